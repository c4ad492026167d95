//! Audio frame descriptors.
//!
//! Native audio is planar 32-bit float: every channel is a contiguous run of
//! `no_samples` floats, and consecutive channels start `channel_stride`
//! bytes apart. The interleaved layouts exist only for the conversion
//! utilities of the native library.

use crate::fourcc::FourCC;
use crate::timing::{TIMECODE_EMPTY, TIMECODE_SYNTHESIZE};
use std::ffi::c_char;
use std::mem::size_of;
use std::ptr;

/// Default sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: i32 = 48_000;

/// Default channel count.
pub const DEFAULT_CHANNELS: i32 = 2;

/// Bytes covered by `channels` planar channels of `samples` samples of width
/// `sample_size`, `stride` bytes apart.
fn planar_len(channels: i32, samples: i32, stride: i32, sample_size: usize) -> Option<usize> {
    let channels = usize::try_from(channels).ok()?;
    let samples = usize::try_from(samples).ok()?;
    let stride = usize::try_from(stride).ok()?;
    if channels == 0 || samples == 0 {
        return Some(0);
    }
    let channel_bytes = samples.checked_mul(sample_size)?;
    stride.checked_mul(channels - 1)?.checked_add(channel_bytes)
}

/// Audio frame descriptor, layout-identical to `NDIlib_audio_frame_v2_t`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AudioFrameV2 {
    /// Sample rate in Hz.
    pub sample_rate: i32,

    /// Number of channels.
    pub no_channels: i32,

    /// Samples per channel.
    pub no_samples: i32,

    /// Timecode in 100 ns ticks.
    pub timecode: i64,

    /// First sample of channel 0, or null for no payload.
    pub data: *mut f32,

    /// Bytes between the starts of two channels.
    pub channel_stride: i32,

    /// Per-frame XML metadata as a NUL-terminated UTF-8 string, or null.
    pub metadata: *const c_char,

    /// Submission time in 100 ns ticks. Only meaningful on received frames.
    pub timestamp: i64,
}

impl AudioFrameV2 {
    pub fn new() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            no_channels: DEFAULT_CHANNELS,
            no_samples: 0,
            timecode: TIMECODE_SYNTHESIZE,
            data: ptr::null_mut(),
            channel_stride: 0,
            metadata: ptr::null(),
            timestamp: TIMECODE_EMPTY,
        }
    }

    /// Reset every field to its baseline value.
    pub fn set_default(&mut self) {
        *self = Self::new();
    }

    /// Describe a tightly packed planar buffer of `no_channels` x `no_samples`.
    pub fn set_layout(&mut self, no_channels: i32, no_samples: i32) {
        self.no_channels = no_channels;
        self.no_samples = no_samples;
        self.channel_stride = no_samples.saturating_mul(size_of::<f32>() as i32);
    }

    pub fn has_data(&self) -> bool {
        !self.data.is_null()
    }

    /// Bytes spanned by all channels, derived from the stride and counts.
    pub fn data_len(&self) -> Option<usize> {
        planar_len(
            self.no_channels,
            self.no_samples,
            self.channel_stride,
            size_of::<f32>(),
        )
    }

    /// Samples of one channel. `None` for a null address or out-of-range
    /// channel.
    ///
    /// # Safety
    ///
    /// A non-null `data` must cover [`Self::data_len`] bytes, suitably
    /// aligned for `f32`, valid for the returned lifetime.
    pub unsafe fn channel(&self, index: usize) -> Option<&[f32]> {
        if self.data.is_null() || index >= usize::try_from(self.no_channels).ok()? {
            return None;
        }
        let stride = usize::try_from(self.channel_stride).ok()?;
        let samples = usize::try_from(self.no_samples).ok()?;
        let offset = stride.checked_mul(index)?;
        // SAFETY: caller guarantees the planar buffer covers every channel.
        unsafe {
            let start = self.data.cast::<u8>().add(offset).cast::<f32>();
            Some(std::slice::from_raw_parts(start, samples))
        }
    }

    /// Point the descriptor at a caller-owned planar buffer.
    pub fn set_data(&mut self, buffer: &mut [f32]) {
        self.data = buffer.as_mut_ptr();
    }
}

impl Default for AudioFrameV2 {
    fn default() -> Self {
        Self::new()
    }
}

/// Audio frame descriptor, layout-identical to `NDIlib_audio_frame_v3_t`.
///
/// Adds a format tag and carries the payload as bytes so compressed formats
/// fit. For [`FourCC::FLTP`] the stride field is the channel stride; for
/// other formats it is the total data size.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AudioFrameV3 {
    /// Sample rate in Hz.
    pub sample_rate: i32,

    /// Number of channels.
    pub no_channels: i32,

    /// Samples per channel.
    pub no_samples: i32,

    /// Timecode in 100 ns ticks.
    pub timecode: i64,

    /// Sample layout.
    pub fourcc: FourCC,

    /// First byte of the payload, or null.
    pub data: *mut u8,

    /// Channel stride for planar float, otherwise the payload size in bytes.
    pub channel_stride_or_data_size: i32,

    /// Per-frame XML metadata, or null.
    pub metadata: *const c_char,

    /// Submission time in 100 ns ticks.
    pub timestamp: i64,
}

impl AudioFrameV3 {
    pub fn new() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            no_channels: DEFAULT_CHANNELS,
            no_samples: 0,
            timecode: TIMECODE_SYNTHESIZE,
            fourcc: FourCC::FLTP,
            data: ptr::null_mut(),
            channel_stride_or_data_size: 0,
            metadata: ptr::null(),
            timestamp: TIMECODE_EMPTY,
        }
    }

    pub fn set_default(&mut self) {
        *self = Self::new();
    }

    pub fn has_data(&self) -> bool {
        !self.data.is_null()
    }

    /// Bytes covered by the payload.
    pub fn data_len(&self) -> Option<usize> {
        if self.fourcc == FourCC::FLTP {
            planar_len(
                self.no_channels,
                self.no_samples,
                self.channel_stride_or_data_size,
                size_of::<f32>(),
            )
        } else {
            usize::try_from(self.channel_stride_or_data_size).ok()
        }
    }

    /// View the payload as bytes.
    ///
    /// # Safety
    ///
    /// A non-null `data` must cover [`Self::data_len`] bytes for the
    /// returned lifetime.
    pub unsafe fn data(&self) -> Option<&[u8]> {
        if self.data.is_null() {
            return None;
        }
        let len = self.data_len()?;
        Some(unsafe { std::slice::from_raw_parts(self.data, len) })
    }
}

impl Default for AudioFrameV3 {
    fn default() -> Self {
        Self::new()
    }
}

/// Interleaved signed 16-bit audio, layout of
/// `NDIlib_audio_frame_interleaved_16s_t`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AudioFrameInterleaved16s {
    pub sample_rate: i32,
    pub no_channels: i32,
    pub no_samples: i32,
    pub timecode: i64,
    /// Headroom in dB applied when converting from float. 0 maps +1.0 to
    /// full scale; 20 is the recommended broadcast value.
    pub reference_level: i32,
    /// `no_samples * no_channels` interleaved samples.
    pub data: *mut i16,
}

impl AudioFrameInterleaved16s {
    pub fn new() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            no_channels: DEFAULT_CHANNELS,
            no_samples: 0,
            timecode: TIMECODE_SYNTHESIZE,
            reference_level: 0,
            data: ptr::null_mut(),
        }
    }

    /// Number of `i16` values the buffer must hold.
    pub fn sample_count(&self) -> Option<usize> {
        let channels = usize::try_from(self.no_channels).ok()?;
        let samples = usize::try_from(self.no_samples).ok()?;
        channels.checked_mul(samples)
    }
}

impl Default for AudioFrameInterleaved16s {
    fn default() -> Self {
        Self::new()
    }
}

/// Interleaved 32-bit float audio, layout of
/// `NDIlib_audio_frame_interleaved_32f_t`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AudioFrameInterleaved32f {
    pub sample_rate: i32,
    pub no_channels: i32,
    pub no_samples: i32,
    pub timecode: i64,
    /// `no_samples * no_channels` interleaved samples.
    pub data: *mut f32,
}

impl AudioFrameInterleaved32f {
    pub fn new() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            no_channels: DEFAULT_CHANNELS,
            no_samples: 0,
            timecode: TIMECODE_SYNTHESIZE,
            data: ptr::null_mut(),
        }
    }

    pub fn sample_count(&self) -> Option<usize> {
        let channels = usize::try_from(self.no_channels).ok()?;
        let samples = usize::try_from(self.no_samples).ok()?;
        channels.checked_mul(samples)
    }
}

impl Default for AudioFrameInterleaved32f {
    fn default() -> Self {
        Self::new()
    }
}

/// Interleaved signed 32-bit audio, layout of
/// `NDIlib_audio_frame_interleaved_32s_t`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AudioFrameInterleaved32s {
    pub sample_rate: i32,
    pub no_channels: i32,
    pub no_samples: i32,
    pub timecode: i64,
    /// Headroom in dB, as for the 16-bit layout.
    pub reference_level: i32,
    pub data: *mut i32,
}

impl AudioFrameInterleaved32s {
    pub fn new() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            no_channels: DEFAULT_CHANNELS,
            no_samples: 0,
            timecode: TIMECODE_SYNTHESIZE,
            reference_level: 0,
            data: ptr::null_mut(),
        }
    }

    pub fn sample_count(&self) -> Option<usize> {
        let channels = usize::try_from(self.no_channels).ok()?;
        let samples = usize::try_from(self.no_samples).ok()?;
        channels.checked_mul(samples)
    }
}

impl Default for AudioFrameInterleaved32s {
    fn default() -> Self {
        Self::new()
    }
}
