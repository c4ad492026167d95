//! Video frame descriptor.

use crate::fourcc::FourCC;
use crate::timing::{FrameRate, TIMECODE_EMPTY, TIMECODE_SYNTHESIZE};
use std::ffi::c_char;
use std::ptr;

/// Field layout of a video frame.
///
/// Kept as a transparent integer rather than a Rust enum because received
/// frames carry whatever value the native side wrote.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameFormat(pub i32);

impl FrameFormat {
    /// Both fields, field 0 on even lines and field 1 on odd lines.
    pub const INTERLEAVED: Self = Self(0);
    /// A progressive frame.
    pub const PROGRESSIVE: Self = Self(1);
    /// Field 0 only.
    pub const FIELD_0: Self = Self(2);
    /// Field 1 only.
    pub const FIELD_1: Self = Self(3);

    /// Whether this is one of the four formats the native library defines.
    pub fn is_known(self) -> bool {
        (0..=3).contains(&self.0)
    }
}

/// Video frame descriptor, layout-identical to `NDIlib_video_frame_v2_t`.
///
/// The descriptor never owns the buffer behind `data`. When sending, the
/// caller owns it; when receiving, the native library owns it until the
/// matching free entry point is called.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VideoFrameV2 {
    /// Horizontal resolution in pixels.
    pub xres: i32,

    /// Vertical resolution in lines.
    pub yres: i32,

    /// Pixel layout.
    pub fourcc: FourCC,

    /// Frame rate numerator, e.g. 30000 for NTSC.
    pub frame_rate_n: i32,

    /// Frame rate denominator, e.g. 1001 for NTSC.
    pub frame_rate_d: i32,

    /// Picture aspect ratio (16:9 = 1.778). Zero means square pixels.
    pub picture_aspect_ratio: f32,

    /// Progressive, interleaved or single field.
    pub frame_format_type: FrameFormat,

    /// Timecode in 100 ns ticks.
    pub timecode: i64,

    /// First byte of the pixel data, or null for no payload.
    pub data: *mut u8,

    /// Bytes between the starts of two lines of the first plane.
    pub line_stride: i32,

    /// Per-frame XML metadata as a NUL-terminated UTF-8 string, or null.
    pub metadata: *const c_char,

    /// Submission time in 100 ns ticks. Only meaningful on received frames.
    pub timestamp: i64,
}

impl VideoFrameV2 {
    /// Create a descriptor with default values.
    pub fn new() -> Self {
        let rate = FrameRate::NTSC_2997;
        Self {
            xres: 0,
            yres: 0,
            fourcc: FourCC::UYVA,
            frame_rate_n: rate.n,
            frame_rate_d: rate.d,
            picture_aspect_ratio: 0.0,
            frame_format_type: FrameFormat::PROGRESSIVE,
            timecode: TIMECODE_SYNTHESIZE,
            data: ptr::null_mut(),
            line_stride: 0,
            metadata: ptr::null(),
            timestamp: TIMECODE_EMPTY,
        }
    }

    /// Reset every field to its baseline value.
    pub fn set_default(&mut self) {
        *self = Self::new();
    }

    /// Frame rate as a rational.
    pub fn frame_rate(&self) -> FrameRate {
        FrameRate::new(self.frame_rate_n, self.frame_rate_d)
    }

    pub fn set_frame_rate(&mut self, rate: FrameRate) {
        self.frame_rate_n = rate.n;
        self.frame_rate_d = rate.d;
    }

    /// Set resolution and format together, deriving the line stride for
    /// packed layouts.
    pub fn set_geometry(&mut self, xres: i32, yres: i32, fourcc: FourCC) {
        self.xres = xres;
        self.yres = yres;
        self.fourcc = fourcc;
        self.line_stride = match fourcc {
            FourCC::BGRA | FourCC::BGRX | FourCC::RGBA | FourCC::RGBX => xres.saturating_mul(4),
            FourCC::UYVY | FourCC::UYVA => xres.saturating_mul(2),
            FourCC::P216 | FourCC::PA16 => xres.saturating_mul(2),
            _ => xres,
        };
    }

    /// Whether a payload address is present.
    pub fn has_data(&self) -> bool {
        !self.data.is_null()
    }

    /// Size of the payload described by this descriptor, in bytes.
    ///
    /// Derived from `line_stride`, `yres` and the pixel layout. Returns `None`
    /// for negative dimensions, unknown layouts, or overflow.
    pub fn data_len(&self) -> Option<usize> {
        let stride = usize::try_from(self.line_stride).ok()?;
        let yres = usize::try_from(self.yres).ok()?;
        self.fourcc.frame_size(stride, yres)
    }

    /// View the payload as bytes.
    ///
    /// Returns `None` when the address is null or the size cannot be
    /// derived. A null address is never dereferenced.
    ///
    /// # Safety
    ///
    /// A non-null `data` must point to at least [`Self::data_len`] readable
    /// bytes that stay valid and unmodified for the returned lifetime.
    pub unsafe fn data(&self) -> Option<&[u8]> {
        if self.data.is_null() {
            return None;
        }
        let len = self.data_len()?;
        // SAFETY: caller guarantees the buffer covers `len` bytes.
        Some(unsafe { std::slice::from_raw_parts(self.data, len) })
    }

    /// Point the descriptor at a caller-owned buffer.
    ///
    /// The descriptor does not borrow `buffer`; keeping it alive for as long
    /// as the descriptor is handed to native code is up to the caller.
    pub fn set_data(&mut self, buffer: &mut [u8]) {
        self.data = buffer.as_mut_ptr();
    }
}

impl Default for VideoFrameV2 {
    fn default() -> Self {
        Self::new()
    }
}
