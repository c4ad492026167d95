//! Frame synchronizer.
//!
//! Wraps a receiver and turns its push-driven stream into pull-driven
//! capture: video always returns the latest frame (repeating or dropping as
//! needed) and audio is resampled to the requested layout. Captures never
//! block.

use crate::error::{NdiError, NdiResult};
use crate::lifecycle::{FramesyncKind, InstanceState, Lifecycle, Received};
use crate::recv::Receiver;
use crate::symbols::ep;
use lib_ndi_types::{AudioFrameV2, AudioFrameV3, FrameFormat, VideoFrameV2};
use std::marker::PhantomData;

/// A frame synchronizer holding its receiver exclusively.
///
/// The receiver cannot be captured from directly while this exists, and
/// cannot be destroyed before it.
#[derive(Debug)]
pub struct Framesync<'r> {
    inner: Lifecycle<FramesyncKind>,
    _receiver: PhantomData<&'r mut Receiver>,
}

impl<'r> Framesync<'r> {
    pub fn create(receiver: &'r mut Receiver) -> NdiResult<Self> {
        let recv = receiver.lifecycle();
        let handle = recv.handle()?;
        let binding = recv.binding();
        let create = binding.entry::<ep::FramesyncCreate>()?;
        let raw = unsafe { create(handle.as_ptr()) };
        Ok(Self {
            inner: Lifecycle::adopt(binding.clone(), raw)?,
            _receiver: PhantomData,
        })
    }

    pub fn state(&self) -> InstanceState {
        self.inner.state()
    }

    /// Latest video frame. Before the first frame arrives the descriptor
    /// has no data.
    pub fn capture_video(&self, field: FrameFormat) -> NdiResult<Received<'_, VideoFrameV2>> {
        let handle = self.inner.handle()?;
        let binding = self.inner.binding();
        let capture = binding.entry::<ep::FramesyncCaptureVideo>()?;
        let free = binding.entry::<ep::FramesyncFreeVideo>()?;
        let mut frame = VideoFrameV2::new();
        unsafe { capture(handle.as_ptr(), &mut frame, field) };
        Ok(unsafe { Received::new(frame, handle.as_ptr(), free) })
    }

    /// Exactly `no_samples` of audio. Zeros ask for the source's own rate
    /// and channel count; silence is returned while nothing is buffered.
    pub fn capture_audio(
        &self,
        sample_rate: i32,
        no_channels: i32,
        no_samples: i32,
    ) -> NdiResult<Received<'_, AudioFrameV2>> {
        check_audio_request(sample_rate, no_channels, no_samples)?;
        let handle = self.inner.handle()?;
        let binding = self.inner.binding();
        let capture = binding.entry::<ep::FramesyncCaptureAudio>()?;
        let free = binding.entry::<ep::FramesyncFreeAudio>()?;
        let mut frame = AudioFrameV2::new();
        unsafe { capture(handle.as_ptr(), &mut frame, sample_rate, no_channels, no_samples) };
        Ok(unsafe { Received::new(frame, handle.as_ptr(), free) })
    }

    /// As [`Self::capture_audio`], in the v3 descriptor.
    pub fn capture_audio_v2(
        &self,
        sample_rate: i32,
        no_channels: i32,
        no_samples: i32,
    ) -> NdiResult<Received<'_, AudioFrameV3>> {
        check_audio_request(sample_rate, no_channels, no_samples)?;
        let handle = self.inner.handle()?;
        let binding = self.inner.binding();
        let capture = binding.entry::<ep::FramesyncCaptureAudioV2>()?;
        let free = binding.entry::<ep::FramesyncFreeAudioV2>()?;
        let mut frame = AudioFrameV3::new();
        unsafe { capture(handle.as_ptr(), &mut frame, sample_rate, no_channels, no_samples) };
        Ok(unsafe { Received::new(frame, handle.as_ptr(), free) })
    }

    /// Samples currently buffered per channel.
    pub fn audio_queue_depth(&self) -> NdiResult<usize> {
        let handle = self.inner.handle()?;
        let depth = self.inner.binding().entry::<ep::FramesyncAudioQueueDepth>()?;
        let samples = unsafe { depth(handle.as_ptr()) };
        Ok(usize::try_from(samples).unwrap_or(0))
    }

    pub fn destroy(&mut self) -> NdiResult<()> {
        self.inner.destroy()
    }
}

fn check_audio_request(sample_rate: i32, no_channels: i32, no_samples: i32) -> NdiResult<()> {
    if sample_rate < 0 || no_channels < 0 {
        return Err(NdiError::invalid_parameter(
            "audio",
            "sample rate and channel count must not be negative",
        ));
    }
    if no_samples <= 0 {
        return Err(NdiError::invalid_parameter("no_samples", "must be positive"));
    }
    Ok(())
}
