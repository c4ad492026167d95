//! Publishing video, audio and metadata.
//!
//! Payloads are borrowed for the duration of a call. The synchronous sends
//! return once the native side is done reading. Asynchronous video is sent
//! inside an [`AsyncVideoScope`], whose payloads stay borrowed until the
//! scope has told the native side to release them.

use crate::error::{NdiError, NdiResult};
use crate::lifecycle::{FreeFn, InstanceState, Lifecycle, Received, SenderKind};
use crate::loader::Binding;
use crate::raw::{SendCreateRaw, SourceRaw};
use crate::strings::CStringArena;
use crate::symbols::ep;
use lib_ndi_types::{
    AudioFrameInterleaved16s, AudioFrameInterleaved32f, AudioFrameInterleaved32s, AudioFrameV2,
    AudioFrameV3, FrameType, MetadataFrame, SendCreateSettings, Source, Tally, VideoFrameV2,
};
use std::ffi::{c_char, CStr, CString};
use std::marker::PhantomData;
use std::mem::size_of_val;
use std::ptr;
use std::sync::Arc;

/// A sender instance.
#[derive(Debug)]
pub struct Sender {
    inner: Lifecycle<SenderKind>,
}

impl Sender {
    pub fn create(binding: &Arc<Binding>, settings: &SendCreateSettings) -> NdiResult<Self> {
        let create = binding.entry::<ep::SendCreate>()?;
        let mut arena = CStringArena::new();
        let record = SendCreateRaw::lower(settings, &mut arena)?;
        let handle = unsafe { create(&record) };
        tracing::debug!(name = %settings.name, "Creating sender");
        Ok(Self {
            inner: Lifecycle::adopt(binding.clone(), handle)?,
        })
    }

    pub fn state(&self) -> InstanceState {
        self.inner.state()
    }

    /// Send one video frame synchronously.
    ///
    /// The payload size is derived from `frame` and `data` must cover it.
    /// The pointers in `frame` are ignored; `data` and `metadata` are sent
    /// instead. The buffer may be reused as soon as this returns.
    pub fn send_video(
        &self,
        frame: &VideoFrameV2,
        data: &[u8],
        metadata: Option<&CStr>,
    ) -> NdiResult<()> {
        let desc = video_with_payload(frame, data, metadata)?;
        // SAFETY: `desc` only points at `data` and `metadata`, both borrowed
        // for the call.
        unsafe { self.send_video_raw(&desc) }
    }

    /// Send a descriptor whose pointers the caller manages.
    ///
    /// # Safety
    ///
    /// `frame.data` must be null or cover [`VideoFrameV2::data_len`] bytes,
    /// and `frame.metadata` must be null or a NUL-terminated string.
    pub unsafe fn send_video_raw(&self, frame: &VideoFrameV2) -> NdiResult<()> {
        let handle = self.inner.handle()?;
        let send = self.inner.binding().entry::<ep::SendSendVideoV2>()?;
        unsafe { send(handle.as_ptr(), frame) };
        Ok(())
    }

    /// Run `during` with an asynchronous video queue.
    ///
    /// Frames queued through the scope are still read after
    /// [`AsyncVideoScope::send`] returns, so their payloads must outlive
    /// this call. The queue is flushed before this returns, also when
    /// `during` panics.
    pub fn send_video_async<'buf, R>(
        &self,
        during: impl FnOnce(&mut AsyncVideoScope<'_, 'buf>) -> R,
    ) -> NdiResult<R> {
        self.inner.handle()?;
        let mut scope = AsyncVideoScope {
            sender: self,
            pending: false,
            _payload: PhantomData,
        };
        let out = during(&mut scope);
        scope.flush()?;
        Ok(out)
    }

    /// Send planar float audio.
    pub fn send_audio_v2(
        &self,
        frame: &AudioFrameV2,
        data: &[f32],
        metadata: Option<&CStr>,
    ) -> NdiResult<()> {
        let needed = frame
            .data_len()
            .ok_or_else(|| NdiError::invalid_parameter("frame", "negative audio layout"))?;
        check_payload(needed, size_of_val(data))?;
        let mut desc = *frame;
        desc.data = data.as_ptr().cast_mut();
        desc.metadata = metadata_ptr(metadata);

        let handle = self.inner.handle()?;
        let send = self.inner.binding().entry::<ep::SendSendAudioV2>()?;
        unsafe { send(handle.as_ptr(), &desc) };
        Ok(())
    }

    /// Send audio in any format the v3 descriptor can describe.
    pub fn send_audio_v3(
        &self,
        frame: &AudioFrameV3,
        data: &[u8],
        metadata: Option<&CStr>,
    ) -> NdiResult<()> {
        let needed = frame
            .data_len()
            .ok_or_else(|| NdiError::invalid_parameter("frame", "negative audio layout"))?;
        check_payload(needed, data.len())?;
        let mut desc = *frame;
        desc.data = data.as_ptr().cast_mut();
        desc.metadata = metadata_ptr(metadata);

        let handle = self.inner.handle()?;
        let send = self.inner.binding().entry::<ep::SendSendAudioV3>()?;
        unsafe { send(handle.as_ptr(), &desc) };
        Ok(())
    }

    pub fn send_audio_interleaved_16s(
        &self,
        frame: &AudioFrameInterleaved16s,
        data: &[i16],
    ) -> NdiResult<()> {
        check_samples(frame.sample_count(), data.len())?;
        let mut desc = *frame;
        desc.data = data.as_ptr().cast_mut();

        let handle = self.inner.handle()?;
        let send = self.inner.binding().entry::<ep::UtilSendSendAudioInterleaved16s>()?;
        unsafe { send(handle.as_ptr(), &desc) };
        Ok(())
    }

    pub fn send_audio_interleaved_32f(
        &self,
        frame: &AudioFrameInterleaved32f,
        data: &[f32],
    ) -> NdiResult<()> {
        check_samples(frame.sample_count(), data.len())?;
        let mut desc = *frame;
        desc.data = data.as_ptr().cast_mut();

        let handle = self.inner.handle()?;
        let send = self.inner.binding().entry::<ep::UtilSendSendAudioInterleaved32f>()?;
        unsafe { send(handle.as_ptr(), &desc) };
        Ok(())
    }

    pub fn send_audio_interleaved_32s(
        &self,
        frame: &AudioFrameInterleaved32s,
        data: &[i32],
    ) -> NdiResult<()> {
        check_samples(frame.sample_count(), data.len())?;
        let mut desc = *frame;
        desc.data = data.as_ptr().cast_mut();

        let handle = self.inner.handle()?;
        let send = self.inner.binding().entry::<ep::UtilSendSendAudioInterleaved32s>()?;
        unsafe { send(handle.as_ptr(), &desc) };
        Ok(())
    }

    /// Send an XML metadata message to every connected receiver.
    pub fn send_metadata(&self, xml: &str, timecode: i64) -> NdiResult<()> {
        let text = metadata_text(xml)?;
        let mut frame = MetadataFrame::new();
        frame.timecode = timecode;
        frame.set_text(&text);

        let handle = self.inner.handle()?;
        let send = self.inner.binding().entry::<ep::SendSendMetadata>()?;
        unsafe { send(handle.as_ptr(), &frame) };
        Ok(())
    }

    /// Receive metadata sent upstream by receivers.
    ///
    /// `Ok(None)` when nothing arrived within `timeout_ms`.
    pub fn capture(&self, timeout_ms: u32) -> NdiResult<Option<Received<'_, MetadataFrame>>> {
        let handle = self.inner.handle()?;
        let binding = self.inner.binding();
        let capture = binding.entry::<ep::SendCapture>()?;
        let free: FreeFn<MetadataFrame> = binding.entry::<ep::SendFreeMetadata>()?;

        let mut frame = MetadataFrame::new();
        let raw = unsafe { capture(handle.as_ptr(), &mut frame, timeout_ms) };
        let frame_type = FrameType::from_raw(raw);
        tracing::trace!(?frame_type, "Sender capture");

        let is_metadata = frame_type == Some(FrameType::Metadata);
        // Anything the call wrote is released, whatever it returned.
        let guard = (is_metadata || frame.has_data())
            .then(|| unsafe { Received::new(frame, handle.as_ptr(), free) });

        match frame_type {
            Some(FrameType::Metadata) => Ok(guard),
            Some(_) => Ok(None),
            None => Err(NdiError::UnexpectedFrameType(raw)),
        }
    }

    /// Tally state, once it changes or `timeout_ms` elapses.
    ///
    /// `Ok(None)` on timeout.
    pub fn tally(&self, timeout_ms: u32) -> NdiResult<Option<Tally>> {
        let handle = self.inner.handle()?;
        let get = self.inner.binding().entry::<ep::SendGetTally>()?;
        let mut tally = Tally::default();
        let changed = unsafe { get(handle.as_ptr(), &mut tally, timeout_ms) };
        Ok(changed.then_some(tally))
    }

    /// Number of connected receivers, waiting up to `timeout_ms` for at
    /// least one.
    pub fn connections(&self, timeout_ms: u32) -> NdiResult<usize> {
        let handle = self.inner.handle()?;
        let get = self.inner.binding().entry::<ep::SendGetNoConnections>()?;
        let count = unsafe { get(handle.as_ptr(), timeout_ms) };
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Drop all metadata handed to new connections.
    pub fn clear_connection_metadata(&self) -> NdiResult<()> {
        let handle = self.inner.handle()?;
        let clear = self.inner.binding().entry::<ep::SendClearConnectionMetadata>()?;
        unsafe { clear(handle.as_ptr()) };
        Ok(())
    }

    /// Add metadata sent to every receiver when it connects.
    pub fn add_connection_metadata(&self, xml: &str) -> NdiResult<()> {
        let text = metadata_text(xml)?;
        let mut frame = MetadataFrame::new();
        frame.set_text(&text);

        let handle = self.inner.handle()?;
        let add = self.inner.binding().entry::<ep::SendAddConnectionMetadata>()?;
        unsafe { add(handle.as_ptr(), &frame) };
        Ok(())
    }

    /// Source receivers switch to if this sender goes away. `None` clears it.
    pub fn set_failover(&self, source: Option<&Source>) -> NdiResult<()> {
        let handle = self.inner.handle()?;
        let set = self.inner.binding().entry::<ep::SendSetFailover>()?;
        let mut arena = CStringArena::new();
        let record = source.map(|s| SourceRaw::lower(s, &mut arena)).transpose()?;
        let record_ptr = record.as_ref().map_or(ptr::null(), |r| r as *const SourceRaw);
        unsafe { set(handle.as_ptr(), record_ptr) };
        Ok(())
    }

    /// The name this sender is published under.
    pub fn source(&self) -> NdiResult<Source> {
        let handle = self.inner.handle()?;
        let get = self.inner.binding().entry::<ep::SendGetSourceName>()?;
        let record = unsafe { get(handle.as_ptr()) };
        if record.is_null() {
            return Ok(Source::default());
        }
        // SAFETY: the record is owned by the sender and valid while it lives.
        unsafe { (*record).to_source() }
    }

    pub fn destroy(&mut self) -> NdiResult<()> {
        self.inner.destroy()
    }
}

/// Asynchronous video queue handed out by [`Sender::send_video_async`].
///
/// The native side keeps reading the last queued frame until the next one
/// is queued or the queue is flushed. Payloads are therefore borrowed for
/// `'buf`, which outlives the whole scope.
pub struct AsyncVideoScope<'s, 'buf> {
    sender: &'s Sender,
    pending: bool,
    _payload: PhantomData<&'buf [u8]>,
}

impl<'buf> AsyncVideoScope<'_, 'buf> {
    /// Queue a frame and return without waiting for it to be read.
    pub fn send(
        &mut self,
        frame: &VideoFrameV2,
        data: &'buf [u8],
        metadata: Option<&'buf CStr>,
    ) -> NdiResult<()> {
        let desc = video_with_payload(frame, data, metadata)?;
        let handle = self.sender.inner.handle()?;
        let send = self.sender.inner.binding().entry::<ep::SendSendVideoAsyncV2>()?;
        unsafe { send(handle.as_ptr(), &desc) };
        self.pending = true;
        Ok(())
    }

    /// Wait until the native side has released the last queued frame.
    pub fn flush(&mut self) -> NdiResult<()> {
        if !self.pending {
            return Ok(());
        }
        self.pending = false;
        let handle = self.sender.inner.handle()?;
        let send = self.sender.inner.binding().entry::<ep::SendSendVideoAsyncV2>()?;
        unsafe { send(handle.as_ptr(), ptr::null()) };
        Ok(())
    }
}

impl Drop for AsyncVideoScope<'_, '_> {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!(error = %e, "Error flushing asynchronous video");
        }
    }
}

/// Copy of `frame` pointing at `data` and `metadata`, after checking that
/// `data` covers the payload the descriptor describes.
fn video_with_payload(
    frame: &VideoFrameV2,
    data: &[u8],
    metadata: Option<&CStr>,
) -> NdiResult<VideoFrameV2> {
    let needed = frame.data_len().ok_or_else(|| {
        NdiError::invalid_parameter("frame", format!("cannot size a {} frame", frame.fourcc))
    })?;
    check_payload(needed, data.len())?;
    let mut desc = *frame;
    desc.data = data.as_ptr().cast_mut();
    desc.metadata = metadata_ptr(metadata);
    Ok(desc)
}

fn metadata_ptr(metadata: Option<&CStr>) -> *const c_char {
    metadata.map_or(ptr::null(), CStr::as_ptr)
}

fn check_payload(needed: usize, actual: usize) -> NdiResult<()> {
    if actual < needed {
        return Err(NdiError::BufferTooSmall { needed, actual });
    }
    Ok(())
}

fn check_samples(needed: Option<usize>, actual: usize) -> NdiResult<()> {
    let needed =
        needed.ok_or_else(|| NdiError::invalid_parameter("frame", "negative audio layout"))?;
    check_payload(needed, actual)
}

pub(crate) fn metadata_text(xml: &str) -> NdiResult<CString> {
    CString::new(xml).map_err(|_| NdiError::invalid_parameter("xml", "contains a NUL byte"))
}
