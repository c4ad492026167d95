//! Receiving from a source.
//!
//! Captured frames are handed out as [`Received`] guards. Each guard is
//! released through the free entry point matching the capture call that
//! filled it: video and audio from `recv_capture_v2` through the v2 frees,
//! audio from `recv_capture_v3` through `recv_free_audio_v3`.

use crate::error::{NdiError, NdiResult};
use crate::lifecycle::{FreeFn, InstanceHandle, InstanceState, Lifecycle, Received, ReceiverKind};
use crate::loader::Binding;
use crate::raw::{RecvCreateV3Raw, SourceRaw};
use crate::send::metadata_text;
use crate::strings::{string_from_transient, CStringArena};
use crate::symbols::ep;
use lib_ndi_types::{
    AudioFrameV2, AudioFrameV3, FrameType, MetadataFrame, RecordingTimes, RecvCreateSettings,
    RecvPerformance, RecvQueue, Source, Tally, VideoFrameV2,
};
use std::ffi::{c_char, c_void, CString};
use std::ptr;
use std::sync::Arc;

/// Which descriptors a capture call may fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureKinds {
    pub video: bool,
    pub audio: bool,
    pub metadata: bool,
}

impl CaptureKinds {
    pub const ALL: Self = Self {
        video: true,
        audio: true,
        metadata: true,
    };
    pub const VIDEO: Self = Self {
        video: true,
        audio: false,
        metadata: false,
    };
    pub const AUDIO: Self = Self {
        video: false,
        audio: true,
        metadata: false,
    };
    pub const METADATA: Self = Self {
        video: false,
        audio: false,
        metadata: true,
    };
}

impl Default for CaptureKinds {
    fn default() -> Self {
        Self::ALL
    }
}

/// Result of one capture call.
///
/// `A` is the audio descriptor of the capture version used.
#[derive(Debug)]
pub enum Capture<'r, A = AudioFrameV2> {
    /// Nothing arrived within the timeout.
    None,
    Video(Received<'r, VideoFrameV2>),
    Audio(Received<'r, A>),
    Metadata(Received<'r, MetadataFrame>),
    /// The connection was lost.
    Error,
    /// Source settings changed.
    StatusChange,
}

impl<A> Capture<'_, A> {
    pub fn frame_type(&self) -> FrameType {
        match self {
            Self::None => FrameType::None,
            Self::Video(_) => FrameType::Video,
            Self::Audio(_) => FrameType::Audio,
            Self::Metadata(_) => FrameType::Metadata,
            Self::Error => FrameType::Error,
            Self::StatusChange => FrameType::StatusChange,
        }
    }
}

/// Audio descriptors a capture call can fill.
trait AudioDescriptor: Copy {
    fn empty() -> Self;
    fn has_data(&self) -> bool;
}

impl AudioDescriptor for AudioFrameV2 {
    fn empty() -> Self {
        Self::new()
    }

    fn has_data(&self) -> bool {
        AudioFrameV2::has_data(self)
    }
}

impl AudioDescriptor for AudioFrameV3 {
    fn empty() -> Self {
        Self::new()
    }

    fn has_data(&self) -> bool {
        AudioFrameV3::has_data(self)
    }
}

/// Free entry points matching one capture version.
struct Frees<A> {
    video: FreeFn<VideoFrameV2>,
    audio: FreeFn<A>,
    metadata: FreeFn<MetadataFrame>,
}

/// A receiver instance.
#[derive(Debug)]
pub struct Receiver {
    inner: Lifecycle<ReceiverKind>,
}

impl Receiver {
    /// Create a receiver. An empty source leaves it idle until
    /// [`Self::connect`].
    pub fn create(binding: &Arc<Binding>, settings: &RecvCreateSettings) -> NdiResult<Self> {
        let create = binding.entry::<ep::RecvCreateV3>()?;
        let mut arena = CStringArena::new();
        let record = RecvCreateV3Raw::lower(settings, &mut arena)?;
        let handle = unsafe { create(&record) };
        tracing::debug!(source = %settings.source.name, "Creating receiver");
        Ok(Self {
            inner: Lifecycle::adopt(binding.clone(), handle)?,
        })
    }

    pub fn state(&self) -> InstanceState {
        self.inner.state()
    }

    pub(crate) fn lifecycle(&self) -> &Lifecycle<ReceiverKind> {
        &self.inner
    }

    /// Switch to `source`, or disconnect with `None`.
    pub fn connect(&self, source: Option<&Source>) -> NdiResult<()> {
        let handle = self.inner.handle()?;
        let connect = self.inner.binding().entry::<ep::RecvConnect>()?;
        let mut arena = CStringArena::new();
        let record = source.map(|s| SourceRaw::lower(s, &mut arena)).transpose()?;
        let record_ptr = record.as_ref().map_or(ptr::null(), |r| r as *const SourceRaw);
        unsafe { connect(handle.as_ptr(), record_ptr) };
        Ok(())
    }

    /// Wait up to `timeout_ms` for one frame of the requested kinds.
    ///
    /// A timeout yields `Ok(Capture::None)`, not an error.
    pub fn capture(&self, kinds: CaptureKinds, timeout_ms: u32) -> NdiResult<Capture<'_>> {
        let handle = self.inner.handle()?;
        let binding = self.inner.binding();
        let capture = binding.entry::<ep::RecvCaptureV2>()?;
        let frees = Frees {
            video: binding.entry::<ep::RecvFreeVideoV2>()?,
            audio: binding.entry::<ep::RecvFreeAudioV2>()?,
            metadata: binding.entry::<ep::RecvFreeMetadata>()?,
        };
        self.capture_with(handle, kinds, frees, |v, a, m| unsafe {
            capture(handle.as_ptr(), v, a, m, timeout_ms)
        })
    }

    /// As [`Self::capture`], with audio in the v3 descriptor.
    pub fn capture_v3(
        &self,
        kinds: CaptureKinds,
        timeout_ms: u32,
    ) -> NdiResult<Capture<'_, AudioFrameV3>> {
        let handle = self.inner.handle()?;
        let binding = self.inner.binding();
        let capture = binding.entry::<ep::RecvCaptureV3>()?;
        let frees = Frees {
            video: binding.entry::<ep::RecvFreeVideoV2>()?,
            audio: binding.entry::<ep::RecvFreeAudioV3>()?,
            metadata: binding.entry::<ep::RecvFreeMetadata>()?,
        };
        self.capture_with(handle, kinds, frees, |v, a, m| unsafe {
            capture(handle.as_ptr(), v, a, m, timeout_ms)
        })
    }

    fn capture_with<A: AudioDescriptor>(
        &self,
        handle: InstanceHandle<ReceiverKind>,
        kinds: CaptureKinds,
        frees: Frees<A>,
        call: impl FnOnce(*mut VideoFrameV2, *mut A, *mut MetadataFrame) -> i32,
    ) -> NdiResult<Capture<'_, A>> {
        let mut video = VideoFrameV2::new();
        let mut audio = A::empty();
        let mut metadata = MetadataFrame::new();

        let raw = call(
            if kinds.video { &mut video as *mut _ } else { ptr::null_mut() },
            if kinds.audio { &mut audio as *mut _ } else { ptr::null_mut() },
            if kinds.metadata { &mut metadata as *mut _ } else { ptr::null_mut() },
        );
        let frame_type = FrameType::from_raw(raw);
        tracing::trace!(?frame_type, raw, "Receiver capture");

        // Take ownership of every descriptor the call reported or wrote
        // into, so a partial fill is released even on timeout.
        let instance = handle.as_ptr();
        let video = (kinds.video && (frame_type == Some(FrameType::Video) || video.has_data()))
            .then(|| unsafe { Received::new(video, instance, frees.video) });
        let audio = (kinds.audio && (frame_type == Some(FrameType::Audio) || audio.has_data()))
            .then(|| unsafe { Received::new(audio, instance, frees.audio) });
        let metadata = (kinds.metadata
            && (frame_type == Some(FrameType::Metadata) || metadata.has_data()))
        .then(|| unsafe { Received::new(metadata, instance, frees.metadata) });

        let unexpected = NdiError::UnexpectedFrameType(raw);
        match frame_type {
            Some(FrameType::None) => Ok(Capture::None),
            Some(FrameType::Video) => video.map(Capture::Video).ok_or(unexpected),
            Some(FrameType::Audio) => audio.map(Capture::Audio).ok_or(unexpected),
            Some(FrameType::Metadata) => metadata.map(Capture::Metadata).ok_or(unexpected),
            Some(FrameType::Error) => Ok(Capture::Error),
            Some(FrameType::StatusChange) => Ok(Capture::StatusChange),
            None => Err(unexpected),
        }
    }

    /// Send metadata upstream to the source. `false` when not connected.
    pub fn send_metadata(&self, xml: &str) -> NdiResult<bool> {
        let text = metadata_text(xml)?;
        let mut frame = MetadataFrame::new();
        frame.set_text(&text);

        let handle = self.inner.handle()?;
        let send = self.inner.binding().entry::<ep::RecvSendMetadata>()?;
        Ok(unsafe { send(handle.as_ptr(), &frame) })
    }

    /// Report this receiver's tally to the source.
    pub fn set_tally(&self, tally: Tally) -> NdiResult<bool> {
        let handle = self.inner.handle()?;
        let set = self.inner.binding().entry::<ep::RecvSetTally>()?;
        Ok(unsafe { set(handle.as_ptr(), &tally) })
    }

    /// Frames received and frames dropped so far.
    pub fn performance(&self) -> NdiResult<(RecvPerformance, RecvPerformance)> {
        let handle = self.inner.handle()?;
        let get = self.inner.binding().entry::<ep::RecvGetPerformance>()?;
        let mut total = RecvPerformance::default();
        let mut dropped = RecvPerformance::default();
        unsafe { get(handle.as_ptr(), &mut total, &mut dropped) };
        Ok((total, dropped))
    }

    /// Frames waiting to be captured.
    pub fn queue(&self) -> NdiResult<RecvQueue> {
        let handle = self.inner.handle()?;
        let get = self.inner.binding().entry::<ep::RecvGetQueue>()?;
        let mut queue = RecvQueue::default();
        unsafe { get(handle.as_ptr(), &mut queue) };
        Ok(queue)
    }

    pub fn connections(&self) -> NdiResult<usize> {
        let handle = self.inner.handle()?;
        let get = self.inner.binding().entry::<ep::RecvGetNoConnections>()?;
        let count = unsafe { get(handle.as_ptr()) };
        Ok(usize::try_from(count).unwrap_or(0))
    }

    pub fn clear_connection_metadata(&self) -> NdiResult<()> {
        let handle = self.inner.handle()?;
        let clear = self.inner.binding().entry::<ep::RecvClearConnectionMetadata>()?;
        unsafe { clear(handle.as_ptr()) };
        Ok(())
    }

    /// Add metadata sent to the source whenever this receiver connects.
    pub fn add_connection_metadata(&self, xml: &str) -> NdiResult<()> {
        let text = metadata_text(xml)?;
        let mut frame = MetadataFrame::new();
        frame.set_text(&text);

        let handle = self.inner.handle()?;
        let add = self.inner.binding().entry::<ep::RecvAddConnectionMetadata>()?;
        unsafe { add(handle.as_ptr(), &frame) };
        Ok(())
    }

    /// URL of the source's web configuration page, if it has one.
    pub fn web_control(&self) -> NdiResult<Option<String>> {
        let handle = self.inner.handle()?;
        let get = self.inner.binding().entry::<ep::RecvGetWebControl>()?;
        let ptr = unsafe { get(handle.as_ptr()) };
        self.take_string(handle.as_ptr(), ptr)
    }

    /// Copy a string the caller owns, then hand it back to the library.
    fn take_string(&self, instance: *mut c_void, ptr: *const c_char) -> NdiResult<Option<String>> {
        if ptr.is_null() {
            return Ok(None);
        }
        let free = self.inner.binding().entry::<ep::RecvFreeString>()?;
        // SAFETY: valid until freed below.
        let copied = unsafe { string_from_transient(ptr) };
        unsafe { free(instance, ptr) };
        copied
    }

    fn call_bool<E>(&self) -> NdiResult<bool>
    where
        E: crate::symbols::EntryPoint<Fn = unsafe extern "C" fn(*mut c_void) -> bool>,
    {
        let handle = self.inner.handle()?;
        let call = self.inner.binding().entry::<E>()?;
        Ok(unsafe { call(handle.as_ptr()) })
    }

    fn call_bool_f32<E>(&self, value: f32) -> NdiResult<bool>
    where
        E: crate::symbols::EntryPoint<Fn = unsafe extern "C" fn(*mut c_void, f32) -> bool>,
    {
        let handle = self.inner.handle()?;
        let call = self.inner.binding().entry::<E>()?;
        Ok(unsafe { call(handle.as_ptr(), value) })
    }

    fn call_bool_f32_f32<E>(&self, a: f32, b: f32) -> NdiResult<bool>
    where
        E: crate::symbols::EntryPoint<Fn = unsafe extern "C" fn(*mut c_void, f32, f32) -> bool>,
    {
        let handle = self.inner.handle()?;
        let call = self.inner.binding().entry::<E>()?;
        Ok(unsafe { call(handle.as_ptr(), a, b) })
    }

    // PTZ. Every control returns whether the source accepted it; values are
    // normalized as the native documentation describes (zoom 0..1, pan and
    // tilt -1..1, speeds -1..1).

    pub fn ptz_is_supported(&self) -> NdiResult<bool> {
        self.call_bool::<ep::RecvPtzIsSupported>()
    }

    pub fn ptz_zoom(&self, zoom: f32) -> NdiResult<bool> {
        self.call_bool_f32::<ep::RecvPtzZoom>(zoom)
    }

    pub fn ptz_zoom_speed(&self, speed: f32) -> NdiResult<bool> {
        self.call_bool_f32::<ep::RecvPtzZoomSpeed>(speed)
    }

    pub fn ptz_pan_tilt(&self, pan: f32, tilt: f32) -> NdiResult<bool> {
        self.call_bool_f32_f32::<ep::RecvPtzPanTilt>(pan, tilt)
    }

    pub fn ptz_pan_tilt_speed(&self, pan_speed: f32, tilt_speed: f32) -> NdiResult<bool> {
        self.call_bool_f32_f32::<ep::RecvPtzPanTiltSpeed>(pan_speed, tilt_speed)
    }

    /// Store the current position as preset `preset` (0..=99).
    pub fn ptz_store_preset(&self, preset: u8) -> NdiResult<bool> {
        let handle = self.inner.handle()?;
        let store = self.inner.binding().entry::<ep::RecvPtzStorePreset>()?;
        Ok(unsafe { store(handle.as_ptr(), i32::from(preset)) })
    }

    pub fn ptz_recall_preset(&self, preset: u8, speed: f32) -> NdiResult<bool> {
        let handle = self.inner.handle()?;
        let recall = self.inner.binding().entry::<ep::RecvPtzRecallPreset>()?;
        Ok(unsafe { recall(handle.as_ptr(), i32::from(preset), speed) })
    }

    pub fn ptz_auto_focus(&self) -> NdiResult<bool> {
        self.call_bool::<ep::RecvPtzAutoFocus>()
    }

    pub fn ptz_focus(&self, focus: f32) -> NdiResult<bool> {
        self.call_bool_f32::<ep::RecvPtzFocus>(focus)
    }

    pub fn ptz_focus_speed(&self, speed: f32) -> NdiResult<bool> {
        self.call_bool_f32::<ep::RecvPtzFocusSpeed>(speed)
    }

    pub fn ptz_white_balance_auto(&self) -> NdiResult<bool> {
        self.call_bool::<ep::RecvPtzWhiteBalanceAuto>()
    }

    pub fn ptz_white_balance_indoor(&self) -> NdiResult<bool> {
        self.call_bool::<ep::RecvPtzWhiteBalanceIndoor>()
    }

    pub fn ptz_white_balance_outdoor(&self) -> NdiResult<bool> {
        self.call_bool::<ep::RecvPtzWhiteBalanceOutdoor>()
    }

    pub fn ptz_white_balance_oneshot(&self) -> NdiResult<bool> {
        self.call_bool::<ep::RecvPtzWhiteBalanceOneshot>()
    }

    pub fn ptz_white_balance_manual(&self, red: f32, blue: f32) -> NdiResult<bool> {
        self.call_bool_f32_f32::<ep::RecvPtzWhiteBalanceManual>(red, blue)
    }

    pub fn ptz_exposure_auto(&self) -> NdiResult<bool> {
        self.call_bool::<ep::RecvPtzExposureAuto>()
    }

    pub fn ptz_exposure_manual(&self, level: f32) -> NdiResult<bool> {
        self.call_bool_f32::<ep::RecvPtzExposureManual>(level)
    }

    pub fn ptz_exposure_manual_v2(&self, iris: f32, gain: f32, shutter_speed: f32) -> NdiResult<bool> {
        let handle = self.inner.handle()?;
        let set = self.inner.binding().entry::<ep::RecvPtzExposureManualV2>()?;
        Ok(unsafe { set(handle.as_ptr(), iris, gain, shutter_speed) })
    }

    // Recording on the source side.

    pub fn recording_is_supported(&self) -> NdiResult<bool> {
        self.call_bool::<ep::RecvRecordingIsSupported>()
    }

    /// Start recording. `filename_hint` is a base name without extension.
    pub fn recording_start(&self, filename_hint: Option<&str>) -> NdiResult<bool> {
        let hint = filename_hint
            .map(CString::new)
            .transpose()
            .map_err(|_| NdiError::invalid_parameter("filename_hint", "contains a NUL byte"))?;
        let handle = self.inner.handle()?;
        let start = self.inner.binding().entry::<ep::RecvRecordingStart>()?;
        let hint_ptr = hint.as_ref().map_or(ptr::null(), |h| h.as_ptr());
        Ok(unsafe { start(handle.as_ptr(), hint_ptr) })
    }

    pub fn recording_stop(&self) -> NdiResult<bool> {
        self.call_bool::<ep::RecvRecordingStop>()
    }

    /// Recording gain in dB.
    pub fn recording_set_audio_level(&self, level_db: f32) -> NdiResult<bool> {
        self.call_bool_f32::<ep::RecvRecordingSetAudioLevel>(level_db)
    }

    pub fn recording_is_recording(&self) -> NdiResult<bool> {
        self.call_bool::<ep::RecvRecordingIsRecording>()
    }

    pub fn recording_filename(&self) -> NdiResult<Option<String>> {
        let handle = self.inner.handle()?;
        let get = self.inner.binding().entry::<ep::RecvRecordingGetFilename>()?;
        let ptr = unsafe { get(handle.as_ptr()) };
        self.take_string(handle.as_ptr(), ptr)
    }

    pub fn recording_error(&self) -> NdiResult<Option<String>> {
        let handle = self.inner.handle()?;
        let get = self.inner.binding().entry::<ep::RecvRecordingGetError>()?;
        let ptr = unsafe { get(handle.as_ptr()) };
        self.take_string(handle.as_ptr(), ptr)
    }

    /// Recording progress, or `None` when not recording.
    pub fn recording_times(&self) -> NdiResult<Option<RecordingTimes>> {
        let handle = self.inner.handle()?;
        let get = self.inner.binding().entry::<ep::RecvRecordingGetTimes>()?;
        let mut times = RecordingTimes::default();
        let ok = unsafe { get(handle.as_ptr(), &mut times) };
        Ok(ok.then_some(times))
    }

    pub fn destroy(&mut self) -> NdiResult<()> {
        self.inner.destroy()
    }
}
