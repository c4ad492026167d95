//! Entry-point table.
//!
//! Every function the binding may call is listed once in [`Entry`], grouped
//! by the SDK revision that introduced it. A [`SymbolTable`] resolves a list
//! of entries against a [`SymbolSource`] in one pass; any missing name
//! aborts the whole resolution and nothing partial escapes.

use crate::error::{NdiError, NdiResult};
use std::ffi::c_void;
use std::fmt;
use std::ptr::NonNull;

/// SDK revision that introduced an entry point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SdkRevision {
    V1_5,
    V2,
    V3,
    V3_01,
    V3_1,
    V3_5,
    V3_6,
    V3_8,
    V4_0,
    V4_1,
    V4_5,
}

impl SdkRevision {
    pub const ALL: [SdkRevision; 11] = [
        Self::V1_5,
        Self::V2,
        Self::V3,
        Self::V3_01,
        Self::V3_1,
        Self::V3_5,
        Self::V3_6,
        Self::V3_8,
        Self::V4_0,
        Self::V4_1,
        Self::V4_5,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::V1_5 => "1.5",
            Self::V2 => "2",
            Self::V3 => "3",
            Self::V3_01 => "3.01",
            Self::V3_1 => "3.1",
            Self::V3_5 => "3.5",
            Self::V3_6 => "3.6",
            Self::V3_8 => "3.8",
            Self::V4_0 => "4.0",
            Self::V4_1 => "4.1",
            Self::V4_5 => "4.5",
        }
    }
}

impl fmt::Display for SdkRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! entries {
    ($( $rev:ident { $( $variant:ident = $name:literal, )* } )*) => {
        /// A named native entry point.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Entry {
            $( $( $variant, )* )*
        }

        impl Entry {
            /// Every entry in resolution order.
            pub const ALL: &'static [Entry] = &[ $( $( Entry::$variant, )* )* ];

            pub const COUNT: usize = Self::ALL.len();

            /// Exported symbol name.
            pub const fn name(self) -> &'static str {
                match self {
                    $( $( Entry::$variant => concat!("NDIlib_", $name), )* )*
                }
            }

            pub const fn introduced_in(self) -> SdkRevision {
                match self {
                    $( $( Entry::$variant => SdkRevision::$rev, )* )*
                }
            }
        }
    };
}

entries! {
    V1_5 {
        Initialize = "initialize",
        Destroy = "destroy",
        Version = "version",
        IsSupportedCpu = "is_supported_CPU",
        FindCreate = "find_create",
        FindCreateV2 = "find_create_v2",
        FindDestroy = "find_destroy",
        FindGetSources = "find_get_sources",
        SendCreate = "send_create",
        SendDestroy = "send_destroy",
        SendSendVideo = "send_send_video",
        SendSendVideoAsync = "send_send_video_async",
        SendSendAudio = "send_send_audio",
        SendSendMetadata = "send_send_metadata",
        SendCapture = "send_capture",
        SendFreeMetadata = "send_free_metadata",
        SendGetTally = "send_get_tally",
        SendGetNoConnections = "send_get_no_connections",
        SendClearConnectionMetadata = "send_clear_connection_metadata",
        SendAddConnectionMetadata = "send_add_connection_metadata",
        SendSetFailover = "send_set_failover",
        RecvCreateV2 = "recv_create_v2",
        RecvCreate = "recv_create",
        RecvDestroy = "recv_destroy",
        RecvCapture = "recv_capture",
        RecvFreeVideo = "recv_free_video",
        RecvFreeAudio = "recv_free_audio",
        RecvFreeMetadata = "recv_free_metadata",
        RecvSendMetadata = "recv_send_metadata",
        RecvSetTally = "recv_set_tally",
        RecvGetPerformance = "recv_get_performance",
        RecvGetQueue = "recv_get_queue",
        RecvClearConnectionMetadata = "recv_clear_connection_metadata",
        RecvAddConnectionMetadata = "recv_add_connection_metadata",
        RecvGetNoConnections = "recv_get_no_connections",
        RoutingCreate = "routing_create",
        RoutingDestroy = "routing_destroy",
        RoutingChange = "routing_change",
        RoutingClear = "routing_clear",
        UtilSendSendAudioInterleaved16s = "util_send_send_audio_interleaved_16s",
        UtilAudioToInterleaved16s = "util_audio_to_interleaved_16s",
        UtilAudioFromInterleaved16s = "util_audio_from_interleaved_16s",
    }
    V2 {
        FindWaitForSources = "find_wait_for_sources",
        FindGetCurrentSources = "find_get_current_sources",
        UtilAudioToInterleaved32f = "util_audio_to_interleaved_32f",
        UtilAudioFromInterleaved32f = "util_audio_from_interleaved_32f",
        UtilSendSendAudioInterleaved32f = "util_send_send_audio_interleaved_32f",
    }
    V3 {
        RecvFreeVideoV2 = "recv_free_video_v2",
        RecvFreeAudioV2 = "recv_free_audio_v2",
        RecvCaptureV2 = "recv_capture_v2",
        SendSendVideoV2 = "send_send_video_v2",
        SendSendVideoAsyncV2 = "send_send_video_async_v2",
        SendSendAudioV2 = "send_send_audio_v2",
        UtilAudioToInterleaved16sV2 = "util_audio_to_interleaved_16s_v2",
        UtilAudioFromInterleaved16sV2 = "util_audio_from_interleaved_16s_v2",
        UtilAudioToInterleaved32fV2 = "util_audio_to_interleaved_32f_v2",
        UtilAudioFromInterleaved32fV2 = "util_audio_from_interleaved_32f_v2",
    }
    V3_01 {
        RecvFreeString = "recv_free_string",
        RecvPtzIsSupported = "recv_ptz_is_supported",
        RecvRecordingIsSupported = "recv_recording_is_supported",
        RecvGetWebControl = "recv_get_web_control",
        RecvPtzZoom = "recv_ptz_zoom",
        RecvPtzZoomSpeed = "recv_ptz_zoom_speed",
        RecvPtzPanTilt = "recv_ptz_pan_tilt",
        RecvPtzPanTiltSpeed = "recv_ptz_pan_tilt_speed",
        RecvPtzStorePreset = "recv_ptz_store_preset",
        RecvPtzRecallPreset = "recv_ptz_recall_preset",
        RecvPtzAutoFocus = "recv_ptz_auto_focus",
        RecvPtzFocus = "recv_ptz_focus",
        RecvPtzFocusSpeed = "recv_ptz_focus_speed",
        RecvPtzWhiteBalanceAuto = "recv_ptz_white_balance_auto",
        RecvPtzWhiteBalanceIndoor = "recv_ptz_white_balance_indoor",
        RecvPtzWhiteBalanceOutdoor = "recv_ptz_white_balance_outdoor",
        RecvPtzWhiteBalanceOneshot = "recv_ptz_white_balance_oneshot",
        RecvPtzWhiteBalanceManual = "recv_ptz_white_balance_manual",
        RecvPtzExposureAuto = "recv_ptz_exposure_auto",
        RecvPtzExposureManual = "recv_ptz_exposure_manual",
        RecvRecordingStart = "recv_recording_start",
        RecvRecordingStop = "recv_recording_stop",
        RecvRecordingSetAudioLevel = "recv_recording_set_audio_level",
        RecvRecordingIsRecording = "recv_recording_is_recording",
        RecvRecordingGetFilename = "recv_recording_get_filename",
        RecvRecordingGetError = "recv_recording_get_error",
        RecvRecordingGetTimes = "recv_recording_get_times",
    }
    V3_1 {
        RecvCreateV3 = "recv_create_v3",
    }
    V3_5 {
        RecvConnect = "recv_connect",
    }
    V3_6 {
        FramesyncCreate = "framesync_create",
        FramesyncDestroy = "framesync_destroy",
        FramesyncCaptureAudio = "framesync_capture_audio",
        FramesyncFreeAudio = "framesync_free_audio",
        FramesyncCaptureVideo = "framesync_capture_video",
        FramesyncFreeVideo = "framesync_free_video",
        UtilSendSendAudioInterleaved32s = "util_send_send_audio_interleaved_32s",
        UtilAudioToInterleaved32sV2 = "util_audio_to_interleaved_32s_v2",
        UtilAudioFromInterleaved32sV2 = "util_audio_from_interleaved_32s_v2",
    }
    V3_8 {
        SendGetSourceName = "send_get_source_name",
    }
    V4_0 {
        SendSendAudioV3 = "send_send_audio_v3",
        UtilV210ToP216 = "util_V210_to_P216",
        UtilP216ToV210 = "util_P216_to_V210",
    }
    V4_1 {
        RoutingGetNoConnections = "routing_get_no_connections",
        RoutingGetSourceName = "routing_get_source_name",
        RecvCaptureV3 = "recv_capture_v3",
        RecvFreeAudioV3 = "recv_free_audio_v3",
        FramesyncCaptureAudioV2 = "framesync_capture_audio_v2",
        FramesyncFreeAudioV2 = "framesync_free_audio_v2",
        FramesyncAudioQueueDepth = "framesync_audio_queue_depth",
    }
    V4_5 {
        RecvPtzExposureManualV2 = "recv_ptz_exposure_manual_v2",
    }
}

impl Entry {
    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Something symbols can be looked up in.
pub trait SymbolSource: Send + Sync {
    /// Address of the exported symbol `name`, if present.
    fn lookup(&self, name: &str) -> Option<NonNull<c_void>>;

    /// Human-readable origin, for diagnostics.
    fn origin(&self) -> &str;
}

/// Resolved entry-point addresses.
///
/// Immutable once built, so it can be read from any number of threads.
pub struct SymbolTable {
    slots: Box<[Option<NonNull<c_void>>]>,
    resolved: usize,
}

// SAFETY: the table only stores code addresses and never writes to them.
unsafe impl Send for SymbolTable {}
unsafe impl Sync for SymbolTable {}

impl SymbolTable {
    /// Resolve `entries` in order.
    ///
    /// The first entry `source` cannot provide aborts with
    /// [`NdiError::MissingSymbol`]; the partially built table is dropped.
    pub fn resolve(source: &dyn SymbolSource, entries: &[Entry]) -> NdiResult<Self> {
        let mut slots = vec![None; Entry::COUNT].into_boxed_slice();
        let mut resolved = 0;

        for &entry in entries {
            let addr = source.lookup(entry.name()).ok_or_else(|| {
                tracing::debug!(origin = source.origin(), symbol = entry.name(), "Missing symbol");
                NdiError::missing_symbol(entry.name())
            })?;
            if slots[entry.index()].replace(addr).is_none() {
                resolved += 1;
            }
        }

        Ok(Self { slots, resolved })
    }

    /// Address of `entry`, if it was part of the resolved list.
    pub fn get(&self, entry: Entry) -> Option<NonNull<c_void>> {
        self.slots[entry.index()]
    }

    /// Number of resolved entries.
    pub fn len(&self) -> usize {
        self.resolved
    }

    pub fn is_empty(&self) -> bool {
        self.resolved == 0
    }

    /// Typed function pointer for `E`.
    pub(crate) fn entry<E: EntryPoint>(&self) -> NdiResult<E::Fn> {
        // SAFETY: every `EntryPoint::Fn` in this crate is an `extern "C"` fn
        // pointer, which has the size and representation of an address.
        unsafe { self.entry_as::<E::Fn>(E::ENTRY) }
    }

    /// Function pointer of type `F` for `entry`.
    ///
    /// # Safety
    ///
    /// `F` must be a function pointer type matching the native signature.
    pub(crate) unsafe fn entry_as<F: Copy>(&self, entry: Entry) -> NdiResult<F> {
        debug_assert_eq!(std::mem::size_of::<F>(), std::mem::size_of::<NonNull<c_void>>());
        let addr = self
            .get(entry)
            .ok_or_else(|| NdiError::missing_symbol(entry.name()))?;
        Ok(unsafe { std::mem::transmute_copy::<NonNull<c_void>, F>(&addr) })
    }

    /// Resolved entries per SDK revision, oldest first.
    pub fn counts_by_revision(&self) -> Vec<(SdkRevision, usize)> {
        SdkRevision::ALL
            .iter()
            .map(|&rev| {
                let count = Entry::ALL
                    .iter()
                    .filter(|e| e.introduced_in() == rev && self.get(**e).is_some())
                    .count();
                (rev, count)
            })
            .collect()
    }
}

impl fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolTable")
            .field("resolved", &self.resolved)
            .finish()
    }
}

/// Typed view of one entry point.
///
/// Implemented by zero-sized marker types so that the function signature
/// travels with the entry name and call sites cannot mix them up.
pub trait EntryPoint {
    const ENTRY: Entry;
    type Fn: Copy;
}

macro_rules! entry_points {
    ($( $variant:ident: fn($($arg:ty),*) $(-> $ret:ty)?; )*) => {
        $(
            pub(crate) struct $variant;

            impl EntryPoint for $variant {
                const ENTRY: Entry = Entry::$variant;
                type Fn = unsafe extern "C" fn($($arg),*) $(-> $ret)?;
            }
        )*
    };
}

/// Signatures of the entry points the wrappers call.
pub(crate) mod ep {
    use super::{Entry, EntryPoint};
    use crate::raw::{
        FindCreateRaw, RecvCreateV3Raw, RoutingCreateRaw, SendCreateRaw, SourceRaw,
    };
    use lib_ndi_types::{
        AudioFrameInterleaved16s, AudioFrameInterleaved32f, AudioFrameInterleaved32s,
        AudioFrameV2, AudioFrameV3, FrameFormat, MetadataFrame, RecordingTimes,
        RecvPerformance, RecvQueue, Tally, VideoFrameV2,
    };
    use std::ffi::{c_char, c_void};

    type Instance = *mut c_void;

    // The per-kind destroy entries are called through `InstanceKind::DESTROY`.
    entry_points! {
        Initialize: fn() -> bool;
        Destroy: fn();
        Version: fn() -> *const c_char;
        IsSupportedCpu: fn() -> bool;

        FindCreateV2: fn(*const FindCreateRaw) -> Instance;
        FindGetSources: fn(Instance, *mut u32, u32) -> *const SourceRaw;
        FindWaitForSources: fn(Instance, u32) -> bool;
        FindGetCurrentSources: fn(Instance, *mut u32) -> *const SourceRaw;

        SendCreate: fn(*const SendCreateRaw) -> Instance;
        SendSendVideoV2: fn(Instance, *const VideoFrameV2);
        SendSendVideoAsyncV2: fn(Instance, *const VideoFrameV2);
        SendSendAudioV2: fn(Instance, *const AudioFrameV2);
        SendSendAudioV3: fn(Instance, *const AudioFrameV3);
        SendSendMetadata: fn(Instance, *const MetadataFrame);
        SendCapture: fn(Instance, *mut MetadataFrame, u32) -> i32;
        SendFreeMetadata: fn(Instance, *mut MetadataFrame);
        SendGetTally: fn(Instance, *mut Tally, u32) -> bool;
        SendGetNoConnections: fn(Instance, u32) -> i32;
        SendClearConnectionMetadata: fn(Instance);
        SendAddConnectionMetadata: fn(Instance, *const MetadataFrame);
        SendSetFailover: fn(Instance, *const SourceRaw);
        SendGetSourceName: fn(Instance) -> *const SourceRaw;
        UtilSendSendAudioInterleaved16s: fn(Instance, *const AudioFrameInterleaved16s);
        UtilSendSendAudioInterleaved32f: fn(Instance, *const AudioFrameInterleaved32f);
        UtilSendSendAudioInterleaved32s: fn(Instance, *const AudioFrameInterleaved32s);

        RecvCreateV3: fn(*const RecvCreateV3Raw) -> Instance;
        RecvConnect: fn(Instance, *const SourceRaw);
        RecvCaptureV2: fn(Instance, *mut VideoFrameV2, *mut AudioFrameV2, *mut MetadataFrame, u32) -> i32;
        RecvCaptureV3: fn(Instance, *mut VideoFrameV2, *mut AudioFrameV3, *mut MetadataFrame, u32) -> i32;
        RecvFreeVideoV2: fn(Instance, *mut VideoFrameV2);
        RecvFreeAudioV2: fn(Instance, *mut AudioFrameV2);
        RecvFreeAudioV3: fn(Instance, *mut AudioFrameV3);
        RecvFreeMetadata: fn(Instance, *mut MetadataFrame);
        RecvFreeString: fn(Instance, *const c_char);
        RecvSendMetadata: fn(Instance, *const MetadataFrame) -> bool;
        RecvSetTally: fn(Instance, *const Tally) -> bool;
        RecvGetPerformance: fn(Instance, *mut RecvPerformance, *mut RecvPerformance);
        RecvGetQueue: fn(Instance, *mut RecvQueue);
        RecvClearConnectionMetadata: fn(Instance);
        RecvAddConnectionMetadata: fn(Instance, *const MetadataFrame);
        RecvGetNoConnections: fn(Instance) -> i32;
        RecvGetWebControl: fn(Instance) -> *const c_char;

        RecvPtzIsSupported: fn(Instance) -> bool;
        RecvPtzZoom: fn(Instance, f32) -> bool;
        RecvPtzZoomSpeed: fn(Instance, f32) -> bool;
        RecvPtzPanTilt: fn(Instance, f32, f32) -> bool;
        RecvPtzPanTiltSpeed: fn(Instance, f32, f32) -> bool;
        RecvPtzStorePreset: fn(Instance, i32) -> bool;
        RecvPtzRecallPreset: fn(Instance, i32, f32) -> bool;
        RecvPtzAutoFocus: fn(Instance) -> bool;
        RecvPtzFocus: fn(Instance, f32) -> bool;
        RecvPtzFocusSpeed: fn(Instance, f32) -> bool;
        RecvPtzWhiteBalanceAuto: fn(Instance) -> bool;
        RecvPtzWhiteBalanceIndoor: fn(Instance) -> bool;
        RecvPtzWhiteBalanceOutdoor: fn(Instance) -> bool;
        RecvPtzWhiteBalanceOneshot: fn(Instance) -> bool;
        RecvPtzWhiteBalanceManual: fn(Instance, f32, f32) -> bool;
        RecvPtzExposureAuto: fn(Instance) -> bool;
        RecvPtzExposureManual: fn(Instance, f32) -> bool;
        RecvPtzExposureManualV2: fn(Instance, f32, f32, f32) -> bool;

        RecvRecordingIsSupported: fn(Instance) -> bool;
        RecvRecordingStart: fn(Instance, *const c_char) -> bool;
        RecvRecordingStop: fn(Instance) -> bool;
        RecvRecordingSetAudioLevel: fn(Instance, f32) -> bool;
        RecvRecordingIsRecording: fn(Instance) -> bool;
        RecvRecordingGetFilename: fn(Instance) -> *const c_char;
        RecvRecordingGetError: fn(Instance) -> *const c_char;
        RecvRecordingGetTimes: fn(Instance, *mut RecordingTimes) -> bool;

        RoutingCreate: fn(*const RoutingCreateRaw) -> Instance;
        RoutingChange: fn(Instance, *const SourceRaw) -> bool;
        RoutingClear: fn(Instance) -> bool;
        RoutingGetNoConnections: fn(Instance, u32) -> i32;
        RoutingGetSourceName: fn(Instance) -> *const SourceRaw;

        FramesyncCreate: fn(Instance) -> Instance;
        FramesyncCaptureVideo: fn(Instance, *mut VideoFrameV2, FrameFormat);
        FramesyncFreeVideo: fn(Instance, *mut VideoFrameV2);
        FramesyncCaptureAudio: fn(Instance, *mut AudioFrameV2, i32, i32, i32);
        FramesyncFreeAudio: fn(Instance, *mut AudioFrameV2);
        FramesyncCaptureAudioV2: fn(Instance, *mut AudioFrameV3, i32, i32, i32);
        FramesyncFreeAudioV2: fn(Instance, *mut AudioFrameV3);
        FramesyncAudioQueueDepth: fn(Instance) -> i32;

        UtilAudioToInterleaved16sV2: fn(*const AudioFrameV2, *mut AudioFrameInterleaved16s);
        UtilAudioFromInterleaved16sV2: fn(*const AudioFrameInterleaved16s, *mut AudioFrameV2);
        UtilAudioToInterleaved32fV2: fn(*const AudioFrameV2, *mut AudioFrameInterleaved32f);
        UtilAudioFromInterleaved32fV2: fn(*const AudioFrameInterleaved32f, *mut AudioFrameV2);
        UtilAudioToInterleaved32sV2: fn(*const AudioFrameV2, *mut AudioFrameInterleaved32s);
        UtilAudioFromInterleaved32sV2: fn(*const AudioFrameInterleaved32s, *mut AudioFrameV2);
        UtilV210ToP216: fn(*const VideoFrameV2, *mut VideoFrameV2);
        UtilP216ToV210: fn(*const VideoFrameV2, *mut VideoFrameV2);
    }
}
