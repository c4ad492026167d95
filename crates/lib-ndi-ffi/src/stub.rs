//! In-process stand-in for the native library, used by unit tests.
//!
//! Every entry point resolves to a function in this module. Calls are
//! recorded by short name (without the `NDIlib_` prefix) in thread-local
//! state, so each test thread sees only its own calls.

use crate::raw::{FindCreateRaw, RecvCreateV3Raw, RoutingCreateRaw, SendCreateRaw, SourceRaw};
use crate::symbols::{Entry, SymbolSource};
use lib_ndi_types::{
    AudioFrameInterleaved16s, AudioFrameInterleaved32f, AudioFrameInterleaved32s, AudioFrameV2,
    AudioFrameV3, FourCC, FrameFormat, MetadataFrame, RecordingTimes, RecvPerformance, RecvQueue,
    Tally, VideoFrameV2,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::{c_char, c_void, CStr};
use std::ptr::{self, NonNull};

pub const VERSION: &str = "6.0.0 (stub)";
const VERSION_C: &CStr = c"6.0.0 (stub)";

/// 4x2 BGRA, stride 16.
pub static FRAME_PIXELS: [u8; 32] = [0x40; 32];
static SILENCE: [f32; 8] = [0.0; 8];
const METADATA: &CStr = c"<ndi_product short_name=\"stub\"/>";

struct StaticSources([SourceRaw; 2]);

// SAFETY: points only at string literals.
unsafe impl Sync for StaticSources {}

static SOURCES: StaticSources = StaticSources([
    SourceRaw {
        p_ndi_name: c"HOST-A (Camera 1)".as_ptr(),
        p_url_address: c"192.168.0.10:5961".as_ptr(),
    },
    SourceRaw {
        p_ndi_name: c"HOST-B (Mixer)".as_ptr(),
        p_url_address: ptr::null(),
    },
]);

struct StaticSource(SourceRaw);

unsafe impl Sync for StaticSource {}

static OWN_NAME: StaticSource = StaticSource(SourceRaw {
    p_ndi_name: c"STUB (x)".as_ptr(),
    p_url_address: ptr::null(),
});

static TOKEN: u8 = 0;

/// What the next capture call on a receiver or sender delivers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CaptureMode {
    #[default]
    Idle,
    Video,
    Audio,
    Metadata,
    /// Writes a video payload but reports a timeout.
    PartialVideo,
    StatusChange,
    Error,
    Unknown(i32),
}

#[derive(Debug)]
pub struct StubState {
    pub calls: Vec<&'static str>,
    pub initialize_ok: bool,
    pub capture: CaptureMode,
    pub source_count: u32,
    pub connections: i32,
    pub tally: Tally,
    pub last_groups: Option<String>,
    pub last_show_local: Option<bool>,
    pub last_video: Option<VideoFrameV2>,
    pub video_bytes_read: usize,
    /// Metadata text carried by the last sent video or audio descriptor.
    pub last_frame_metadata: Option<String>,
    pub last_metadata: Option<String>,
    pub last_bandwidth: Option<i32>,
    pub last_source_name: Option<String>,
    /// Descriptors passed as null to the last capture call.
    pub null_descriptors: usize,
}

impl Default for StubState {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            initialize_ok: true,
            capture: CaptureMode::default(),
            source_count: 2,
            connections: 0,
            tally: Tally::default(),
            last_groups: None,
            last_show_local: None,
            last_video: None,
            video_bytes_read: 0,
            last_frame_metadata: None,
            last_metadata: None,
            last_bandwidth: None,
            last_source_name: None,
            null_descriptors: 0,
        }
    }
}

thread_local! {
    static STATE: RefCell<StubState> = RefCell::new(StubState::default());
}

pub fn reset() {
    STATE.with(|s| *s.borrow_mut() = StubState::default());
}

pub fn with_state<R>(f: impl FnOnce(&mut StubState) -> R) -> R {
    STATE.with(|s| f(&mut s.borrow_mut()))
}

/// Calls recorded under `name`.
pub fn count(name: &str) -> usize {
    with_state(|s| s.calls.iter().filter(|c| **c == name).count())
}

/// Frame descriptors released so far, across all free entry points.
pub fn freed_total() -> usize {
    with_state(|s| {
        s.calls
            .iter()
            .filter(|c| c.contains("_free_") && !c.ends_with("_string"))
            .count()
    })
}

/// Non-null handle returned by the create stubs.
pub fn instance_token() -> *mut c_void {
    ptr::addr_of!(TOKEN).cast_mut().cast()
}

fn record(name: &'static str) {
    with_state(|s| s.calls.push(name));
}

unsafe fn text(ptr: *const c_char) -> Option<String> {
    (!ptr.is_null()).then(|| unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

/// Symbol source resolving every entry to a stub.
pub struct StubLibrary {
    symbols: HashMap<&'static str, usize>,
}

impl StubLibrary {
    pub fn new() -> Self {
        let mut symbols: HashMap<&'static str, usize> =
            Entry::ALL.iter().map(|e| (e.name(), inert as usize)).collect();
        for (entry, addr) in typed_stubs() {
            symbols.insert(entry.name(), addr);
        }
        Self { symbols }
    }

    /// Drop `entry`, as if the library did not export it.
    pub fn without(mut self, entry: Entry) -> Self {
        self.symbols.remove(entry.name());
        self
    }
}

impl SymbolSource for StubLibrary {
    fn lookup(&self, name: &str) -> Option<NonNull<c_void>> {
        self.symbols
            .get(name)
            .and_then(|&addr| NonNull::new(addr as *mut c_void))
    }

    fn origin(&self) -> &str {
        "stub"
    }
}

extern "C" fn inert() {}

/// Stubs that only record the call, with a fixed result.
macro_rules! recorders {
    ($( $name:ident($($arg:ty),*) $(-> $ret:ty = $value:expr)?; )*) => {
        $(
            unsafe extern "C" fn $name($(_: $arg),*) $(-> $ret)? {
                record(stringify!($name));
                $($value)?
            }
        )*
    };
}

type Instance = *mut c_void;

recorders! {
    destroy();
    find_destroy(Instance);
    send_destroy(Instance);
    recv_destroy(Instance);
    routing_destroy(Instance);
    framesync_destroy(Instance);

    util_send_send_audio_interleaved_16s(Instance, *const AudioFrameInterleaved16s);
    util_send_send_audio_interleaved_32f(Instance, *const AudioFrameInterleaved32f);
    util_send_send_audio_interleaved_32s(Instance, *const AudioFrameInterleaved32s);
    send_free_metadata(Instance, *mut MetadataFrame);
    send_clear_connection_metadata(Instance);
    send_add_connection_metadata(Instance, *const MetadataFrame);
    send_set_failover(Instance, *const SourceRaw);

    recv_free_video_v2(Instance, *mut VideoFrameV2);
    recv_free_audio_v2(Instance, *mut AudioFrameV2);
    recv_free_audio_v3(Instance, *mut AudioFrameV3);
    recv_free_metadata(Instance, *mut MetadataFrame);
    recv_free_string(Instance, *const c_char);
    recv_send_metadata(Instance, *const MetadataFrame) -> bool = true;
    recv_set_tally(Instance, *const Tally) -> bool = true;
    recv_clear_connection_metadata(Instance);
    recv_add_connection_metadata(Instance, *const MetadataFrame);

    recv_ptz_is_supported(Instance) -> bool = true;
    recv_ptz_zoom(Instance, f32) -> bool = true;
    recv_ptz_zoom_speed(Instance, f32) -> bool = true;
    recv_ptz_pan_tilt(Instance, f32, f32) -> bool = true;
    recv_ptz_pan_tilt_speed(Instance, f32, f32) -> bool = true;
    recv_ptz_store_preset(Instance, i32) -> bool = true;
    recv_ptz_recall_preset(Instance, i32, f32) -> bool = true;
    recv_ptz_auto_focus(Instance) -> bool = true;
    recv_ptz_focus(Instance, f32) -> bool = true;
    recv_ptz_focus_speed(Instance, f32) -> bool = true;
    recv_ptz_white_balance_auto(Instance) -> bool = true;
    recv_ptz_white_balance_indoor(Instance) -> bool = true;
    recv_ptz_white_balance_outdoor(Instance) -> bool = true;
    recv_ptz_white_balance_oneshot(Instance) -> bool = true;
    recv_ptz_white_balance_manual(Instance, f32, f32) -> bool = true;
    recv_ptz_exposure_auto(Instance) -> bool = true;
    recv_ptz_exposure_manual(Instance, f32) -> bool = true;
    recv_ptz_exposure_manual_v2(Instance, f32, f32, f32) -> bool = true;

    recv_recording_is_supported(Instance) -> bool = true;
    recv_recording_start(Instance, *const c_char) -> bool = true;
    recv_recording_stop(Instance) -> bool = true;
    recv_recording_set_audio_level(Instance, f32) -> bool = true;
    recv_recording_is_recording(Instance) -> bool = false;
    recv_recording_get_error(Instance) -> *const c_char = ptr::null();

    routing_clear(Instance) -> bool = true;

    framesync_free_video(Instance, *mut VideoFrameV2);
    framesync_free_audio(Instance, *mut AudioFrameV2);
    framesync_free_audio_v2(Instance, *mut AudioFrameV3);
    framesync_audio_queue_depth(Instance) -> i32 = 960;

    util_audio_to_interleaved_16s_v2(*const AudioFrameV2, *mut AudioFrameInterleaved16s);
    util_audio_from_interleaved_16s_v2(*const AudioFrameInterleaved16s, *mut AudioFrameV2);
    util_audio_to_interleaved_32f_v2(*const AudioFrameV2, *mut AudioFrameInterleaved32f);
    util_audio_from_interleaved_32f_v2(*const AudioFrameInterleaved32f, *mut AudioFrameV2);
    util_audio_to_interleaved_32s_v2(*const AudioFrameV2, *mut AudioFrameInterleaved32s);
    util_audio_from_interleaved_32s_v2(*const AudioFrameInterleaved32s, *mut AudioFrameV2);
    util_v210_to_p216(*const VideoFrameV2, *mut VideoFrameV2);
    util_p216_to_v210(*const VideoFrameV2, *mut VideoFrameV2);
}

unsafe extern "C" fn initialize() -> bool {
    record("initialize");
    with_state(|s| s.initialize_ok)
}

unsafe extern "C" fn version() -> *const c_char {
    record("version");
    VERSION_C.as_ptr()
}

unsafe extern "C" fn is_supported_cpu() -> bool {
    true
}

unsafe extern "C" fn find_create_v2(settings: *const FindCreateRaw) -> Instance {
    record("find_create_v2");
    let settings = unsafe { &*settings };
    let groups = unsafe { text(settings.p_groups) };
    with_state(|s| {
        s.last_groups = groups;
        s.last_show_local = Some(settings.show_local_sources);
    });
    instance_token()
}

unsafe fn write_sources(count: *mut u32) -> *const SourceRaw {
    let n = with_state(|s| s.source_count.min(SOURCES.0.len() as u32));
    unsafe { *count = n };
    if n == 0 {
        ptr::null()
    } else {
        SOURCES.0.as_ptr()
    }
}

unsafe extern "C" fn find_get_sources(_: Instance, count: *mut u32, _: u32) -> *const SourceRaw {
    record("find_get_sources");
    unsafe { write_sources(count) }
}

unsafe extern "C" fn find_get_current_sources(_: Instance, count: *mut u32) -> *const SourceRaw {
    record("find_get_current_sources");
    unsafe { write_sources(count) }
}

unsafe extern "C" fn find_wait_for_sources(_: Instance, _: u32) -> bool {
    record("find_wait_for_sources");
    with_state(|s| s.source_count > 0)
}

unsafe extern "C" fn send_create(settings: *const SendCreateRaw) -> Instance {
    record("send_create");
    let name = unsafe { text((*settings).p_ndi_name) };
    match name {
        Some(name) if !name.is_empty() => instance_token(),
        _ => ptr::null_mut(),
    }
}

unsafe extern "C" fn send_send_video_v2(_: Instance, frame: *const VideoFrameV2) {
    record("send_send_video_v2");
    let frame = unsafe { *frame };
    let read = unsafe { frame.data() }.map_or(0, <[u8]>::len);
    let metadata = unsafe { text(frame.metadata) };
    with_state(|s| {
        s.last_video = Some(frame);
        s.video_bytes_read = read;
        s.last_frame_metadata = metadata;
    });
}

unsafe extern "C" fn send_send_audio_v2(_: Instance, frame: *const AudioFrameV2) {
    record("send_send_audio_v2");
    let metadata = unsafe { text((*frame).metadata) };
    with_state(|s| s.last_frame_metadata = metadata);
}

unsafe extern "C" fn send_send_audio_v3(_: Instance, frame: *const AudioFrameV3) {
    record("send_send_audio_v3");
    let metadata = unsafe { text((*frame).metadata) };
    with_state(|s| s.last_frame_metadata = metadata);
}

unsafe extern "C" fn send_send_video_async_v2(_: Instance, frame: *const VideoFrameV2) {
    if frame.is_null() {
        record("send_send_video_async_v2(null)");
    } else {
        record("send_send_video_async_v2");
    }
}

unsafe extern "C" fn send_send_metadata(_: Instance, frame: *const MetadataFrame) {
    record("send_send_metadata");
    let text = unsafe { text((*frame).data) };
    with_state(|s| s.last_metadata = text);
}

fn fill_metadata(frame: &mut MetadataFrame) {
    frame.set_text(METADATA);
}

unsafe extern "C" fn send_capture(_: Instance, frame: *mut MetadataFrame, _: u32) -> i32 {
    record("send_capture");
    match with_state(|s| s.capture) {
        CaptureMode::Metadata => {
            fill_metadata(unsafe { &mut *frame });
            3
        }
        CaptureMode::Unknown(raw) => raw,
        _ => 0,
    }
}

unsafe extern "C" fn send_get_tally(_: Instance, tally: *mut Tally, _: u32) -> bool {
    record("send_get_tally");
    unsafe { *tally = with_state(|s| s.tally) };
    true
}

unsafe extern "C" fn send_get_no_connections(_: Instance, _: u32) -> i32 {
    record("send_get_no_connections");
    with_state(|s| s.connections)
}

unsafe extern "C" fn send_get_source_name(_: Instance) -> *const SourceRaw {
    record("send_get_source_name");
    &OWN_NAME.0
}

unsafe extern "C" fn recv_create_v3(settings: *const RecvCreateV3Raw) -> Instance {
    record("recv_create_v3");
    let settings = unsafe { &*settings };
    let name = unsafe { text(settings.source_to_connect_to.p_ndi_name) };
    with_state(|s| {
        s.last_bandwidth = Some(settings.bandwidth);
        s.last_source_name = name;
    });
    instance_token()
}

unsafe extern "C" fn recv_connect(_: Instance, source: *const SourceRaw) {
    record("recv_connect");
    let name = if source.is_null() {
        None
    } else {
        unsafe { text((*source).p_ndi_name) }
    };
    with_state(|s| s.last_source_name = name);
}

fn fill_video(frame: &mut VideoFrameV2) {
    frame.set_geometry(4, 2, FourCC::BGRA);
    frame.data = FRAME_PIXELS.as_ptr().cast_mut();
}

fn fill_audio_v2(frame: &mut AudioFrameV2) {
    frame.set_layout(2, 4);
    frame.data = SILENCE.as_ptr().cast_mut();
}

fn fill_audio_v3(frame: &mut AudioFrameV3) {
    frame.no_channels = 2;
    frame.no_samples = 4;
    frame.fourcc = FourCC::FLTP;
    frame.channel_stride_or_data_size = 16;
    frame.data = SILENCE.as_ptr().cast_mut().cast();
}

/// Shared body of both receiver capture versions. `audio` fills the audio
/// descriptor and is only called when one was passed.
fn capture_into(
    name: &'static str,
    video: *mut VideoFrameV2,
    audio: Option<&mut dyn FnMut()>,
    metadata: *mut MetadataFrame,
) -> i32 {
    record(name);
    let nulls = [video.is_null(), audio.is_none(), metadata.is_null()]
        .iter()
        .filter(|n| **n)
        .count();
    let mode = with_state(|s| {
        s.null_descriptors = nulls;
        s.capture
    });

    match mode {
        CaptureMode::Idle => 0,
        CaptureMode::Video if !video.is_null() => {
            fill_video(unsafe { &mut *video });
            1
        }
        CaptureMode::Audio => match audio {
            Some(fill) => {
                fill();
                2
            }
            None => 0,
        },
        CaptureMode::Metadata if !metadata.is_null() => {
            fill_metadata(unsafe { &mut *metadata });
            3
        }
        CaptureMode::PartialVideo => {
            if !video.is_null() {
                unsafe { (*video).data = FRAME_PIXELS.as_ptr().cast_mut() };
            }
            0
        }
        CaptureMode::Error => 4,
        CaptureMode::StatusChange => 100,
        CaptureMode::Unknown(raw) => raw,
        _ => 0,
    }
}

unsafe extern "C" fn recv_capture_v2(
    _: Instance,
    video: *mut VideoFrameV2,
    audio: *mut AudioFrameV2,
    metadata: *mut MetadataFrame,
    _: u32,
) -> i32 {
    let mut fill = || fill_audio_v2(unsafe { &mut *audio });
    let audio = (!audio.is_null()).then_some(&mut fill as &mut dyn FnMut());
    capture_into("recv_capture_v2", video, audio, metadata)
}

unsafe extern "C" fn recv_capture_v3(
    _: Instance,
    video: *mut VideoFrameV2,
    audio: *mut AudioFrameV3,
    metadata: *mut MetadataFrame,
    _: u32,
) -> i32 {
    let mut fill = || fill_audio_v3(unsafe { &mut *audio });
    let audio = (!audio.is_null()).then_some(&mut fill as &mut dyn FnMut());
    capture_into("recv_capture_v3", video, audio, metadata)
}

unsafe extern "C" fn recv_get_performance(
    _: Instance,
    total: *mut RecvPerformance,
    dropped: *mut RecvPerformance,
) {
    record("recv_get_performance");
    unsafe {
        *total = RecvPerformance {
            video_frames: 100,
            audio_frames: 200,
            metadata_frames: 3,
        };
        *dropped = RecvPerformance {
            video_frames: 1,
            ..RecvPerformance::default()
        };
    }
}

unsafe extern "C" fn recv_get_queue(_: Instance, queue: *mut RecvQueue) {
    record("recv_get_queue");
    unsafe {
        *queue = RecvQueue {
            video_frames: 0,
            audio_frames: 2,
            metadata_frames: 0,
        };
    }
}

unsafe extern "C" fn recv_get_no_connections(_: Instance) -> i32 {
    record("recv_get_no_connections");
    with_state(|s| s.connections)
}

unsafe extern "C" fn recv_get_web_control(_: Instance) -> *const c_char {
    record("recv_get_web_control");
    c"http://10.0.0.1/".as_ptr()
}

unsafe extern "C" fn recv_recording_get_filename(_: Instance) -> *const c_char {
    record("recv_recording_get_filename");
    c"capture".as_ptr()
}

unsafe extern "C" fn recv_recording_get_times(_: Instance, times: *mut RecordingTimes) -> bool {
    record("recv_recording_get_times");
    unsafe {
        *times = RecordingTimes {
            no_frames: 25,
            start_time: 0,
            last_time: 10_000_000,
        };
    }
    true
}

unsafe extern "C" fn routing_create(settings: *const RoutingCreateRaw) -> Instance {
    record("routing_create");
    let name = unsafe { text((*settings).p_ndi_name) };
    match name {
        Some(name) if !name.is_empty() => instance_token(),
        _ => ptr::null_mut(),
    }
}

unsafe extern "C" fn routing_change(_: Instance, source: *const SourceRaw) -> bool {
    record("routing_change");
    let name = unsafe { text((*source).p_ndi_name) };
    with_state(|s| s.last_source_name = name);
    true
}

unsafe extern "C" fn routing_get_no_connections(_: Instance, _: u32) -> i32 {
    record("routing_get_no_connections");
    with_state(|s| s.connections)
}

unsafe extern "C" fn routing_get_source_name(_: Instance) -> *const SourceRaw {
    record("routing_get_source_name");
    &OWN_NAME.0
}

unsafe extern "C" fn framesync_create(_: Instance) -> Instance {
    record("framesync_create");
    instance_token()
}

unsafe extern "C" fn framesync_capture_video(_: Instance, frame: *mut VideoFrameV2, field: FrameFormat) {
    record("framesync_capture_video");
    let frame = unsafe { &mut *frame };
    fill_video(frame);
    frame.frame_format_type = field;
}

unsafe extern "C" fn framesync_capture_audio(
    _: Instance,
    frame: *mut AudioFrameV2,
    sample_rate: i32,
    no_channels: i32,
    no_samples: i32,
) {
    record("framesync_capture_audio");
    let frame = unsafe { &mut *frame };
    frame.sample_rate = if sample_rate == 0 { 48_000 } else { sample_rate };
    frame.set_layout(if no_channels == 0 { 2 } else { no_channels }, no_samples);
}

unsafe extern "C" fn framesync_capture_audio_v2(
    _: Instance,
    frame: *mut AudioFrameV3,
    sample_rate: i32,
    no_channels: i32,
    no_samples: i32,
) {
    record("framesync_capture_audio_v2");
    let frame = unsafe { &mut *frame };
    frame.sample_rate = if sample_rate == 0 { 48_000 } else { sample_rate };
    frame.no_channels = if no_channels == 0 { 2 } else { no_channels };
    frame.no_samples = no_samples;
    frame.channel_stride_or_data_size = no_samples * 4;
}

fn typed_stubs() -> Vec<(Entry, usize)> {
    vec![
        (Entry::Initialize, initialize as usize),
        (Entry::Destroy, destroy as usize),
        (Entry::Version, version as usize),
        (Entry::IsSupportedCpu, is_supported_cpu as usize),
        (Entry::FindCreateV2, find_create_v2 as usize),
        (Entry::FindDestroy, find_destroy as usize),
        (Entry::FindGetSources, find_get_sources as usize),
        (Entry::FindGetCurrentSources, find_get_current_sources as usize),
        (Entry::FindWaitForSources, find_wait_for_sources as usize),
        (Entry::SendCreate, send_create as usize),
        (Entry::SendDestroy, send_destroy as usize),
        (Entry::SendSendVideoV2, send_send_video_v2 as usize),
        (Entry::SendSendVideoAsyncV2, send_send_video_async_v2 as usize),
        (Entry::SendSendAudioV2, send_send_audio_v2 as usize),
        (Entry::SendSendAudioV3, send_send_audio_v3 as usize),
        (Entry::SendSendMetadata, send_send_metadata as usize),
        (Entry::SendCapture, send_capture as usize),
        (Entry::SendFreeMetadata, send_free_metadata as usize),
        (Entry::SendGetTally, send_get_tally as usize),
        (Entry::SendGetNoConnections, send_get_no_connections as usize),
        (Entry::SendClearConnectionMetadata, send_clear_connection_metadata as usize),
        (Entry::SendAddConnectionMetadata, send_add_connection_metadata as usize),
        (Entry::SendSetFailover, send_set_failover as usize),
        (Entry::SendGetSourceName, send_get_source_name as usize),
        (Entry::UtilSendSendAudioInterleaved16s, util_send_send_audio_interleaved_16s as usize),
        (Entry::UtilSendSendAudioInterleaved32f, util_send_send_audio_interleaved_32f as usize),
        (Entry::UtilSendSendAudioInterleaved32s, util_send_send_audio_interleaved_32s as usize),
        (Entry::RecvCreateV3, recv_create_v3 as usize),
        (Entry::RecvDestroy, recv_destroy as usize),
        (Entry::RecvConnect, recv_connect as usize),
        (Entry::RecvCaptureV2, recv_capture_v2 as usize),
        (Entry::RecvCaptureV3, recv_capture_v3 as usize),
        (Entry::RecvFreeVideoV2, recv_free_video_v2 as usize),
        (Entry::RecvFreeAudioV2, recv_free_audio_v2 as usize),
        (Entry::RecvFreeAudioV3, recv_free_audio_v3 as usize),
        (Entry::RecvFreeMetadata, recv_free_metadata as usize),
        (Entry::RecvFreeString, recv_free_string as usize),
        (Entry::RecvSendMetadata, recv_send_metadata as usize),
        (Entry::RecvSetTally, recv_set_tally as usize),
        (Entry::RecvGetPerformance, recv_get_performance as usize),
        (Entry::RecvGetQueue, recv_get_queue as usize),
        (Entry::RecvClearConnectionMetadata, recv_clear_connection_metadata as usize),
        (Entry::RecvAddConnectionMetadata, recv_add_connection_metadata as usize),
        (Entry::RecvGetNoConnections, recv_get_no_connections as usize),
        (Entry::RecvGetWebControl, recv_get_web_control as usize),
        (Entry::RecvPtzIsSupported, recv_ptz_is_supported as usize),
        (Entry::RecvPtzZoom, recv_ptz_zoom as usize),
        (Entry::RecvPtzZoomSpeed, recv_ptz_zoom_speed as usize),
        (Entry::RecvPtzPanTilt, recv_ptz_pan_tilt as usize),
        (Entry::RecvPtzPanTiltSpeed, recv_ptz_pan_tilt_speed as usize),
        (Entry::RecvPtzStorePreset, recv_ptz_store_preset as usize),
        (Entry::RecvPtzRecallPreset, recv_ptz_recall_preset as usize),
        (Entry::RecvPtzAutoFocus, recv_ptz_auto_focus as usize),
        (Entry::RecvPtzFocus, recv_ptz_focus as usize),
        (Entry::RecvPtzFocusSpeed, recv_ptz_focus_speed as usize),
        (Entry::RecvPtzWhiteBalanceAuto, recv_ptz_white_balance_auto as usize),
        (Entry::RecvPtzWhiteBalanceIndoor, recv_ptz_white_balance_indoor as usize),
        (Entry::RecvPtzWhiteBalanceOutdoor, recv_ptz_white_balance_outdoor as usize),
        (Entry::RecvPtzWhiteBalanceOneshot, recv_ptz_white_balance_oneshot as usize),
        (Entry::RecvPtzWhiteBalanceManual, recv_ptz_white_balance_manual as usize),
        (Entry::RecvPtzExposureAuto, recv_ptz_exposure_auto as usize),
        (Entry::RecvPtzExposureManual, recv_ptz_exposure_manual as usize),
        (Entry::RecvPtzExposureManualV2, recv_ptz_exposure_manual_v2 as usize),
        (Entry::RecvRecordingIsSupported, recv_recording_is_supported as usize),
        (Entry::RecvRecordingStart, recv_recording_start as usize),
        (Entry::RecvRecordingStop, recv_recording_stop as usize),
        (Entry::RecvRecordingSetAudioLevel, recv_recording_set_audio_level as usize),
        (Entry::RecvRecordingIsRecording, recv_recording_is_recording as usize),
        (Entry::RecvRecordingGetFilename, recv_recording_get_filename as usize),
        (Entry::RecvRecordingGetError, recv_recording_get_error as usize),
        (Entry::RecvRecordingGetTimes, recv_recording_get_times as usize),
        (Entry::RoutingCreate, routing_create as usize),
        (Entry::RoutingDestroy, routing_destroy as usize),
        (Entry::RoutingChange, routing_change as usize),
        (Entry::RoutingClear, routing_clear as usize),
        (Entry::RoutingGetNoConnections, routing_get_no_connections as usize),
        (Entry::RoutingGetSourceName, routing_get_source_name as usize),
        (Entry::FramesyncCreate, framesync_create as usize),
        (Entry::FramesyncDestroy, framesync_destroy as usize),
        (Entry::FramesyncCaptureVideo, framesync_capture_video as usize),
        (Entry::FramesyncFreeVideo, framesync_free_video as usize),
        (Entry::FramesyncCaptureAudio, framesync_capture_audio as usize),
        (Entry::FramesyncFreeAudio, framesync_free_audio as usize),
        (Entry::FramesyncCaptureAudioV2, framesync_capture_audio_v2 as usize),
        (Entry::FramesyncFreeAudioV2, framesync_free_audio_v2 as usize),
        (Entry::FramesyncAudioQueueDepth, framesync_audio_queue_depth as usize),
        (Entry::UtilAudioToInterleaved16sV2, util_audio_to_interleaved_16s_v2 as usize),
        (Entry::UtilAudioFromInterleaved16sV2, util_audio_from_interleaved_16s_v2 as usize),
        (Entry::UtilAudioToInterleaved32fV2, util_audio_to_interleaved_32f_v2 as usize),
        (Entry::UtilAudioFromInterleaved32fV2, util_audio_from_interleaved_32f_v2 as usize),
        (Entry::UtilAudioToInterleaved32sV2, util_audio_to_interleaved_32s_v2 as usize),
        (Entry::UtilAudioFromInterleaved32sV2, util_audio_from_interleaved_32s_v2 as usize),
        (Entry::UtilV210ToP216, util_v210_to_p216 as usize),
        (Entry::UtilP216ToV210, util_p216_to_v210 as usize),
    ]
}
