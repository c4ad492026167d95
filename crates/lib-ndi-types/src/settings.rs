//! Creation settings and small status records.
//!
//! Settings are owned, defaulted Rust values. They are lowered to the native
//! `#[repr(C)]` records only for the duration of a create call, so nothing
//! here holds a raw pointer.

use serde::{Deserialize, Serialize};

/// Preferred pixel layout for received video.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecvColorFormat {
    /// BGRX without alpha, BGRA with alpha.
    BgrxBgra,
    /// UYVY without alpha, BGRA with alpha.
    #[default]
    UyvyBgra,
    /// RGBX without alpha, RGBA with alpha.
    RgbxRgba,
    /// UYVY without alpha, RGBA with alpha.
    UyvyRgba,
    /// Whatever the source delivers with the least conversion.
    Fastest,
}

impl RecvColorFormat {
    /// Native enumeration value.
    pub fn raw(self) -> i32 {
        match self {
            Self::BgrxBgra => 0,
            Self::UyvyBgra => 1,
            Self::RgbxRgba => 2,
            Self::UyvyRgba => 3,
            Self::Fastest => 100,
        }
    }
}

/// How much of a source a receiver asks for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecvBandwidth {
    /// Metadata only.
    MetadataOnly,
    /// Metadata and audio.
    AudioOnly,
    /// Metadata, audio and reduced-resolution video.
    Lowest,
    /// Everything at full resolution.
    #[default]
    Highest,
}

impl RecvBandwidth {
    /// Native enumeration value.
    pub fn raw(self) -> i32 {
        match self {
            Self::MetadataOnly => -10,
            Self::AudioOnly => 10,
            Self::Lowest => 0,
            Self::Highest => 100,
        }
    }
}

/// Kind of data returned by a capture call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameType {
    /// Nothing arrived before the timeout.
    None,
    Video,
    Audio,
    Metadata,
    /// The connection was lost.
    Error,
    /// Settings of the source changed, e.g. it became a PTZ camera.
    StatusChange,
}

impl FrameType {
    /// Map a native return value. Unknown values yield `None`.
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::None),
            1 => Some(Self::Video),
            2 => Some(Self::Audio),
            3 => Some(Self::Metadata),
            4 => Some(Self::Error),
            100 => Some(Self::StatusChange),
            _ => None,
        }
    }

    pub fn raw(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Video => 1,
            Self::Audio => 2,
            Self::Metadata => 3,
            Self::Error => 4,
            Self::StatusChange => 100,
        }
    }
}

/// A network source as an owned value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Source {
    /// Canonical name, `MACHINE (Source)`.
    pub name: String,

    /// Network address. When absent, the name is resolved by discovery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_address: Option<String>,
}

impl Source {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url_address: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url_address = Some(url.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.url_address.is_none()
    }
}

/// Settings for a finder instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindCreateSettings {
    /// Include sources running on this machine.
    #[serde(default = "default_true")]
    pub show_local_sources: bool,

    /// Comma-separated groups to search. `None` uses the system default.
    #[serde(default)]
    pub groups: Option<String>,

    /// Comma-separated extra addresses to query directly.
    #[serde(default)]
    pub extra_ips: Option<String>,
}

impl Default for FindCreateSettings {
    fn default() -> Self {
        Self {
            show_local_sources: true,
            groups: None,
            extra_ips: None,
        }
    }
}

/// Settings for a sender instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendCreateSettings {
    /// Name advertised on the network.
    pub name: String,

    /// Groups the source is published in. `None` uses the system default.
    #[serde(default)]
    pub groups: Option<String>,

    /// Pace video submission to the frame rate.
    #[serde(default = "default_true")]
    pub clock_video: bool,

    /// Pace audio submission to the sample rate.
    #[serde(default)]
    pub clock_audio: bool,
}

impl SendCreateSettings {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Default for SendCreateSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            groups: None,
            clock_video: true,
            clock_audio: false,
        }
    }
}

/// Settings for a receiver instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecvCreateSettings {
    /// Source to connect to. An empty source creates an idle receiver that
    /// can be connected later.
    #[serde(default)]
    pub source: Source,

    #[serde(default)]
    pub color_format: RecvColorFormat,

    #[serde(default)]
    pub bandwidth: RecvBandwidth,

    /// Deliver fielded video as-is. When false everything is progressive.
    #[serde(default = "default_true")]
    pub allow_video_fields: bool,

    /// Name of this receiver as shown to the sender.
    #[serde(default)]
    pub name: Option<String>,
}

impl RecvCreateSettings {
    pub fn for_source(source: Source) -> Self {
        Self {
            source,
            ..Self::default()
        }
    }
}

impl Default for RecvCreateSettings {
    fn default() -> Self {
        Self {
            source: Source::default(),
            color_format: RecvColorFormat::UyvyBgra,
            bandwidth: RecvBandwidth::Highest,
            allow_video_fields: true,
            name: None,
        }
    }
}

/// Settings for a routing instance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingCreateSettings {
    pub name: String,
    #[serde(default)]
    pub groups: Option<String>,
}

impl RoutingCreateSettings {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            groups: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Tally state, layout of `NDIlib_tally_t`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub on_program: bool,
    pub on_preview: bool,
}

/// Frames waiting in a receiver queue, layout of `NDIlib_recv_queue_t`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecvQueue {
    pub video_frames: i32,
    pub audio_frames: i32,
    pub metadata_frames: i32,
}

/// Frame counters, layout of `NDIlib_recv_performance_t`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecvPerformance {
    pub video_frames: i64,
    pub audio_frames: i64,
    pub metadata_frames: i64,
}

/// Recording progress, layout of `NDIlib_recv_recording_time_t`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingTimes {
    /// Frames written so far.
    pub no_frames: i64,
    /// Timecode of the first frame in 100 ns ticks.
    pub start_time: i64,
    /// Timecode of the latest frame in 100 ns ticks.
    pub last_time: i64,
}
