//! Timecodes, timestamps and frame rates.
//!
//! All native time values are signed 64-bit counts of 100 ns ticks.

use serde::{Deserialize, Serialize};

/// Ask the native side to generate the timecode itself.
pub const TIMECODE_SYNTHESIZE: i64 = i64::MAX;

/// An empty timecode or timestamp.
pub const TIMECODE_EMPTY: i64 = 0;

/// Timestamp reported on received frames when the sender supplied none.
pub const RECV_TIMESTAMP_UNDEFINED: i64 = i64::MAX;

/// Number of 100 ns ticks in one second.
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Frame rate expressed as a rational number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    /// Numerator.
    pub n: i32,
    /// Denominator.
    pub d: i32,
}

impl FrameRate {
    /// NTSC 29.97 fps, the descriptor default.
    pub const NTSC_2997: Self = Self::new(30000, 1001);
    /// NTSC 59.94 fps.
    pub const NTSC_5994: Self = Self::new(60000, 1001);
    /// PAL 25 fps.
    pub const PAL_25: Self = Self::new(25, 1);
    /// 50 fps.
    pub const PAL_50: Self = Self::new(50, 1);
    /// 30 fps.
    pub const FPS_30: Self = Self::new(30, 1);
    /// 60 fps.
    pub const FPS_60: Self = Self::new(60, 1);

    pub const fn new(n: i32, d: i32) -> Self {
        Self { n, d }
    }

    /// Frames per second, or `None` for a zero denominator.
    pub fn as_f64(&self) -> Option<f64> {
        (self.d != 0).then(|| self.n as f64 / self.d as f64)
    }

    /// Duration of one frame in 100 ns ticks, or `None` for a non-positive rate.
    pub fn frame_duration_ticks(&self) -> Option<i64> {
        if self.n <= 0 || self.d <= 0 {
            return None;
        }
        Some(TICKS_PER_SECOND * self.d as i64 / self.n as i64)
    }

    /// Frame duration as a [`std::time::Duration`].
    pub fn frame_duration(&self) -> Option<std::time::Duration> {
        self.frame_duration_ticks()
            .map(|ticks| std::time::Duration::from_nanos(ticks as u64 * 100))
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::NTSC_2997
    }
}
