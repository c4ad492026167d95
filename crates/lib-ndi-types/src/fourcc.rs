//! Four-character format tags.
//!
//! The native library identifies pixel and sample layouts by a 32-bit value
//! built from four ASCII bytes, first byte in the least significant position.
//! [`FourCC`] stores that value directly so it has the width and alignment of
//! the native enumeration it replaces.

use std::fmt;
use std::str::FromStr;

/// A four-character format tag with the native 32-bit representation.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCC(u32);

impl FourCC {
    /// 4:2:2 YCbCr, 16 bits per pixel.
    pub const UYVY: Self = Self::from_bytes(*b"UYVY");

    /// UYVY followed by an 8-bit alpha plane.
    ///
    /// The alpha plane starts at `data + yres * stride` and has a line
    /// stride of `stride / 2`.
    pub const UYVA: Self = Self::from_bytes(*b"UYVA");

    /// 4:2:2 semi-planar, 16 bits per component.
    pub const P216: Self = Self::from_bytes(*b"P216");

    /// P216 followed by a 16-bit alpha plane.
    pub const PA16: Self = Self::from_bytes(*b"PA16");

    /// Planar 4:2:0, V plane before U.
    pub const YV12: Self = Self::from_bytes(*b"YV12");

    /// Planar 4:2:0, U plane before V.
    pub const I420: Self = Self::from_bytes(*b"I420");

    /// Semi-planar 4:2:0.
    pub const NV12: Self = Self::from_bytes(*b"NV12");

    /// 8-bit BGRA with alpha.
    pub const BGRA: Self = Self::from_bytes(*b"BGRA");

    /// 8-bit BGR with the fourth byte ignored.
    pub const BGRX: Self = Self::from_bytes(*b"BGRX");

    /// 8-bit RGBA with alpha.
    pub const RGBA: Self = Self::from_bytes(*b"RGBA");

    /// 8-bit RGB with the fourth byte ignored.
    pub const RGBX: Self = Self::from_bytes(*b"RGBX");

    /// Planar 32-bit float audio.
    pub const FLTP: Self = Self::from_bytes(*b"FLTp");

    /// Build a tag from its four characters.
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_le_bytes(bytes))
    }

    /// Wrap a raw value received from the native side.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The four characters of this tag.
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    /// The raw native value.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Whether the pixel layout carries an alpha channel.
    pub fn has_alpha(self) -> bool {
        matches!(self, Self::UYVA | Self::PA16 | Self::BGRA | Self::RGBA)
    }

    /// Bytes occupied by a frame of `yres` lines with the given line stride.
    ///
    /// The stride always refers to the first plane. Additional planes are
    /// derived from it the way the native library lays them out. Returns
    /// `None` for unknown tags and on overflow.
    pub fn frame_size(self, line_stride: usize, yres: usize) -> Option<usize> {
        let luma = line_stride.checked_mul(yres)?;
        match self {
            Self::UYVY | Self::BGRA | Self::BGRX | Self::RGBA | Self::RGBX => Some(luma),
            // Alpha plane at half the stride.
            Self::UYVA => luma.checked_add(luma / 2),
            // Interleaved CbCr plane with the same stride at half height.
            Self::P216 => luma.checked_mul(2),
            Self::PA16 => luma.checked_mul(3),
            Self::YV12 | Self::I420 | Self::NV12 => luma.checked_add(luma / 2),
            _ => None,
        }
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCC({self})")
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.to_bytes() {
            if b.is_ascii_graphic() {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02x}")?;
            }
        }
        Ok(())
    }
}

/// Error parsing a [`FourCC`] from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("FourCC must be exactly four ASCII characters, got {0:?}")]
pub struct ParseFourCCError(pub String);

impl FromStr for FourCC {
    type Err = ParseFourCCError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes: [u8; 4] = s
            .as_bytes()
            .try_into()
            .ok()
            .filter(|b: &[u8; 4]| b.iter().all(u8::is_ascii))
            .ok_or_else(|| ParseFourCCError(s.to_string()))?;
        Ok(Self::from_bytes(bytes))
    }
}
