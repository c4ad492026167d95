//! # lib-ndi-types
//!
//! Data definitions shared across the NDI binding workspace.
//!
//! This crate provides:
//! - Frame descriptors (`VideoFrameV2`, `AudioFrameV2`, `AudioFrameV3`,
//!   `MetadataFrame`) whose layout matches the native structures field for
//!   field, so their addresses can be handed to the native library directly
//! - Format tags and timing sentinels
//! - Owned, defaulted creation settings and small status records
//!
//! Nothing here loads or calls native code.

pub mod fourcc;
pub mod timing;
pub mod video;
pub mod audio;
pub mod metadata;
pub mod settings;

pub use fourcc::FourCC;
pub use timing::*;
pub use video::{FrameFormat, VideoFrameV2};
pub use audio::*;
pub use metadata::MetadataFrame;
pub use settings::*;
