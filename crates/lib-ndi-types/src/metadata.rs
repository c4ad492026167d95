//! Metadata frame descriptor.

use crate::timing::TIMECODE_SYNTHESIZE;
use std::ffi::{c_char, CStr};
use std::ptr;

/// Metadata frame, layout-identical to `NDIlib_metadata_frame_t`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetadataFrame {
    /// Length of the string in bytes including the terminating NUL.
    /// Zero means "scan for the terminator".
    pub length: i32,

    /// Timecode in 100 ns ticks.
    pub timecode: i64,

    /// NUL-terminated UTF-8 XML, or null.
    pub data: *mut c_char,
}

impl MetadataFrame {
    pub fn new() -> Self {
        Self {
            length: 0,
            timecode: TIMECODE_SYNTHESIZE,
            data: ptr::null_mut(),
        }
    }

    /// Reset every field to its baseline value.
    pub fn set_default(&mut self) {
        *self = Self::new();
    }

    pub fn has_data(&self) -> bool {
        !self.data.is_null()
    }

    /// Point the descriptor at a caller-owned NUL-terminated string.
    ///
    /// The descriptor does not borrow `text`; it must outlive every native
    /// call the descriptor is passed to.
    pub fn set_text(&mut self, text: &CStr) {
        self.data = text.as_ptr().cast_mut();
        self.length = i32::try_from(text.to_bytes_with_nul().len()).unwrap_or(0);
    }

    /// Bytes to scan for the payload, when the descriptor states one.
    pub fn declared_len(&self) -> Option<usize> {
        usize::try_from(self.length).ok().filter(|&len| len > 0)
    }
}

impl Default for MetadataFrame {
    fn default() -> Self {
        Self::new()
    }
}
