//! Foreign string marshaling.
//!
//! Native strings carry no length. Every scan here is bounded by
//! [`MAX_FOREIGN_STRING_LEN`] and copies into an owned `String` before
//! returning, so no raw address outlives the call that produced it.

use crate::error::{NdiError, NdiResult};
use std::ffi::{c_char, CString};

/// Upper bound on the bytes scanned for a terminator.
pub const MAX_FOREIGN_STRING_LEN: usize = 1 << 20;

/// Length of the NUL-terminated string at `ptr`, scanning at most `limit`
/// bytes.
///
/// # Safety
///
/// `ptr` must be non-null and every byte up to and including the terminator,
/// or `limit` bytes if that comes first, must be readable.
pub unsafe fn scan_terminated(ptr: *const c_char, limit: usize) -> NdiResult<usize> {
    let bytes = ptr.cast::<u8>();
    for len in 0..limit {
        // SAFETY: caller guarantees readability up to the terminator or limit.
        if unsafe { *bytes.add(len) } == 0 {
            return Ok(len);
        }
    }
    Err(NdiError::UnterminatedString { limit })
}

/// Copy the bytes before the terminator. Invalid UTF-8 is replaced.
unsafe fn copy_terminated(ptr: *const c_char, limit: usize) -> NdiResult<Option<String>> {
    if ptr.is_null() {
        return Ok(None);
    }
    let len = unsafe { scan_terminated(ptr, limit)? };
    let bytes = unsafe { std::slice::from_raw_parts(ptr.cast::<u8>(), len) };
    Ok(Some(String::from_utf8_lossy(bytes).into_owned()))
}

/// Read a string baked into the native module.
///
/// The result may be cached for the life of the binding.
///
/// # Safety
///
/// `ptr` must be null or point to a string that stays valid while the
/// module is loaded.
pub unsafe fn string_from_static(ptr: *const c_char) -> NdiResult<Option<String>> {
    unsafe { copy_terminated(ptr, MAX_FOREIGN_STRING_LEN) }
}

/// Copy a string returned by a native call.
///
/// Copy before making any further call on the same instance; if the entry
/// point hands ownership to the caller, free the native string only after
/// this returns.
///
/// # Safety
///
/// `ptr` must be null or point to a string that is valid for the duration
/// of this call.
pub unsafe fn string_from_transient(ptr: *const c_char) -> NdiResult<Option<String>> {
    unsafe { copy_terminated(ptr, MAX_FOREIGN_STRING_LEN) }
}

/// Owned NUL-terminated copies of Rust strings.
///
/// Raw settings records point into the arena, so it must outlive the
/// native call they are passed to.
#[derive(Debug, Default)]
pub struct CStringArena {
    strings: Vec<CString>,
}

impl CStringArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` and return its address.
    ///
    /// The address stays valid until the arena is dropped; moving a
    /// `CString` into the vector does not move its heap buffer.
    pub fn push(&mut self, field: &str, value: &str) -> NdiResult<*const c_char> {
        let s = CString::new(value)
            .map_err(|_| NdiError::invalid_parameter(field, "contains a NUL byte"))?;
        let ptr = s.as_ptr();
        self.strings.push(s);
        Ok(ptr)
    }

    /// As [`Self::push`], with `None` mapped to a null address.
    pub fn push_opt(&mut self, field: &str, value: Option<&str>) -> NdiResult<*const c_char> {
        match value {
            Some(v) => self.push(field, v),
            None => Ok(std::ptr::null()),
        }
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
