//! Source discovery.

use crate::error::NdiResult;
use crate::lifecycle::{FinderKind, InstanceState, Lifecycle};
use crate::loader::Binding;
use crate::raw::{FindCreateRaw, SourceRaw};
use crate::strings::CStringArena;
use crate::symbols::ep;
use lib_ndi_types::{FindCreateSettings, Source};
use std::sync::Arc;

/// A finder instance.
#[derive(Debug)]
pub struct Finder {
    inner: Lifecycle<FinderKind>,
}

impl Finder {
    pub fn create(binding: &Arc<Binding>, settings: &FindCreateSettings) -> NdiResult<Self> {
        let create = binding.entry::<ep::FindCreateV2>()?;
        let mut arena = CStringArena::new();
        let record = FindCreateRaw::lower(settings, &mut arena)?;
        // SAFETY: `record` and the strings in `arena` outlive the call.
        let handle = unsafe { create(&record) };
        Ok(Self {
            inner: Lifecycle::adopt(binding.clone(), handle)?,
        })
    }

    pub fn state(&self) -> InstanceState {
        self.inner.state()
    }

    /// Block until the source list changes or `timeout_ms` elapses.
    ///
    /// Returns `false` on timeout.
    pub fn wait_for_sources(&self, timeout_ms: u32) -> NdiResult<bool> {
        let handle = self.inner.handle()?;
        let wait = self.inner.binding().entry::<ep::FindWaitForSources>()?;
        Ok(unsafe { wait(handle.as_ptr(), timeout_ms) })
    }

    /// Sources currently known, without waiting.
    pub fn current_sources(&self) -> NdiResult<Vec<Source>> {
        let handle = self.inner.handle()?;
        let get = self.inner.binding().entry::<ep::FindGetCurrentSources>()?;
        let mut count = 0u32;
        let list = unsafe { get(handle.as_ptr(), &mut count) };
        // SAFETY: the list stays valid until the next call on this finder,
        // and it is copied before returning.
        unsafe { copy_sources(list, count) }
    }

    /// Wait up to `timeout_ms` for sources, then list them.
    pub fn sources(&self, timeout_ms: u32) -> NdiResult<Vec<Source>> {
        let handle = self.inner.handle()?;
        let get = self.inner.binding().entry::<ep::FindGetSources>()?;
        let mut count = 0u32;
        let list = unsafe { get(handle.as_ptr(), &mut count, timeout_ms) };
        unsafe { copy_sources(list, count) }
    }

    pub fn destroy(&mut self) -> NdiResult<()> {
        self.inner.destroy()
    }
}

/// Copy a native source array.
///
/// # Safety
///
/// `list` must be null or point to `count` valid records.
unsafe fn copy_sources(list: *const SourceRaw, count: u32) -> NdiResult<Vec<Source>> {
    if list.is_null() || count == 0 {
        return Ok(Vec::new());
    }
    let raw = unsafe { std::slice::from_raw_parts(list, count as usize) };
    let sources = raw
        .iter()
        .map(|s| unsafe { s.to_source() })
        .collect::<NdiResult<Vec<_>>>()?;
    tracing::debug!(count = sources.len(), "Discovered sources");
    Ok(sources)
}
