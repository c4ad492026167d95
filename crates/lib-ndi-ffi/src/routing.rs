//! Routing: a published name that forwards another source.

use crate::error::NdiResult;
use crate::lifecycle::{InstanceState, Lifecycle, RoutingKind};
use crate::loader::Binding;
use crate::raw::{RoutingCreateRaw, SourceRaw};
use crate::strings::CStringArena;
use crate::symbols::ep;
use lib_ndi_types::{RoutingCreateSettings, Source};
use std::sync::Arc;

/// A routing instance.
#[derive(Debug)]
pub struct Routing {
    inner: Lifecycle<RoutingKind>,
}

impl Routing {
    pub fn create(binding: &Arc<Binding>, settings: &RoutingCreateSettings) -> NdiResult<Self> {
        let create = binding.entry::<ep::RoutingCreate>()?;
        let mut arena = CStringArena::new();
        let record = RoutingCreateRaw::lower(settings, &mut arena)?;
        let handle = unsafe { create(&record) };
        tracing::debug!(name = %settings.name, "Creating routing");
        Ok(Self {
            inner: Lifecycle::adopt(binding.clone(), handle)?,
        })
    }

    pub fn state(&self) -> InstanceState {
        self.inner.state()
    }

    /// Forward `source` under this routing's name.
    pub fn change(&self, source: &Source) -> NdiResult<bool> {
        let handle = self.inner.handle()?;
        let change = self.inner.binding().entry::<ep::RoutingChange>()?;
        let mut arena = CStringArena::new();
        let record = SourceRaw::lower(source, &mut arena)?;
        Ok(unsafe { change(handle.as_ptr(), &record) })
    }

    /// Stop forwarding. Receivers stay connected to the routed name.
    pub fn clear(&self) -> NdiResult<bool> {
        let handle = self.inner.handle()?;
        let clear = self.inner.binding().entry::<ep::RoutingClear>()?;
        Ok(unsafe { clear(handle.as_ptr()) })
    }

    /// Receivers connected, waiting up to `timeout_ms` for at least one.
    pub fn connections(&self, timeout_ms: u32) -> NdiResult<usize> {
        let handle = self.inner.handle()?;
        let get = self.inner.binding().entry::<ep::RoutingGetNoConnections>()?;
        let count = unsafe { get(handle.as_ptr(), timeout_ms) };
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// The name this routing is published under.
    pub fn source(&self) -> NdiResult<Source> {
        let handle = self.inner.handle()?;
        let get = self.inner.binding().entry::<ep::RoutingGetSourceName>()?;
        let record = unsafe { get(handle.as_ptr()) };
        if record.is_null() {
            return Ok(Source::default());
        }
        unsafe { (*record).to_source() }
    }

    pub fn destroy(&mut self) -> NdiResult<()> {
        self.inner.destroy()
    }
}
