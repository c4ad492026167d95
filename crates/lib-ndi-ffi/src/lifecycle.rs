//! Instance lifecycle management.
//!
//! Every native instance (finder, sender, receiver, routing, frame
//! synchronizer) follows the same state machine:
//!
//! - Created: a create call returned a non-null handle
//! - any number of operations dispatched through the binding
//! - Destroyed: the matching destroy entry point has been called once
//!
//! There is no way back from Destroyed. Operations on a destroyed instance
//! fail with [`NdiError::InvalidState`] and never reach native code.

use crate::error::{NdiError, NdiResult};
use crate::loader::Binding;
use crate::symbols::Entry;
use std::cell::Cell;
use std::ffi::c_void;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::ptr::NonNull;
use std::sync::Arc;

/// State of a native instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstanceState {
    Created,
    Destroyed,
}

/// Marker describing one kind of native instance.
pub trait InstanceKind {
    /// Short name used in errors and logs.
    const NAME: &'static str;

    /// Entry point that destroys an instance of this kind.
    const DESTROY: Entry;
}

macro_rules! instance_kinds {
    ($( $(#[$meta:meta])* $kind:ident => $name:literal, $destroy:ident; )*) => {
        $(
            $(#[$meta])*
            #[derive(Debug)]
            pub enum $kind {}

            impl InstanceKind for $kind {
                const NAME: &'static str = $name;
                const DESTROY: Entry = Entry::$destroy;
            }
        )*
    };
}

instance_kinds! {
    /// Source discovery.
    FinderKind => "find", FindDestroy;
    SenderKind => "send", SendDestroy;
    ReceiverKind => "recv", RecvDestroy;
    RoutingKind => "routing", RoutingDestroy;
    /// Clock-corrected capture on top of a receiver.
    FramesyncKind => "framesync", FramesyncDestroy;
}

/// Opaque native handle of kind `K`.
///
/// Handles of different kinds are distinct types, so a sender handle cannot
/// be passed where a receiver is expected.
pub struct InstanceHandle<K> {
    ptr: NonNull<c_void>,
    _kind: PhantomData<K>,
}

impl<K> InstanceHandle<K> {
    pub fn as_ptr(self) -> *mut c_void {
        self.ptr.as_ptr()
    }
}

impl<K> Clone for InstanceHandle<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for InstanceHandle<K> {}

impl<K: InstanceKind> fmt::Debug for InstanceHandle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceHandle<{}>({:p})", K::NAME, self.ptr)
    }
}

/// Owner of one native instance.
///
/// Holds the binding alive, so the library cannot be unloaded while the
/// instance exists. `Send` but not `Sync`: the binding adds no locking of
/// its own, so concurrent use of one instance must be arranged by the caller.
pub struct Lifecycle<K: InstanceKind> {
    binding: Arc<Binding>,
    handle: Option<InstanceHandle<K>>,
    _not_sync: PhantomData<Cell<()>>,
}

// SAFETY: the handle is an opaque token; the native library allows an
// instance to be used from any thread as long as calls do not overlap,
// which `!Sync` guarantees.
unsafe impl<K: InstanceKind> Send for Lifecycle<K> {}

impl<K: InstanceKind> Lifecycle<K> {
    /// Take ownership of the result of a create call.
    pub(crate) fn adopt(binding: Arc<Binding>, raw: *mut c_void) -> NdiResult<Self> {
        let ptr = NonNull::new(raw).ok_or(NdiError::CreationFailed { kind: K::NAME })?;
        tracing::debug!(kind = K::NAME, handle = ?ptr, "Instance created");
        Ok(Self {
            binding,
            handle: Some(InstanceHandle {
                ptr,
                _kind: PhantomData,
            }),
            _not_sync: PhantomData,
        })
    }

    pub fn state(&self) -> InstanceState {
        match self.handle {
            Some(_) => InstanceState::Created,
            None => InstanceState::Destroyed,
        }
    }

    pub fn binding(&self) -> &Arc<Binding> {
        &self.binding
    }

    /// Handle for the next native call.
    pub(crate) fn handle(&self) -> NdiResult<InstanceHandle<K>> {
        self.handle.ok_or(NdiError::InvalidState {
            kind: K::NAME,
            expected: InstanceState::Created,
            actual: InstanceState::Destroyed,
        })
    }

    /// Destroy the native instance.
    ///
    /// The destroy entry point is called exactly once; later calls fail
    /// without touching native code.
    pub fn destroy(&mut self) -> NdiResult<()> {
        let handle = self.handle()?;
        // SAFETY: every destroy entry point takes the instance and nothing else.
        let destroy = unsafe {
            self.binding
                .table()
                .entry_as::<unsafe extern "C" fn(*mut c_void)>(K::DESTROY)?
        };
        self.handle = None;
        unsafe { destroy(handle.as_ptr()) };
        tracing::debug!(kind = K::NAME, "Instance destroyed");
        Ok(())
    }
}

impl<K: InstanceKind> Drop for Lifecycle<K> {
    fn drop(&mut self) {
        if self.handle.is_some() {
            // Best-effort destroy, log but don't propagate errors
            if let Err(e) = self.destroy() {
                tracing::warn!(kind = K::NAME, error = %e, "Error during instance cleanup");
            }
        }
    }
}

impl<K: InstanceKind> fmt::Debug for Lifecycle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifecycle")
            .field("kind", &K::NAME)
            .field("state", &self.state())
            .finish()
    }
}

/// Signature shared by every free entry point.
pub(crate) type FreeFn<F> = unsafe extern "C" fn(*mut c_void, *mut F);

/// A descriptor filled by native code, released on drop.
///
/// The guard carries the one free entry point matching the descriptor kind
/// and API version that produced it, and calls it exactly once. It borrows
/// the producing instance, so the instance cannot be destroyed while the
/// frame is alive.
pub struct Received<'o, F> {
    frame: F,
    instance: *mut c_void,
    free: FreeFn<F>,
    _owner: PhantomData<&'o ()>,
}

impl<'o, F> Received<'o, F> {
    /// # Safety
    ///
    /// `frame` must have been filled by a call on `instance`, and `free` must
    /// be the free entry point for that call's descriptor kind and version.
    pub(crate) unsafe fn new(frame: F, instance: *mut c_void, free: FreeFn<F>) -> Self {
        Self {
            frame,
            instance,
            free,
            _owner: PhantomData,
        }
    }
}

impl<F> Deref for Received<'_, F> {
    type Target = F;

    fn deref(&self) -> &F {
        &self.frame
    }
}

impl<F> Drop for Received<'_, F> {
    fn drop(&mut self) {
        // SAFETY: invariants of `Received::new`.
        unsafe { (self.free)(self.instance, &mut self.frame) };
    }
}

impl<F: fmt::Debug> fmt::Debug for Received<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Received").field(&self.frame).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::{self, StubLibrary};

    #[test]
    fn test_null_create_is_creation_failure() {
        let binding = Binding::from_source(Box::new(StubLibrary::new())).unwrap();
        let err = Lifecycle::<SenderKind>::adopt(binding, std::ptr::null_mut()).unwrap_err();
        assert!(matches!(err, NdiError::CreationFailed { kind: "send" }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_single_destroy_then_rejected() {
        stub::reset();
        let binding = Binding::from_source(Box::new(StubLibrary::new())).unwrap();
        let mut instance = Lifecycle::<RoutingKind>::adopt(binding, stub::instance_token()).unwrap();
        assert_eq!(instance.state(), InstanceState::Created);
        assert!(instance.handle().is_ok());

        instance.destroy().unwrap();
        assert_eq!(instance.state(), InstanceState::Destroyed);
        assert_eq!(stub::count("routing_destroy"), 1);

        assert!(matches!(
            instance.handle(),
            Err(NdiError::InvalidState {
                kind: "routing",
                actual: InstanceState::Destroyed,
                ..
            })
        ));
        assert!(instance.destroy().is_err());
        drop(instance);
        assert_eq!(stub::count("routing_destroy"), 1);
    }

    #[test]
    fn test_drop_destroys_once() {
        stub::reset();
        let binding = Binding::from_source(Box::new(StubLibrary::new())).unwrap();
        {
            let _finder = Lifecycle::<FinderKind>::adopt(binding.clone(), stub::instance_token()).unwrap();
            assert_eq!(Arc::strong_count(&binding), 2);
        }
        assert_eq!(stub::count("find_destroy"), 1);
        assert_eq!(Arc::strong_count(&binding), 1);
    }
}
