//! # lib-ndi-ffi
//!
//! Runtime binding to the NDI shared library.
//!
//! This crate loads the vendor library at run time and exposes its entry
//! points through safe wrappers. It handles:
//!
//! - Dynamic library loading with `libloading`, one shared [`Binding`] per
//!   library path
//! - All-or-nothing resolution of the entry-point table
//! - Per-instance lifecycle (create, use, destroy exactly once) for
//!   finders, senders, receivers, routings and frame synchronizers
//! - Release of every received frame through its matching free entry point
//! - Bounded copying of strings handed out by native code
//!
//! # Safety
//!
//! The library is trusted to honour its documented contracts. The wrappers
//! guarantee the Rust side of them: descriptors and strings passed in live
//! for the whole call, nothing is freed twice, and no instance is used
//! after it was destroyed.

pub mod error;
pub mod symbols;
pub mod strings;
pub mod raw;
pub mod lifecycle;
pub mod loader;
pub mod find;
pub mod send;
pub mod recv;
pub mod routing;
pub mod framesync;

#[cfg(test)]
mod stub;

pub use error::{NdiError, NdiResult, OsError};
pub use loader::{Binding, LibraryFormat, NativeLibrary};
pub use symbols::{Entry, SdkRevision, SymbolSource, SymbolTable};
pub use lifecycle::{InstanceState, Received};
pub use find::Finder;
pub use send::{AsyncVideoScope, Sender};
pub use recv::{Capture, CaptureKinds, Receiver};
pub use routing::Routing;
pub use framesync::Framesync;
