//! Error types for NDI binding operations.

use crate::lifecycle::InstanceState;
use std::fmt;
use std::io;
use thiserror::Error;

/// Windows `ERROR_TIMEOUT`, which the native library uses for its own
/// timeouts even on platforms where it is not a standard timeout code.
pub const VENDOR_TIMEOUT_CODE: i32 = 1460;

/// A raw platform error code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OsError {
    code: i32,
}

impl OsError {
    /// Wrap a raw code.
    pub fn from_raw(code: i32) -> Self {
        Self { code }
    }

    /// The error of the last failed system call on this thread.
    pub fn last() -> Option<Self> {
        io::Error::last_os_error().raw_os_error().map(Self::from_raw)
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    /// Standard classification of this code.
    pub fn kind(&self) -> io::ErrorKind {
        io::Error::from_raw_os_error(self.code).kind()
    }

    /// True for the platform's timeout codes and for the vendor timeout code.
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
            || self.code == VENDOR_TIMEOUT_CODE
    }
}

impl fmt::Display for OsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (os error {})", io::Error::from_raw_os_error(self.code), self.code)
    }
}

impl std::error::Error for OsError {}

/// Errors that can occur while binding to or calling the native library.
#[derive(Debug, Error)]
pub enum NdiError {
    /// The shared library could not be loaded: missing file, wrong
    /// architecture, permission denied.
    #[error("Failed to load library '{path}': {source}")]
    LoadFailure {
        path: String,
        #[source]
        source: libloading::Error,
    },

    /// A required entry point is not exported. The library is older or
    /// otherwise incompatible.
    #[error("Symbol '{symbol}' not found in library")]
    MissingSymbol { symbol: String },

    /// `NDIlib_initialize` reported failure, usually an unsupported CPU.
    #[error("Native library failed to initialize (unsupported CPU?)")]
    InitializeFailed,

    /// A create call returned a null handle.
    #[error("Failed to create {kind} instance")]
    CreationFailed { kind: &'static str },

    /// Operation on an instance in the wrong state.
    #[error("Invalid {kind} state: expected {expected:?}, got {actual:?}")]
    InvalidState {
        kind: &'static str,
        expected: InstanceState,
        actual: InstanceState,
    },

    /// Invalid parameter.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// A payload slice is shorter than its descriptor says.
    #[error("Buffer too small: descriptor needs {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    /// A foreign string had no terminator within the scan limit.
    #[error("Foreign string not terminated within {limit} bytes")]
    UnterminatedString { limit: usize },

    /// A capture call returned a frame type this binding does not know.
    #[error("Unexpected frame type {0} from capture")]
    UnexpectedFrameType(i32),

    /// Raw platform error.
    #[error("System error: {0}")]
    Os(#[from] OsError),
}

impl NdiError {
    /// Create a load failure.
    pub fn load_failure(path: impl Into<String>, source: libloading::Error) -> Self {
        Self::LoadFailure {
            path: path.into(),
            source,
        }
    }

    /// Create a missing symbol error.
    pub fn missing_symbol(symbol: impl Into<String>) -> Self {
        Self::MissingSymbol {
            symbol: symbol.into(),
        }
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Platform error code behind this error, if any.
    ///
    /// Load failures carry one on platforms where the loader reports
    /// through the system error mechanism.
    pub fn os_error(&self) -> Option<OsError> {
        if let Self::Os(e) = self {
            return Some(*e);
        }
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            if let Some(code) = err.downcast_ref::<io::Error>().and_then(io::Error::raw_os_error) {
                return Some(OsError::from_raw(code));
            }
            source = err.source();
        }
        None
    }

    /// Whether this error represents a timeout.
    pub fn is_timeout(&self) -> bool {
        self.os_error().is_some_and(|e| e.is_timeout())
    }

    /// Check if this is a recoverable error.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::CreationFailed { .. }
            | Self::InvalidParameter { .. }
            | Self::BufferTooSmall { .. }
            | Self::UnterminatedString { .. }
            | Self::UnexpectedFrameType(_) => true,
            Self::Os(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Check if the binding as a whole is unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::LoadFailure { .. } | Self::MissingSymbol { .. } | Self::InitializeFailed
        )
    }
}

/// Result type for NDI operations.
pub type NdiResult<T> = Result<T, NdiError>;
