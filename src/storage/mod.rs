//! Append-only log storage
//!
//! The wake cycle persists one record line per wake through the
//! [`LogStorage`] trait. Implementations own the "open, append one line,
//! flush, close" sequence so a failed cycle never leaves the file wedged
//! for the next one.

use core::fmt;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(feature = "pico2_w")]
pub mod sdcard;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockStorage;

/// Result type for storage operations
pub type Result<T> = core::result::Result<T, StorageError>;

/// Storage error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum StorageError {
    /// The volume is not mounted (initialization failed or never ran)
    NotReady,
    /// The log file could not be opened for this append
    OpenFailed,
    /// The line could not be written or flushed
    WriteFailed,
    /// The underlying block device failed
    DeviceError,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotReady => write!(f, "storage not ready"),
            StorageError::OpenFailed => write!(f, "log file open failed"),
            StorageError::WriteFailed => write!(f, "log file write failed"),
            StorageError::DeviceError => write!(f, "storage device error"),
        }
    }
}

/// Append-only record log
///
/// # Contract
///
/// - `initialize` mounts the volume and, when the log file does not exist
///   yet, creates it and writes the two header lines. Existing records are
///   never touched.
/// - `append` persists one record line (the implementation adds the line
///   terminator) as an independent open/write/close so consecutive failures
///   stay independent.
pub trait LogStorage {
    /// Mount the volume and ensure the log file exists with its header
    fn initialize(&mut self) -> Result<()>;

    /// Append one record line to the log file
    fn append(&mut self, line: &str) -> Result<()>;
}
