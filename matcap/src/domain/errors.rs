//! Structured error types for matcap
//!
//! Using thiserror for automatic Display implementation and error chaining.
//! Every error is returned synchronously to the immediate caller; nothing in
//! the capture core retries.

use thiserror::Error;

use super::types::CoreId;

/// Failure to obtain the backing store of a single segment
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocError {
    #[error("Out of memory allocating {bytes} bytes")]
    OutOfMemory { bytes: u64 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Allocation failed on {core} segment {segment}: {source}")]
    AllocationFailure {
        core: CoreId,
        segment: usize,
        #[source]
        source: AllocError,
    },

    #[error("Requested {requested} bytes exceeds buffer limit of {limit} bytes")]
    CapacityExceeded { requested: u64, limit: u64 },

    #[error("No data: buffers are not allocated")]
    NoData,

    #[error("Read of {length} bytes at offset {offset} exceeds {available} filled bytes")]
    OutOfRange { offset: u64, length: u64, available: u64 },

    #[error("Sink accepted {accepted} of {offered} bytes")]
    SinkFault { offered: usize, accepted: usize },

    #[error("Capture is disabled")]
    Disabled,

    #[error("Device is busy")]
    Busy,

    #[error("Read-only: {0}")]
    ReadOnly(String),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CaptureError {
    /// Translate into the Linux errno a device file operation would return
    ///
    /// Callers negate the value when emulating a `ssize_t` return.
    #[must_use]
    pub fn errno(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) | Self::CapacityExceeded { .. } => libc::EINVAL,
            Self::AllocationFailure { .. } => libc::ENOMEM,
            Self::NoData | Self::Disabled => libc::ENODATA,
            Self::OutOfRange { .. } | Self::SinkFault { .. } => libc::EFAULT,
            Self::Busy => libc::EBUSY,
            Self::ReadOnly(_) => libc::EROFS,
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_display() {
        let err = CaptureError::OutOfRange { offset: 0, length: 12_001, available: 12_000 };
        assert_eq!(
            err.to_string(),
            "Read of 12001 bytes at offset 0 exceeds 12000 filled bytes"
        );
    }

    #[test]
    fn test_allocation_failure_chains_source() {
        let err = CaptureError::AllocationFailure {
            core: CoreId(2),
            segment: 5,
            source: AllocError::OutOfMemory { bytes: 64 },
        };
        assert!(err.to_string().contains("CPU:2"));
        assert!(err.to_string().contains("segment 5"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_export_error_from_io() {
        let err: ExportError = std::io::Error::other("disk full").into();
        assert_eq!(err.to_string(), "disk full");
    }

    #[test]
    fn test_errno_mapping() {
        assert_eq!(CaptureError::invalid("x").errno(), libc::EINVAL);
        assert_eq!(CaptureError::CapacityExceeded { requested: 2, limit: 1 }.errno(), libc::EINVAL);
        assert_eq!(CaptureError::NoData.errno(), libc::ENODATA);
        assert_eq!(CaptureError::Disabled.errno(), libc::ENODATA);
        assert_eq!(
            CaptureError::SinkFault { offered: 8, accepted: 4 }.errno(),
            libc::EFAULT
        );
        assert_eq!(CaptureError::Busy.errno(), libc::EBUSY);
        assert_eq!(CaptureError::ReadOnly("buffers_bytes".into()).errno(), libc::EROFS);
    }
}
