//! Domain types providing compile-time safety and self-documentation
//!
//! These newtype wrappers keep core indices, core selections and byte
//! quantities apart, so an element count is never passed where a byte
//! offset is expected.

use std::fmt;

use matcap_common::{ALL_CORES, BYTES_PER_MIB, ELEMENT_SIZE};
use serde::Serialize;

/// CPU core index (0-based)
///
/// Indexes the per-core pool array. Always smaller than the configured CPU
/// count once it has passed through [`CoreFilter::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CoreId(pub usize);

impl fmt::Display for CoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CPU:{}", self.0)
    }
}

/// Core selection used for reporting and reads
///
/// `All` is stored as `-1` on the control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoreFilter {
    #[default]
    All,
    Core(CoreId),
}

impl CoreFilter {
    /// Validate a raw selector against the CPU count
    ///
    /// Accepts `-1` or `[0, cpu_count)`.
    #[must_use]
    pub fn parse(raw: i64, cpu_count: usize) -> Option<Self> {
        if raw == i64::from(ALL_CORES) {
            return Some(Self::All);
        }
        let index = usize::try_from(raw).ok()?;
        (index < cpu_count).then_some(Self::Core(CoreId(index)))
    }

    /// The selected core, if exactly one is selected
    #[must_use]
    pub fn core(self) -> Option<CoreId> {
        match self {
            Self::All => None,
            Self::Core(core) => Some(core),
        }
    }
}

impl fmt::Display for CoreFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "{ALL_CORES}"),
            Self::Core(core) => write!(f, "{}", core.0),
        }
    }
}

/// A quantity of bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
pub struct ByteCount(pub u64);

impl ByteCount {
    /// Bytes occupied by `elements` samples
    #[must_use]
    pub fn of_elements(elements: u64) -> Self {
        Self(elements.saturating_mul(ELEMENT_SIZE))
    }

    /// Whole MiB, rounded down
    #[must_use]
    pub fn as_mib(self) -> u64 {
        self.0 / BYTES_PER_MIB
    }
}

impl fmt::Display for ByteCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bytes", self.0)
    }
}
