//! Capture configuration
//!
//! Defaults come from `matcap-common` and the host's online CPU count. A JSON
//! file can override any field; CLI flags override the file.

use anyhow::{bail, Context, Result};
use matcap_common::{BUFFER_LIMIT, SEGMENTS_PER_CORE};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::capture::cpu_utils::online_cpu_count;
use crate::capture::AllocationPolicy;

/// Geometry and limits of the capture buffers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Number of per-core pools
    pub cpu_count: usize,

    /// Segments in every pool
    pub segments_per_core: usize,

    /// Global byte budget across all pools
    pub buffer_limit: u64,

    /// Behaviour when a segment allocation fails mid-request
    pub allocation_policy: AllocationPolicy,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            cpu_count: online_cpu_count(),
            segments_per_core: SEGMENTS_PER_CORE,
            buffer_limit: BUFFER_LIMIT,
            allocation_policy: AllocationPolicy::default(),
        }
    }
}

impl CaptureConfig {
    /// Default configuration for a fixed number of cores
    #[must_use]
    pub fn with_cpus(cpu_count: usize) -> Self {
        Self { cpu_count, ..Self::default() }
    }

    /// Load a configuration from a JSON file; missing fields take defaults
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject geometries that cannot hold any data
    ///
    /// # Errors
    /// Returns an error naming the offending field
    pub fn validate(&self) -> Result<()> {
        if self.cpu_count == 0 {
            bail!("cpu_count must be at least 1");
        }
        if self.segments_per_core == 0 {
            bail!("segments_per_core must be at least 1");
        }
        if self.buffer_limit == 0 {
            bail!("buffer_limit must be greater than 0");
        }
        Ok(())
    }
}
