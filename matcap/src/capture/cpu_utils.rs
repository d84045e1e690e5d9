//! CPU utility functions
//!
//! Utilities for querying CPU information from /sys filesystem.

use anyhow::{Context, Result};
use std::fs;

use crate::domain::CoreId;

const ONLINE_CPUS_PATH: &str = "/sys/devices/system/cpu/online";

/// Get list of online CPU IDs from /sys/devices/system/cpu/online
///
/// Returns a vector of CPU IDs (e.g., [0, 1, 2, 3] for a 4-core system).
/// The format in /sys is like "0-3" or "0-3,8-11" for NUMA systems.
///
/// # Errors
/// Returns an error if the file cannot be read or contains malformed ranges
pub fn online_cpus() -> Result<Vec<CoreId>> {
    let content = fs::read_to_string(ONLINE_CPUS_PATH)
        .with_context(|| format!("Failed to read {ONLINE_CPUS_PATH}"))?;
    parse_cpu_list(&content)
}

/// Number of online CPUs, or 1 if /sys is unavailable
#[must_use]
pub fn online_cpu_count() -> usize {
    match online_cpus() {
        Ok(cpus) if !cpus.is_empty() => cpus.len(),
        Ok(_) => 1,
        Err(e) => {
            log::warn!("{e:#}; assuming a single CPU");
            1
        }
    }
}

/// Parse a kernel CPU list such as "0-3,8-11" or "5"
///
/// # Errors
/// Returns an error if a range bound is not a number
pub fn parse_cpu_list(content: &str) -> Result<Vec<CoreId>> {
    let mut cpus = Vec::new();

    for range in content.trim().split(',').filter(|r| !r.is_empty()) {
        if let Some((start, end)) = range.split_once('-') {
            // Range like "0-3"
            let start: usize = start.parse().with_context(|| format!("Bad CPU range: {range}"))?;
            let end: usize = end.parse().with_context(|| format!("Bad CPU range: {range}"))?;
            cpus.extend((start..=end).map(CoreId));
        } else {
            // Single CPU like "5"
            let cpu: usize = range.parse().with_context(|| format!("Bad CPU id: {range}"))?;
            cpus.push(CoreId(cpu));
        }
    }

    Ok(cpus)
}
