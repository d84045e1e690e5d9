//! Global byte budget enforcement.
//!
//! The budget is shared by every core, so the current total is recomputed
//! from the live pools on each configuration request instead of being cached.
//! This walks `cores × segments` and only runs on the configuration path.

use log::{debug, error};
use matcap_common::ELEMENT_SIZE;

use super::pool::BufferPool;
use crate::domain::{CaptureError, CoreId};

/// Admits or rejects allocation requests against the byte budget
#[derive(Debug, Clone, Copy)]
pub struct CapacityGovernor {
    limit: u64,
}

impl CapacityGovernor {
    #[must_use]
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }

    #[must_use]
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// `true` if `proposed_total_bytes` fits the budget
    #[must_use]
    pub fn check(&self, proposed_total_bytes: u64) -> bool {
        proposed_total_bytes <= self.limit
    }

    /// Bytes currently allocated across all pools
    #[must_use]
    pub fn current_total(pools: &[BufferPool]) -> u64 {
        pools.iter().map(BufferPool::capacity_bytes).sum()
    }

    /// Admit a request that replaces every pool with `capacity`-sample segments
    ///
    /// # Errors
    /// Returns [`CaptureError::CapacityExceeded`] if the total exceeds the
    /// budget or overflows.
    pub fn admit_all_cores(
        &self,
        capacity: u64,
        cpu_count: usize,
        segments_per_core: usize,
    ) -> Result<u64, CaptureError> {
        let proposed = capacity
            .checked_mul(cpu_count as u64)
            .and_then(|v| v.checked_mul(segments_per_core as u64))
            .and_then(|v| v.checked_mul(ELEMENT_SIZE));
        self.admit(proposed)
    }

    /// Admit a request that replaces only `core`'s pool
    ///
    /// The target core's current segments are excluded from the total since
    /// the request destroys them.
    ///
    /// # Errors
    /// Returns [`CaptureError::CapacityExceeded`] if the resulting global total
    /// exceeds the budget or overflows.
    pub fn admit_core(
        &self,
        pools: &[BufferPool],
        core: CoreId,
        capacity: u64,
        segments_per_core: usize,
    ) -> Result<u64, CaptureError> {
        let others: u64 = pools
            .iter()
            .filter(|pool| pool.core() != core)
            .map(BufferPool::capacity_bytes)
            .sum();
        debug!("{core}: {others} bytes allocated on other cores");

        let proposed = capacity
            .checked_mul(segments_per_core as u64)
            .and_then(|v| v.checked_mul(ELEMENT_SIZE))
            .and_then(|v| v.checked_add(others));
        self.admit(proposed)
    }

    fn admit(&self, proposed: Option<u64>) -> Result<u64, CaptureError> {
        match proposed {
            Some(total) if self.check(total) => Ok(total),
            _ => {
                let requested = proposed.unwrap_or(u64::MAX);
                error!("total buffer too large: {requested} > {}", self.limit);
                Err(CaptureError::CapacityExceeded { requested, limit: self.limit })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::pool::AllocationPolicy;

    #[test]
    fn test_check_boundary() {
        let governor = CapacityGovernor::new(1024);
        assert!(governor.check(1024));
        assert!(!governor.check(1025));
        assert!(governor.check(0));
    }

    #[test]
    fn test_admit_all_cores_exact_limit() {
        // 4 cores * 8 segments * 8 bytes * 16 samples = 4096
        let governor = CapacityGovernor::new(4096);
        assert_eq!(governor.admit_all_cores(16, 4, 8).unwrap(), 4096);
        assert!(matches!(
            governor.admit_all_cores(17, 4, 8),
            Err(CaptureError::CapacityExceeded { requested: 4352, limit: 4096 })
        ));
    }

    #[test]
    fn test_admit_all_cores_overflow_is_rejected() {
        let governor = CapacityGovernor::new(u64::MAX);
        assert!(matches!(
            governor.admit_all_cores(u64::MAX, 2, 8),
            Err(CaptureError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn test_admit_core_recomputes_other_cores() {
        let mut pools: Vec<BufferPool> = (0..3).map(|i| BufferPool::new(CoreId(i), 2)).collect();
        pools[0].allocate_all(10, AllocationPolicy::Atomic).unwrap(); // 160 bytes
        pools[2].allocate_all(50, AllocationPolicy::Atomic).unwrap(); // 800 bytes
        assert_eq!(CapacityGovernor::current_total(&pools), 960);

        let governor = CapacityGovernor::new(1000);
        // core 2 is replaced: 160 + 2 * 8 * 52 = 992
        assert_eq!(governor.admit_core(&pools, CoreId(2), 52, 2).unwrap(), 992);
        // core 1 is added on top: 960 + 2 * 8 * 3 = 1008
        assert!(governor.admit_core(&pools, CoreId(1), 3, 2).is_err());
    }
}
