//! Process-wide capture state: one pool per core plus the global flags.
//!
//! The state performs no locking. Configuration calls and the producer of a
//! core must be serialized by the owner (see [`crate::control::CaptureDevice`]).

use log::{debug, info};
use matcap_common::Sample;

use super::governor::CapacityGovernor;
use super::pool::{AllocationPolicy, BufferPool};
use super::reader::SequentialReader;
use super::segment::Segment;
use super::sink::ByteSink;
use crate::config::CaptureConfig;
use crate::domain::{AllocError, CaptureError, CoreFilter, CoreId};

#[derive(Debug)]
pub struct CaptureState {
    config: CaptureConfig,
    governor: CapacityGovernor,
    pools: Vec<BufferPool>,
    enabled: bool,
    core_filter: CoreFilter,
}

impl CaptureState {
    /// Fresh state: every pool empty, capture disabled, all cores selected
    #[must_use]
    pub fn init(config: CaptureConfig) -> Self {
        info!(
            "init: {} cores, {} segments per core, limit {} bytes",
            config.cpu_count, config.segments_per_core, config.buffer_limit
        );
        let pools = (0..config.cpu_count)
            .map(|core| BufferPool::new(CoreId(core), config.segments_per_core))
            .collect();
        Self {
            governor: CapacityGovernor::new(config.buffer_limit),
            config,
            pools,
            enabled: false,
            core_filter: CoreFilter::All,
        }
    }

    /// Disable capture and free every segment
    pub fn teardown(&mut self) {
        self.enabled = false;
        self.deallocate_all();
        info!("teardown: all buffers released");
    }

    #[must_use]
    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    #[must_use]
    pub fn cpu_count(&self) -> usize {
        self.pools.len()
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[must_use]
    pub fn core_filter(&self) -> CoreFilter {
        self.core_filter
    }

    pub fn set_core_filter(&mut self, filter: CoreFilter) {
        self.core_filter = filter;
    }

    #[must_use]
    pub fn pools(&self) -> &[BufferPool] {
        &self.pools
    }

    #[must_use]
    pub fn pool(&self, core: CoreId) -> Option<&BufferPool> {
        self.pools.get(core.0)
    }

    fn pool_mut(&mut self, core: CoreId) -> Result<&mut BufferPool, CaptureError> {
        let cpus = self.pools.len();
        self.pools
            .get_mut(core.0)
            .ok_or_else(|| CaptureError::invalid(format!("{core} out of range (cpus={cpus})")))
    }

    /// Free the segments of every core
    pub fn deallocate_all(&mut self) {
        debug!("destroy buffers for every core");
        for pool in &mut self.pools {
            pool.reset();
        }
    }

    /// Replace every core's segments with `capacity`-sample segments
    ///
    /// The budget is checked before anything is freed, so a rejected request
    /// leaves the current buffers untouched.
    ///
    /// # Errors
    /// - [`CaptureError::CapacityExceeded`] if the request breaks the budget
    /// - [`CaptureError::AllocationFailure`] if a segment cannot be allocated;
    ///   under the atomic policy every core is left empty
    pub fn allocate_all_cores(&mut self, capacity: u64) -> Result<(), CaptureError> {
        self.allocate_all_cores_with(capacity, Segment::allocate)
    }

    pub(crate) fn allocate_all_cores_with<F>(
        &mut self,
        capacity: u64,
        mut alloc: F,
    ) -> Result<(), CaptureError>
    where
        F: FnMut(u64) -> Result<Segment, AllocError>,
    {
        let total = self.governor.admit_all_cores(
            capacity,
            self.pools.len(),
            self.config.segments_per_core,
        )?;

        self.deallocate_all();
        debug!("create buffers for every core ({total} bytes)");
        let policy = self.config.allocation_policy;
        for index in 0..self.pools.len() {
            if let Err(e) = self.pools[index].allocate_all_with(capacity, policy, &mut alloc) {
                if policy == AllocationPolicy::Atomic {
                    self.deallocate_all();
                }
                return Err(e);
            }
        }
        Ok(())
    }

    /// Replace only `core`'s segments with `capacity`-sample segments
    ///
    /// # Errors
    /// - [`CaptureError::InvalidArgument`] if `core` does not exist
    /// - [`CaptureError::CapacityExceeded`] if the resulting global total
    ///   breaks the budget
    /// - [`CaptureError::AllocationFailure`] if a segment cannot be allocated
    pub fn allocate_core(&mut self, core: CoreId, capacity: u64) -> Result<(), CaptureError> {
        self.pool_mut(core)?;
        let total = self.governor.admit_core(
            &self.pools,
            core,
            capacity,
            self.config.segments_per_core,
        )?;
        debug!("create buffers on {core} (global total {total} bytes)");

        let policy = self.config.allocation_policy;
        self.pool_mut(core)?.allocate_all(capacity, policy)
    }

    /// Producer path: append a sample to `core`'s active segment
    ///
    /// Samples are dropped while capture is disabled, for unknown cores, and
    /// once the core's segments are full.
    pub fn record(&mut self, core: CoreId, sample: Sample) -> bool {
        if !self.enabled {
            return false;
        }
        self.pools.get_mut(core.0).is_some_and(|pool| pool.record(sample))
    }

    /// Filled bytes of `core`, or 0 for an unknown core
    #[must_use]
    pub fn filled_bytes(&self, core: CoreId) -> u64 {
        self.pool(core).map_or(0, BufferPool::filled_bytes)
    }

    /// Sequential read of `core`'s stream
    ///
    /// # Errors
    /// See [`SequentialReader::read`]; an unknown core is an invalid argument.
    pub fn read<S>(
        &self,
        core: CoreId,
        offset: u64,
        length: u64,
        sink: &mut S,
    ) -> Result<u64, CaptureError>
    where
        S: ByteSink + ?Sized,
    {
        let pool = self
            .pool(core)
            .ok_or_else(|| CaptureError::invalid(format!("{core} out of range")))?;
        SequentialReader::new(pool).read(offset, length, sink)
    }
}
