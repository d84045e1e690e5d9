//! Per-core pool of capture segments.

use log::{debug, error, warn};
use matcap_common::Sample;
use serde::{Deserialize, Serialize};

use super::segment::Segment;
use crate::domain::{AllocError, CaptureError, CoreId};

/// What happens to already-allocated segments when a later one fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationPolicy {
    /// All-or-nothing: a failure frees every segment of the request
    #[default]
    Atomic,
    /// Segments allocated before the failure stay in place
    Partial,
}

/// The fixed-size ordered collection of segments owned by one core
///
/// The producer bound to this core appends into the active segment; once it
/// is full the cursor moves on to the next one. Nothing is ever overwritten.
#[derive(Debug)]
pub struct BufferPool {
    core: CoreId,
    segments: Vec<Segment>,
    active_index: usize,
}

impl BufferPool {
    /// A pool of `segment_count` segments without backing store
    #[must_use]
    pub fn new(core: CoreId, segment_count: usize) -> Self {
        Self {
            core,
            segments: (0..segment_count).map(|_| Segment::empty()).collect(),
            active_index: 0,
        }
    }

    #[must_use]
    pub fn core(&self) -> CoreId {
        self.core
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Index of the segment the producer is currently writing
    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// Free every segment and rewind the active cursor
    pub fn reset(&mut self) {
        for segment in &mut self.segments {
            segment.free();
        }
        self.active_index = 0;
        debug!("{}: pool reset", self.core);
    }

    /// Reset the pool, then allocate every segment with `capacity` samples
    ///
    /// # Errors
    /// Returns [`CaptureError::AllocationFailure`] naming the first segment
    /// that could not be allocated. Under [`AllocationPolicy::Atomic`] the pool
    /// is left empty; under [`AllocationPolicy::Partial`] the segments before
    /// the failing one stay allocated.
    pub fn allocate_all(
        &mut self,
        capacity: u64,
        policy: AllocationPolicy,
    ) -> Result<(), CaptureError> {
        self.allocate_all_with(capacity, policy, Segment::allocate)
    }

    pub(crate) fn allocate_all_with<F>(
        &mut self,
        capacity: u64,
        policy: AllocationPolicy,
        mut alloc: F,
    ) -> Result<(), CaptureError>
    where
        F: FnMut(u64) -> Result<Segment, AllocError>,
    {
        self.reset();

        for index in 0..self.segments.len() {
            match alloc(capacity) {
                Ok(segment) => self.segments[index] = segment,
                Err(source) => {
                    error!("{}: failed to allocate segment {index} ({capacity} samples)", self.core);
                    if policy == AllocationPolicy::Atomic {
                        self.reset();
                    } else {
                        warn!("{}: keeping {index} segments allocated before failure", self.core);
                    }
                    return Err(CaptureError::AllocationFailure {
                        core: self.core,
                        segment: index,
                        source,
                    });
                }
            }
        }

        debug!("{}: allocated {} segments of {capacity} samples", self.core, self.segments.len());
        Ok(())
    }

    /// Append a sample at the active cursor
    ///
    /// Returns `false` and drops the sample when every segment is full or the
    /// pool is not allocated.
    pub fn record(&mut self, sample: Sample) -> bool {
        while let Some(segment) = self.segments.get_mut(self.active_index) {
            if segment.push(sample) {
                return true;
            }
            if !segment.is_live() || self.active_index + 1 >= self.segments.len() {
                return false;
            }
            self.active_index += 1;
        }
        false
    }

    /// Whether every segment owns a backing store
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.segments.iter().all(Segment::is_live)
    }

    #[must_use]
    pub fn capacity_elements(&self) -> u64 {
        self.segments.iter().map(|s| s.capacity() as u64).sum()
    }

    #[must_use]
    pub fn size_elements(&self) -> u64 {
        self.segments.iter().map(|s| s.size() as u64).sum()
    }

    #[must_use]
    pub fn capacity_bytes(&self) -> u64 {
        self.segments.iter().map(Segment::byte_capacity).sum()
    }

    /// Readable bytes: the filled part of every segment
    #[must_use]
    pub fn filled_bytes(&self) -> u64 {
        self.segments.iter().map(Segment::byte_length).sum()
    }
}
