//! Buffer status reporting
//!
//! [`StatusReport`] snapshots capacities and fill levels so the same numbers
//! can be rendered as the `buffers` attribute text or exported as JSON.
//!
//! ```text
//! CPU  0:  8# capacity=8000 (0 MiB) size=8000 (0 MiB) (full)
//! CPU  1:  8# capacity=8000 (0 MiB) size=12 (0 MiB)
//! total_capacity:            16000 (         0 MiB)
//! total_size:                 8012 (         0 MiB)
//! ```

use serde::Serialize;

use super::page::PageWriter;
use crate::capture::{BufferPool, CaptureState};
use crate::domain::{ByteCount, CoreFilter, CoreId};

/// One segment's capacity and fill level, in samples
#[derive(Debug, Clone, Serialize)]
pub struct SegmentStatus {
    pub index: usize,
    pub capacity: u64,
    pub size: u64,
    pub active: bool,
    pub full: bool,
}

/// One core's totals, with per-segment detail
#[derive(Debug, Clone, Serialize)]
pub struct CoreStatus {
    pub core: CoreId,
    pub capacity: u64,
    pub size: u64,
    pub full: bool,
    pub segments: Vec<SegmentStatus>,
}

impl CoreStatus {
    fn collect(pool: &BufferPool) -> Self {
        let segments: Vec<SegmentStatus> = pool
            .segments()
            .iter()
            .enumerate()
            .map(|(index, segment)| SegmentStatus {
                index,
                capacity: segment.capacity() as u64,
                size: segment.size() as u64,
                active: index == pool.active_index(),
                full: segment.is_full(),
            })
            .collect();
        let capacity = pool.capacity_elements();
        let size = pool.size_elements();
        Self { core: pool.core(), capacity, size, full: size > 0 && size == capacity, segments }
    }
}

/// Snapshot of the buffers selected by a core filter
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    /// Raw core filter (`-1` for all cores)
    pub core_filter: String,
    pub enabled: bool,
    pub cores: Vec<CoreStatus>,
    /// Sum of capacities in samples
    pub total_capacity: u64,
    /// Sum of fill levels in samples
    pub total_size: u64,
    pub total_capacity_bytes: ByteCount,
    pub total_size_bytes: ByteCount,
}

impl StatusReport {
    #[must_use]
    pub fn collect(state: &CaptureState) -> Self {
        let filter = state.core_filter();
        let cores: Vec<CoreStatus> = match filter {
            CoreFilter::All => state.pools().iter().map(CoreStatus::collect).collect(),
            CoreFilter::Core(core) => state.pool(core).map(CoreStatus::collect).into_iter().collect(),
        };
        let total_capacity = cores.iter().map(|c| c.capacity).sum();
        let total_size = cores.iter().map(|c| c.size).sum();

        Self {
            core_filter: filter.to_string(),
            enabled: state.enabled(),
            cores,
            total_capacity,
            total_size,
            total_capacity_bytes: ByteCount::of_elements(total_capacity),
            total_size_bytes: ByteCount::of_elements(total_size),
        }
    }

    /// Render as `buffers` attribute text, bounded to one page
    ///
    /// With all cores selected there is one summary line per core; with a
    /// single core selected there is one line per segment, `*` marking the
    /// active segment.
    #[must_use]
    pub fn render(&self, filter: CoreFilter) -> String {
        let mut page = PageWriter::new();

        match filter {
            CoreFilter::All => {
                for core in &self.cores {
                    page.push(&format!(
                        "CPU {:2}: {:2}# capacity={} ({} MiB) size={} ({} MiB){}\n",
                        core.core.0,
                        core.segments.len(),
                        core.capacity,
                        mib(core.capacity),
                        core.size,
                        mib(core.size),
                        full_marker(core.full),
                    ));
                }
            }
            CoreFilter::Core(_) => {
                for core in &self.cores {
                    for segment in &core.segments {
                        page.push(&format!(
                            "CPU {:2} {}BUF {:2}: capacity={} ({} MiB) size={} ({} MiB){}\n",
                            core.core.0,
                            if segment.active { '*' } else { ' ' },
                            segment.index,
                            segment.capacity,
                            mib(segment.capacity),
                            segment.size,
                            mib(segment.size),
                            full_marker(segment.full),
                        ));
                    }
                }
            }
        }

        page.push(&format!(
            "total_capacity: {:16} ({:10} MiB)\n",
            self.total_capacity,
            self.total_capacity_bytes.as_mib()
        ));
        page.push(&format!(
            "total_size:     {:16} ({:10} MiB)\n",
            self.total_size,
            self.total_size_bytes.as_mib()
        ));

        page.into_string()
    }
}

fn mib(elements: u64) -> u64 {
    ByteCount::of_elements(elements).as_mib()
}

fn full_marker(full: bool) -> &'static str {
    if full {
        " (full)"
    } else {
        ""
    }
}
