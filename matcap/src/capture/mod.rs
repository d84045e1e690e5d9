//! # Per-Core Capture Buffers
//!
//! Each core owns a [`BufferPool`] of a fixed number of [`Segment`]s. A
//! single producer per core appends captured addresses into the active
//! segment; user space drains the pool through [`SequentialReader`], which
//! stitches the filled part of every segment into one byte stream.
//!
//! ```text
//! configure ──▶ CapacityGovernor::admit_* ──▶ BufferPool::allocate_all
//!                                                   │
//! producer  ──▶ BufferPool::record ──▶ Segment[active_index]
//!                                                   │
//! read      ──▶ SequentialReader::read ──▶ ByteSink
//! ```
//!
//! Invariants upheld here:
//! - `size <= capacity` for every segment
//! - the sum of all segment capacities (in bytes) never exceeds the budget
//! - every pool holds the same number of segments
//! - reallocating a core frees all of its previous segments first

pub mod cpu_utils;
pub mod governor;
pub mod pool;
pub mod reader;
pub mod segment;
pub mod sink;
pub mod state;

pub use governor::CapacityGovernor;
pub use pool::{AllocationPolicy, BufferPool};
pub use reader::{SegmentCursor, SequentialReader};
pub use segment::Segment;
pub use sink::{ByteSink, SliceSink};
pub use state::CaptureState;
