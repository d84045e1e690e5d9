//! # Sequential Reads Across Segments
//!
//! A core's segments are read as one logical byte stream: the filled bytes of
//! segment 0, followed by the filled bytes of segment 1, and so on. Unfilled
//! capacity is never part of the stream.
//!
//! ```text
//!   segment:   [0: 8000 B filled ][1: 4000 B ][2: 0 B][3: 0 B] ...
//!   offset:     0            7999  8000  11999
//!
//!   offset 9000 → (segment 1, intra-offset 1000)
//!   offset 8000 → (segment 1, intra-offset 0)     boundary selects next
//! ```
//!
//! Offsets are byte-addressed even though segments store 8-byte samples, so a
//! read may start or end in the middle of a sample. The reader keeps no state
//! between calls; the caller advances its own cursor after a successful read.

use log::{debug, error};

use super::pool::BufferPool;
use super::sink::ByteSink;
use crate::domain::CaptureError;

/// Position of a byte offset inside a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentCursor {
    /// Segment index within the pool
    pub index: usize,
    /// Byte offset within that segment's filled bytes
    pub offset: u64,
}

/// Reads byte ranges from one core's pool
#[derive(Debug, Clone, Copy)]
pub struct SequentialReader<'a> {
    pool: &'a BufferPool,
}

impl<'a> SequentialReader<'a> {
    #[must_use]
    pub fn new(pool: &'a BufferPool) -> Self {
        Self { pool }
    }

    /// Sum of the filled bytes of every segment
    #[must_use]
    pub fn total_filled_bytes(&self) -> u64 {
        self.pool.filled_bytes()
    }

    /// Map a stream offset to `(segment, intra-offset)`
    ///
    /// Segments without filled bytes are skipped. Returns `None` when the
    /// offset lies at or beyond the end of the filled bytes.
    #[must_use]
    pub fn locate(&self, offset: u64) -> Option<SegmentCursor> {
        let mut start = 0u64;
        for (index, segment) in self.pool.segments().iter().enumerate() {
            let end = start + segment.byte_length();
            if offset < end {
                return Some(SegmentCursor { index, offset: offset - start });
            }
            start = end;
        }
        None
    }

    /// Copy `length` bytes starting at `start_offset` into `sink`
    ///
    /// Short reads are not permitted: the whole range must lie inside the
    /// filled bytes. A zero-length read is a no-op.
    ///
    /// # Errors
    /// - [`CaptureError::NoData`] if any segment has no backing store, or if
    ///   `length > 0` and every segment has zero capacity
    /// - [`CaptureError::OutOfRange`] if the range exceeds the filled bytes
    /// - [`CaptureError::SinkFault`] if the sink accepts less than offered
    pub fn read<S>(&self, start_offset: u64, length: u64, sink: &mut S) -> Result<u64, CaptureError>
    where
        S: ByteSink + ?Sized,
    {
        let segments = self.pool.segments();
        if let Some(index) = segments.iter().position(|s| !s.is_live()) {
            error!("{}: segment {index} has no backing store", self.pool.core());
            return Err(CaptureError::NoData);
        }
        if length > 0 && self.pool.capacity_bytes() == 0 {
            error!("{}: segments have zero capacity", self.pool.core());
            return Err(CaptureError::NoData);
        }

        let total = self.total_filled_bytes();
        let out_of_range =
            || CaptureError::OutOfRange { offset: start_offset, length, available: total };

        match total.checked_sub(start_offset) {
            Some(available) if length <= available => {}
            _ => {
                error!("off={start_offset} len={length} exceeds total={total}");
                return Err(out_of_range());
            }
        }
        if length == 0 {
            return Ok(0);
        }

        let Some(SegmentCursor { mut index, offset }) = self.locate(start_offset) else {
            return Err(out_of_range());
        };
        debug!("off={start_offset} len={length} selected_idx={index} buffer_off={offset}");

        // `offset < byte_length`, so it indexes the first segment's bytes
        let mut intra = usize::try_from(offset).map_err(|_| out_of_range())?;
        let mut remaining = length;

        loop {
            let bytes = &segments[index].filled_bytes()[intra..];
            let take = bytes.len().min(usize::try_from(remaining).unwrap_or(usize::MAX));
            if take > 0 {
                let accepted = sink.accept(&bytes[..take]);
                if accepted < take {
                    error!("sink accepted {accepted} of {take} bytes at segment {index}");
                    return Err(CaptureError::SinkFault { offered: take, accepted });
                }
                remaining -= take as u64;
            }
            debug!("idx={index} copied={take} remaining={remaining}");

            if remaining == 0 {
                return Ok(length);
            }

            index += 1;
            intra = 0;
            if index >= segments.len() {
                error!("ran past last segment with {remaining} bytes unread");
                return Err(out_of_range());
            }
        }
    }
}
