//! A single fixed-capacity backing block of samples.

use log::{debug, error};
use matcap_common::{Sample, ELEMENT_SIZE};

use crate::domain::AllocError;

/// One allocated block of samples within a per-core pool
///
/// A segment owns its memory exclusively. It is created by a configuration
/// command, filled by the producer, and destroyed on reset or reallocation.
/// It is never resized in place.
///
/// **Invariant**: `size <= capacity`
#[derive(Debug, Default)]
pub struct Segment {
    /// Backing store (`None` once freed or before the first allocation)
    data: Option<Vec<Sample>>,

    /// Number of samples written by the producer
    size: usize,
}

impl Segment {
    /// A segment without backing store
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Allocate `capacity` zero-initialized samples
    ///
    /// A capacity of zero yields a live segment that can hold nothing.
    ///
    /// # Errors
    /// Returns [`AllocError::OutOfMemory`] if the allocator refuses the request
    /// or the byte size does not fit the address space.
    pub fn allocate(capacity: u64) -> Result<Self, AllocError> {
        let bytes = capacity.saturating_mul(ELEMENT_SIZE);
        let len = usize::try_from(capacity).map_err(|_| AllocError::OutOfMemory { bytes })?;

        let mut data: Vec<Sample> = Vec::new();
        if data.try_reserve_exact(len).is_err() {
            error!("failed to allocate {bytes} bytes ({capacity} samples)");
            return Err(AllocError::OutOfMemory { bytes });
        }
        data.resize(len, 0);
        debug!("allocated segment: {capacity} samples ({bytes} bytes)");

        Ok(Self { data: Some(data), size: 0 })
    }

    /// Release the backing store. Freeing a freed segment does nothing.
    pub fn free(&mut self) {
        if self.data.take().is_some() {
            debug!("freed segment");
        }
        self.size = 0;
    }

    /// Whether the segment currently owns a backing store
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.data.is_some()
    }

    /// Allocated element count (0 when freed)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }

    /// Filled element count
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.capacity() > 0 && self.size == self.capacity()
    }

    #[must_use]
    pub fn byte_length(&self) -> u64 {
        self.size as u64 * ELEMENT_SIZE
    }

    #[must_use]
    pub fn byte_capacity(&self) -> u64 {
        self.capacity() as u64 * ELEMENT_SIZE
    }

    /// Append one sample; returns `false` if the segment is full or freed
    pub fn push(&mut self, sample: Sample) -> bool {
        let Some(data) = self.data.as_mut() else {
            return false;
        };
        match data.get_mut(self.size) {
            Some(slot) => {
                *slot = sample;
                self.size += 1;
                true
            }
            None => false,
        }
    }

    /// Filled samples
    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        self.data.as_deref().map_or(&[][..], |data| &data[..self.size])
    }

    /// Filled samples viewed as bytes in native order
    #[must_use]
    pub fn filled_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.samples())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_is_zeroed_and_empty() {
        let segment = Segment::allocate(16).unwrap();
        assert!(segment.is_live());
        assert_eq!(segment.capacity(), 16);
        assert_eq!(segment.size(), 0);
        assert_eq!(segment.byte_capacity(), 128);
        assert_eq!(segment.byte_length(), 0);
        assert!(segment.filled_bytes().is_empty());
    }

    #[test]
    fn test_allocate_zero_capacity_is_live() {
        let mut segment = Segment::allocate(0).unwrap();
        assert!(segment.is_live());
        assert!(!segment.is_full());
        assert!(!segment.push(1));
    }

    #[test]
    fn test_allocate_oversized_fails() {
        let result = Segment::allocate(u64::MAX / ELEMENT_SIZE);
        assert!(matches!(result, Err(AllocError::OutOfMemory { .. })));
    }

    #[test]
    fn test_push_until_full() {
        let mut segment = Segment::allocate(2).unwrap();
        assert!(segment.push(0xdead));
        assert!(segment.push(0xbeef));
        assert!(segment.is_full());
        assert!(!segment.push(0xcafe));
        assert_eq!(segment.samples(), [0xdead_u64, 0xbeef].as_slice());
        assert_eq!(segment.byte_length(), 16);
    }

    #[test]
    fn test_filled_bytes_native_order() {
        let mut segment = Segment::allocate(4).unwrap();
        segment.push(0x0102_0304_0506_0708);
        assert_eq!(segment.filled_bytes(), &0x0102_0304_0506_0708u64.to_ne_bytes());
    }

    #[test]
    fn test_filled_bytes_covers_only_filled_samples() {
        let mut segment = Segment::allocate(4).unwrap();
        assert!(segment.filled_bytes().is_empty());
        segment.push(1);
        segment.push(2);
        assert_eq!(segment.filled_bytes().len(), 16);
        assert_eq!(segment.filled_bytes()[8..], 2u64.to_ne_bytes());
        segment.free();
        assert!(segment.filled_bytes().is_empty());
    }

    #[test]
    fn test_free_is_idempotent() {
        let mut segment = Segment::allocate(8).unwrap();
        segment.push(7);
        segment.free();
        assert!(!segment.is_live());
        assert_eq!(segment.capacity(), 0);
        assert_eq!(segment.size(), 0);
        segment.free();
        assert!(!segment.is_live());
        assert!(!segment.push(1));
    }
}
