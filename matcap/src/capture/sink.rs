//! Destinations for sequential reads.

/// Destination of a copy from the capture buffers
///
/// `accept` copies as much of `bytes` as the destination can take and
/// returns that count. Accepting fewer bytes than offered aborts the read
/// with a sink fault; partial acceptance is never retried.
pub trait ByteSink {
    fn accept(&mut self, bytes: &[u8]) -> usize;
}

impl ByteSink for Vec<u8> {
    fn accept(&mut self, bytes: &[u8]) -> usize {
        self.extend_from_slice(bytes);
        bytes.len()
    }
}

/// Sink over a caller-provided buffer; accepts until the buffer is full
#[derive(Debug)]
pub struct SliceSink<'a> {
    buf: &'a mut [u8],
    written: usize,
}

impl<'a> SliceSink<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, written: 0 }
    }

    /// Bytes accepted so far
    #[must_use]
    pub fn written(&self) -> usize {
        self.written
    }

    /// Room left in the buffer
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.written
    }
}

impl ByteSink for SliceSink<'_> {
    fn accept(&mut self, bytes: &[u8]) -> usize {
        let room = &mut self.buf[self.written..];
        let n = room.len().min(bytes.len());
        room[..n].copy_from_slice(&bytes[..n]);
        self.written += n;
        n
    }
}
