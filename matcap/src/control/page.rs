//! Page-bounded text output for attribute `show` handlers.

use matcap_common::PAGE_SIZE;

/// Marker written in place of the first line that no longer fits
pub const LIMIT_MSG: &str = "\n[...] (print limit reached)\n";

/// Accumulates whole lines up to one page
///
/// A line is written completely or not at all. The first line that does not
/// fit is replaced by [`LIMIT_MSG`] and every later line is discarded, so the
/// output never exceeds `PAGE_SIZE - 1` bytes.
#[derive(Debug, Default)]
pub struct PageWriter {
    buf: String,
    full: bool,
}

impl PageWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text` if it fits, otherwise terminate the page
    pub fn push(&mut self, text: &str) {
        if self.full {
            return;
        }
        // room reserved for the limit message and its terminator
        let available = (PAGE_SIZE - 1)
            .saturating_sub(LIMIT_MSG.len() + 1)
            .saturating_sub(self.buf.len());
        if text.len() >= available {
            self.buf.push_str(LIMIT_MSG);
            self.full = true;
        } else {
            self.buf.push_str(text);
        }
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.full
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_output_passes_through() {
        let mut page = PageWriter::new();
        page.push("a\n");
        page.push("b\n");
        assert!(!page.is_full());
        assert_eq!(page.into_string(), "a\nb\n");
    }

    #[test]
    fn test_overflow_is_marked_and_bounded() {
        let line = "x".repeat(99) + "\n";
        let mut page = PageWriter::new();
        for _ in 0..100 {
            page.push(&line);
        }
        assert!(page.is_full());
        let out = page.into_string();
        assert!(out.ends_with(LIMIT_MSG));
        assert!(out.len() < PAGE_SIZE);
        // only whole lines before the marker
        let body = &out[..out.len() - LIMIT_MSG.len()];
        assert_eq!(body.len() % line.len(), 0);
    }
}
