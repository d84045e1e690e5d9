//! Named control attributes and their input parsing.

use std::fmt;
use std::str::FromStr;

use matcap_common::{ATTR_BUFFERS, ATTR_BUFFERS_BYTES, ATTR_BUFFERS_ENABLED, ATTR_CPU};

use crate::domain::CaptureError;

/// A get/set endpoint of the control surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// Capture enabled flag, `0` or `1`
    BuffersEnabled,
    /// Selected core, `-1` for all
    Cpu,
    /// Store: configure buffers. Show: status report
    Buffers,
    /// Filled bytes of the selected core (read-only)
    BuffersBytes,
}

impl Attribute {
    pub const ALL: [Attribute; 4] =
        [Self::BuffersEnabled, Self::Cpu, Self::Buffers, Self::BuffersBytes];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::BuffersEnabled => ATTR_BUFFERS_ENABLED,
            Self::Cpu => ATTR_CPU,
            Self::Buffers => ATTR_BUFFERS,
            Self::BuffersBytes => ATTR_BUFFERS_BYTES,
        }
    }

    #[must_use]
    pub fn is_writable(self) -> bool {
        !matches!(self, Self::BuffersBytes)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = CaptureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|attr| attr.name() == s)
            .ok_or_else(|| CaptureError::invalid(format!("unknown attribute: {s}")))
    }
}

/// Scan up to `max` leading decimal integers, `sscanf("%lld%lld")` style
///
/// Leading whitespace and an optional sign are accepted before each number.
/// Scanning stops at the first token that is not an integer; whatever
/// follows is ignored.
#[must_use]
pub fn scan_integers(input: &str, max: usize) -> Vec<i64> {
    let mut values = Vec::with_capacity(max);
    let mut rest = input;

    while values.len() < max {
        rest = rest.trim_start();
        let sign_len = usize::from(rest.starts_with(['+', '-']));
        let digits = rest[sign_len..].bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            break;
        }
        let (token, tail) = rest.split_at(sign_len + digits);
        match token.parse::<i64>() {
            Ok(value) => values.push(value),
            Err(_) => break,
        }
        rest = tail;
    }

    values
}

/// Scan exactly one leading integer
///
/// # Errors
/// Returns [`CaptureError::InvalidArgument`] if the input does not start
/// with an integer
pub fn scan_one(input: &str) -> Result<i64, CaptureError> {
    scan_integers(input, 1)
        .first()
        .copied()
        .ok_or_else(|| CaptureError::invalid(format!("expected an integer, got {:?}", input.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_names_round_trip() {
        for attr in Attribute::ALL {
            assert_eq!(attr.name().parse::<Attribute>().unwrap(), attr);
        }
        assert!("samples_total".parse::<Attribute>().is_err());
    }

    #[test]
    fn test_buffers_bytes_is_read_only() {
        assert!(!Attribute::BuffersBytes.is_writable());
        assert!(Attribute::Buffers.is_writable());
    }

    #[test]
    fn test_scan_integers_like_sscanf() {
        assert_eq!(scan_integers("100\n", 2), vec![100]);
        assert_eq!(scan_integers("  2 100", 2), vec![2, 100]);
        assert_eq!(scan_integers("-1", 1), vec![-1]);
        assert_eq!(scan_integers("+7 8 9", 2), vec![7, 8]);
        assert_eq!(scan_integers("3 abc", 2), vec![3]);
        assert_eq!(scan_integers("12ab", 2), vec![12]);
        assert!(scan_integers("abc", 2).is_empty());
        assert!(scan_integers("-", 2).is_empty());
        assert!(scan_integers("", 2).is_empty());
    }

    #[test]
    fn test_scan_overflow_stops() {
        assert!(scan_integers("99999999999999999999", 1).is_empty());
    }

    #[test]
    fn test_scan_one() {
        assert_eq!(scan_one("1\n").unwrap(), 1);
        assert!(matches!(scan_one("on"), Err(CaptureError::InvalidArgument(_))));
    }
}
