//! Binary dump to hex text, one captured address per line.

use std::fmt;
use std::io::{ErrorKind, Read, Write};

use clap::ValueEnum;
use matcap_common::ELEMENT_SIZE;

use crate::domain::ExportError;

const CHUNK: usize = ELEMENT_SIZE as usize;

/// Byte order of the 8-byte elements in a dump
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ByteOrder {
    Big,
    /// Native order of the capture host
    #[default]
    Little,
}

impl ByteOrder {
    fn decode(self, chunk: [u8; CHUNK]) -> u64 {
        match self {
            Self::Big => u64::from_be_bytes(chunk),
            Self::Little => u64::from_le_bytes(chunk),
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Big => "big",
            Self::Little => "little",
        })
    }
}

/// Write `0x%016x` per 8-byte element of `reader`, returning the line count
///
/// A trailing chunk shorter than 8 bytes is zero-extended (at the high end
/// for little-endian, the low end for big-endian).
///
/// # Errors
/// Returns [`ExportError::Io`] if reading or writing fails
pub fn write_hex_dump<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    order: ByteOrder,
) -> Result<u64, ExportError> {
    let mut lines = 0;

    loop {
        let mut chunk = [0u8; CHUNK];
        let filled = fill(&mut reader, &mut chunk)?;
        if filled == 0 {
            break;
        }
        writeln!(writer, "0x{:016x}", order.decode(chunk))?;
        lines += 1;
        if filled < CHUNK {
            break;
        }
    }

    writer.flush()?;
    Ok(lines)
}

/// Read until `buf` is full or EOF
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
