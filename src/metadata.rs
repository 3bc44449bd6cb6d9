//! File header: the 256 byte counts, each a 32-bit big-endian integer.

use std::io::{ErrorKind, Read, Write};

use crate::bit_io::{BitReader, BitWriter};
use crate::error::{HuffmanError, Result};
use crate::frequency::{FrequencyTable, SYMBOLS};

/// Size of the header in bytes. The payload starts at this offset.
pub const HEADER_LEN: usize = SYMBOLS * 4;

pub fn write_header<W: Write>(writer: &mut BitWriter<W>, table: &FrequencyTable) -> Result<()> {
    for &count in table.counts() {
        writer.write_u32(count)?;
    }
    Ok(())
}

pub fn read_header<R: Read>(reader: &mut BitReader<R>) -> Result<FrequencyTable> {
    let mut counts = [0u32; SYMBOLS];
    for slot in counts.iter_mut() {
        *slot = reader.read_u32().map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => HuffmanError::TruncatedHeader {
                bytes_read: reader.bytes_read(),
            },
            _ => HuffmanError::Io(e),
        })?;
    }
    Ok(FrequencyTable::from_counts(counts))
}
