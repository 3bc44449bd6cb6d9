//! Per-byte occurrence counts.

use std::io::{ErrorKind, Read};

use crate::error::{HuffmanError, Result};

/// Number of distinct symbols, one per byte value.
pub const SYMBOLS: usize = 256;

const SCAN_CHUNK: usize = 8 * 1024;

/// Occurrence count of every byte value in one input, indexed by byte.
///
/// The sum of all counts is the input's length in bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u32; SYMBOLS],
}

impl FrequencyTable {
    pub fn from_counts(counts: [u32; SYMBOLS]) -> Self {
        FrequencyTable { counts }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut counts = [0u32; SYMBOLS];
        tally(&mut counts, bytes)?;
        Ok(FrequencyTable { counts })
    }

    /// Counts every byte a reader yields until end of input.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut counts = [0u32; SYMBOLS];
        let mut chunk = [0u8; SCAN_CHUNK];
        loop {
            let n = match reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            tally(&mut counts, &chunk[..n])?;
        }
        Ok(FrequencyTable { counts })
    }

    pub fn get(&self, byte: u8) -> u32 {
        self.counts[byte as usize]
    }

    pub fn counts(&self) -> &[u32; SYMBOLS] {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Number of byte values that occur at least once.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Byte values with non-zero counts, ascending.
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(b, &c)| (b as u8, c))
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        FrequencyTable {
            counts: [0; SYMBOLS],
        }
    }
}

fn tally(counts: &mut [u32; SYMBOLS], bytes: &[u8]) -> Result<()> {
    for &byte in bytes {
        let slot = &mut counts[byte as usize];
        *slot = slot
            .checked_add(1)
            .ok_or(HuffmanError::FrequencyOverflow { byte })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn counts_sum_to_input_length() {
        let table = FrequencyTable::from_bytes(b"abracadabra").unwrap();
        assert_eq!(table.get(b'a'), 5);
        assert_eq!(table.get(b'b'), 2);
        assert_eq!(table.get(b'r'), 2);
        assert_eq!(table.get(b'c'), 1);
        assert_eq!(table.get(b'd'), 1);
        assert_eq!(table.get(b'z'), 0);
        assert_eq!(table.total(), 11);
        assert_eq!(table.distinct(), 5);
    }

    #[test]
    fn empty_input_is_all_zero() {
        let table = FrequencyTable::from_bytes(&[]).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
        assert_eq!(table, FrequencyTable::default());
    }

    #[test]
    fn reader_scan_matches_slice_scan() {
        let data: Vec<u8> = (0..50_000u32).map(|i| (i * 31 % 251) as u8).collect();
        let from_reader = FrequencyTable::from_reader(Cursor::new(&data)).unwrap();
        assert_eq!(from_reader, FrequencyTable::from_bytes(&data).unwrap());
    }

    #[test]
    fn nonzero_iteration_is_ascending() {
        let table = FrequencyTable::from_bytes(b"zyxzz").unwrap();
        let pairs: Vec<_> = table.iter_nonzero().collect();
        assert_eq!(pairs, vec![(b'x', 1), (b'y', 1), (b'z', 3)]);
    }

    #[test]
    fn saturated_count_overflows() {
        let mut counts = [0u32; SYMBOLS];
        counts[7] = u32::MAX;
        let err = tally(&mut counts, &[7]).unwrap_err();
        assert!(matches!(err, HuffmanError::FrequencyOverflow { byte: 7 }));
    }
}
