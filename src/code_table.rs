//! Byte-to-code lookup derived from a Huffman tree.

use bitvec::prelude::*;

use crate::frequency::{FrequencyTable, SYMBOLS};
use crate::hufftree::HuffmanTree;

/// A single code, first bit first.
pub type Code = BitVec<u8, Msb0>;

/// The code of every byte value. Bytes absent from the input have an empty
/// code, as does the only byte of a single-symbol input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Code>,
}

impl CodeTable {
    /// Walks the tree with an explicit stack; left edges append 0, right
    /// edges append 1.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = vec![Code::new(); SYMBOLS];
        let mut stack = vec![(tree.root(), Code::new())];

        while let Some((id, path)) = stack.pop() {
            let node = tree.node(id);
            match node.children() {
                Some((left, right)) => {
                    let mut right_path = path.clone();
                    right_path.push(true);
                    stack.push((right, right_path));

                    let mut left_path = path;
                    left_path.push(false);
                    stack.push((left, left_path));
                }
                None => {
                    if let Some(byte) = node.symbol() {
                        codes[byte as usize] = path;
                    }
                }
            }
        }

        CodeTable { codes }
    }

    pub fn get(&self, byte: u8) -> &BitSlice<u8, Msb0> {
        &self.codes[byte as usize]
    }

    pub fn len_of(&self, byte: u8) -> usize {
        self.codes[byte as usize].len()
    }

    /// Exact number of payload bits needed to encode an input with these
    /// counts.
    pub fn payload_bits(&self, frequencies: &FrequencyTable) -> u64 {
        frequencies
            .iter_nonzero()
            .map(|(byte, count)| count as u64 * self.len_of(byte) as u64)
            .sum()
    }

    /// Non-empty codes in byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &BitSlice<u8, Msb0>)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_empty())
            .map(|(b, c)| (b as u8, c.as_bitslice()))
    }

    /// The code as a string of '0' and '1'.
    pub fn code_string(&self, byte: u8) -> String {
        self.get(byte)
            .iter()
            .map(|bit| if *bit { '1' } else { '0' })
            .collect()
    }

    /// True when no non-empty code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<_> = self.iter().map(|(_, c)| c).collect();
        codes.iter().enumerate().all(|(i, a)| {
            codes
                .iter()
                .enumerate()
                .all(|(j, b)| i == j || !(a.len() <= b.len() && b[..a.len()] == **a))
        })
    }
}

impl Default for CodeTable {
    fn default() -> Self {
        CodeTable {
            codes: vec![Code::new(); SYMBOLS],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_for(pairs: &[(u8, u32)]) -> (FrequencyTable, CodeTable) {
        let mut counts = [0u32; SYMBOLS];
        for &(byte, count) in pairs {
            counts[byte as usize] = count;
        }
        let freqs = FrequencyTable::from_counts(counts);
        let tree = HuffmanTree::build(&freqs).unwrap().unwrap();
        let codes = CodeTable::from_tree(&tree);
        (freqs, codes)
    }

    #[test]
    fn textbook_distribution_gets_optimal_lengths() {
        let (freqs, codes) = table_for(&[
            (b'A', 5),
            (b'B', 9),
            (b'C', 12),
            (b'D', 13),
            (b'E', 16),
            (b'F', 45),
        ]);

        assert_eq!(codes.len_of(b'F'), 1);
        assert_eq!(codes.len_of(b'C'), 3);
        assert_eq!(codes.len_of(b'D'), 3);
        assert_eq!(codes.len_of(b'E'), 3);
        assert_eq!(codes.len_of(b'A'), 4);
        assert_eq!(codes.len_of(b'B'), 4);
        assert_eq!(codes.payload_bits(&freqs), 224);
        assert!(codes.is_prefix_free());
    }

    #[test]
    fn codes_follow_left_zero_right_one() {
        let (_, codes) = table_for(&[(b'x', 1), (b'y', 2)]);
        assert_eq!(codes.code_string(b'x'), "0");
        assert_eq!(codes.code_string(b'y'), "1");
        assert_eq!(codes.code_string(b'z'), "");
    }

    #[test]
    fn single_symbol_has_empty_code() {
        let (freqs, codes) = table_for(&[(b'k', 5)]);
        assert_eq!(codes.len_of(b'k'), 0);
        assert_eq!(codes.payload_bits(&freqs), 0);
        assert_eq!(codes.iter().count(), 0);
    }

    #[test]
    fn every_present_byte_gets_a_code() {
        let pairs: Vec<(u8, u32)> = (0..=255u8).map(|b| (b, b as u32 % 7 + 1)).collect();
        let (freqs, codes) = table_for(&pairs);
        assert_eq!(codes.iter().count(), freqs.distinct());
        assert!(codes.is_prefix_free());
    }

    #[test]
    fn prefix_check_catches_overlap() {
        let mut codes = CodeTable::default();
        codes.codes[1] = bitvec![u8, Msb0; 0, 1];
        codes.codes[2] = bitvec![u8, Msb0; 0, 1, 1];
        assert!(!codes.is_prefix_free());
    }
}
