//! # huffpack
//!
//! Static Huffman compression for files.
//!
//! The encoder counts every byte of its input, builds a Huffman tree from
//! those counts, and writes the 256 counts as a header followed by the
//! bit-packed codes. The decoder rebuilds the same tree from the header, so
//! the tree itself is never stored.
//!
//! ## Quick Start
//!
//! ```rust
//! use huffpack::HuffmanCodec;
//!
//! let codec = HuffmanCodec::default();
//! let encoded = codec.encode_bytes(b"abracadabra")?;
//! let decoded = codec.decode_bytes(&encoded)?;
//! assert_eq!(decoded, b"abracadabra");
//! # Ok::<(), huffpack::HuffmanError>(())
//! ```
//!
//! ## File format
//!
//! ```text
//! offset 0     256 x u32 big-endian, count of each byte value
//! offset 1024  codes of the input bytes, MSB first, zero padded
//! ```
//!
//! The payload is absent when the input is empty or holds a single
//! distinct byte value.

pub mod bit_io;
pub mod code_table;
pub mod config;
pub mod error;
pub mod frequency;
pub mod huffman_codec;
pub mod hufftree;
pub mod metadata;
pub mod min_heap;

pub use code_table::CodeTable;
pub use config::CodecConfig;
pub use error::{HuffmanError, Result};
pub use frequency::FrequencyTable;
pub use huffman_codec::{decode_to, encode_to, DecodeReport, DecodeState, EncodeReport, HuffmanCodec};
pub use hufftree::HuffmanTree;
