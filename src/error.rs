//! Error types for encoding and decoding.

use std::path::PathBuf;

use thiserror::Error;

use crate::min_heap::HeapErr;

/// A specialized Result type for huffpack operations.
pub type Result<T> = std::result::Result<T, HuffmanError>;

#[derive(Debug, Error)]
pub enum HuffmanError {
    /// The input file does not exist.
    #[error("file '{}' not found", .path.display())]
    MissingFile { path: PathBuf },

    /// Input and output name the same file.
    #[error("input and output are the same file '{}'", .path.display())]
    SameFile { path: PathBuf },

    /// Extraction from an empty priority queue. Never produced by a
    /// well-formed frequency table.
    #[error("priority queue error: {0}")]
    Heap(#[from] HeapErr),

    /// The payload ran out of bits before every symbol was decoded.
    #[error("truncated stream: expected {expected} bytes, decoded {decoded}")]
    TruncatedStream { expected: u64, decoded: u64 },

    /// The input ended inside the 1024-byte frequency table.
    #[error("truncated header after {bytes_read} bytes")]
    TruncatedHeader { bytes_read: usize },

    /// A byte value occurs too often to be stored in a 32-bit header field.
    #[error("byte 0x{byte:02x} occurs more than {} times", u32::MAX)]
    FrequencyOverflow { byte: u8 },

    #[error("config '{}': {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HuffmanError {
    pub fn missing_file(path: impl Into<PathBuf>) -> Self {
        HuffmanError::MissingFile { path: path.into() }
    }

    /// Whether the error means the compressed input is damaged, as opposed
    /// to a problem with the environment.
    pub fn is_corrupt_input(&self) -> bool {
        matches!(
            self,
            HuffmanError::TruncatedStream { .. } | HuffmanError::TruncatedHeader { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = HuffmanError::missing_file("nope.txt");
        assert_eq!(err.to_string(), "file 'nope.txt' not found");

        let err = HuffmanError::TruncatedStream { expected: 10, decoded: 4 };
        assert!(err.to_string().contains("expected 10"));
        assert!(err.is_corrupt_input());

        let err = HuffmanError::from(HeapErr::HeapUnderflow);
        assert!(!err.is_corrupt_input());
    }
}
