use std::fs::File;
use std::io::{self, BufReader, BufWriter, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::bit_io::{BitReader, BitWriter};
use crate::code_table::CodeTable;
use crate::config::CodecConfig;
use crate::error::{HuffmanError, Result};
use crate::frequency::{FrequencyTable, SYMBOLS};
use crate::hufftree::HuffmanTree;
use crate::metadata::{read_header, write_header, HEADER_LEN};

const CHUNK: usize = 8 * 1024;

/// Summary of one encode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeReport {
    pub original_length: u64,
    pub distinct: usize,
    pub payload_bits: u64,
}

impl EncodeReport {
    /// Size of the encoded output in bytes, header included.
    pub fn compressed_length(&self) -> u64 {
        HEADER_LEN as u64 + self.payload_bits.div_ceil(8)
    }

    pub fn ratio(&self) -> f64 {
        if self.original_length == 0 {
            return 0.0;
        }
        self.compressed_length() as f64 / self.original_length as f64
    }
}

/// Decoder progress. Every run starts in `ReadHeader`, takes exactly one
/// of `Empty`, `SingleSymbol` or `Traversing`, and ends in `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeState {
    ReadHeader,
    Empty,
    SingleSymbol,
    Traversing,
    Done,
}

/// Summary of one decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeReport {
    /// Byte count recorded in the header.
    pub expected: u64,
    pub written: u64,
    /// The branch the decoder took after reading the header.
    pub path: DecodeState,
}

impl DecodeReport {
    /// The payload ran out before `expected` bytes were produced.
    pub fn is_truncated(&self) -> bool {
        self.written < self.expected
    }
}

/// Writes the header for `table` followed by the code of every byte of
/// `input`. Fails with `InvalidData` if `table` is not the frequency table
/// of `input`.
pub fn encode_to<R: Read, W: Write>(
    mut input: R,
    output: W,
    table: &FrequencyTable,
) -> Result<EncodeReport> {
    let mut writer = BitWriter::new(output);
    write_header(&mut writer, table)?;

    let codes = match HuffmanTree::build(table)? {
        Some(tree) => CodeTable::from_tree(&tree),
        None => CodeTable::default(),
    };
    let payload_bits = codes.payload_bits(table);
    debug!(payload_bits, "encoding payload");

    // Single-symbol inputs have no payload bits but are still read so the
    // input can be checked against the table.
    let mut chunk = [0u8; CHUNK];
    let mut seen = [0u32; SYMBOLS];
    loop {
        let n = match input.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        for &byte in &chunk[..n] {
            writer.write_bits(codes.get(byte))?;
            seen[byte as usize] = seen[byte as usize].saturating_add(1);
        }
    }
    if &seen != table.counts() {
        return Err(io::Error::new(
            ErrorKind::InvalidData,
            "input does not match its frequency table",
        )
        .into());
    }

    writer.finish()?;
    Ok(EncodeReport {
        original_length: table.total(),
        distinct: table.distinct(),
        payload_bits,
    })
}

/// Reads a header and payload and writes the decoded bytes.
///
/// A payload that ends early is not an error here: decoding stops and the
/// report shows fewer bytes written than expected.
pub fn decode_to<R: Read, W: Write>(input: R, mut output: W) -> Result<DecodeReport> {
    let mut reader = BitReader::new(input);
    let mut state = DecodeState::ReadHeader;
    let mut report = DecodeReport {
        expected: 0,
        written: 0,
        path: DecodeState::ReadHeader,
    };
    let mut tree = None;

    while state != DecodeState::Done {
        debug!(?state, "decoder state");
        state = match state {
            DecodeState::ReadHeader => {
                let table = read_header(&mut reader)?;
                report.expected = table.total();
                let next = match HuffmanTree::build(&table)? {
                    None => DecodeState::Empty,
                    Some(t) if t.is_single_symbol() => {
                        tree = Some(t);
                        DecodeState::SingleSymbol
                    }
                    Some(t) => {
                        tree = Some(t);
                        DecodeState::Traversing
                    }
                };
                report.path = next;
                next
            }
            DecodeState::Empty => DecodeState::Done,
            DecodeState::SingleSymbol => {
                if let Some(byte) = tree.as_ref().and_then(|t| t.node(t.root()).symbol()) {
                    let chunk = [byte; CHUNK];
                    while report.written < report.expected {
                        let n = (report.expected - report.written).min(CHUNK as u64) as usize;
                        output.write_all(&chunk[..n])?;
                        report.written += n as u64;
                    }
                }
                DecodeState::Done
            }
            DecodeState::Traversing => {
                if let Some(t) = tree.as_ref() {
                    report.written = traverse(t, &mut reader, &mut output, report.expected)?;
                }
                DecodeState::Done
            }
            DecodeState::Done => DecodeState::Done,
        };
    }

    output.flush()?;
    if report.is_truncated() {
        warn!(
            expected = report.expected,
            written = report.written,
            "payload ended before all bytes were decoded"
        );
    }
    Ok(report)
}

fn traverse<R: Read, W: Write>(
    tree: &HuffmanTree,
    reader: &mut BitReader<R>,
    output: &mut W,
    total: u64,
) -> Result<u64> {
    let root = tree.root();
    let mut current = root;
    let mut written = 0u64;
    let mut buffer = Vec::with_capacity(CHUNK);

    while written < total {
        let Some(bit) = reader.read_bit()? else {
            break;
        };
        let Some((left, right)) = tree.node(current).children() else {
            break;
        };
        current = if bit { right } else { left };

        let node = tree.node(current);
        if node.children().is_none() {
            if let Some(byte) = node.symbol() {
                buffer.push(byte);
                written += 1;
                if buffer.len() == CHUNK {
                    output.write_all(&buffer)?;
                    buffer.clear();
                }
            }
            current = root;
        }
    }

    output.write_all(&buffer)?;
    Ok(written)
}

/// File and buffer level entry points, configured by a [`CodecConfig`].
#[derive(Debug, Clone, Default)]
pub struct HuffmanCodec {
    config: CodecConfig,
}

impl HuffmanCodec {
    pub fn new(config: CodecConfig) -> Self {
        HuffmanCodec { config }
    }

    pub fn encode_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        let table = FrequencyTable::from_bytes(data)?;
        let mut out = Vec::with_capacity(HEADER_LEN + data.len() / 2);
        encode_to(data, &mut out, &table)?;
        Ok(out)
    }

    pub fn decode_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let report = decode_to(data, &mut out)?;
        self.check(report)?;
        Ok(out)
    }

    /// Scans `input` for its frequencies, rewinds it, and encodes it.
    pub fn encode_stream<R: Read + Seek, W: Write>(
        &self,
        mut input: R,
        output: W,
    ) -> Result<EncodeReport> {
        let start = input.stream_position()?;
        let table = FrequencyTable::from_reader(&mut input)?;
        input.seek(SeekFrom::Start(start))?;
        let report = encode_to(input, output, &table)?;
        info!(
            original = report.original_length,
            compressed = report.compressed_length(),
            distinct = report.distinct,
            "encoded"
        );
        Ok(report)
    }

    pub fn decode_stream<R: Read, W: Write>(&self, input: R, output: W) -> Result<DecodeReport> {
        let report = decode_to(input, output)?;
        info!(written = report.written, path = ?report.path, "decoded");
        self.check(report)
    }

    pub fn encode_file(&self, input: &Path, output: &Path) -> Result<EncodeReport> {
        ensure_distinct(input, output)?;
        let reader = BufReader::with_capacity(self.config.buffer_size, open_input(input)?);
        let writer = BufWriter::with_capacity(self.config.buffer_size, File::create(output)?);
        self.encode_stream(reader, writer)
    }

    pub fn decode_file(&self, input: &Path, output: &Path) -> Result<DecodeReport> {
        ensure_distinct(input, output)?;
        let reader = BufReader::with_capacity(self.config.buffer_size, open_input(input)?);
        let writer = BufWriter::with_capacity(self.config.buffer_size, File::create(output)?);
        self.decode_stream(reader, writer)
    }

    fn check(&self, report: DecodeReport) -> Result<DecodeReport> {
        if self.config.strict && report.is_truncated() {
            return Err(HuffmanError::TruncatedStream {
                expected: report.expected,
                decoded: report.written,
            });
        }
        Ok(report)
    }
}

/// Creating the output truncates it, so it must not be the input file.
fn ensure_distinct(input: &Path, output: &Path) -> Result<()> {
    open_input(input)?;
    let input = input.canonicalize()?;
    match output.canonicalize() {
        Ok(output) if output == input => Err(HuffmanError::SameFile { path: input }),
        _ => Ok(()),
    }
}

fn open_input(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => HuffmanError::missing_file(path),
        _ => HuffmanError::Io(e),
    })
}
