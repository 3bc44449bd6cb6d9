//! Bit-granular reading and writing on top of byte streams.
//!
//! Bits are packed most significant first. The writer pads the final byte
//! with zero bits; the reader hands back those padding bits like any other,
//! so callers must know how many bits are meaningful.

use std::io::{self, ErrorKind, Read, Write};

use bitvec::prelude::*;

pub struct BitWriter<W: Write> {
    inner: W,
    current: u8,
    bit_count: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        BitWriter {
            inner,
            current: 0,
            bit_count: 0,
        }
    }

    /// Total bits written so far, padding excluded.
    pub fn bit_count(&self) -> u64 {
        self.bit_count
    }

    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        let bit_offset = (self.bit_count % 8) as u32;
        if bit {
            self.current |= 1 << (7 - bit_offset);
        }
        self.bit_count += 1;

        if bit_offset == 7 {
            self.inner.write_all(&[self.current])?;
            self.current = 0;
        }
        Ok(())
    }

    pub fn write_bits(&mut self, bits: &BitSlice<u8, Msb0>) -> io::Result<()> {
        for bit in bits.iter().by_vals() {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Writes a 32-bit value, most significant bit first.
    pub fn write_u32(&mut self, value: u32) -> io::Result<()> {
        if self.bit_count % 8 == 0 {
            self.bit_count += 32;
            return self.inner.write_all(&value.to_be_bytes());
        }
        for bit_pos in (0..32).rev() {
            self.write_bit((value >> bit_pos) & 1 != 0)?;
        }
        Ok(())
    }

    /// Pads and writes out the partial final byte, flushes, and returns the
    /// underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        if self.bit_count % 8 != 0 {
            self.inner.write_all(&[self.current])?;
            self.current = 0;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }
}

pub struct BitReader<R: Read> {
    inner: R,
    current: u8,
    bits_remaining: u8,
    bytes_read: usize,
    exhausted: bool,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        BitReader {
            inner,
            current: 0,
            bits_remaining: 0,
            bytes_read: 0,
            exhausted: false,
        }
    }

    /// Bytes pulled from the underlying reader so far.
    pub fn bytes_read(&self) -> usize {
        self.bytes_read
    }

    fn fill(&mut self) -> io::Result<bool> {
        if self.bits_remaining > 0 {
            return Ok(true);
        }
        if self.exhausted {
            return Ok(false);
        }
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => {
                    self.exhausted = true;
                    return Ok(false);
                }
                Ok(_) => {
                    self.current = byte[0];
                    self.bits_remaining = 8;
                    self.bytes_read += 1;
                    return Ok(true);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// True once every bit of the underlying stream has been consumed.
    pub fn at_end(&mut self) -> io::Result<bool> {
        Ok(!self.fill()?)
    }

    /// Next bit, or `None` at end of stream.
    pub fn read_bit(&mut self) -> io::Result<Option<bool>> {
        if !self.fill()? {
            return Ok(None);
        }
        self.bits_remaining -= 1;
        Ok(Some((self.current >> self.bits_remaining) & 1 == 1))
    }

    /// Reads a 32-bit value, most significant bit first.
    pub fn read_u32(&mut self) -> io::Result<u32> {
        let mut value = 0u32;
        for _ in 0..32 {
            match self.read_bit()? {
                Some(bit) => value = (value << 1) | bit as u32,
                None => {
                    return Err(io::Error::new(
                        ErrorKind::UnexpectedEof,
                        "stream ended inside a 32-bit field",
                    ))
                }
            }
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn bits_pack_msb_first_with_zero_padding() {
        let mut writer = BitWriter::new(Vec::new());
        for bit in [true, false, true, true] {
            writer.write_bit(bit).unwrap();
        }
        assert_eq!(writer.bit_count(), 4);
        let bytes = writer.finish().unwrap();
        assert_eq!(bytes, vec![0b1011_0000]);
    }

    #[test]
    fn aligned_u32_is_big_endian() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_u32(0x0102_0304).unwrap();
        assert_eq!(writer.finish().unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn unaligned_u32_survives() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bit(true).unwrap();
        writer.write_u32(0xDEAD_BEEF).unwrap();
        writer.write_bits(bits![u8, Msb0; 0, 1, 1]).unwrap();
        assert_eq!(writer.bit_count(), 36);
        let bytes = writer.finish().unwrap();
        assert_eq!(bytes.len(), 5);

        let mut reader = BitReader::new(Cursor::new(bytes));
        assert_eq!(reader.read_bit().unwrap(), Some(true));
        assert_eq!(reader.read_u32().unwrap(), 0xDEAD_BEEF);
        assert_eq!(reader.read_bit().unwrap(), Some(false));
        assert_eq!(reader.read_bit().unwrap(), Some(true));
        assert_eq!(reader.read_bit().unwrap(), Some(true));
        // four padding bits remain
        for _ in 0..4 {
            assert_eq!(reader.read_bit().unwrap(), Some(false));
        }
        assert!(reader.at_end().unwrap());
        assert_eq!(reader.read_bit().unwrap(), None);
        assert_eq!(reader.bytes_read(), 5);
    }

    #[test]
    fn short_u32_is_unexpected_eof() {
        let mut reader = BitReader::new(Cursor::new(vec![0xFF, 0xFF]));
        let err = reader.read_u32().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn empty_stream_is_at_end() {
        let mut reader = BitReader::new(Cursor::new(Vec::<u8>::new()));
        assert!(reader.at_end().unwrap());
        assert_eq!(reader.read_bit().unwrap(), None);
    }
}
