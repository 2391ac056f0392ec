//! Bit-level access to J1939 payloads.
//!
//! J1939 numbers bits LSB-first inside each byte and lays multi-byte fields out in
//! little-endian order, so a field is simply a run of consecutive bits in a
//! little-endian bit stream. Fields may straddle byte boundaries (the 19-bit SPN of a
//! DTC spans three bytes).
use crate::error::{BitReaderError, BitWriterError};

/// Extract `bit_len` bits of `value` starting at `bit_offset` (LSB = bit 0).
///
/// Used for sub-byte codes such as the 2-bit lamp fields.
#[inline]
pub const fn shave(value: u64, bit_offset: u8, bit_len: u8) -> u64 {
    if bit_len == 0 || bit_offset >= 64 {
        return 0;
    }
    let shifted = value >> bit_offset;
    if bit_len >= 64 {
        shifted
    } else {
        shifted & ((1u64 << bit_len) - 1)
    }
}

/// Read `bit_len` bits at an absolute `bit_offset` of `buffer` without a cursor.
pub fn read_at(buffer: &[u8], bit_offset: usize, bit_len: u8) -> Result<u64, BitReaderError> {
    let mut reader = BitReader::new(buffer);
    reader.seek(bit_offset)?;
    reader.read_u64(bit_len)
}

/// Cursor over a borrowed payload; never copies or allocates.
pub struct BitReader<'a> {
    buffer: &'a [u8],
    /// Number of bits consumed since the start of `buffer`.
    bit_cursor: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            bit_cursor: 0,
        }
    }

    /// Bits left between the cursor and the end of the buffer.
    pub fn remaining_bits(&self) -> usize {
        self.buffer.len() * 8 - self.bit_cursor
    }

    pub fn bit_cursor(&self) -> usize {
        self.bit_cursor
    }

    /// Move the cursor to an absolute bit position.
    pub fn seek(&mut self, bit_position: usize) -> Result<(), BitReaderError> {
        let buffer_len_bits = self.buffer.len() * 8;
        if bit_position > buffer_len_bits {
            return Err(BitReaderError::OutOfBounds {
                asked: bit_position,
                available: buffer_len_bits,
            });
        }
        self.bit_cursor = bit_position;
        Ok(())
    }

    /// Read `num_bits` (1..=64) bits and advance the cursor.
    pub fn read_u64(&mut self, num_bits: u8) -> Result<u64, BitReaderError> {
        if !(1..=64).contains(&num_bits) {
            return Err(BitReaderError::TooLongForType {
                max: 64,
                asked: num_bits,
            });
        }
        if num_bits as usize > self.remaining_bits() {
            return Err(BitReaderError::OutOfBounds {
                asked: num_bits as usize,
                available: self.remaining_bits(),
            });
        }

        let mut result: u64 = 0;
        let mut filled: u8 = 0;
        while filled < num_bits {
            let position = self.bit_cursor + filled as usize;
            let byte = self.buffer[position / 8];
            let bit_in_byte = (position % 8) as u8;

            let take = (8 - bit_in_byte).min(num_bits - filled);
            let chunk = shave(byte as u64, bit_in_byte, take);
            result |= chunk << filled;
            filled += take;
        }
        self.bit_cursor += num_bits as usize;
        Ok(result)
    }

    pub fn read_u8(&mut self, num_bits: u8) -> Result<u8, BitReaderError> {
        if num_bits > 8 {
            return Err(BitReaderError::TooLongForType {
                max: 8,
                asked: num_bits,
            });
        }
        self.read_u64(num_bits).map(|val| val as u8)
    }

    pub fn read_u16(&mut self, num_bits: u8) -> Result<u16, BitReaderError> {
        if num_bits > 16 {
            return Err(BitReaderError::TooLongForType {
                max: 16,
                asked: num_bits,
            });
        }
        self.read_u64(num_bits).map(|val| val as u16)
    }

    pub fn read_u32(&mut self, num_bits: u8) -> Result<u32, BitReaderError> {
        if num_bits > 32 {
            return Err(BitReaderError::TooLongForType {
                max: 32,
                asked: num_bits,
            });
        }
        self.read_u64(num_bits).map(|val| val as u32)
    }

    /// Skip `num_bits` without interpreting them (reserved bits).
    pub fn skip(&mut self, num_bits: usize) -> Result<(), BitReaderError> {
        self.seek(self.bit_cursor + num_bits)
    }
}

//==================================================================================BITWRITER
/// Cursor laying bit fields into a mutable buffer; bits outside the written
/// fields keep their previous value (callers pre-fill with `0xFF` for reserved bits).
pub struct BitWriter<'a> {
    buffer: &'a mut [u8],
    bit_cursor: usize,
}

impl<'a> BitWriter<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self {
            buffer,
            bit_cursor: 0,
        }
    }

    pub fn bit_cursor(&self) -> usize {
        self.bit_cursor
    }

    /// Write the low `num_bits` of `value`; the value must fit.
    pub fn write_u64(&mut self, value: u64, num_bits: u8) -> Result<(), BitWriterError> {
        if !(1..=64).contains(&num_bits) {
            return Err(BitWriterError::TooLongForType {
                max: 64,
                asked: num_bits,
            });
        }
        if num_bits < 64 && value >> num_bits != 0 {
            return Err(BitWriterError::ValueTooWide {
                value,
                bits: num_bits,
            });
        }
        let available = self.buffer.len() * 8 - self.bit_cursor;
        if num_bits as usize > available {
            return Err(BitWriterError::OutOfBounds {
                asked: num_bits as usize,
                available,
            });
        }

        let mut written: u8 = 0;
        while written < num_bits {
            let position = self.bit_cursor + written as usize;
            let bit_in_byte = (position % 8) as u8;
            let take = (8 - bit_in_byte).min(num_bits - written);

            let mask = (((1u16 << take) - 1) as u8) << bit_in_byte;
            let chunk = (shave(value, written, take) as u8) << bit_in_byte;
            let byte = &mut self.buffer[position / 8];
            *byte = (*byte & !mask) | chunk;

            written += take;
        }
        self.bit_cursor += num_bits as usize;
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8, num_bits: u8) -> Result<(), BitWriterError> {
        if num_bits > 8 {
            return Err(BitWriterError::TooLongForType {
                max: 8,
                asked: num_bits,
            });
        }
        self.write_u64(value as u64, num_bits)
    }

    pub fn write_u16(&mut self, value: u16, num_bits: u8) -> Result<(), BitWriterError> {
        if num_bits > 16 {
            return Err(BitWriterError::TooLongForType {
                max: 16,
                asked: num_bits,
            });
        }
        self.write_u64(value as u64, num_bits)
    }

    pub fn write_u32(&mut self, value: u32, num_bits: u8) -> Result<(), BitWriterError> {
        if num_bits > 32 {
            return Err(BitWriterError::TooLongForType {
                max: 32,
                asked: num_bits,
            });
        }
        self.write_u64(value as u64, num_bits)
    }
}
