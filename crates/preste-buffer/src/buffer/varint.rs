//! Variable-length integer codecs.
//!
//! Four wire encodings, bit-exact across language implementations of the
//! runtime: positive varint (1-5 bytes), zig-zag signed varint, 4-byte
//! aligned varint (6-bit groups plus padding) and positive var-long
//! (1-9 bytes), plus the two-form SLI long. Writers reserve headroom once
//! and commit composed words with a single store; readers take a wide-load
//! fast path whenever enough bytes remain and fall back to a byte-at-a-time
//! decoder that never overreads.

use std::ptr;

use crate::error::{BufferError, BufferResult};

use super::MemBuffer;

/// Continuation-bit masks indexed by encoded length: `0x80` on every byte
/// except the last one of the encoding.
const CONT32: [u64; 6] = [0, 0, 0x80, 0x8080, 0x0080_8080, 0x8080_8080];

const CONT64: [u64; 10] = [
    0,
    0,
    0x80,
    0x8080,
    0x0080_8080,
    0x8080_8080,
    0x0080_8080_8080,
    0x8080_8080_8080,
    0x0080_8080_8080_8080,
    // 9-byte form: all eight low bytes flag continuation, the 9th byte
    // carries the top 8 bits with no flag at all.
    0x8080_8080_8080_8080,
];

/// Spreads the low 56 bits of `v` into eight 7-bit groups, one per byte.
#[inline]
const fn spread7(v: u64) -> u64 {
    (v & 0x7f)
        | (((v >> 7) & 0x7f) << 8)
        | (((v >> 14) & 0x7f) << 16)
        | (((v >> 21) & 0x7f) << 24)
        | (((v >> 28) & 0x7f) << 32)
        | (((v >> 35) & 0x7f) << 40)
        | (((v >> 42) & 0x7f) << 48)
        | (((v >> 49) & 0x7f) << 56)
}

impl MemBuffer {
    /// Smallest value of the 4-byte SLI form.
    pub const SLI_MIN: i64 = (i32::MIN / 2) as i64;
    /// Largest value of the 4-byte SLI form.
    pub const SLI_MAX: i64 = (i32::MAX / 2) as i64;

    /// Number of bytes [`MemBuffer::write_varuint32`] emits for `value`.
    #[must_use]
    pub const fn varuint32_encoded_len(value: u32) -> usize {
        1 + (31 - (value | 1).leading_zeros() as usize) / 7
    }

    /// Number of bytes [`MemBuffer::write_varuint64`] emits for `value`.
    #[must_use]
    pub const fn varuint64_encoded_len(value: u64) -> usize {
        let n = 1 + (63 - (value | 1).leading_zeros() as usize) / 7;
        if n > 9 { 9 } else { n }
    }

    /* ── Positive varint (1-5 bytes) ───────────────────────────────── */

    /// Appends `value` as a positive varint (1-5 bytes).
    ///
    /// The up-to-5 output bytes are composed into one word and committed
    /// with a single 8-byte store, so 8 bytes of headroom are reserved.
    pub fn write_varuint32(&mut self, value: u32) {
        self.ensure(self.writer + 8);
        let n = Self::varuint32_encoded_len(value);
        let enc = spread7(u64::from(value)) | CONT32[n];
        unsafe { self.put_u64_unchecked(self.writer, enc) };
        self.writer += n;
    }

    /// Reads a positive varint and advances the read cursor by the bytes
    /// consumed.
    ///
    /// Fails with [`BufferError::InvalidArgument`] when a 5th byte still
    /// flags continuation, and with [`BufferError::OutOfBounds`] when the
    /// encoding runs past the end of the buffer.
    pub fn read_varuint32(&mut self) -> BufferResult<u32> {
        if self.size - self.reader < 8 {
            return self.read_varuint32_slow();
        }
        let chunk = unsafe { self.get_u64_unchecked(self.reader) };
        let mut value = (chunk & 0x7f) as u32;
        let mut consumed = 1;
        if chunk & 0x80 != 0 {
            value |= (((chunk >> 8) & 0x7f) as u32) << 7;
            consumed = 2;
            if chunk & 0x8000 != 0 {
                value |= (((chunk >> 16) & 0x7f) as u32) << 14;
                consumed = 3;
                if chunk & 0x0080_0000 != 0 {
                    value |= (((chunk >> 24) & 0x7f) as u32) << 21;
                    consumed = 4;
                    if chunk & 0x8000_0000 != 0 {
                        let last = (chunk >> 32) & 0xff;
                        if last & 0x80 != 0 {
                            return Err(BufferError::invalid_argument(
                                "varuint32 longer than 5 bytes",
                            ));
                        }
                        value |= (last as u32) << 28;
                        consumed = 5;
                    }
                }
            }
        }
        self.reader += consumed;
        Ok(value)
    }

    #[cold]
    fn read_varuint32_slow(&mut self) -> BufferResult<u32> {
        let mut idx = self.reader;
        let mut value: u32 = 0;
        let mut shift = 0u32;
        loop {
            self.check_range_always(idx, 1)?;
            let byte = unsafe { self.get_u8_unchecked(idx) };
            idx += 1;
            value |= u32::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                break;
            }
            if shift == 28 {
                return Err(BufferError::invalid_argument("varuint32 longer than 5 bytes"));
            }
            shift += 7;
        }
        self.reader = idx;
        Ok(value)
    }

    /* ── Zig-zag varint ────────────────────────────────────────────── */

    /// Appends `value` as a zig-zag signed varint; small magnitudes of
    /// either sign stay short.
    pub fn write_varint32(&mut self, value: i32) {
        let zigzag = ((value as u32) << 1) ^ ((value >> 31) as u32);
        self.write_varuint32(zigzag);
    }

    /// Reads a zig-zag signed varint.
    pub fn read_varint32(&mut self) -> BufferResult<i32> {
        let raw = self.read_varuint32()?;
        Ok(((raw >> 1) as i32) ^ -((raw & 1) as i32))
    }

    /* ── Aligned positive varint (1-9 bytes) ───────────────────────── */

    /// Appends `value` as an aligned positive varint, leaving the write
    /// cursor on a multiple of 4.
    ///
    /// Data bytes carry 6 bits each; bit 7 flags another data byte, bit 6
    /// (with bit 7 clear) flags the terminator, both clear means another
    /// padding byte. At most 3 padding bytes follow the last data byte.
    pub fn write_varuint32_aligned(&mut self, value: u32) {
        self.ensure(self.writer + 12);
        let bits = 32 - (value | 1).leading_zeros() as usize;
        let data_bytes = (bits + 5) / 6;
        let w = self.writer;
        let padding = (4 - ((w + data_bytes) & 3)) & 3;

        let mut scratch = [0u8; 12];
        for i in 0..data_bytes {
            let mut byte = ((value >> (6 * i)) & 0x3f) as u8;
            if i + 1 < data_bytes {
                byte |= 0x80;
            }
            scratch[i] = byte;
        }
        if padding == 0 {
            scratch[data_bytes - 1] |= 0x40;
        } else {
            scratch[data_bytes + padding - 1] = 0x40;
        }
        unsafe {
            ptr::copy_nonoverlapping(scratch.as_ptr(), self.base.add(w), data_bytes + padding);
        }
        self.writer = w + data_bytes + padding;
    }

    /// Reads an aligned positive varint, consuming data and padding bytes
    /// through the terminator.
    ///
    /// Fails with [`BufferError::InvalidArgument`] on a 4th padding byte, a
    /// data byte inside the padding, or more than 6 data bytes.
    pub fn read_varuint32_aligned(&mut self) -> BufferResult<u32> {
        let mut idx = self.reader;
        let mut value: u32 = 0;
        let mut shift = 0u32;
        let last = loop {
            self.check_range_always(idx, 1)?;
            let byte = unsafe { self.get_u8_unchecked(idx) };
            idx += 1;
            value |= u32::from(byte & 0x3f) << shift;
            if byte & 0x80 == 0 {
                break byte;
            }
            if shift == 30 {
                return Err(BufferError::invalid_argument(
                    "aligned varint longer than 6 data bytes",
                ));
            }
            shift += 6;
        };
        if last & 0x40 == 0 {
            let mut padding = 0;
            loop {
                padding += 1;
                if padding > 3 {
                    return Err(BufferError::invalid_argument(
                        "aligned varint with more than 3 padding bytes",
                    ));
                }
                self.check_range_always(idx, 1)?;
                let byte = unsafe { self.get_u8_unchecked(idx) };
                idx += 1;
                if byte & 0x80 != 0 {
                    return Err(BufferError::invalid_argument(
                        "aligned varint data byte inside padding",
                    ));
                }
                if byte & 0x40 != 0 {
                    break;
                }
            }
        }
        self.reader = idx;
        Ok(value)
    }

    /* ── Positive var-long (1-9 bytes) ─────────────────────────────── */

    /// Appends `value` as a positive var-long (1-9 bytes); the 9th byte
    /// carries the top 8 bits with no continuation flag.
    pub fn write_varuint64(&mut self, value: u64) {
        self.ensure(self.writer + 9);
        let n = Self::varuint64_encoded_len(value);
        let enc = spread7(value) | CONT64[n];
        unsafe { self.put_u64_unchecked(self.writer, enc) };
        if n == 9 {
            unsafe { self.put_u8_unchecked(self.writer + 8, (value >> 56) as u8) };
        }
        self.writer += n;
    }

    /// Reads a positive var-long and advances the read cursor by the bytes
    /// consumed.
    pub fn read_varuint64(&mut self) -> BufferResult<u64> {
        if self.size - self.reader < 9 {
            return self.read_varuint64_slow();
        }
        let chunk = unsafe { self.get_u64_unchecked(self.reader) };
        let mut value = chunk & 0x7f;
        let mut consumed = 1usize;
        while consumed < 8 && chunk & (0x80u64 << ((consumed - 1) * 8)) != 0 {
            value |= ((chunk >> (consumed * 8)) & 0x7f) << (consumed * 7);
            consumed += 1;
        }
        if consumed == 8 && chunk & 0x8000_0000_0000_0000 != 0 {
            let last = unsafe { self.get_u8_unchecked(self.reader + 8) };
            value |= u64::from(last) << 56;
            consumed = 9;
        }
        self.reader += consumed;
        Ok(value)
    }

    #[cold]
    fn read_varuint64_slow(&mut self) -> BufferResult<u64> {
        let mut idx = self.reader;
        let mut value: u64 = 0;
        let mut shift = 0u32;
        loop {
            self.check_range_always(idx, 1)?;
            let byte = unsafe { self.get_u8_unchecked(idx) };
            idx += 1;
            if shift == 56 {
                value |= u64::from(byte) << 56;
                break;
            }
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
        }
        self.reader = idx;
        Ok(value)
    }

    /// Appends `value` as a zig-zag signed var-long.
    pub fn write_varint64(&mut self, value: i64) {
        let zigzag = ((value as u64) << 1) ^ ((value >> 63) as u64);
        self.write_varuint64(zigzag);
    }

    /// Reads a zig-zag signed var-long.
    pub fn read_varint64(&mut self) -> BufferResult<i64> {
        let raw = self.read_varuint64()?;
        Ok(((raw >> 1) as i64) ^ -((raw & 1) as i64))
    }

    /* ── SLI (small long as int) ───────────────────────────────────── */

    /// Appends `value` in SLI form: 4 little-endian bytes of
    /// `(value as i32) << 1` inside `[SLI_MIN, SLI_MAX]` (low bit 0 marks
    /// the int form), otherwise a `0b1` marker byte followed by the full
    /// 8-byte little-endian value.
    pub fn write_sli_i64(&mut self, value: i64) {
        self.ensure(self.writer + 9);
        if (Self::SLI_MIN..=Self::SLI_MAX).contains(&value) {
            unsafe { self.put_i32_unchecked(self.writer, (value as i32) << 1) };
            self.writer += 4;
        } else {
            unsafe {
                self.put_u8_unchecked(self.writer, 0b1);
                self.put_i64_unchecked(self.writer + 1, value);
            }
            self.writer += 9;
        }
    }

    /// Reads an SLI-encoded long, consuming 4 or 9 bytes.
    pub fn read_sli_i64(&mut self) -> BufferResult<i64> {
        if self.size - self.reader >= 9 {
            let head = unsafe { self.get_i32_unchecked(self.reader) };
            if head & 1 == 0 {
                self.reader += 4;
                Ok(i64::from(head >> 1))
            } else {
                let value = unsafe { self.get_i64_unchecked(self.reader + 1) };
                self.reader += 9;
                Ok(value)
            }
        } else {
            self.read_sli_i64_slow()
        }
    }

    #[cold]
    fn read_sli_i64_slow(&mut self) -> BufferResult<i64> {
        self.check_range_always(self.reader, 4)?;
        let head = unsafe { self.get_i32_unchecked(self.reader) };
        if head & 1 == 0 {
            self.reader += 4;
            Ok(i64::from(head >> 1))
        } else {
            self.check_range_always(self.reader, 9)?;
            let value = unsafe { self.get_i64_unchecked(self.reader + 1) };
            self.reader += 9;
            Ok(value)
        }
    }

    /* ── Size-embedded primitive arrays ────────────────────────────── */

    /// Appends a varint byte count followed by the raw bytes.
    pub fn write_bytes_with_size(&mut self, bytes: &[u8]) {
        self.write_varuint32(bytes.len() as u32);
        self.write_bytes(bytes);
    }

    /// Reads a varint byte count then that many raw bytes.
    pub fn read_bytes_with_size(&mut self) -> BufferResult<Vec<u8>> {
        let len = self.read_varuint32()? as usize;
        self.read_bytes(len)
    }

    /// Appends an aligned-varint byte count followed by the raw bytes.
    pub fn write_bytes_with_aligned_size(&mut self, bytes: &[u8]) {
        self.write_varuint32_aligned(bytes.len() as u32);
        self.write_bytes(bytes);
    }

    /// Reads an aligned-varint byte count then that many raw bytes.
    pub fn read_bytes_with_aligned_size(&mut self) -> BufferResult<Vec<u8>> {
        let len = self.read_varuint32_aligned()? as usize;
        self.read_bytes(len)
    }

    /// Appends a varint byte count followed by the values little-endian.
    pub fn write_u16s_with_size(&mut self, values: &[u16]) {
        let num_bytes = values.len() * 2;
        self.write_varuint32(num_bytes as u32);
        self.ensure(self.writer + num_bytes);
        for (i, v) in values.iter().enumerate() {
            unsafe { self.put_u16_unchecked(self.writer + 2 * i, *v) };
        }
        self.writer += num_bytes;
    }

    /// Reads a varint byte count then `num_bytes / 2` little-endian `u16`s.
    ///
    /// Fails with [`BufferError::InvalidArgument`] on a byte count that is
    /// not a multiple of the element size.
    pub fn read_u16s_with_size(&mut self) -> BufferResult<Vec<u16>> {
        let num_bytes = self.read_varuint32()? as usize;
        if num_bytes % 2 != 0 {
            return Err(BufferError::invalid_argument(
                "embedded size not a multiple of element size",
            ));
        }
        self.check_range_always(self.reader, num_bytes)?;
        let count = num_bytes / 2;
        let mut out = Vec::with_capacity(count);
        for i in 0..count {
            out.push(unsafe { self.get_u16_unchecked(self.reader + 2 * i) });
        }
        self.reader += num_bytes;
        Ok(out)
    }

    /// Appends a varint byte count followed by the values little-endian.
    pub fn write_i64s_with_size(&mut self, values: &[i64]) {
        let num_bytes = values.len() * 8;
        self.write_varuint32(num_bytes as u32);
        self.ensure(self.writer + num_bytes);
        for (i, v) in values.iter().enumerate() {
            unsafe { self.put_i64_unchecked(self.writer + 8 * i, *v) };
        }
        self.writer += num_bytes;
    }

    /// Reads a varint byte count then `num_bytes / 8` little-endian `i64`s.
    pub fn read_i64s_with_size(&mut self) -> BufferResult<Vec<i64>> {
        let num_bytes = self.read_varuint32()? as usize;
        if num_bytes % 8 != 0 {
            return Err(BufferError::invalid_argument(
                "embedded size not a multiple of element size",
            ));
        }
        self.check_range_always(self.reader, num_bytes)?;
        let count = num_bytes / 8;
        let mut out = Vec::with_capacity(count);
        for i in 0..count {
            out.push(unsafe { self.get_i64_unchecked(self.reader + 8 * i) });
        }
        self.reader += num_bytes;
        Ok(out)
    }
}
