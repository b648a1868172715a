//! Random-access primitive reads and writes.
//!
//! Every primitive type gets four access forms: checked little-endian
//! (`get_*`/`put_*`), checked host-native (`*_native`), and the unchecked
//! duals (`*_unchecked`) reserved for generated hot paths that prove their
//! bounds themselves. Little-endian forms are a native unaligned access plus
//! `to_le`/`from_le`, so the byte swap only exists on big-endian hosts.

use crate::error::BufferResult;

use super::MemBuffer;

macro_rules! int_access {
    ($t:ty, $bytes:expr,
     $get:ident, $put:ident,
     $get_native:ident, $put_native:ident,
     $get_unchecked:ident, $put_unchecked:ident,
     $get_native_unchecked:ident, $put_native_unchecked:ident) => {
        #[doc = concat!("Reads a little-endian [`", stringify!($t), "`] at `index`.")]
        #[inline]
        pub fn $get(&self, index: usize) -> BufferResult<$t> {
            self.check_range(index, $bytes)?;
            Ok(unsafe { self.$get_unchecked(index) })
        }

        #[doc = concat!("Writes `value` as a little-endian [`", stringify!($t), "`] at `index`.")]
        #[inline]
        pub fn $put(&mut self, index: usize, value: $t) -> BufferResult<()> {
            self.check_range(index, $bytes)?;
            unsafe { self.$put_unchecked(index, value) };
            Ok(())
        }

        #[doc = concat!("Reads a host-native [`", stringify!($t), "`] at `index` (no byte swap).")]
        #[inline]
        pub fn $get_native(&self, index: usize) -> BufferResult<$t> {
            self.check_range(index, $bytes)?;
            Ok(unsafe { self.$get_native_unchecked(index) })
        }

        #[doc = concat!("Writes a host-native [`", stringify!($t), "`] at `index` (no byte swap).")]
        #[inline]
        pub fn $put_native(&mut self, index: usize, value: $t) -> BufferResult<()> {
            self.check_range(index, $bytes)?;
            unsafe { self.$put_native_unchecked(index, value) };
            Ok(())
        }

        #[doc = concat!("Reads a little-endian [`", stringify!($t), "`] at `index` without bounds checking.")]
        ///
        /// # Safety
        ///
        #[doc = concat!("`index + ", stringify!($bytes), " <= size()` must hold.")]
        #[inline]
        pub unsafe fn $get_unchecked(&self, index: usize) -> $t {
            <$t>::from_le(unsafe { self.read_raw::<$t>(index) })
        }

        #[doc = concat!("Writes a little-endian [`", stringify!($t), "`] at `index` without bounds checking.")]
        ///
        /// # Safety
        ///
        #[doc = concat!("`index + ", stringify!($bytes), " <= size()` must hold.")]
        #[inline]
        pub unsafe fn $put_unchecked(&mut self, index: usize, value: $t) {
            unsafe { self.write_raw::<$t>(index, value.to_le()) };
        }

        #[doc = concat!("Reads a host-native [`", stringify!($t), "`] at `index` without bounds checking.")]
        ///
        /// # Safety
        ///
        #[doc = concat!("`index + ", stringify!($bytes), " <= size()` must hold.")]
        #[inline]
        pub unsafe fn $get_native_unchecked(&self, index: usize) -> $t {
            unsafe { self.read_raw::<$t>(index) }
        }

        #[doc = concat!("Writes a host-native [`", stringify!($t), "`] at `index` without bounds checking.")]
        ///
        /// # Safety
        ///
        #[doc = concat!("`index + ", stringify!($bytes), " <= size()` must hold.")]
        #[inline]
        pub unsafe fn $put_native_unchecked(&mut self, index: usize, value: $t) {
            unsafe { self.write_raw::<$t>(index, value) };
        }
    };
}

macro_rules! int_access_be {
    ($t:ty, $bytes:expr, $get:ident, $put:ident) => {
        #[doc = concat!("Reads a big-endian [`", stringify!($t), "`] at `index` (byte-comparable form).")]
        #[inline]
        pub fn $get(&self, index: usize) -> BufferResult<$t> {
            self.check_range(index, $bytes)?;
            Ok(<$t>::from_be(unsafe { self.read_raw::<$t>(index) }))
        }

        #[doc = concat!("Writes a big-endian [`", stringify!($t), "`] at `index` (byte-comparable form).")]
        #[inline]
        pub fn $put(&mut self, index: usize, value: $t) -> BufferResult<()> {
            self.check_range(index, $bytes)?;
            unsafe { self.write_raw::<$t>(index, value.to_be()) };
            Ok(())
        }
    };
}

impl MemBuffer {
    int_access!(i8, 1, get_i8, put_i8, get_i8_native, put_i8_native,
        get_i8_unchecked, put_i8_unchecked, get_i8_native_unchecked, put_i8_native_unchecked);
    int_access!(u8, 1, get_u8, put_u8, get_u8_native, put_u8_native,
        get_u8_unchecked, put_u8_unchecked, get_u8_native_unchecked, put_u8_native_unchecked);
    int_access!(i16, 2, get_i16, put_i16, get_i16_native, put_i16_native,
        get_i16_unchecked, put_i16_unchecked, get_i16_native_unchecked, put_i16_native_unchecked);
    int_access!(u16, 2, get_u16, put_u16, get_u16_native, put_u16_native,
        get_u16_unchecked, put_u16_unchecked, get_u16_native_unchecked, put_u16_native_unchecked);
    int_access!(i32, 4, get_i32, put_i32, get_i32_native, put_i32_native,
        get_i32_unchecked, put_i32_unchecked, get_i32_native_unchecked, put_i32_native_unchecked);
    int_access!(u32, 4, get_u32, put_u32, get_u32_native, put_u32_native,
        get_u32_unchecked, put_u32_unchecked, get_u32_native_unchecked, put_u32_native_unchecked);
    int_access!(i64, 8, get_i64, put_i64, get_i64_native, put_i64_native,
        get_i64_unchecked, put_i64_unchecked, get_i64_native_unchecked, put_i64_native_unchecked);
    int_access!(u64, 8, get_u64, put_u64, get_u64_native, put_u64_native,
        get_u64_unchecked, put_u64_unchecked, get_u64_native_unchecked, put_u64_native_unchecked);

    int_access_be!(u16, 2, get_u16_be, put_u16_be);
    int_access_be!(u32, 4, get_u32_be, put_u32_be);
    int_access_be!(u64, 8, get_u64_be, put_u64_be);

    /// Reads a `bool` at `index` (any nonzero byte is `true`).
    #[inline]
    pub fn get_bool(&self, index: usize) -> BufferResult<bool> {
        Ok(self.get_u8(index)? != 0)
    }

    /// Writes a `bool` at `index` as one byte.
    #[inline]
    pub fn put_bool(&mut self, index: usize, value: bool) -> BufferResult<()> {
        self.put_u8(index, u8::from(value))
    }

    /// Reads a little-endian `f32` at `index` (raw IEEE 754 bit pattern).
    #[inline]
    pub fn get_f32(&self, index: usize) -> BufferResult<f32> {
        Ok(f32::from_bits(self.get_u32(index)?))
    }

    /// Writes `value` as a little-endian `f32` bit pattern at `index`.
    #[inline]
    pub fn put_f32(&mut self, index: usize, value: f32) -> BufferResult<()> {
        self.put_u32(index, value.to_bits())
    }

    /// Reads a host-native `f32` at `index`.
    #[inline]
    pub fn get_f32_native(&self, index: usize) -> BufferResult<f32> {
        Ok(f32::from_bits(self.get_u32_native(index)?))
    }

    /// Writes a host-native `f32` at `index`.
    #[inline]
    pub fn put_f32_native(&mut self, index: usize, value: f32) -> BufferResult<()> {
        self.put_u32_native(index, value.to_bits())
    }

    /// Reads a little-endian `f32` at `index` without bounds checking.
    ///
    /// # Safety
    ///
    /// `index + 4 <= size()` must hold.
    #[inline]
    pub unsafe fn get_f32_unchecked(&self, index: usize) -> f32 {
        f32::from_bits(unsafe { self.get_u32_unchecked(index) })
    }

    /// Writes a little-endian `f32` at `index` without bounds checking.
    ///
    /// # Safety
    ///
    /// `index + 4 <= size()` must hold.
    #[inline]
    pub unsafe fn put_f32_unchecked(&mut self, index: usize, value: f32) {
        unsafe { self.put_u32_unchecked(index, value.to_bits()) };
    }

    /// Reads a little-endian `f64` at `index` (raw IEEE 754 bit pattern).
    #[inline]
    pub fn get_f64(&self, index: usize) -> BufferResult<f64> {
        Ok(f64::from_bits(self.get_u64(index)?))
    }

    /// Writes `value` as a little-endian `f64` bit pattern at `index`.
    #[inline]
    pub fn put_f64(&mut self, index: usize, value: f64) -> BufferResult<()> {
        self.put_u64(index, value.to_bits())
    }

    /// Reads a host-native `f64` at `index`.
    #[inline]
    pub fn get_f64_native(&self, index: usize) -> BufferResult<f64> {
        Ok(f64::from_bits(self.get_u64_native(index)?))
    }

    /// Writes a host-native `f64` at `index`.
    #[inline]
    pub fn put_f64_native(&mut self, index: usize, value: f64) -> BufferResult<()> {
        self.put_u64_native(index, value.to_bits())
    }

    /// Reads a little-endian `f64` at `index` without bounds checking.
    ///
    /// # Safety
    ///
    /// `index + 8 <= size()` must hold.
    #[inline]
    pub unsafe fn get_f64_unchecked(&self, index: usize) -> f64 {
        f64::from_bits(unsafe { self.get_u64_unchecked(index) })
    }

    /// Writes a little-endian `f64` at `index` without bounds checking.
    ///
    /// # Safety
    ///
    /// `index + 8 <= size()` must hold.
    #[inline]
    pub unsafe fn put_f64_unchecked(&mut self, index: usize, value: f64) {
        unsafe { self.put_u64_unchecked(index, value.to_bits()) };
    }
}

#[cfg(test)]
mod tests {
    use crate::MemBuffer;
    use pretty_assertions::assert_eq;

    #[test]
    fn little_endian_bytes_on_any_host() {
        let mut buf = MemBuffer::allocate(8);
        buf.put_i32(0, 0x0A0B_0C0D).unwrap();
        assert_eq!(&buf.as_slice()[..4], &[0x0D, 0x0C, 0x0B, 0x0A]);
        assert_eq!(buf.get_i32(0).unwrap(), 0x0A0B_0C0D);
    }

    #[test]
    fn native_bytes_match_host_layout() {
        let mut buf = MemBuffer::allocate(4);
        buf.put_u32_native(0, 0x0102_0304).unwrap();
        assert_eq!(&buf.as_slice()[..4], &0x0102_0304u32.to_ne_bytes());
    }

    #[test]
    fn big_endian_forms_are_byte_comparable() {
        let mut buf = MemBuffer::allocate(8);
        buf.put_u64_be(0, 0x0102_0304_0506_0708).unwrap();
        assert_eq!(buf.as_slice(), &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(buf.get_u64_be(0).unwrap(), 0x0102_0304_0506_0708);
    }

    #[test]
    fn floats_keep_raw_bit_patterns() {
        let mut buf = MemBuffer::allocate(16);
        let quiet_nan_with_payload = f64::from_bits(0x7FF8_0000_0000_BEEF);
        buf.put_f64(0, quiet_nan_with_payload).unwrap();
        assert_eq!(buf.get_f64(0).unwrap().to_bits(), 0x7FF8_0000_0000_BEEF);

        buf.put_f32(8, f32::from_bits(0xFF80_0001)).unwrap();
        assert_eq!(buf.get_f32(8).unwrap().to_bits(), 0xFF80_0001);
    }

    #[test]
    fn bool_and_bytes() {
        let mut buf = MemBuffer::allocate(2);
        buf.put_bool(0, true).unwrap();
        buf.put_u8(1, 7).unwrap();
        assert!(buf.get_bool(0).unwrap());
        assert!(buf.get_bool(1).unwrap());
        assert_eq!(buf.get_i8(1).unwrap(), 7);
    }

    #[cfg(feature = "bounds-checks")]
    #[test]
    fn checked_access_fails_out_of_range() {
        use crate::error::BufferError;

        let mut buf = MemBuffer::allocate(4);
        assert_eq!(
            buf.get_i32(1),
            Err(BufferError::OutOfBounds { index: 1, need: 4, size: 4 })
        );
        assert_eq!(
            buf.put_i64(0, 1),
            Err(BufferError::OutOfBounds { index: 0, need: 8, size: 4 })
        );
        assert_eq!(
            buf.get_u8(4),
            Err(BufferError::OutOfBounds { index: 4, need: 1, size: 4 })
        );
        assert!(buf.get_i32(0).is_ok());
    }

    #[test]
    fn unchecked_matches_checked() {
        let mut buf = MemBuffer::allocate(8);
        unsafe { buf.put_u64_unchecked(0, 0xDEAD_BEEF_CAFE_F00D) };
        assert_eq!(buf.get_u64(0).unwrap(), 0xDEAD_BEEF_CAFE_F00D);
        assert_eq!(unsafe { buf.get_u64_unchecked(0) }, 0xDEAD_BEEF_CAFE_F00D);
    }
}
