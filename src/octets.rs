//! Big-endian field access.
//!
//! RTCP carries one field the `bytes` crate has no direct reader for: the
//! cumulative loss counter, a signed 24-bit two's-complement integer.
//! The helpers here cover it together with the plain unsigned widths so
//! every codec in the crate reads and writes through one place.

use bytes::{BufMut, BytesMut};

use crate::Error;

/// Reads a big-endian `u16` at `at`.
pub fn read_u16(buf: &[u8], at: usize) -> Result<u16, Error> {
    let buf = buf.get(at..at + 2).ok_or(Error::InvalidInput)?;
    Ok(u16::from_be_bytes(buf.try_into()?))
}

/// Reads a big-endian `u24` at `at`.
pub fn read_u24(buf: &[u8], at: usize) -> Result<u32, Error> {
    let buf = buf.get(at..at + 3).ok_or(Error::InvalidInput)?;
    Ok(((buf[0] as u32) << 16) | ((buf[1] as u32) << 8) | buf[2] as u32)
}

/// Reads a big-endian signed 24-bit integer at `at`.
///
/// Values at or above `0x800000` are the two's-complement encodings of
/// the negative range.
pub fn read_s24(buf: &[u8], at: usize) -> Result<i32, Error> {
    let u = read_u24(buf, at)?;
    Ok(if u < 0x800000 {
        u as i32
    } else {
        -((((!u) & 0xffffff) + 1) as i32)
    })
}

/// Reads a big-endian `u32` at `at`.
pub fn read_u32(buf: &[u8], at: usize) -> Result<u32, Error> {
    let buf = buf.get(at..at + 4).ok_or(Error::InvalidInput)?;
    Ok(u32::from_be_bytes(buf.try_into()?))
}

/// Appends the low 24 bits of `value`, big-endian.
pub fn put_u24(bytes: &mut BytesMut, value: u32) {
    bytes.put_u8((value >> 16) as u8);
    bytes.put_u8((value >> 8) as u8);
    bytes.put_u8(value as u8);
}

/// Appends `value` as a 24-bit two's-complement integer.
///
/// The caller keeps `value` inside `-8388608..=8388607`; out-of-range
/// values wrap like any narrowing two's-complement store.
pub fn put_s24(bytes: &mut BytesMut, value: i32) {
    put_u24(bytes, (value as u32) & 0xffffff);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s24_round_trip() {
        let mut bytes = BytesMut::new();
        for value in [-8388608, -8388607, -1, 0, 1, 0x7ffffe, 0x7fffff] {
            bytes.clear();
            put_s24(&mut bytes, value);
            assert_eq!(read_s24(&bytes, 0).unwrap(), value);
        }
    }

    #[test]
    fn s24_wire_form() {
        let mut bytes = BytesMut::new();
        put_s24(&mut bytes, -1);
        assert_eq!(&bytes[..], [0xff, 0xff, 0xff]);

        bytes.clear();
        put_s24(&mut bytes, -8388608);
        assert_eq!(&bytes[..], [0x80, 0x00, 0x00]);
    }

    #[test]
    fn short_reads() {
        assert_eq!(read_u32(&[0; 3], 0), Err(Error::InvalidInput));
        assert_eq!(read_u16(&[0; 4], 3), Err(Error::InvalidInput));
    }
}
