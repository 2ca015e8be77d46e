//! Bounds-checked sequential reader over the decode buffer.

use crate::util::{Error, Result};

/// Sequential reader over an immutable byte buffer.
///
/// Every read checks the remaining length first and fails with
/// [`Error::TruncatedInput`] rather than panicking. The only way to move
/// other than reading is [`Cursor::seek_to`], which is forward-only — the
/// forced skip to a composite's declared end is the single place the format
/// needs it.
#[derive(Debug)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Wrap a byte buffer, positioned at offset 0.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current read offset.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total buffer length.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the underlying buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Bytes left to read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Whether the cursor sits exactly at end-of-buffer.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos == self.buf.len()
    }

    /// Return the next `n` bytes and advance past them.
    pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(Error::TruncatedInput {
                offset: self.pos,
                needed: n,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Force the cursor to an absolute offset at or past the current
    /// position. Used to honor a composite's declared payload end.
    pub fn seek_to(&mut self, target: usize) -> Result<()> {
        if target < self.pos {
            return Err(Error::corrupt(
                self.pos,
                format!("declared end {} is behind the cursor", target),
            ));
        }
        if target > self.buf.len() {
            return Err(Error::corrupt(
                self.pos,
                format!(
                    "declared end {} is past the buffer end {}",
                    target,
                    self.buf.len()
                ),
            ));
        }
        self.pos = target;
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_exact(1)?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let b = self.read_exact(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let b = self.read_exact(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let b = self.read_exact(8)?;
        Ok(u64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(self.read_u64()? as i64)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    /// Read a u32-length-prefixed UTF-8 string.
    pub fn read_name(&mut self) -> Result<String> {
        let len = self.read_u32()? as usize;
        let start = self.pos;
        let bytes = self.read_exact(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| Error::InvalidText { offset: start })
    }

    /// Read a selector-prefixed unsigned size.
    ///
    /// One selector byte gives the width of the size field itself: 1, 2 or
    /// 4 bytes, little-endian. Any other selector is [`Error::BadSizeWidth`].
    pub fn read_size(&mut self) -> Result<usize> {
        let at = self.pos;
        let selector = self.read_u8()?;
        match selector {
            1 => Ok(self.read_u8()? as usize),
            2 => Ok(self.read_u16()? as usize),
            4 => Ok(self.read_u32()? as usize),
            _ => Err(Error::BadSizeWidth {
                offset: at,
                selector,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_exact_bounds() {
        let mut cur = Cursor::new(&[1, 2, 3]);
        assert_eq!(cur.read_exact(2).unwrap(), &[1, 2]);
        assert_eq!(cur.position(), 2);
        assert!(matches!(
            cur.read_exact(2),
            Err(Error::TruncatedInput {
                offset: 2,
                needed: 2,
                remaining: 1,
            })
        ));
        // A failed read does not move the cursor
        assert_eq!(cur.position(), 2);
    }

    #[test]
    fn test_scalar_reads_little_endian() {
        let bytes = [
            0x01, 0x02, // u16
            0xFF, 0xFF, 0xFF, 0xFF, // i32 = -1
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF0, 0x3F, // f64 = 1.0
        ];
        let mut cur = Cursor::new(&bytes);
        assert_eq!(cur.read_u16().unwrap(), 0x0201);
        assert_eq!(cur.read_i32().unwrap(), -1);
        assert_eq!(cur.read_f64().unwrap(), 1.0);
        assert!(cur.at_end());
    }

    #[test]
    fn test_seek_forward_only() {
        let mut cur = Cursor::new(&[0u8; 10]);
        cur.read_exact(4).unwrap();
        cur.seek_to(8).unwrap();
        assert_eq!(cur.position(), 8);
        assert!(matches!(cur.seek_to(4), Err(Error::CorruptSize { .. })));
        assert!(matches!(cur.seek_to(11), Err(Error::CorruptSize { .. })));
    }

    #[test]
    fn test_read_name() {
        let mut bytes = vec![3, 0, 0, 0];
        bytes.extend_from_slice(b"abc");
        let mut cur = Cursor::new(&bytes);
        assert_eq!(cur.read_name().unwrap(), "abc");
        assert!(cur.at_end());
    }

    #[test]
    fn test_read_name_invalid_utf8() {
        let bytes = [2, 0, 0, 0, 0xFF, 0xFE];
        let mut cur = Cursor::new(&bytes);
        assert!(matches!(
            cur.read_name(),
            Err(Error::InvalidText { offset: 4 })
        ));
    }

    #[test]
    fn test_read_size_widths() {
        let mut cur = Cursor::new(&[1, 0x2A]);
        assert_eq!(cur.read_size().unwrap(), 42);

        let mut cur = Cursor::new(&[2, 0x01, 0x02]);
        assert_eq!(cur.read_size().unwrap(), 0x0201);

        let mut cur = Cursor::new(&[4, 0x01, 0x02, 0x03, 0x04]);
        assert_eq!(cur.read_size().unwrap(), 0x0403_0201);
    }

    #[test]
    fn test_read_size_bad_selector() {
        let mut cur = Cursor::new(&[3, 0, 0, 0]);
        assert!(matches!(
            cur.read_size(),
            Err(Error::BadSizeWidth {
                offset: 0,
                selector: 3,
            })
        ));
    }
}
