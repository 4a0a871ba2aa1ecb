use eomap_core::number;

use crate::error::PersistError;
use crate::format::Section;

/// Sequential reader over an in-memory EMF file.
///
/// Offers two kinds of read: `read` fails on any shortfall, while `try_read`
/// distinguishes a source that is exhausted exactly at the current position
/// (`Ok(None)`) from one that ends part-way through the request (error).
pub struct ByteSource<'a> {
    bytes: &'a [u8],
    pos: usize,
    section: Section,
}

impl<'a> ByteSource<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            section: Section::Header,
        }
    }

    /// Set the section named in truncation errors.
    pub fn enter(&mut self, section: Section) {
        self.section = section;
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read(&mut self, n: usize) -> Result<&'a [u8], PersistError> {
        if self.remaining() < n {
            return Err(PersistError::Truncated {
                section: self.section,
                offset: self.pos,
                needed: n,
                available: self.remaining(),
            });
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read `n` bytes if the source has any left; `Ok(None)` if it ended here.
    pub fn try_read(&mut self, n: usize) -> Result<Option<&'a [u8]>, PersistError> {
        if self.is_exhausted() {
            return Ok(None);
        }
        self.read(n).map(Some)
    }

    /// Read and decode a 1-byte EO number.
    pub fn char(&mut self) -> Result<u8, PersistError> {
        Ok(number::decode_char(self.read(1)?[0]))
    }

    /// Like `char`, but `Ok(None)` when the source ended exactly here.
    pub fn try_char(&mut self) -> Result<Option<u8>, PersistError> {
        Ok(self.try_read(1)?.map(|b| number::decode_char(b[0])))
    }

    /// Read and decode a 2-byte EO number.
    pub fn short(&mut self) -> Result<u16, PersistError> {
        let b = self.read(2)?;
        Ok(number::decode_short(b[0], b[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_advances() {
        let data = [1, 2, 3, 4, 5];
        let mut src = ByteSource::new(&data);
        assert_eq!(src.read(2).expect("read"), &[1, 2]);
        assert_eq!(src.position(), 2);
        assert_eq!(src.remaining(), 3);
    }

    #[test]
    fn test_short_read_is_truncation() {
        let data = [1, 2, 3];
        let mut src = ByteSource::new(&data);
        src.enter(Section::Warps);
        src.read(2).expect("read");
        let err = src.read(4).expect_err("should fail");
        assert!(matches!(
            err,
            PersistError::Truncated {
                section: Section::Warps,
                offset: 2,
                needed: 4,
                available: 1
            }
        ));
        // Failed read does not consume
        assert_eq!(src.position(), 2);
    }

    #[test]
    fn test_try_read_clean_end_is_none() {
        let data = [7];
        let mut src = ByteSource::new(&data);
        assert_eq!(src.try_read(1).expect("read"), Some(&[7u8][..]));
        assert_eq!(src.try_read(1).expect("clean end"), None);
        assert_eq!(src.try_char().expect("clean end"), None);
    }

    #[test]
    fn test_try_read_partial_is_error() {
        let data = [7];
        let mut src = ByteSource::new(&data);
        assert!(src.try_read(2).is_err());
    }

    #[test]
    fn test_decoding_helpers() {
        // 1-byte 5, then 2-byte 254 = [2, 2]
        let data = [6, 2, 2];
        let mut src = ByteSource::new(&data);
        assert_eq!(src.char().expect("char"), 5);
        assert_eq!(src.short().expect("short"), 254);
        assert!(src.char().is_err());
    }
}
