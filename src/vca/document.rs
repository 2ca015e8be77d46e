//! Document assembly: magic validation, top-level record loop, path lookup.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use memmap2::Mmap;
use tracing::debug;

use super::cursor::Cursor;
use super::decode::read_record;
use super::format::{HEADER_SIZE, OPDX_MAGIC};
use super::value::{Entries, Value};
use crate::util::{Error, Result};

/// A fully decoded OPDx file: the root name→value mapping.
///
/// Built in one pass over the bytes and immutable afterwards. The Document
/// owns every decoded value; nothing borrows the source buffer, so the
/// buffer (or mapping) can be dropped as soon as decoding returns.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    entries: Entries,
}

impl Document {
    /// Decode a complete OPDx byte buffer.
    ///
    /// Fails with [`Error::BadMagic`] before any record is touched if the
    /// 12-byte header does not match; any later error aborts the whole
    /// decode with no partial result.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut cur = Cursor::new(bytes);
        if cur.read_exact(HEADER_SIZE).map_err(|_| Error::BadMagic)? != OPDX_MAGIC {
            return Err(Error::BadMagic);
        }

        let mut entries = Entries::new();
        while !cur.at_end() {
            let record = read_record(&mut cur, 0)?;
            // Terminator records carry no value and are dropped
            if let Some(value) = record.value {
                entries.insert(record.name, value);
            }
        }
        debug!(
            entries = entries.len(),
            bytes = bytes.len(),
            "decoded OPDx document"
        );
        Ok(Self { entries })
    }

    /// Open and decode a file, memory-mapping it for the read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_opts(path, true)
    }

    /// Open and decode a file with optional memory mapping.
    ///
    /// The file handle (and mapping) lives only for the duration of this
    /// call; the returned Document owns all of its data.
    pub fn open_opts(path: impl AsRef<Path>, use_mmap: bool) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;

        if use_mmap && file.metadata()?.len() > 0 {
            // Safety: the file is opened read-only and the mapping does not
            // outlive this call
            let mmap = unsafe { Mmap::map(&file) }.map_err(|e| Error::MmapFailed(e.to_string()))?;
            Self::decode(&mmap)
        } else {
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)?;
            Self::decode(&buf)
        }
    }

    /// Root mapping in first-occurrence order.
    #[inline]
    pub fn root(&self) -> &Entries {
        &self.entries
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the document holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over top-level name-value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter()
    }

    /// Resolve a path through nested RawData/Dict mappings, one name per
    /// segment.
    ///
    /// A missing name is [`Error::NotFound`] (carrying the path up to the
    /// failing segment); descending through a non-container value is
    /// [`Error::TypeMismatch`].
    pub fn get(&self, path: &[&str]) -> Result<&Value> {
        let mut entries = &self.entries;
        for (i, segment) in path.iter().enumerate() {
            let value = entries
                .get(segment)
                .ok_or_else(|| Error::NotFound(path[..=i].join("/")))?;
            if i + 1 == path.len() {
                return Ok(value);
            }
            entries = value.as_entries().ok_or_else(|| {
                Error::mismatch("RawData or Dict", value.type_name())
            })?;
        }
        Err(Error::NotFound(path.join("/")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        let doc = Document::decode(OPDX_MAGIC).unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.len(), 0);
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = OPDX_MAGIC.to_vec();
        bytes[0] ^= 0xFF;
        assert!(matches!(Document::decode(&bytes), Err(Error::BadMagic)));
        // A short header is also a magic failure, not a partial decode
        assert!(matches!(
            Document::decode(b"VCA"),
            Err(Error::BadMagic)
        ));
    }

    #[test]
    fn test_get_empty_path() {
        let doc = Document::decode(OPDX_MAGIC).unwrap();
        assert!(matches!(doc.get(&[]), Err(Error::NotFound(_))));
    }
}
