//! Low-level OPDx container format.
//!
//! The container is a 12-byte magic header followed by a flat sequence of
//! records. Every record is `u32 name length + name bytes + one type tag
//! byte + type-specific payload`, little-endian throughout and with no
//! padding. Two tags (RawData / Dict) hold a size-prefixed span of nested
//! records, which is what turns a flat stream into a tree.
//!
//! Decoding is one forward pass. Size-prefixed composites declare their
//! exact payload length and the cursor is forced to the declared end after
//! the known fields are read, so files written by newer instruments with
//! extra trailer bytes still decode.

pub mod format;

mod cursor;
mod decode;
mod document;
mod value;

pub use cursor::Cursor;
pub use decode::Record;
pub use document::Document;
pub use format::TypeTag;
pub use value::{DType, Entries, PosData, Quantity, Unit, Value};
