//! OPDx format constants and the type tag table.

/// Magic bytes at the start of an OPDx file: "VCA DATA" + 01 00 00 55.
pub const OPDX_MAGIC: &[u8; 12] = b"VCA DATA\x01\x00\x00\x55";

/// Size of the file header in bytes.
pub const HEADER_SIZE: usize = 12;

/// Bytes discarded at the front of an Array payload.
pub const ARRAY_HEADER_SIZE: usize = 5;

/// Opaque reserved span inside a PosData payload.
pub const POSDATA_RESERVED_SIZE: usize = 12;

/// Length of a TimeStamp payload.
pub const TIMESTAMP_SIZE: usize = 9;

/// Expected payload of a Terminator record.
pub const TERMINATOR_MARKER: [u8; 2] = [0xFF, 0xFF];

/// Defensive cap on RawData/Dict nesting. The format itself has no bound;
/// anything deeper than this is a corrupted size field in practice.
pub const MAX_NESTING_DEPTH: usize = 256;

/// One-byte type tags, exhaustive over every code the format defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeTag {
    Matrix = 0x00,
    Boolean = 0x01,
    Int32 = 0x06,
    Uint32 = 0x07,
    Int64 = 0x0A,
    Uint64 = 0x0B,
    Float32 = 0x0C,
    Float64 = 0x0D,
    DType = 0x0E,
    String = 0x12,
    Quantity = 0x13,
    TimeStamp = 0x15,
    Unit = 0x18,
    Array = 0x40,
    StringList = 0x42,
    AnonMatrix = 0x45,
    RawData = 0x46,
    RawData2D = 0x47,
    PosData = 0x7C,
    Dict = 0x7D,
    Terminator = 0x7F,
}

impl TypeTag {
    /// Look up a tag by its byte code. `None` means the code is not in the
    /// dispatch table and the record cannot be decoded.
    pub const fn from_u8(code: u8) -> Option<Self> {
        Some(match code {
            0x00 => Self::Matrix,
            0x01 => Self::Boolean,
            0x06 => Self::Int32,
            0x07 => Self::Uint32,
            0x0A => Self::Int64,
            0x0B => Self::Uint64,
            0x0C => Self::Float32,
            0x0D => Self::Float64,
            0x0E => Self::DType,
            0x12 => Self::String,
            0x13 => Self::Quantity,
            0x15 => Self::TimeStamp,
            0x18 => Self::Unit,
            0x40 => Self::Array,
            0x42 => Self::StringList,
            0x45 => Self::AnonMatrix,
            0x46 => Self::RawData,
            0x47 => Self::RawData2D,
            0x7C => Self::PosData,
            0x7D => Self::Dict,
            0x7F => Self::Terminator,
            _ => return None,
        })
    }

    /// The tag's byte code.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Human-readable tag name for diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Matrix => "Matrix",
            Self::Boolean => "Boolean",
            Self::Int32 => "Int32",
            Self::Uint32 => "Uint32",
            Self::Int64 => "Int64",
            Self::Uint64 => "Uint64",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
            Self::DType => "DType",
            Self::String => "String",
            Self::Quantity => "Quantity",
            Self::TimeStamp => "TimeStamp",
            Self::Unit => "Unit",
            Self::Array => "Array",
            Self::StringList => "StringList",
            Self::AnonMatrix => "AnonMatrix",
            Self::RawData => "RawData",
            Self::RawData2D => "RawData2D",
            Self::PosData => "PosData",
            Self::Dict => "Dict",
            Self::Terminator => "Terminator",
        }
    }
}
