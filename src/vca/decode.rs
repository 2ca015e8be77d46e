//! Record decoding: tag dispatch and one decoder per payload layout.
//!
//! Each decoder is entered with the cursor sitting immediately after the
//! type tag byte. Size-prefixed composites (Quantity, Unit, StringList,
//! RawData, Dict) declare their exact payload length; after the known
//! fields are read the cursor is forced to `payload_start + declared_size`,
//! which is how the format stays readable when newer instruments append
//! trailer fields.

use tracing::trace;

use super::cursor::Cursor;
use super::format::{
    ARRAY_HEADER_SIZE, MAX_NESTING_DEPTH, POSDATA_RESERVED_SIZE, TERMINATOR_MARKER,
    TIMESTAMP_SIZE, TypeTag,
};
use super::value::{DType, Entries, PosData, Quantity, Unit, Value};
use crate::util::{Error, Result};

/// One decoded record. Transient: Document and container decoding fold
/// records into an [`Entries`] mapping and drop the rest.
#[derive(Debug)]
pub struct Record {
    pub name: String,
    /// `None` for Terminator records, which carry no value.
    pub value: Option<Value>,
    /// Offset of the record's name length field.
    pub start: usize,
    /// Offset of the payload, just past the type tag.
    pub value_start: usize,
}

impl Record {
    /// Decode one record from the cursor's current position.
    pub fn read(cur: &mut Cursor) -> Result<Self> {
        read_record(cur, 0)
    }
}

/// Decode one record: name, tag byte, dispatched payload.
pub fn read_record(cur: &mut Cursor, depth: usize) -> Result<Record> {
    let start = cur.position();
    let name = cur.read_name()?;
    let tag_at = cur.position();
    let code = cur.read_u8()?;
    let tag = TypeTag::from_u8(code).ok_or(Error::UnknownTypeCode {
        offset: tag_at,
        code,
    })?;
    let value_start = cur.position();
    trace!(name = %name, tag = tag.name(), offset = start, "record");
    let value = read_value(tag, cur, depth)?;
    Ok(Record {
        name,
        value,
        start,
        value_start,
    })
}

/// Dispatch on the tag. Exhaustive over [`TypeTag`]; an unknown byte code
/// never reaches this point.
fn read_value(tag: TypeTag, cur: &mut Cursor, depth: usize) -> Result<Option<Value>> {
    Ok(Some(match tag {
        TypeTag::Boolean => Value::Boolean(cur.read_bool()?),
        TypeTag::Int32 => Value::Int32(cur.read_i32()?),
        TypeTag::Uint32 => Value::Uint32(cur.read_u32()?),
        TypeTag::Int64 => Value::Int64(cur.read_i64()?),
        TypeTag::Uint64 => Value::Uint64(cur.read_u64()?),
        TypeTag::Float32 => Value::Float32(cur.read_f32()?),
        TypeTag::Float64 => Value::Float64(cur.read_f64()?),
        TypeTag::DType => Value::DType(read_dtype(cur)?),
        TypeTag::String => Value::String(read_string(cur)?),
        TypeTag::Quantity => Value::Quantity(read_quantity(cur)?),
        TypeTag::TimeStamp => Value::TimeStamp(read_timestamp(cur)?),
        TypeTag::Unit => Value::Unit(read_unit(cur)?),
        TypeTag::Array => read_array(cur)?,
        TypeTag::StringList => read_string_list(cur)?,
        TypeTag::RawData => Value::RawData(read_entries(cur, depth + 1)?),
        TypeTag::Dict => Value::Dict(read_entries(cur, depth + 1)?),
        TypeTag::PosData => Value::PosData(read_pos_data(cur)?),
        // Payload layouts for these tags are undetermined; they decode as
        // zero-length markers rather than guessing a byte layout.
        TypeTag::Matrix => Value::Matrix,
        TypeTag::AnonMatrix => Value::AnonMatrix,
        TypeTag::RawData2D => Value::RawData2D,
        TypeTag::Terminator => {
            read_terminator(cur)?;
            return Ok(None);
        }
    }))
}

/// Absolute payload end for a declared size, guarding against overflow.
fn payload_end(cur: &Cursor, start: usize, size: usize) -> Result<usize> {
    start
        .checked_add(size)
        .filter(|&end| end <= cur.len())
        .ok_or_else(|| {
            Error::corrupt(
                start,
                format!("declared payload of {} bytes runs past the buffer", size),
            )
        })
}

fn read_dtype(cur: &mut Cursor) -> Result<DType> {
    let name = cur.read_name()?;
    let width_at = cur.position();
    let width = cur.read_size()?;
    let typeid = match width {
        1 => cur.read_u8()? as u32,
        2 => cur.read_u16()? as u32,
        4 => cur.read_u32()?,
        _ => {
            return Err(Error::corrupt(
                width_at,
                format!("DType id width {} is not 1, 2 or 4", width),
            ))
        }
    };
    Ok(DType { name, typeid })
}

fn read_string(cur: &mut Cursor) -> Result<String> {
    let size = cur.read_size()?;
    let at = cur.position();
    let bytes = cur.read_exact(size)?;
    String::from_utf8(bytes.to_vec()).map_err(|_| Error::InvalidText { offset: at })
}

/// Quantity stream order: f64 value, unit name, symbol name.
fn read_quantity(cur: &mut Cursor) -> Result<Quantity> {
    let size = cur.read_size()?;
    let start = cur.position();
    let end = payload_end(cur, start, size)?;
    let value = cur.read_f64()?;
    let unit = cur.read_name()?;
    let symbol = cur.read_name()?;
    cur.seek_to(end)?;
    Ok(Quantity {
        value,
        unit,
        symbol,
    })
}

/// Unit stream order: unit name, symbol name, f64 value. Not the same
/// order as Quantity; the asymmetry is part of the format.
fn read_unit(cur: &mut Cursor) -> Result<Unit> {
    let size = cur.read_size()?;
    let start = cur.position();
    let end = payload_end(cur, start, size)?;
    let unit = cur.read_name()?;
    let symbol = cur.read_name()?;
    let value = cur.read_f64()?;
    cur.seek_to(end)?;
    Ok(Unit {
        value,
        unit,
        symbol,
    })
}

fn read_timestamp(cur: &mut Cursor) -> Result<[u8; TIMESTAMP_SIZE]> {
    let bytes = cur.read_exact(TIMESTAMP_SIZE)?;
    let mut raw = [0u8; TIMESTAMP_SIZE];
    raw.copy_from_slice(bytes);
    Ok(raw)
}

/// Array payload: 5 header bytes (discarded), then consecutive LE f64s.
fn read_array(cur: &mut Cursor) -> Result<Value> {
    let name = cur.read_name()?;
    let size_at = cur.position();
    let size = cur.read_size()?;
    if size < ARRAY_HEADER_SIZE || (size - ARRAY_HEADER_SIZE) % 8 != 0 {
        return Err(Error::corrupt(
            size_at,
            format!("array payload of {} bytes is not 5 + 8k", size),
        ));
    }
    let payload = cur.read_exact(size)?;
    let samples = f64_samples(&payload[ARRAY_HEADER_SIZE..]);
    Ok(Value::Array { name, samples })
}

/// StringList payload: length-prefixed names packed to exactly the
/// declared size.
fn read_string_list(cur: &mut Cursor) -> Result<Value> {
    let name = cur.read_name()?;
    let size_at = cur.position();
    let size = cur.read_size()?;
    let start = cur.position();
    let end = payload_end(cur, start, size)?;

    let mut items = Vec::new();
    while cur.position() < end {
        let item = cur.read_name()?;
        if cur.position() > end {
            return Err(Error::corrupt(
                size_at,
                format!("string list overran its declared {} byte span", size),
            ));
        }
        items.push(item);
    }
    Ok(Value::StringList { name, items })
}

/// RawData/Dict payload: nested records filling exactly the declared span.
fn read_entries(cur: &mut Cursor, depth: usize) -> Result<Entries> {
    if depth > MAX_NESTING_DEPTH {
        return Err(Error::NestingTooDeep {
            offset: cur.position(),
            limit: MAX_NESTING_DEPTH,
        });
    }
    let size_at = cur.position();
    let size = cur.read_size()?;
    let start = cur.position();
    let end = payload_end(cur, start, size)?;

    let mut entries = Entries::new();
    while cur.position() < end {
        let record = read_record(cur, depth)?;
        if cur.position() > end {
            return Err(Error::corrupt(
                size_at,
                format!("nested records overran the declared {} byte span", size),
            ));
        }
        // Terminator records carry no value and are dropped
        if let Some(value) = record.value {
            entries.insert(record.name, value);
        }
    }
    Ok(entries)
}

/// PosData payload: exact layout, no declared-size trailer to skip.
fn read_pos_data(cur: &mut Cursor) -> Result<PosData> {
    let name = cur.read_name()?;
    // The declared size is present but the layout below is exact
    let _ = cur.read_size()?;
    let unit = cur.read_name()?;
    let symbol = cur.read_name()?;
    let divisor = cur.read_f64()?;

    // 12 reserved bytes of unknown semantics, skipped opaquely
    cur.read_exact(POSDATA_RESERVED_SIZE)?;

    let count_at = cur.position();
    let count = cur.read_u64()?;
    let byte_len = count
        .checked_mul(8)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| {
            Error::corrupt(count_at, format!("sample count {} overflows", count))
        })?;
    let samples = f64_samples(cur.read_exact(byte_len)?);

    Ok(PosData {
        name,
        unit: Unit {
            value: divisor,
            unit,
            symbol,
        },
        samples,
    })
}

fn read_terminator(cur: &mut Cursor) -> Result<()> {
    let at = cur.position();
    let marker = cur.read_exact(TERMINATOR_MARKER.len())?;
    if marker != TERMINATOR_MARKER {
        return Err(Error::MalformedTerminator { offset: at });
    }
    Ok(())
}

/// Reinterpret a byte span (length a multiple of 8) as LE f64 samples.
fn f64_samples(bytes: &[u8]) -> Vec<f64> {
    bytes
        .chunks_exact(8)
        .map(|c| {
            f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]])
        })
        .collect()
}
