//! Decoded value types and the ordered name→value mapping.

use std::fmt;

/// A physical quantity: value first in the stream, then unit and symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub unit: String,
    pub symbol: String,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.value, self.unit, self.symbol)
    }
}

/// A unit definition: unit and symbol first in the stream, value last.
///
/// Same three fields as [`Quantity`] but the stream stores them in the
/// opposite order; the two tags are not interchangeable on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub value: f64,
    pub unit: String,
    pub symbol: String,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.value, self.unit, self.symbol)
    }
}

/// A named type descriptor with a variable-width numeric id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DType {
    pub name: String,
    pub typeid: u32,
}

/// A calibrated position/sample array.
///
/// `unit.value` is the divisor applied to the raw samples; [`PosData::scaled`]
/// gives the calibrated positions.
#[derive(Debug, Clone, PartialEq)]
pub struct PosData {
    pub name: String,
    pub unit: Unit,
    pub samples: Vec<f64>,
}

impl PosData {
    /// Samples multiplied by the unit divisor.
    pub fn scaled(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s * self.unit.value).collect()
    }
}

/// One decoded value, exactly one variant per type tag that carries data.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Int32(i32),
    Uint32(u32),
    Int64(i64),
    Uint64(u64),
    Float32(f32),
    Float64(f64),
    DType(DType),
    String(String),
    Quantity(Quantity),
    /// 9 raw bytes; the field semantics are not decoded further.
    TimeStamp([u8; 9]),
    Unit(Unit),
    Array {
        name: String,
        samples: Vec<f64>,
    },
    StringList {
        name: String,
        items: Vec<String>,
    },
    RawData(Entries),
    Dict(Entries),
    PosData(PosData),
    /// Tag recognized, payload layout unknown; decodes as a bare marker.
    Matrix,
    /// Tag recognized, payload layout unknown; decodes as a bare marker.
    AnonMatrix,
    /// Tag recognized, payload layout unknown; decodes as a bare marker.
    RawData2D,
}

impl Value {
    /// Variant name for diagnostics and type-mismatch errors.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "Boolean",
            Self::Int32(_) => "Int32",
            Self::Uint32(_) => "Uint32",
            Self::Int64(_) => "Int64",
            Self::Uint64(_) => "Uint64",
            Self::Float32(_) => "Float32",
            Self::Float64(_) => "Float64",
            Self::DType(_) => "DType",
            Self::String(_) => "String",
            Self::Quantity(_) => "Quantity",
            Self::TimeStamp(_) => "TimeStamp",
            Self::Unit(_) => "Unit",
            Self::Array { .. } => "Array",
            Self::StringList { .. } => "StringList",
            Self::RawData(_) => "RawData",
            Self::Dict(_) => "Dict",
            Self::PosData(_) => "PosData",
            Self::Matrix => "Matrix",
            Self::AnonMatrix => "AnonMatrix",
            Self::RawData2D => "RawData2D",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Boolean(b) => Some(b),
            _ => None,
        }
    }

    /// Signed integer view of any integer variant that fits in i64.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Int32(v) => Some(v as i64),
            Self::Uint32(v) => Some(v as i64),
            Self::Int64(v) => Some(v),
            Self::Uint64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    /// Float view of the floating-point variants.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Float32(v) => Some(v as f64),
            Self::Float64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_quantity(&self) -> Option<&Quantity> {
        match self {
            Self::Quantity(q) => Some(q),
            _ => None,
        }
    }

    pub fn as_unit(&self) -> Option<&Unit> {
        match self {
            Self::Unit(u) => Some(u),
            _ => None,
        }
    }

    /// The nested mapping of a RawData or Dict container.
    pub fn as_entries(&self) -> Option<&Entries> {
        match self {
            Self::RawData(e) | Self::Dict(e) => Some(e),
            _ => None,
        }
    }

    /// The samples of an Array value.
    pub fn as_samples(&self) -> Option<&[f64]> {
        match self {
            Self::Array { samples, .. } => Some(samples),
            _ => None,
        }
    }

    pub fn as_pos_data(&self) -> Option<&PosData> {
        match self {
            Self::PosData(p) => Some(p),
            _ => None,
        }
    }
}

/// Ordered name→value mapping used by Document, RawData and Dict.
///
/// Entries keep the order of first occurrence; inserting an existing name
/// overwrites the value in place without moving it. Lookups are linear,
/// which is fine for the record counts these files carry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entries {
    entries: Vec<(String, Value)>,
}

impl Entries {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, overwriting in place if the name already exists.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        for (k, v) in &mut self.entries {
            if *k == name {
                *v = value;
                return;
            }
        }
        self.entries.push((name, value));
    }

    /// Get a value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Check if a name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over name-value pairs in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_insert_overwrites_in_place() {
        let mut e = Entries::new();
        e.insert("a", Value::Int32(1));
        e.insert("b", Value::Int32(2));
        e.insert("a", Value::Int32(3));

        assert_eq!(e.len(), 2);
        assert_eq!(e.get("a"), Some(&Value::Int32(3)));
        let order: Vec<&str> = e.iter().map(|(k, _)| k).collect();
        assert_eq!(order, ["a", "b"]);
    }

    #[test]
    fn test_pos_data_scaled() {
        let p = PosData {
            name: "pos".into(),
            unit: Unit {
                value: 0.5,
                unit: "micrometer".into(),
                symbol: "um".into(),
            },
            samples: vec![2.0, 4.0, 6.0],
        };
        assert_eq!(p.scaled(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Uint64(7).as_i64(), Some(7));
        assert_eq!(Value::Uint64(u64::MAX).as_i64(), None);
        assert_eq!(Value::Float32(1.5).as_f64(), Some(1.5));
        assert_eq!(Value::Boolean(true).as_f64(), None);
        assert_eq!(Value::String("x".into()).as_str(), Some("x"));
    }

    #[test]
    fn test_quantity_display() {
        let q = Quantity {
            value: 2.5,
            unit: "nanometer".into(),
            symbol: "nm".into(),
        };
        assert_eq!(q.to_string(), "2.5 nanometer (nm)");
    }
}
