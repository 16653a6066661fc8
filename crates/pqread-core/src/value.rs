use bytes::Bytes;
use indexmap::IndexMap;
use num::BigInt;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A single decoded cell, typed by the column it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    // Numeric types
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float16(ordered_float::OrderedFloat<f32>), // f16 widened to f32
    Float32(ordered_float::OrderedFloat<f32>),
    Float64(ordered_float::OrderedFloat<f64>),

    // Basic types
    Boolean(bool),
    String(Arc<str>),
    Bytes(Bytes),

    // Date/Time types
    Date32(i32), // Days since epoch
    Date64(i64), // Milliseconds since epoch

    // Decimal types
    Decimal128(i128, i8),   // value, scale
    Decimal256(BigInt, i8), // value, scale

    // Timestamp types with optional timezone
    TimestampSecond(i64, Option<Arc<str>>),
    TimestampMillis(i64, Option<Arc<str>>),
    TimestampMicros(i64, Option<Arc<str>>),
    TimestampNanos(i64, Option<Arc<str>>),

    // Time of day since midnight
    TimeSecond(i32),
    TimeMillis(i32),
    TimeMicros(i64),
    TimeNanos(i64),

    // Elapsed time in a fixed unit
    DurationSecond(i64),
    DurationMillis(i64),
    DurationMicros(i64),
    DurationNanos(i64),

    // Calendar intervals
    IntervalYearMonth(i32),              // months
    IntervalDayTime(i32, i32),           // days, milliseconds
    IntervalMonthDayNano(i32, i32, i64), // months, days, nanoseconds

    // Complex types
    List(Vec<Value>),
    Map(Vec<(Value, Value)>), // entries in file order
    Struct(IndexMap<Arc<str>, Value>),

    Null,
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Int8(i) => i.hash(state),
            Value::Int16(i) => i.hash(state),
            Value::Int32(i) => i.hash(state),
            Value::Int64(i) => i.hash(state),
            Value::UInt8(i) => i.hash(state),
            Value::UInt16(i) => i.hash(state),
            Value::UInt32(i) => i.hash(state),
            Value::UInt64(i) => i.hash(state),
            Value::Float16(f) | Value::Float32(f) => f.hash(state),
            Value::Float64(f) => f.hash(state),
            Value::Boolean(b) => b.hash(state),
            Value::String(s) => s.hash(state),
            Value::Bytes(b) => b.hash(state),
            Value::Date32(d) => d.hash(state),
            Value::Date64(d) => d.hash(state),
            Value::Decimal128(d, scale) => {
                d.hash(state);
                scale.hash(state);
            }
            Value::Decimal256(d, scale) => {
                d.hash(state);
                scale.hash(state);
            }
            Value::TimestampSecond(ts, tz)
            | Value::TimestampMillis(ts, tz)
            | Value::TimestampMicros(ts, tz)
            | Value::TimestampNanos(ts, tz) => {
                ts.hash(state);
                tz.hash(state);
            }
            Value::TimeSecond(t) | Value::TimeMillis(t) => t.hash(state),
            Value::TimeMicros(t) | Value::TimeNanos(t) => t.hash(state),
            Value::DurationSecond(d)
            | Value::DurationMillis(d)
            | Value::DurationMicros(d)
            | Value::DurationNanos(d) => d.hash(state),
            Value::IntervalYearMonth(m) => m.hash(state),
            Value::IntervalDayTime(days, millis) => {
                days.hash(state);
                millis.hash(state);
            }
            Value::IntervalMonthDayNano(months, days, nanos) => {
                months.hash(state);
                days.hash(state);
                nanos.hash(state);
            }
            Value::List(l) => l.hash(state),
            Value::Map(m) => m.hash(state),
            Value::Struct(fields) => {
                // IndexMap iterates in insertion order
                for (k, v) in fields {
                    k.hash(state);
                    v.hash(state);
                }
            }
            Value::Null => 0_i32.hash(state),
        }
    }
}

impl Value {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the type name of the value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int8(_) => "Int8",
            Value::Int16(_) => "Int16",
            Value::Int32(_) => "Int32",
            Value::Int64(_) => "Int64",
            Value::UInt8(_) => "UInt8",
            Value::UInt16(_) => "UInt16",
            Value::UInt32(_) => "UInt32",
            Value::UInt64(_) => "UInt64",
            Value::Float16(_) => "Float16",
            Value::Float32(_) => "Float32",
            Value::Float64(_) => "Float64",
            Value::Boolean(_) => "Boolean",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::Date32(_) => "Date32",
            Value::Date64(_) => "Date64",
            Value::Decimal128(_, _) => "Decimal128",
            Value::Decimal256(_, _) => "Decimal256",
            Value::TimestampSecond(_, _) => "TimestampSecond",
            Value::TimestampMillis(_, _) => "TimestampMillis",
            Value::TimestampMicros(_, _) => "TimestampMicros",
            Value::TimestampNanos(_, _) => "TimestampNanos",
            Value::TimeSecond(_) => "TimeSecond",
            Value::TimeMillis(_) => "TimeMillis",
            Value::TimeMicros(_) => "TimeMicros",
            Value::TimeNanos(_) => "TimeNanos",
            Value::DurationSecond(_) => "DurationSecond",
            Value::DurationMillis(_) => "DurationMillis",
            Value::DurationMicros(_) => "DurationMicros",
            Value::DurationNanos(_) => "DurationNanos",
            Value::IntervalYearMonth(_) => "IntervalYearMonth",
            Value::IntervalDayTime(_, _) => "IntervalDayTime",
            Value::IntervalMonthDayNano(_, _, _) => "IntervalMonthDayNano",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
            Value::Struct(_) => "Struct",
            Value::Null => "Null",
        }
    }

    /// Widen any integer variant to i64, if it fits
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int8(i) => Some(*i as i64),
            Value::Int16(i) => Some(*i as i64),
            Value::Int32(i) => Some(*i as i64),
            Value::Int64(i) => Some(*i),
            Value::UInt8(i) => Some(*i as i64),
            Value::UInt16(i) => Some(*i as i64),
            Value::UInt32(i) => Some(*i as i64),
            Value::UInt64(i) => i64::try_from(*i).ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_ref()),
            _ => None,
        }
    }
}

/// Render an unscaled decimal digit string with `scale` fractional digits
fn format_decimal(unscaled: String, scale: i8) -> String {
    if scale <= 0 {
        let zeros = "0".repeat(scale.unsigned_abs() as usize);
        return if unscaled == "0" {
            unscaled
        } else {
            format!("{unscaled}{zeros}")
        };
    }

    let (sign, digits) = match unscaled.strip_prefix('-') {
        Some(rest) => ("-", rest.to_string()),
        None => ("", unscaled),
    };
    let scale = scale as usize;
    let digits = if digits.len() <= scale {
        format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
    } else {
        digits
    };
    let (int_part, frac_part) = digits.split_at(digits.len() - scale);
    format!("{sign}{int_part}.{frac_part}")
}

fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    f.write_str("0x")?;
    for b in bytes {
        write!(f, "{b:02x}")?;
    }
    Ok(())
}

fn write_timestamp(f: &mut fmt::Formatter<'_>, ts: i64, tz: &Option<Arc<str>>) -> fmt::Result {
    match tz {
        Some(tz) => write!(f, "{ts} {tz}"),
        None => write!(f, "{ts}"),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int8(i) => write!(f, "{i}"),
            Value::Int16(i) => write!(f, "{i}"),
            Value::Int32(i) => write!(f, "{i}"),
            Value::Int64(i) => write!(f, "{i}"),
            Value::UInt8(i) => write!(f, "{i}"),
            Value::UInt16(i) => write!(f, "{i}"),
            Value::UInt32(i) => write!(f, "{i}"),
            Value::UInt64(i) => write!(f, "{i}"),
            Value::Float16(v) | Value::Float32(v) => write!(f, "{}", v.0),
            Value::Float64(v) => write!(f, "{}", v.0),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::String(s) => write!(f, "{:?}", s.as_ref()),
            Value::Bytes(b) => write_hex(f, b),
            Value::Date32(d) => write!(f, "{d}"),
            Value::Date64(d) => write!(f, "{d}"),
            Value::Decimal128(v, scale) => f.write_str(&format_decimal(v.to_string(), *scale)),
            Value::Decimal256(v, scale) => f.write_str(&format_decimal(v.to_string(), *scale)),
            Value::TimestampSecond(ts, tz)
            | Value::TimestampMillis(ts, tz)
            | Value::TimestampMicros(ts, tz)
            | Value::TimestampNanos(ts, tz) => write_timestamp(f, *ts, tz),
            Value::TimeSecond(t) | Value::TimeMillis(t) => write!(f, "{t}"),
            Value::TimeMicros(t) | Value::TimeNanos(t) => write!(f, "{t}"),
            Value::DurationSecond(d) => write!(f, "{d}s"),
            Value::DurationMillis(d) => write!(f, "{d}ms"),
            Value::DurationMicros(d) => write!(f, "{d}us"),
            Value::DurationNanos(d) => write!(f, "{d}ns"),
            Value::IntervalYearMonth(m) => write!(f, "{m} months"),
            Value::IntervalDayTime(days, millis) => write!(f, "{days} days {millis} ms"),
            Value::IntervalMonthDayNano(months, days, nanos) => {
                write!(f, "{months} months {days} days {nanos} ns")
            }
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Value::Struct(fields) => {
                f.write_str("{")?;
                for (i, (k, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Value::Null => f.write_str("null"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Int8(i) => serializer.serialize_i8(*i),
            Value::Int16(i) => serializer.serialize_i16(*i),
            Value::Int32(i) => serializer.serialize_i32(*i),
            Value::Int64(i) => serializer.serialize_i64(*i),
            Value::UInt8(i) => serializer.serialize_u8(*i),
            Value::UInt16(i) => serializer.serialize_u16(*i),
            Value::UInt32(i) => serializer.serialize_u32(*i),
            Value::UInt64(i) => serializer.serialize_u64(*i),
            Value::Float16(v) | Value::Float32(v) => serializer.serialize_f32(v.0),
            Value::Float64(v) => serializer.serialize_f64(v.0),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::String(s) => serializer.serialize_str(s),
            Value::Bytes(b) => serializer.serialize_bytes(b),
            Value::Date32(d) => serializer.serialize_i32(*d),
            Value::Date64(d) => serializer.serialize_i64(*d),
            // Decimals go out as strings so no precision is lost
            Value::Decimal128(v, scale) => {
                serializer.serialize_str(&format_decimal(v.to_string(), *scale))
            }
            Value::Decimal256(v, scale) => {
                serializer.serialize_str(&format_decimal(v.to_string(), *scale))
            }
            Value::TimestampSecond(ts, _)
            | Value::TimestampMillis(ts, _)
            | Value::TimestampMicros(ts, _)
            | Value::TimestampNanos(ts, _) => serializer.serialize_i64(*ts),
            Value::TimeSecond(t) | Value::TimeMillis(t) => serializer.serialize_i32(*t),
            Value::TimeMicros(t) | Value::TimeNanos(t) => serializer.serialize_i64(*t),
            Value::DurationSecond(d)
            | Value::DurationMillis(d)
            | Value::DurationMicros(d)
            | Value::DurationNanos(d) => serializer.serialize_i64(*d),
            Value::IntervalYearMonth(m) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("months", m)?;
                map.end()
            }
            Value::IntervalDayTime(days, millis) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("days", days)?;
                map.serialize_entry("milliseconds", millis)?;
                map.end()
            }
            Value::IntervalMonthDayNano(months, days, nanos) => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("months", months)?;
                map.serialize_entry("days", days)?;
                map.serialize_entry("nanoseconds", nanos)?;
                map.end()
            }
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                // Keys are arbitrary values, so emit [key, value] pairs
                let mut seq = serializer.serialize_seq(Some(entries.len()))?;
                for entry in entries {
                    seq.serialize_element(&(&entry.0, &entry.1))?;
                }
                seq.end()
            }
            Value::Struct(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (k, v) in fields {
                    map.serialize_entry(k.as_ref(), v)?;
                }
                map.end()
            }
            Value::Null => serializer.serialize_unit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordered_float::OrderedFloat;

    #[test]
    fn test_value_creation() {
        let v = Value::Int32(42);
        assert_eq!(v, Value::Int32(42));
        assert!(!v.is_null());
        assert_eq!(v.type_name(), "Int32");
        assert_eq!(v.as_i64(), Some(42));
    }

    #[test]
    fn test_null_value() {
        let v = Value::Null;
        assert!(v.is_null());
        assert_eq!(v.type_name(), "Null");
        assert_eq!(v.to_string(), "null");
    }

    #[test]
    fn test_float_equality() {
        let v1 = Value::Float32(OrderedFloat(3.5));
        let v2 = Value::Float32(OrderedFloat(3.5));
        assert_eq!(v1, v2);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::String(Arc::from("a\"b")).to_string(), "\"a\\\"b\"");
        assert_eq!(Value::Bytes(Bytes::from_static(&[0xde, 0xad])).to_string(), "0xdead");
        assert_eq!(
            Value::List(vec![Value::Int32(1), Value::Null]).to_string(),
            "[1, null]"
        );
        assert_eq!(
            Value::TimestampMillis(1000, Some(Arc::from("UTC"))).to_string(),
            "1000 UTC"
        );
        assert_eq!(Value::DurationMillis(1500).to_string(), "1500ms");
        assert_eq!(
            Value::IntervalDayTime(3, 500).to_string(),
            "3 days 500 ms"
        );
    }

    #[test]
    fn test_decimal_formatting() {
        assert_eq!(Value::Decimal128(12345, 2).to_string(), "123.45");
        assert_eq!(Value::Decimal128(-5, 3).to_string(), "-0.005");
        assert_eq!(Value::Decimal128(0, 2).to_string(), "0.00");
        assert_eq!(Value::Decimal128(12, -2).to_string(), "1200");
        assert_eq!(
            Value::Decimal256(BigInt::from(-123456789), 4).to_string(),
            "-12345.6789"
        );
    }

    #[test]
    fn test_hash_consistency() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(Value::Int32(42));
        set.insert(Value::String(Arc::from("hello")));

        assert!(set.contains(&Value::Int32(42)));
        assert!(set.contains(&Value::String(Arc::from("hello"))));
        assert!(!set.contains(&Value::Int32(43)));
    }
}
