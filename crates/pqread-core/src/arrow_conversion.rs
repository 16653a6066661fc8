//! Conversion from Arrow arrays and schemas into records and the core schema
//!
//! The decoder hands back Arrow `RecordBatch`es. This module turns a single
//! row of a batch into a [`Record`], and an Arrow schema into a [`Schema`].

use crate::{Error, PrimitiveType, Record, Result, Schema, SchemaNode, Value};
use arrow_array::types::{
    ArrowDictionaryKeyType, Int16Type, Int32Type, Int64Type, Int8Type, UInt16Type, UInt32Type,
    UInt64Type, UInt8Type,
};
use arrow_array::{
    Array, DictionaryArray, FixedSizeListArray, LargeListArray, ListArray, MapArray, RecordBatch,
    StructArray,
};
use arrow_schema::{DataType, Field, IntervalUnit, TimeUnit};
use bytes::Bytes;
use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use std::sync::Arc;

/// Convert a single value from an Arrow array at the given index to a Value
pub fn arrow_to_value(array: &dyn Array, index: usize) -> Result<Value> {
    use arrow_array::*;

    // A NullArray carries no validity buffer, so `is_null` reports false
    if array.data_type() == &DataType::Null || array.is_null(index) {
        return Ok(Value::Null);
    }

    match array.data_type() {
        // Primitive types
        DataType::Boolean => {
            let array = downcast_array::<BooleanArray>(array)?;
            Ok(Value::Boolean(array.value(index)))
        }
        DataType::Int8 => {
            let array = downcast_array::<Int8Array>(array)?;
            Ok(Value::Int8(array.value(index)))
        }
        DataType::Int16 => {
            let array = downcast_array::<Int16Array>(array)?;
            Ok(Value::Int16(array.value(index)))
        }
        DataType::Int32 => {
            let array = downcast_array::<Int32Array>(array)?;
            Ok(Value::Int32(array.value(index)))
        }
        DataType::Int64 => {
            let array = downcast_array::<Int64Array>(array)?;
            Ok(Value::Int64(array.value(index)))
        }
        DataType::UInt8 => {
            let array = downcast_array::<UInt8Array>(array)?;
            Ok(Value::UInt8(array.value(index)))
        }
        DataType::UInt16 => {
            let array = downcast_array::<UInt16Array>(array)?;
            Ok(Value::UInt16(array.value(index)))
        }
        DataType::UInt32 => {
            let array = downcast_array::<UInt32Array>(array)?;
            Ok(Value::UInt32(array.value(index)))
        }
        DataType::UInt64 => {
            let array = downcast_array::<UInt64Array>(array)?;
            Ok(Value::UInt64(array.value(index)))
        }
        DataType::Float16 => {
            let array = downcast_array::<Float16Array>(array)?;
            Ok(Value::Float16(OrderedFloat(array.value(index).to_f32())))
        }
        DataType::Float32 => {
            let array = downcast_array::<Float32Array>(array)?;
            Ok(Value::Float32(OrderedFloat(array.value(index))))
        }
        DataType::Float64 => {
            let array = downcast_array::<Float64Array>(array)?;
            Ok(Value::Float64(OrderedFloat(array.value(index))))
        }

        // String and binary types
        DataType::Utf8 => {
            let array = downcast_array::<StringArray>(array)?;
            Ok(Value::String(Arc::from(array.value(index))))
        }
        DataType::LargeUtf8 => {
            let array = downcast_array::<LargeStringArray>(array)?;
            Ok(Value::String(Arc::from(array.value(index))))
        }
        DataType::Utf8View => {
            let array = downcast_array::<StringViewArray>(array)?;
            Ok(Value::String(Arc::from(array.value(index))))
        }
        DataType::Binary => {
            let array = downcast_array::<BinaryArray>(array)?;
            Ok(Value::Bytes(Bytes::copy_from_slice(array.value(index))))
        }
        DataType::LargeBinary => {
            let array = downcast_array::<LargeBinaryArray>(array)?;
            Ok(Value::Bytes(Bytes::copy_from_slice(array.value(index))))
        }
        DataType::BinaryView => {
            let array = downcast_array::<BinaryViewArray>(array)?;
            Ok(Value::Bytes(Bytes::copy_from_slice(array.value(index))))
        }
        DataType::FixedSizeBinary(_) => {
            let array = downcast_array::<FixedSizeBinaryArray>(array)?;
            Ok(Value::Bytes(Bytes::copy_from_slice(array.value(index))))
        }

        // Date and time types
        DataType::Date32 => {
            let array = downcast_array::<Date32Array>(array)?;
            Ok(Value::Date32(array.value(index)))
        }
        DataType::Date64 => {
            let array = downcast_array::<Date64Array>(array)?;
            Ok(Value::Date64(array.value(index)))
        }
        DataType::Timestamp(unit, timezone) => {
            let timezone = timezone.as_ref().map(|s| Arc::from(s.as_ref()));
            match unit {
                TimeUnit::Second => {
                    let array = downcast_array::<TimestampSecondArray>(array)?;
                    Ok(Value::TimestampSecond(array.value(index), timezone))
                }
                TimeUnit::Millisecond => {
                    let array = downcast_array::<TimestampMillisecondArray>(array)?;
                    Ok(Value::TimestampMillis(array.value(index), timezone))
                }
                TimeUnit::Microsecond => {
                    let array = downcast_array::<TimestampMicrosecondArray>(array)?;
                    Ok(Value::TimestampMicros(array.value(index), timezone))
                }
                TimeUnit::Nanosecond => {
                    let array = downcast_array::<TimestampNanosecondArray>(array)?;
                    Ok(Value::TimestampNanos(array.value(index), timezone))
                }
            }
        }
        DataType::Time32(unit) => match unit {
            TimeUnit::Second => {
                let array = downcast_array::<Time32SecondArray>(array)?;
                Ok(Value::TimeSecond(array.value(index)))
            }
            TimeUnit::Millisecond => {
                let array = downcast_array::<Time32MillisecondArray>(array)?;
                Ok(Value::TimeMillis(array.value(index)))
            }
            _ => Err(Error::conversion(format!(
                "Unsupported time32 unit: {:?}",
                unit
            ))),
        },
        DataType::Time64(unit) => match unit {
            TimeUnit::Microsecond => {
                let array = downcast_array::<Time64MicrosecondArray>(array)?;
                Ok(Value::TimeMicros(array.value(index)))
            }
            TimeUnit::Nanosecond => {
                let array = downcast_array::<Time64NanosecondArray>(array)?;
                Ok(Value::TimeNanos(array.value(index)))
            }
            _ => Err(Error::conversion(format!(
                "Unsupported time64 unit: {:?}",
                unit
            ))),
        },

        DataType::Duration(unit) => match unit {
            TimeUnit::Second => {
                let array = downcast_array::<DurationSecondArray>(array)?;
                Ok(Value::DurationSecond(array.value(index)))
            }
            TimeUnit::Millisecond => {
                let array = downcast_array::<DurationMillisecondArray>(array)?;
                Ok(Value::DurationMillis(array.value(index)))
            }
            TimeUnit::Microsecond => {
                let array = downcast_array::<DurationMicrosecondArray>(array)?;
                Ok(Value::DurationMicros(array.value(index)))
            }
            TimeUnit::Nanosecond => {
                let array = downcast_array::<DurationNanosecondArray>(array)?;
                Ok(Value::DurationNanos(array.value(index)))
            }
        },
        DataType::Interval(unit) => match unit {
            IntervalUnit::YearMonth => {
                let array = downcast_array::<IntervalYearMonthArray>(array)?;
                Ok(Value::IntervalYearMonth(array.value(index)))
            }
            IntervalUnit::DayTime => {
                let array = downcast_array::<IntervalDayTimeArray>(array)?;
                let interval = array.value(index);
                Ok(Value::IntervalDayTime(interval.days, interval.milliseconds))
            }
            IntervalUnit::MonthDayNano => {
                let array = downcast_array::<IntervalMonthDayNanoArray>(array)?;
                let interval = array.value(index);
                Ok(Value::IntervalMonthDayNano(
                    interval.months,
                    interval.days,
                    interval.nanoseconds,
                ))
            }
        },

        // Decimal types
        DataType::Decimal128(_precision, scale) => {
            let array = downcast_array::<Decimal128Array>(array)?;
            Ok(Value::Decimal128(array.value(index), *scale))
        }
        DataType::Decimal256(_precision, scale) => {
            let array = downcast_array::<Decimal256Array>(array)?;
            let bytes = array.value(index).to_le_bytes();
            Ok(Value::Decimal256(
                num::BigInt::from_signed_bytes_le(&bytes),
                *scale,
            ))
        }

        // Complex types
        DataType::List(_) => {
            let array = downcast_array::<ListArray>(array)?;
            list_values(array.value(index).as_ref())
        }
        DataType::LargeList(_) => {
            let array = downcast_array::<LargeListArray>(array)?;
            list_values(array.value(index).as_ref())
        }
        DataType::FixedSizeList(_, _) => {
            let array = downcast_array::<FixedSizeListArray>(array)?;
            list_values(array.value(index).as_ref())
        }
        DataType::Map(_, _) => {
            let array = downcast_array::<MapArray>(array)?;
            let entries = array.value(index);

            // Entries are a struct of (key, value) columns
            let keys = entries.column(0);
            let values = entries.column(1);

            let mut map = Vec::with_capacity(keys.len());
            for i in 0..keys.len() {
                map.push((arrow_to_value(keys, i)?, arrow_to_value(values, i)?));
            }

            Ok(Value::Map(map))
        }
        DataType::Struct(_) => {
            let array = downcast_array::<StructArray>(array)?;

            let mut fields = IndexMap::with_capacity(array.num_columns());
            for (col_idx, field) in array.fields().iter().enumerate() {
                let value = arrow_to_value(array.column(col_idx), index)?;
                fields.insert(Arc::from(field.name().as_str()), value);
            }

            Ok(Value::Struct(fields))
        }
        DataType::Dictionary(key_type, _) => match key_type.as_ref() {
            DataType::Int8 => dictionary_value::<Int8Type>(array, index),
            DataType::Int16 => dictionary_value::<Int16Type>(array, index),
            DataType::Int32 => dictionary_value::<Int32Type>(array, index),
            DataType::Int64 => dictionary_value::<Int64Type>(array, index),
            DataType::UInt8 => dictionary_value::<UInt8Type>(array, index),
            DataType::UInt16 => dictionary_value::<UInt16Type>(array, index),
            DataType::UInt32 => dictionary_value::<UInt32Type>(array, index),
            DataType::UInt64 => dictionary_value::<UInt64Type>(array, index),
            kt => Err(Error::conversion(format!(
                "Unsupported dictionary key type: {:?}",
                kt
            ))),
        },

        dt => Err(Error::conversion(format!(
            "Unsupported data type for conversion: {:?}",
            dt
        ))),
    }
}

/// Convert one row of a batch into a record keyed by the batch's field names
pub fn record_from_batch(batch: &RecordBatch, row: usize) -> Result<Record> {
    let schema = batch.schema();
    let mut record = Record::with_capacity(batch.num_columns());

    for (field, column) in schema.fields().iter().zip(batch.columns()) {
        let value = arrow_to_value(column.as_ref(), row)?;
        record.insert(field.name().as_str(), value);
    }

    Ok(record)
}

/// Build the core schema from the Arrow schema the decoder resolved
pub fn arrow_schema_to_schema(schema: &arrow_schema::Schema) -> Result<Schema> {
    let fields = schema
        .fields()
        .iter()
        .map(|f| arrow_field_to_schema_node(f))
        .collect::<Result<Vec<_>>>()?;

    Ok(Schema {
        root: SchemaNode::Struct {
            name: "root".to_string(),
            nullable: false,
            fields,
        },
    })
}

/// Map a single Arrow field to a schema node
pub fn arrow_field_to_schema_node(field: &Field) -> Result<SchemaNode> {
    let name = field.name().to_string();
    let nullable = field.is_nullable();

    let primitive_type = match field.data_type() {
        DataType::Struct(children) => {
            let fields = children
                .iter()
                .map(|f| arrow_field_to_schema_node(f))
                .collect::<Result<Vec<_>>>()?;
            return Ok(SchemaNode::Struct {
                name,
                nullable,
                fields,
            });
        }
        DataType::List(item) | DataType::LargeList(item) | DataType::FixedSizeList(item, _) => {
            return Ok(SchemaNode::List {
                name,
                nullable,
                item: Box::new(arrow_field_to_schema_node(item)?),
            });
        }
        DataType::Map(entries, _) => {
            let DataType::Struct(kv) = entries.data_type() else {
                return Err(Error::conversion(format!(
                    "Map field '{}' has non-struct entries: {:?}",
                    name,
                    entries.data_type()
                )));
            };
            if kv.len() != 2 {
                return Err(Error::conversion(format!(
                    "Map field '{}' must have exactly 2 entry fields, found {}",
                    name,
                    kv.len()
                )));
            }
            return Ok(SchemaNode::Map {
                name,
                nullable,
                key: Box::new(arrow_field_to_schema_node(&kv[0])?),
                value: Box::new(arrow_field_to_schema_node(&kv[1])?),
            });
        }
        DataType::Dictionary(_, value_type) => {
            let inner = Field::new(field.name(), value_type.as_ref().clone(), nullable);
            return arrow_field_to_schema_node(&inner);
        }
        dt => arrow_type_to_primitive(dt).ok_or_else(|| {
            Error::conversion(format!(
                "Unsupported data type for field '{}': {:?}",
                name, dt
            ))
        })?,
    };

    Ok(SchemaNode::Primitive {
        name,
        primitive_type,
        nullable,
    })
}

fn arrow_type_to_primitive(data_type: &DataType) -> Option<PrimitiveType> {
    let tz = |tz: &Option<Arc<str>>| tz.clone();
    Some(match data_type {
        DataType::Null => PrimitiveType::Null,
        DataType::Boolean => PrimitiveType::Boolean,
        DataType::Int8 => PrimitiveType::Int8,
        DataType::Int16 => PrimitiveType::Int16,
        DataType::Int32 => PrimitiveType::Int32,
        DataType::Int64 => PrimitiveType::Int64,
        DataType::UInt8 => PrimitiveType::UInt8,
        DataType::UInt16 => PrimitiveType::UInt16,
        DataType::UInt32 => PrimitiveType::UInt32,
        DataType::UInt64 => PrimitiveType::UInt64,
        DataType::Float16 => PrimitiveType::Float16,
        DataType::Float32 => PrimitiveType::Float32,
        DataType::Float64 => PrimitiveType::Float64,
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => PrimitiveType::String,
        DataType::Binary | DataType::LargeBinary | DataType::BinaryView => PrimitiveType::Binary,
        DataType::FixedSizeBinary(size) => PrimitiveType::FixedLenByteArray(*size),
        DataType::Date32 => PrimitiveType::Date32,
        DataType::Date64 => PrimitiveType::Date64,
        DataType::Timestamp(TimeUnit::Second, z) => PrimitiveType::TimestampSecond(tz(z)),
        DataType::Timestamp(TimeUnit::Millisecond, z) => PrimitiveType::TimestampMillis(tz(z)),
        DataType::Timestamp(TimeUnit::Microsecond, z) => PrimitiveType::TimestampMicros(tz(z)),
        DataType::Timestamp(TimeUnit::Nanosecond, z) => PrimitiveType::TimestampNanos(tz(z)),
        DataType::Time32(TimeUnit::Second) => PrimitiveType::TimeSecond,
        DataType::Time32(TimeUnit::Millisecond) => PrimitiveType::TimeMillis,
        DataType::Time64(TimeUnit::Microsecond) => PrimitiveType::TimeMicros,
        DataType::Time64(TimeUnit::Nanosecond) => PrimitiveType::TimeNanos,
        DataType::Duration(TimeUnit::Second) => PrimitiveType::DurationSecond,
        DataType::Duration(TimeUnit::Millisecond) => PrimitiveType::DurationMillis,
        DataType::Duration(TimeUnit::Microsecond) => PrimitiveType::DurationMicros,
        DataType::Duration(TimeUnit::Nanosecond) => PrimitiveType::DurationNanos,
        DataType::Interval(IntervalUnit::YearMonth) => PrimitiveType::IntervalYearMonth,
        DataType::Interval(IntervalUnit::DayTime) => PrimitiveType::IntervalDayTime,
        DataType::Interval(IntervalUnit::MonthDayNano) => PrimitiveType::IntervalMonthDayNano,
        DataType::Decimal128(precision, scale) => PrimitiveType::Decimal128(*precision, *scale),
        DataType::Decimal256(precision, scale) => PrimitiveType::Decimal256(*precision, *scale),
        _ => return None,
    })
}

fn list_values(items: &dyn Array) -> Result<Value> {
    let mut values = Vec::with_capacity(items.len());
    for i in 0..items.len() {
        values.push(arrow_to_value(items, i)?);
    }
    Ok(Value::List(values))
}

fn dictionary_value<K: ArrowDictionaryKeyType>(array: &dyn Array, index: usize) -> Result<Value> {
    let dict = downcast_array::<DictionaryArray<K>>(array)?;
    match dict.key(index) {
        Some(key) => arrow_to_value(dict.values().as_ref(), key),
        None => Ok(Value::Null),
    }
}

/// Helper function to downcast an array with better error messages
fn downcast_array<T: 'static>(array: &dyn Array) -> Result<&T> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        Error::conversion(format!("Failed to cast to {}", std::any::type_name::<T>()))
    })
}
