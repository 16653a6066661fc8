use std::sync::Arc;

/// Logical schema of a columnar file, decoded from its footer
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub root: SchemaNode,
}

/// Represents a node in the schema tree
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// A struct with named fields
    Struct {
        name: String,
        nullable: bool,
        fields: Vec<SchemaNode>,
    },
    /// A list containing items of a single type
    List {
        name: String,
        nullable: bool,
        item: Box<SchemaNode>,
    },
    /// A map with key-value pairs
    Map {
        name: String,
        nullable: bool,
        key: Box<SchemaNode>,
        value: Box<SchemaNode>,
    },
    /// A primitive/leaf type
    Primitive {
        name: String,
        primitive_type: PrimitiveType,
        nullable: bool,
    },
}

/// Leaf types a column can decode to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    // Integer types
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,

    // Floating point types
    Float16,
    Float32,
    Float64,

    // Decimal types (precision, scale)
    Decimal128(u8, i8),
    Decimal256(u8, i8),

    // Other basic types
    Boolean,
    String,
    Binary,

    // Date/Time types
    Date32,
    Date64,
    TimestampSecond(Option<Arc<str>>),
    TimestampMillis(Option<Arc<str>>),
    TimestampMicros(Option<Arc<str>>),
    TimestampNanos(Option<Arc<str>>),
    TimeSecond,
    TimeMillis,
    TimeMicros,
    TimeNanos,

    // Elapsed time and calendar intervals
    DurationSecond,
    DurationMillis,
    DurationMicros,
    DurationNanos,
    IntervalYearMonth,
    IntervalDayTime,
    IntervalMonthDayNano,

    // Fixed-length byte array
    FixedLenByteArray(i32),

    /// Column with no physical values; every cell is null
    Null,
}

/// Represents how values are repeated in a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repetition {
    /// Field must have exactly one value
    Required,
    /// Field can have 0 or 1 value
    Optional,
    /// Field can have 0 or more values
    Repeated,
}

impl Schema {
    /// Top-level field descriptors, in file order
    pub fn fields(&self) -> &[SchemaNode] {
        match &self.root {
            SchemaNode::Struct { fields, .. } => fields,
            other => std::slice::from_ref(other),
        }
    }

    /// Top-level field names, in file order
    pub fn field_names(&self) -> Vec<&str> {
        self.fields().iter().map(SchemaNode::name).collect()
    }
}

impl SchemaNode {
    /// Get the name of this schema node
    pub fn name(&self) -> &str {
        match self {
            SchemaNode::Struct { name, .. } => name,
            SchemaNode::List { name, .. } => name,
            SchemaNode::Map { name, .. } => name,
            SchemaNode::Primitive { name, .. } => name,
        }
    }

    /// Check if this node is nullable
    pub fn is_nullable(&self) -> bool {
        match self {
            SchemaNode::Struct { nullable, .. } => *nullable,
            SchemaNode::List { nullable, .. } => *nullable,
            SchemaNode::Map { nullable, .. } => *nullable,
            SchemaNode::Primitive { nullable, .. } => *nullable,
        }
    }

    /// Lists repeat; everything else follows nullability
    pub fn repetition(&self) -> Repetition {
        match self {
            SchemaNode::List { .. } => Repetition::Repeated,
            _ if self.is_nullable() => Repetition::Optional,
            _ => Repetition::Required,
        }
    }

    /// Short type description, e.g. `Int64`, `List<String>`
    pub fn type_description(&self) -> String {
        match self {
            SchemaNode::Struct { .. } => "Struct".to_string(),
            SchemaNode::List { item, .. } => format!("List<{}>", item.type_description()),
            SchemaNode::Map { key, value, .. } => format!(
                "Map<{}, {}>",
                key.type_description(),
                value.type_description()
            ),
            SchemaNode::Primitive { primitive_type, .. } => primitive_type.type_name().to_string(),
        }
    }
}

impl PrimitiveType {
    /// Get the logical type name for display
    pub fn type_name(&self) -> &'static str {
        match self {
            PrimitiveType::Int8 => "Int8",
            PrimitiveType::Int16 => "Int16",
            PrimitiveType::Int32 => "Int32",
            PrimitiveType::Int64 => "Int64",
            PrimitiveType::UInt8 => "UInt8",
            PrimitiveType::UInt16 => "UInt16",
            PrimitiveType::UInt32 => "UInt32",
            PrimitiveType::UInt64 => "UInt64",
            PrimitiveType::Float16 => "Float16",
            PrimitiveType::Float32 => "Float32",
            PrimitiveType::Float64 => "Float64",
            PrimitiveType::Decimal128(_, _) => "Decimal128",
            PrimitiveType::Decimal256(_, _) => "Decimal256",
            PrimitiveType::Boolean => "Boolean",
            PrimitiveType::String => "String",
            PrimitiveType::Binary => "Binary",
            PrimitiveType::Date32 => "Date32",
            PrimitiveType::Date64 => "Date64",
            PrimitiveType::TimestampSecond(_) => "TimestampSecond",
            PrimitiveType::TimestampMillis(_) => "TimestampMillis",
            PrimitiveType::TimestampMicros(_) => "TimestampMicros",
            PrimitiveType::TimestampNanos(_) => "TimestampNanos",
            PrimitiveType::TimeSecond => "TimeSecond",
            PrimitiveType::TimeMillis => "TimeMillis",
            PrimitiveType::TimeMicros => "TimeMicros",
            PrimitiveType::TimeNanos => "TimeNanos",
            PrimitiveType::DurationSecond => "DurationSecond",
            PrimitiveType::DurationMillis => "DurationMillis",
            PrimitiveType::DurationMicros => "DurationMicros",
            PrimitiveType::DurationNanos => "DurationNanos",
            PrimitiveType::IntervalYearMonth => "IntervalYearMonth",
            PrimitiveType::IntervalDayTime => "IntervalDayTime",
            PrimitiveType::IntervalMonthDayNano => "IntervalMonthDayNano",
            PrimitiveType::FixedLenByteArray(_) => "FixedLenByteArray",
            PrimitiveType::Null => "Null",
        }
    }
}
