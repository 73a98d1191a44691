use std::fmt;

/// Application-level value types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Type {
    Bool,
    I16,
    I32,
    I64,
    String,
    Decimal,
    Uuid,
    DateTime,
    Bytes,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Type::Bool => "bool",
            Type::I16 => "i16",
            Type::I32 => "i32",
            Type::I64 => "i64",
            Type::String => "string",
            Type::Decimal => "decimal",
            Type::Uuid => "uuid",
            Type::DateTime => "datetime",
            Type::Bytes => "bytes",
        })
    }
}
