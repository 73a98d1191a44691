use crate::{driver, schema::app, Result};
use std::fmt;

/// Database-level storage types.
///
/// These are the types that appear in `CREATE TABLE` statements. The mapping
/// from an [`app::Type`] happens through a
/// [`TypeMappingSource`](crate::driver::TypeMappingSource), which defaults to
/// [`Type::from_app`] with the driver's [`StorageTypes`](driver::StorageTypes).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Type {
    /// A boolean value
    Boolean,

    /// A signed integer of `n` bytes
    Integer(u8),

    /// Unconstrained text type
    Text,

    /// Text type with an explicit maximum length
    VarChar(u64),

    /// 128-bit universally unique identifier (UUID)
    Uuid,

    /// Decimal number with optional precision and scale.
    /// - `None`: Arbitrary-precision decimal
    /// - `Some((precision, scale))`: Fixed precision and scale
    Numeric(Option<(u32, u32)>),

    /// Unconstrained binary type
    Blob,

    /// Fixed-size binary type of `n` bytes
    Binary(u8),

    /// A civil datetime with fractional seconds precision (0-9 digits).
    DateTime(u8),

    /// User-specified unrecognized type
    Custom(String),
}

impl Type {
    /// Maps an application-level type to a database-level storage type.
    pub fn from_app(
        ty: &app::Type,
        hint: Option<&Type>,
        db: &driver::StorageTypes,
    ) -> Result<Type> {
        match hint {
            Some(ty) => Ok(ty.clone()),
            None => Ok(match ty {
                app::Type::Bool => Type::Boolean,
                app::Type::I16 => Type::Integer(2),
                app::Type::I32 => Type::Integer(4),
                app::Type::I64 => Type::Integer(8),
                app::Type::String => db.default_string_type.clone(),
                app::Type::Decimal => db.default_decimal_type.clone(),
                app::Type::Uuid => db.default_uuid_type.clone(),
                app::Type::DateTime => db.default_datetime_type.clone(),
                app::Type::Bytes => Type::Blob,
            }),
        }
    }

    pub(crate) fn verify(&self, db: &driver::Capability) -> Result<()> {
        match *self {
            Type::VarChar(size) => match db.storage_types.varchar {
                Some(max) if size > max => Err(crate::Error::unsupported_feature(format!(
                    "VARCHAR({}) exceeds database maximum of {}",
                    size, max
                ))),
                None => Err(crate::Error::unsupported_feature(
                    "VARCHAR type is not supported by this database",
                )),
                _ => Ok(()),
            },
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Boolean => f.write_str("BOOLEAN"),
            Type::Integer(1 | 2) => f.write_str("SMALLINT"),
            Type::Integer(3 | 4) => f.write_str("INTEGER"),
            Type::Integer(_) => f.write_str("BIGINT"),
            Type::Text => f.write_str("TEXT"),
            Type::VarChar(size) => write!(f, "VARCHAR({size})"),
            Type::Uuid => f.write_str("UUID"),
            Type::Numeric(None) => f.write_str("NUMERIC"),
            Type::Numeric(Some((precision, scale))) => write!(f, "NUMERIC({precision}, {scale})"),
            Type::Blob => f.write_str("BLOB"),
            Type::Binary(size) => write!(f, "BINARY({size})"),
            Type::DateTime(precision) => write!(f, "DATETIME({precision})"),
            Type::Custom(custom) => f.write_str(custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Capability;

    #[test]
    fn hint_wins() {
        let ty = Type::from_app(
            &app::Type::String,
            Some(&Type::VarChar(50)),
            &driver::StorageTypes::POSTGRESQL,
        )
        .unwrap();
        assert_eq!(ty, Type::VarChar(50));
    }

    #[test]
    fn defaults_follow_the_database() {
        let string = &app::Type::String;
        assert_eq!(
            Type::from_app(string, None, &driver::StorageTypes::SQLITE).unwrap(),
            Type::Text
        );
        assert_eq!(
            Type::from_app(string, None, &driver::StorageTypes::MYSQL).unwrap(),
            Type::VarChar(191)
        );
    }

    #[test]
    fn varchar_limit() {
        let err = Type::VarChar(70_000).verify(&Capability::MYSQL).unwrap_err();
        assert!(err.is_unsupported_feature());
        assert!(Type::VarChar(70_000).verify(&Capability::POSTGRESQL).is_ok());
    }

    #[test]
    fn display() {
        assert_eq!(Type::Integer(4).to_string(), "INTEGER");
        assert_eq!(Type::Numeric(Some((18, 2))).to_string(), "NUMERIC(18, 2)");
        assert_eq!(Type::Custom("money".into()).to_string(), "money");
    }
}
