use crate::schema::db;

/// Describes what the target database supports.
#[derive(Debug, Clone)]
pub struct Capability {
    /// Column storage types supported by the database
    pub storage_types: StorageTypes,

    /// Maximum length of an identifier. Generated constraint names longer
    /// than this are truncated.
    pub max_identifier_length: usize,

    /// When false, runtime accessors that need to be generated on the fly
    /// (see [`Schema::column_accessors`](crate::Schema::column_accessors))
    /// are unavailable.
    pub dynamic_code: bool,
}

#[derive(Debug, Clone)]
pub struct StorageTypes {
    /// The default storage type for a string.
    pub default_string_type: db::Type,

    /// The default storage type for a decimal.
    pub default_decimal_type: db::Type,

    /// The default storage type for a UUID.
    pub default_uuid_type: db::Type,

    /// The default storage type for a civil date-time.
    pub default_datetime_type: db::Type,

    /// When `Some` the database supports varchar types with the specified upper
    /// limit.
    pub varchar: Option<u64>,
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        storage_types: StorageTypes::SQLITE,
        max_identifier_length: 128,
        dynamic_code: true,
    };

    /// PostgreSQL capabilities
    pub const POSTGRESQL: Self = Self {
        storage_types: StorageTypes::POSTGRESQL,
        max_identifier_length: 63,
        ..Self::SQLITE
    };

    /// MySQL capabilities
    pub const MYSQL: Self = Self {
        storage_types: StorageTypes::MYSQL,
        max_identifier_length: 64,
        ..Self::SQLITE
    };

    /// SQL Server capabilities
    pub const SQLSERVER: Self = Self {
        storage_types: StorageTypes::SQLSERVER,
        max_identifier_length: 128,
        ..Self::SQLITE
    };
}

impl Default for Capability {
    fn default() -> Self {
        Self::SQLITE
    }
}

impl StorageTypes {
    /// SQLite storage types
    pub const SQLITE: StorageTypes = StorageTypes {
        default_string_type: db::Type::Text,
        default_decimal_type: db::Type::Text,
        default_uuid_type: db::Type::Blob,
        default_datetime_type: db::Type::Text,

        // SQLite ignores the length in VARCHAR(N); the only hard limit is
        // SQLITE_MAX_LENGTH, one billion by default.
        varchar: Some(1_000_000_000),
    };

    pub const POSTGRESQL: StorageTypes = StorageTypes {
        default_string_type: db::Type::Text,
        default_decimal_type: db::Type::Numeric(None),
        default_uuid_type: db::Type::Uuid,
        default_datetime_type: db::Type::DateTime(6),
        varchar: Some(10_485_760),
    };

    pub const MYSQL: StorageTypes = StorageTypes {
        default_string_type: db::Type::VarChar(191),
        default_decimal_type: db::Type::Numeric(Some((65, 30))),
        default_uuid_type: db::Type::Binary(16),
        default_datetime_type: db::Type::DateTime(6),

        // The effective maximum also depends on the row size and charset.
        varchar: Some(65_535),
    };

    pub const SQLSERVER: StorageTypes = StorageTypes {
        default_string_type: db::Type::VarChar(4000),
        default_decimal_type: db::Type::Numeric(Some((18, 2))),
        default_uuid_type: db::Type::Uuid,
        default_datetime_type: db::Type::DateTime(7),
        varchar: Some(8_000),
    };
}
