use super::Error;

/// Error when two logical keys map to the same key name on a table but use
/// different columns.
#[derive(Debug)]
pub(super) struct DuplicateKey {
    first: Box<str>,
    first_entity_type: Box<str>,
    second: Box<str>,
    second_entity_type: Box<str>,
    table: Box<str>,
    name: Box<str>,
    first_columns: Box<str>,
    second_columns: Box<str>,
}

impl std::error::Error for DuplicateKey {}

impl core::fmt::Display for DuplicateKey {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "duplicate key: the keys {} on '{}' and {} on '{}' are both mapped to '{}.{}' but use different columns ({} and {})",
            self.first,
            self.first_entity_type,
            self.second,
            self.second_entity_type,
            self.table,
            self.name,
            self.first_columns,
            self.second_columns,
        )
    }
}

impl Error {
    /// Creates a duplicate key error.
    #[allow(clippy::too_many_arguments)]
    pub fn duplicate_key(
        first: impl Into<String>,
        first_entity_type: impl Into<String>,
        second: impl Into<String>,
        second_entity_type: impl Into<String>,
        table: impl Into<String>,
        name: impl Into<String>,
        first_columns: impl Into<String>,
        second_columns: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::DuplicateKey(DuplicateKey {
            first: first.into().into(),
            first_entity_type: first_entity_type.into().into(),
            second: second.into().into(),
            second_entity_type: second_entity_type.into().into(),
            table: table.into().into(),
            name: name.into().into(),
            first_columns: first_columns.into().into(),
            second_columns: second_columns.into().into(),
        }))
    }

    /// Returns `true` if this error is a duplicate key error.
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::DuplicateKey(_))
    }
}
