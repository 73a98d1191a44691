use super::Error;

/// Error when the logical model cannot be projected onto a consistent
/// relational model.
///
/// This occurs when:
/// - A logical model references an entity type, property or function that does not exist
/// - A mapped root entity type has no primary key
/// - Two properties sharing a column resolve to different store types
/// - Two indexes on the same table end up with the same name
///
/// These errors are raised while the relational model is assembled.
#[derive(Debug)]
pub(super) struct InvalidSchema {
    message: Box<str>,
}

impl std::error::Error for InvalidSchema {}

impl core::fmt::Display for InvalidSchema {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid schema: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidSchema(InvalidSchema {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid schema error.
    pub fn is_invalid_schema(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidSchema(_))
    }
}
