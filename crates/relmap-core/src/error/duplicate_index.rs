use super::Error;

/// Error when two logical indexes map to the same index name on a table but
/// cannot share one physical index.
#[derive(Debug)]
pub(super) struct DuplicateIndex {
    first: Box<str>,
    first_entity_type: Box<str>,
    second: Box<str>,
    second_entity_type: Box<str>,
    table: Box<str>,
    name: Box<str>,
    mismatch: IndexMismatch,
}

/// The aspect in which two same-named indexes disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexMismatch {
    Columns { first: String, second: String },
    Uniqueness,
    SortOrder,
    Filter { first: String, second: String },
}

impl std::error::Error for DuplicateIndex {}

impl core::fmt::Display for DuplicateIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "duplicate index: the indexes {} on '{}' and {} on '{}' are both mapped to '{}.{}' ",
            self.first, self.first_entity_type, self.second, self.second_entity_type, self.table, self.name
        )?;

        match &self.mismatch {
            IndexMismatch::Columns { first, second } => {
                write!(f, "but use different columns ({first} and {second})")
            }
            IndexMismatch::Uniqueness => f.write_str("but with different uniqueness"),
            IndexMismatch::SortOrder => f.write_str("but with different sort orders"),
            IndexMismatch::Filter { first, second } => {
                write!(f, "but with different filters ('{first}' and '{second}')")
            }
        }
    }
}

impl Error {
    /// Creates a duplicate index error.
    pub fn duplicate_index(
        first: impl Into<String>,
        first_entity_type: impl Into<String>,
        second: impl Into<String>,
        second_entity_type: impl Into<String>,
        table: impl Into<String>,
        name: impl Into<String>,
        mismatch: IndexMismatch,
    ) -> Error {
        Error::from(super::ErrorKind::DuplicateIndex(DuplicateIndex {
            first: first.into().into(),
            first_entity_type: first_entity_type.into().into(),
            second: second.into().into(),
            second_entity_type: second_entity_type.into().into(),
            table: table.into().into(),
            name: name.into().into(),
            mismatch,
        }))
    }

    /// Returns `true` if this error is a duplicate index error.
    pub fn is_duplicate_index(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::DuplicateIndex(_))
    }

    /// Returns the mismatch if this error is a duplicate index error.
    pub fn index_mismatch(&self) -> Option<&IndexMismatch> {
        match self.kind() {
            super::ErrorKind::DuplicateIndex(err) => Some(&err.mismatch),
            _ => None,
        }
    }
}
