use super::Error;

/// Error when two logical foreign keys map to the same constraint name on a
/// table but cannot share one physical constraint.
#[derive(Debug)]
pub(super) struct DuplicateForeignKey {
    first: Box<str>,
    first_entity_type: Box<str>,
    second: Box<str>,
    second_entity_type: Box<str>,
    table: Box<str>,
    name: Box<str>,
    mismatch: ForeignKeyMismatch,
}

/// The aspect in which two same-named foreign keys disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForeignKeyMismatch {
    PrincipalTable { first: String, second: String },
    Columns { first: String, second: String },
    PrincipalColumns { first: String, second: String },
    Uniqueness,
    DeleteBehavior { first: String, second: String },
}

impl std::error::Error for DuplicateForeignKey {}

impl core::fmt::Display for DuplicateForeignKey {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "duplicate foreign key: the foreign keys {} on '{}' and {} on '{}' are both mapped to '{}.{}' ",
            self.first, self.first_entity_type, self.second, self.second_entity_type, self.table, self.name
        )?;

        match &self.mismatch {
            ForeignKeyMismatch::PrincipalTable { first, second } => write!(
                f,
                "but reference different principal tables ('{first}' and '{second}')"
            ),
            ForeignKeyMismatch::Columns { first, second } => {
                write!(f, "but use different columns ({first} and {second})")
            }
            ForeignKeyMismatch::PrincipalColumns { first, second } => write!(
                f,
                "but reference different principal columns ({first} and {second})"
            ),
            ForeignKeyMismatch::Uniqueness => f.write_str("but with different uniqueness"),
            ForeignKeyMismatch::DeleteBehavior { first, second } => write!(
                f,
                "but with different delete behaviors ('{first}' and '{second}')"
            ),
        }
    }
}

impl Error {
    /// Creates a duplicate foreign key error.
    pub fn duplicate_foreign_key(
        first: impl Into<String>,
        first_entity_type: impl Into<String>,
        second: impl Into<String>,
        second_entity_type: impl Into<String>,
        table: impl Into<String>,
        name: impl Into<String>,
        mismatch: ForeignKeyMismatch,
    ) -> Error {
        Error::from(super::ErrorKind::DuplicateForeignKey(DuplicateForeignKey {
            first: first.into().into(),
            first_entity_type: first_entity_type.into().into(),
            second: second.into().into(),
            second_entity_type: second_entity_type.into().into(),
            table: table.into().into(),
            name: name.into().into(),
            mismatch,
        }))
    }

    /// Returns `true` if this error is a duplicate foreign key error.
    pub fn is_duplicate_foreign_key(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::DuplicateForeignKey(_))
    }

    /// Returns the mismatch if this error is a duplicate foreign key error.
    pub fn foreign_key_mismatch(&self) -> Option<&ForeignKeyMismatch> {
        match self.kind() {
            super::ErrorKind::DuplicateForeignKey(err) => Some(&err.mismatch),
            _ => None,
        }
    }
}
