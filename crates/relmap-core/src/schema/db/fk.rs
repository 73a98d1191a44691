use super::{ColumnId, TableId, UniqueConstraintId};
use crate::schema::app::{self, DeleteBehavior};
use std::fmt;

/// A foreign key constraint between two tables.
///
/// Several logical foreign keys may share one constraint when they agree on
/// everything the database can observe.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKeyConstraint {
    pub id: ForeignKeyConstraintId,

    pub name: String,

    /// The dependent table
    pub table: TableId,

    /// The referenced table
    pub principal_table: TableId,

    pub columns: Vec<ColumnId>,

    pub principal_columns: Vec<ColumnId>,

    /// The key on the principal table being referenced
    pub principal_unique_constraint: UniqueConstraintId,

    pub on_delete: ReferentialAction,

    pub mapped_foreign_keys: Vec<app::ForeignKeyId>,
}

#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct ForeignKeyConstraintId(pub usize);

/// Database action taken on dependent rows when the principal row is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReferentialAction {
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl From<DeleteBehavior> for ReferentialAction {
    fn from(value: DeleteBehavior) -> Self {
        match value {
            DeleteBehavior::Cascade => ReferentialAction::Cascade,
            DeleteBehavior::SetNull => ReferentialAction::SetNull,
            DeleteBehavior::Restrict => ReferentialAction::Restrict,
            // Client side behaviors leave the database alone
            DeleteBehavior::ClientCascade
            | DeleteBehavior::ClientSetNull
            | DeleteBehavior::NoAction
            | DeleteBehavior::ClientNoAction => ReferentialAction::NoAction,
        }
    }
}

impl fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReferentialAction::NoAction => "NO ACTION",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
        })
    }
}

impl fmt::Debug for ForeignKeyConstraintId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ForeignKeyConstraintId({})", self.0)
    }
}
