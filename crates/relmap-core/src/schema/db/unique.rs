use super::{ColumnId, TableId};
use crate::{cache::Cached, row::RowKeyValueFactory, schema::app};
use std::fmt;

/// A primary key or alternate key constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct UniqueConstraint {
    pub id: UniqueConstraintId,

    pub name: String,

    pub table: TableId,

    pub columns: Vec<ColumnId>,

    pub is_primary_key: bool,

    /// The logical keys sharing this constraint
    pub mapped_keys: Vec<app::KeyId>,

    pub(crate) row_key_value_factory: Cached<RowKeyValueFactory>,
}

#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct UniqueConstraintId(pub usize);

impl fmt::Debug for UniqueConstraintId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "UniqueConstraintId({})", self.0)
    }
}
