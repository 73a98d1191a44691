use super::{ColumnId, TableId};
use crate::{cache::Cached, row::RowIndexValueFactory, schema::app};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct TableIndex {
    /// Uniquely identifies the index within the schema
    pub id: TableIndexId,

    /// Index name is unique within its table
    pub name: String,

    /// The table being indexed
    pub table: TableId,

    pub columns: Vec<ColumnId>,

    /// When `true`, indexed entries are unique
    pub is_unique: bool,

    /// Per column sort order, taken from the first mapped index
    pub is_descending: Vec<bool>,

    /// Partial index filter, taken from the first mapped index
    pub filter: Option<String>,

    /// The logical indexes sharing this index
    pub mapped_indices: Vec<app::IndexId>,

    pub(crate) row_index_value_factory: Cached<RowIndexValueFactory>,
}

#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct TableIndexId(pub usize);

impl fmt::Debug for TableIndexId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "TableIndexId({})", self.0)
    }
}
