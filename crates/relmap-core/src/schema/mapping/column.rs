use super::TableMappingId;
use crate::{
    cache::Cached,
    driver::TypeMapping,
    schema::{app::PropertyId, db::ColumnId},
};
use std::fmt;

/// Maps a property onto a column, within one table mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMapping {
    pub id: ColumnMappingId,

    pub property: PropertyId,

    pub column: ColumnId,

    pub table_mapping: TableMappingId,

    /// Resolved on first use, see [`Schema::type_mapping`](crate::Schema::type_mapping)
    pub(crate) type_mapping: Cached<TypeMapping>,
}

#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct ColumnMappingId(pub usize);

impl fmt::Debug for ColumnMappingId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ColumnMappingId({})", self.0)
    }
}
