use super::{StoreObjectId, Type};
use crate::{
    cache::Cached,
    driver::TypeMapping,
    row::{ColumnAccessors, ValueComparer},
    schema::{
        app::{Facets, ParameterDirection},
        mapping::ColumnMappingId,
        SortedIds,
    },
};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Uniquely identifies the column in the schema.
    pub id: ColumnId,

    /// The name of the column in the database. Unique within its owner.
    pub name: String,

    /// The object owning the column
    pub table: StoreObjectId,

    pub kind: ColumnKind,

    /// The database storage type of the column.
    pub store_type: Type,

    /// Whether or not the column is nullable
    pub is_nullable: bool,

    /// How values stored in the column compare
    pub comparer: ValueComparer,

    /// Set when the column's store type was configured explicitly. Takes
    /// precedence over the per-property lookup.
    pub type_mapping: Option<TypeMapping>,

    pub facets: Facets,

    /// Properties stored in this column, ordered by the column mapping
    /// comparer
    pub property_mappings: SortedIds<ColumnMappingId>,

    pub(crate) accessors: Cached<ColumnAccessors>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// A regular column of a table, view, function or query
    Column,

    /// A stored procedure parameter
    Parameter {
        position: usize,
        direction: ParameterDirection,
    },

    /// A column of the result set returned by a stored procedure
    ResultColumn { position: usize },
}

#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct ColumnId(pub usize);

impl Column {
    pub(crate) fn new(id: ColumnId, name: &str, table: StoreObjectId, kind: ColumnKind, store_type: Type) -> Self {
        Self {
            id,
            name: name.to_string(),
            table,
            kind,
            store_type,
            is_nullable: false,
            comparer: ValueComparer::Default,
            type_mapping: None,
            facets: Facets::default(),
            property_mappings: SortedIds::new(),
            accessors: Cached::new(),
        }
    }

    pub fn is_parameter(&self) -> bool {
        matches!(self.kind, ColumnKind::Parameter { .. })
    }
}

impl From<&Column> for ColumnId {
    fn from(value: &Column) -> Self {
        value.id
    }
}

impl fmt::Debug for ColumnId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ColumnId({})", self.0)
    }
}
