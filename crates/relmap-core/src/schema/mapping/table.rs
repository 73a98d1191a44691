use super::ColumnMappingId;
use crate::schema::{
    app::{EntityTypeId, StoreOperation},
    db::StoreObjectId,
    SortedIds,
};
use std::fmt;

/// Maps an entity type onto a store object.
///
/// The principal flags are part of the sort key used by every set this
/// mapping (or one of its column mappings) belongs to. They are only changed
/// through [`Schema::set_is_shared_table_principal`] and
/// [`Schema::set_is_split_entity_type_principal`], which re-key those sets.
///
/// [`Schema::set_is_shared_table_principal`]: crate::Schema::set_is_shared_table_principal
/// [`Schema::set_is_split_entity_type_principal`]: crate::Schema::set_is_split_entity_type_principal
#[derive(Debug, Clone, PartialEq)]
pub struct TableMapping {
    pub id: TableMappingId,

    pub entity_type: EntityTypeId,

    /// The object the entity type is mapped to
    pub table: StoreObjectId,

    /// Rows of derived types are also found in this object
    pub includes_derived_types: bool,

    /// `Some` when several entity types share the object. `true` for the
    /// entity types that own the rows.
    pub(crate) is_shared_table_principal: Option<bool>,

    /// `Some` when the entity type is split across several objects. `true`
    /// for the object holding the main part.
    pub(crate) is_split_entity_type_principal: Option<bool>,

    /// Ordered by the column mapping comparer
    pub column_mappings: SortedIds<ColumnMappingId>,

    pub kind: TableMappingKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableMappingKind {
    Table {
        insert_procedure: Option<TableMappingId>,
        update_procedure: Option<TableMappingId>,
        delete_procedure: Option<TableMappingId>,
    },
    View,
    Function {
        /// The function the entity type is read from by default
        is_default: bool,
    },
    SqlQuery {
        is_default: bool,
    },
    StoredProcedure {
        operation: StoreOperation,

        /// The table mapping the procedure writes for
        table_mapping: Option<TableMappingId>,
    },
}

#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct TableMappingId(pub usize);

impl TableMapping {
    pub fn is_shared_table_principal(&self) -> Option<bool> {
        self.is_shared_table_principal
    }

    pub fn is_split_entity_type_principal(&self) -> Option<bool> {
        self.is_split_entity_type_principal
    }

    /// Insert, update and delete procedure mappings of a table mapping
    pub fn procedures(&self) -> [Option<TableMappingId>; 3] {
        match self.kind {
            TableMappingKind::Table {
                insert_procedure,
                update_procedure,
                delete_procedure,
            } => [insert_procedure, update_procedure, delete_procedure],
            _ => [None; 3],
        }
    }
}

impl TableMappingKind {
    pub(crate) fn table() -> Self {
        TableMappingKind::Table {
            insert_procedure: None,
            update_procedure: None,
            delete_procedure: None,
        }
    }
}

impl fmt::Debug for TableMappingId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "TableMappingId({})", self.0)
    }
}
