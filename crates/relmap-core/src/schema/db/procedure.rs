use super::{ColumnId, HasColumns, StoreObjectId, TableBase};
use crate::schema::app::{EntityTypeId, StoreOperation};
use std::{collections::BTreeMap, fmt};

/// A stored procedure performing one write operation for an entity type.
///
/// Parameters and result columns are both [`Column`](super::Column)s; only
/// the result columns are part of the name-keyed column set.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreStoredProcedure {
    pub id: StoredProcedureId,

    pub base: TableBase,

    /// Parameters in declaration order
    pub parameters: Vec<ColumnId>,

    /// Parameters by name
    pub parameter_lookup: BTreeMap<String, ColumnId>,

    /// Result columns in declaration order
    pub result_columns: Vec<ColumnId>,

    /// Output parameter receiving the number of affected rows
    pub rows_affected_parameter: Option<ColumnId>,

    pub entity_type: EntityTypeId,

    pub operation: StoreOperation,
}

#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct StoredProcedureId(pub usize);

impl StoreStoredProcedure {
    pub fn find_parameter(&self, name: &str) -> Option<ColumnId> {
        self.parameter_lookup.get(name).copied()
    }
}

impl HasColumns for StoreStoredProcedure {
    fn id(&self) -> StoreObjectId {
        self.id.into()
    }

    fn base(&self) -> &TableBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut TableBase {
        &mut self.base
    }
}

impl fmt::Debug for StoredProcedureId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "StoredProcedureId({})", self.0)
    }
}
