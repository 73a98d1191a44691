use super::{
    CheckConstraintId, ForeignKeyConstraintId, HasColumns, StoreObjectId, TableBase,
    TableIndexId, UniqueConstraintId,
};
use crate::schema::SortedIds;
use std::{collections::BTreeMap, fmt};

/// A database table
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Uniquely identifies a table
    pub id: TableId,

    pub base: TableBase,

    pub primary_key: Option<UniqueConstraintId>,

    /// Unique constraints by name, including the primary key
    pub unique_constraints: BTreeMap<String, UniqueConstraintId>,

    /// Outgoing foreign keys, ordered by the foreign key comparer
    pub foreign_keys: SortedIds<ForeignKeyConstraintId>,

    /// Foreign keys of other tables (or this one) referencing this table
    pub referencing_foreign_keys: SortedIds<ForeignKeyConstraintId>,

    /// Indexes by name
    pub indices: BTreeMap<String, TableIndexId>,

    /// Check constraints by name
    pub check_constraints: BTreeMap<String, CheckConstraintId>,
}

/// Uniquely identifies a table
#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct TableId(pub usize);

/// Objects carrying constraints. Only tables do.
pub trait HasConstraints: HasColumns {
    fn primary_key(&self) -> Option<UniqueConstraintId>;

    fn unique_constraints(&self) -> Vec<UniqueConstraintId>;

    fn foreign_keys(&self) -> Vec<ForeignKeyConstraintId>;

    fn indices(&self) -> Vec<TableIndexId>;

    fn check_constraints(&self) -> Vec<CheckConstraintId>;
}

impl Table {
    pub(crate) fn new(id: TableId, name: &str, schema: Option<&str>) -> Self {
        Self {
            id,
            base: TableBase::new(name, schema),
            primary_key: None,
            unique_constraints: BTreeMap::new(),
            foreign_keys: SortedIds::new(),
            referencing_foreign_keys: SortedIds::new(),
            indices: BTreeMap::new(),
            check_constraints: BTreeMap::new(),
        }
    }
}

impl HasColumns for Table {
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

impl HasConstraints for Table {
    fn primary_key(&self) -> Option<UniqueConstraintId> {
        self.primary_key
    }

    fn unique_constraints(&self) -> Vec<UniqueConstraintId> {
        self.unique_constraints.values().copied().collect()
    }

    fn foreign_keys(&self) -> Vec<ForeignKeyConstraintId> {
        self.foreign_keys.iter().collect()
    }

    fn indices(&self) -> Vec<TableIndexId> {
        self.indices.values().copied().collect()
    }

    fn check_constraints(&self) -> Vec<CheckConstraintId> {
        self.check_constraints.values().copied().collect()
    }
}

impl fmt::Debug for TableId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "TableId({})", self.0)
    }
}
