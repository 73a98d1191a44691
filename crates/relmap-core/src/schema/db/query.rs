use super::{HasColumns, StoreObjectId, TableBase};
use std::fmt;

/// An entity type read from raw SQL
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub id: SqlQueryId,

    pub base: TableBase,

    pub sql: String,
}

#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct SqlQueryId(pub usize);

impl HasColumns for SqlQuery {
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

impl fmt::Debug for SqlQueryId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "SqlQueryId({})", self.0)
    }
}
