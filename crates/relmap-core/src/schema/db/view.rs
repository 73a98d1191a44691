use super::{HasColumns, StoreObjectId, TableBase};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub id: ViewId,

    pub base: TableBase,

    /// SQL defining the view, when the model provides it
    pub definition_sql: Option<String>,
}

#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct ViewId(pub usize);

impl HasColumns for View {
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

impl fmt::Debug for ViewId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ViewId({})", self.0)
    }
}
