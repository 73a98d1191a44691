use super::TableId;
use crate::schema::app::EntityTypeId;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct CheckConstraint {
    pub id: CheckConstraintId,

    pub name: String,

    pub table: TableId,

    pub sql: String,

    /// Entity types declaring the constraint
    pub entity_types: Vec<EntityTypeId>,
}

#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct CheckConstraintId(pub usize);

impl fmt::Debug for CheckConstraintId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "CheckConstraintId({})", self.0)
    }
}
