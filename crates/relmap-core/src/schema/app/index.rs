use super::{EntityTypeId, PropertyId};
use std::fmt;

#[derive(Debug, Clone)]
pub struct Index {
    pub id: IndexId,

    /// Indexed properties, in order
    pub properties: Vec<PropertyId>,

    pub unique: bool,

    /// Explicit index name
    pub name: Option<String>,

    /// Per property sort order. Empty means all ascending.
    pub descending: Vec<bool>,

    /// Partial index filter SQL
    pub filter: Option<String>,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct IndexId {
    pub entity_type: EntityTypeId,
    pub index: usize,
}

impl Index {
    /// Sort order of each property, with unset entries ascending.
    pub fn is_descending(&self) -> Vec<bool> {
        (0..self.properties.len())
            .map(|i| self.descending.get(i).copied().unwrap_or(false))
            .collect()
    }
}

impl fmt::Debug for IndexId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "IndexId({}/{})", self.entity_type.0, self.index)
    }
}
