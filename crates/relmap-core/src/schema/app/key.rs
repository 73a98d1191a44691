use super::{EntityTypeId, PropertyId};
use std::fmt;

#[derive(Debug, Clone)]
pub struct Key {
    pub id: KeyId,

    /// Properties composing the key, in order
    pub properties: Vec<PropertyId>,

    /// True for the entity type's primary key
    pub primary_key: bool,

    /// Explicit constraint name
    pub name: Option<String>,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct KeyId {
    pub entity_type: EntityTypeId,
    pub index: usize,
}

impl fmt::Debug for KeyId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "KeyId({}/{})", self.entity_type.0, self.index)
    }
}
