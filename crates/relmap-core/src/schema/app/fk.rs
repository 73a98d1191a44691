use super::{EntityTypeId, KeyId, PropertyId};
use std::fmt;

#[derive(Debug, Clone)]
pub struct ForeignKey {
    pub id: ForeignKeyId,

    /// Dependent properties, in the order of the principal key
    pub properties: Vec<PropertyId>,

    /// The entity type being referenced
    pub principal: EntityTypeId,

    /// The key on the principal being referenced
    pub principal_key: KeyId,

    /// The dependent cannot exist without a principal
    pub required: bool,

    /// The principal cannot exist without a dependent. Only meaningful for
    /// one-to-one relationships.
    pub required_dependent: bool,

    /// At most one dependent per principal
    pub unique: bool,

    pub delete_behavior: DeleteBehavior,

    /// Explicit constraint name
    pub name: Option<String>,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct ForeignKeyId {
    pub entity_type: EntityTypeId,
    pub index: usize,
}

/// What happens to dependents when their principal is deleted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteBehavior {
    Cascade,
    ClientCascade,
    Restrict,
    SetNull,
    #[default]
    ClientSetNull,
    NoAction,
    ClientNoAction,
}

impl fmt::Display for DeleteBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Debug for ForeignKeyId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ForeignKeyId({}/{})", self.entity_type.0, self.index)
    }
}
