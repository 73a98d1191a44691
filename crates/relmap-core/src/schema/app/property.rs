use super::{EntityTypeId, Type};
use crate::schema::db::{self, StoreObjectIdentifier};
use std::fmt;

#[derive(Debug, Clone)]
pub struct Property {
    /// Uniquely identifies the property
    pub id: PropertyId,

    /// The property name
    pub name: String,

    /// The application type of the property's values
    pub ty: Type,

    /// Whether the property accepts null
    pub nullable: bool,

    /// Column name, defaults to the property name
    pub column_name: Option<String>,

    /// Explicit store type, otherwise the database default for `ty`
    pub store_type: Option<db::Type>,

    /// Per store object column configuration
    pub overrides: Vec<ColumnOverride>,

    pub facets: Facets,

    pub value_generated: ValueGenerated,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyId {
    pub entity_type: EntityTypeId,
    pub index: usize,
}

/// Column configuration that only applies within one store object.
#[derive(Debug, Clone)]
pub struct ColumnOverride {
    pub object: StoreObjectIdentifier,
    pub column_name: Option<String>,
    pub store_type: Option<db::Type>,
}

/// Column annotations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub comment: Option<String>,
    pub default_sql: Option<String>,
    pub computed_sql: Option<String>,
    pub collation: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueGenerated {
    #[default]
    Never,
    OnAdd,
    OnAddOrUpdate,
}

impl Property {
    pub(crate) fn new(id: PropertyId, name: &str, ty: Type) -> Self {
        Self {
            id,
            name: name.to_string(),
            ty,
            nullable: false,
            column_name: None,
            store_type: None,
            overrides: vec![],
            facets: Facets::default(),
            value_generated: ValueGenerated::Never,
        }
    }

    /// The column the property maps to in the given store object.
    pub fn column_name_for(&self, object: &StoreObjectIdentifier) -> &str {
        self.override_for(object)
            .and_then(|o| o.column_name.as_deref())
            .or(self.column_name.as_deref())
            .unwrap_or(&self.name)
    }

    /// The configured store type in the given store object, if any.
    pub fn store_type_for(&self, object: &StoreObjectIdentifier) -> Option<&db::Type> {
        self.override_for(object)
            .and_then(|o| o.store_type.as_ref())
            .or(self.store_type.as_ref())
    }

    fn override_for(&self, object: &StoreObjectIdentifier) -> Option<&ColumnOverride> {
        self.overrides.iter().find(|o| o.object == *object)
    }
}

impl Facets {
    pub fn is_empty(&self) -> bool {
        *self == Facets::default()
    }

    /// Fills in the facets that are not set yet.
    pub(crate) fn merge(&mut self, other: &Facets) {
        fn fill(dst: &mut Option<String>, src: &Option<String>) {
            if dst.is_none() {
                dst.clone_from(src);
            }
        }

        fill(&mut self.comment, &other.comment);
        fill(&mut self.default_sql, &other.default_sql);
        fill(&mut self.computed_sql, &other.computed_sql);
        fill(&mut self.collation, &other.collation);
    }
}

impl From<&Property> for PropertyId {
    fn from(value: &Property) -> Self {
        value.id
    }
}

impl fmt::Debug for PropertyId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "PropertyId({}/{})", self.entity_type.0, self.index)
    }
}
