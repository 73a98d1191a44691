use super::{
    CheckConstraint, ForeignKey, Index, Key, Name, Property, PropertyId, StoredProcedureConfig,
};
use std::fmt;

#[derive(Debug, Clone)]
pub struct EntityType {
    /// Uniquely identifies the entity type within the schema
    pub id: EntityTypeId,

    /// Name of the entity type
    pub name: Name,

    /// The entity type this one derives from
    pub base: Option<EntityTypeId>,

    /// Abstract types have no instances of their own
    pub is_abstract: bool,

    /// Properties declared on this type; inherited ones live on the ancestors
    pub properties: Vec<Property>,

    /// Keys declared on this type. The primary key is declared on the root.
    pub keys: Vec<Key>,

    pub foreign_keys: Vec<ForeignKey>,

    pub indices: Vec<Index>,

    pub check_constraints: Vec<CheckConstraint>,

    /// How the hierarchy is laid out. Only read from the root type.
    pub mapping_strategy: MappingStrategy,

    /// Where instances of this type are stored
    pub table: TableConfig,

    /// Additional tables holding some of the type's properties
    pub fragments: Vec<MappingFragment>,

    /// The view this type is read from, if any
    pub view: Option<StoreName>,

    /// SQL defining the view
    pub view_definition: Option<String>,

    /// Raw SQL query this type is read from, if any
    pub sql_query: Option<String>,

    /// Model name of the table-valued function this type is read from
    pub function: Option<String>,

    pub insert_procedure: Option<StoredProcedureConfig>,
    pub update_procedure: Option<StoredProcedureConfig>,
    pub delete_procedure: Option<StoredProcedureConfig>,

    /// Comment attached to the type's main table
    pub comment: Option<String>,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityTypeId(pub usize);

/// Inheritance layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MappingStrategy {
    /// Table per hierarchy: the whole hierarchy shares the root's table.
    #[default]
    Tph,

    /// Table per type: each type has a table holding the properties it
    /// declares, linked through the primary key.
    Tpt,

    /// Table per concrete type: each concrete type has a table holding all of
    /// its properties.
    Tpc,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TableConfig {
    /// Table named after the pluralized type name
    #[default]
    Default,

    Named(StoreName),

    /// Not stored in a table
    Unmapped,
}

/// A schema-qualified store object name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreName {
    pub name: String,
    pub schema: Option<String>,
}

/// Properties of an entity type split out into another table
#[derive(Debug, Clone)]
pub struct MappingFragment {
    pub table: StoreName,
    pub properties: Vec<PropertyId>,
}

impl EntityType {
    pub(crate) fn new(id: EntityTypeId, name: &str, base: Option<EntityTypeId>) -> Self {
        Self {
            id,
            name: Name::new(name),
            base,
            is_abstract: false,
            properties: vec![],
            keys: vec![],
            foreign_keys: vec![],
            indices: vec![],
            check_constraints: vec![],
            mapping_strategy: MappingStrategy::default(),
            table: TableConfig::default(),
            fragments: vec![],
            view: None,
            view_definition: None,
            sql_query: None,
            function: None,
            insert_procedure: None,
            update_procedure: None,
            delete_procedure: None,
            comment: None,
        }
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|property| property.name == name)
    }
}

impl StoreName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }
}

impl From<&str> for StoreName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<&EntityType> for EntityTypeId {
    fn from(value: &EntityType) -> Self {
        value.id
    }
}

impl fmt::Debug for EntityTypeId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "EntityTypeId({})", self.0)
    }
}
