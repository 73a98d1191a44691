mod column;
pub use column::{ColumnMapping, ColumnMappingId};

mod table;
pub use table::{TableMapping, TableMappingId, TableMappingKind};

use super::{
    app::{EntityTypeId, PropertyId},
    db::StoreObjectKind,
    SortedIds,
};
use indexmap::IndexMap;

/// Defines the correspondence between logical entity types and the store
/// objects holding them.
///
/// Mappings live in arenas. Removing a mapping leaves a tombstone so that the
/// ids of the other mappings stay valid.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Mapping {
    pub(crate) table_mappings: Vec<Option<TableMapping>>,

    pub(crate) column_mappings: Vec<Option<ColumnMapping>>,

    /// Table mappings of each entity type, per store object kind, in
    /// creation order.
    pub(crate) entity_types: IndexMap<(EntityTypeId, StoreObjectKind), Vec<TableMappingId>>,

    /// Column mappings of each property, per store object kind, ordered by
    /// the column mapping comparer.
    pub(crate) properties: IndexMap<(PropertyId, StoreObjectKind), SortedIds<ColumnMappingId>>,

    /// The table mapping holding each entity type's own rows
    pub(crate) main_table_mappings: IndexMap<EntityTypeId, TableMappingId>,
}

impl Mapping {
    /// Returns the table mapping with the given id.
    ///
    /// # Panics
    ///
    /// Panics if the mapping does not exist or was removed.
    pub fn table_mapping(&self, id: TableMappingId) -> &TableMapping {
        self.table_mappings
            .get(id.0)
            .and_then(Option::as_ref)
            .expect("invalid table mapping ID")
    }

    pub(crate) fn table_mapping_mut(&mut self, id: TableMappingId) -> &mut TableMapping {
        self.table_mappings
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .expect("invalid table mapping ID")
    }

    /// Returns the column mapping with the given id.
    ///
    /// # Panics
    ///
    /// Panics if the mapping does not exist or was removed.
    pub fn column_mapping(&self, id: ColumnMappingId) -> &ColumnMapping {
        self.column_mappings
            .get(id.0)
            .and_then(Option::as_ref)
            .expect("invalid column mapping ID")
    }

    /// Live table mappings in creation order
    pub fn table_mappings(&self) -> impl Iterator<Item = &TableMapping> + '_ {
        self.table_mappings.iter().flatten()
    }

    /// Live column mappings in creation order
    pub fn column_mappings(&self) -> impl Iterator<Item = &ColumnMapping> + '_ {
        self.column_mappings.iter().flatten()
    }

    /// The entity type's mappings to objects of the given kind
    pub fn entity_type_mappings(
        &self,
        entity_type: EntityTypeId,
        kind: StoreObjectKind,
    ) -> &[TableMappingId] {
        self.entity_types
            .get(&(entity_type, kind))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The mapping to the table holding the entity type's own rows. For
    /// table-per-type hierarchies this is the type's own table; for split
    /// entity types, the table holding the main part.
    pub fn main_table_mapping(&self, entity_type: EntityTypeId) -> Option<TableMappingId> {
        self.main_table_mappings.get(&entity_type).copied()
    }

    /// The property's mappings to columns of objects of the given kind
    pub fn property_mappings(&self, property: PropertyId, kind: StoreObjectKind) -> &[ColumnMappingId] {
        self.properties
            .get(&(property, kind))
            .map(SortedIds::as_slice)
            .unwrap_or_default()
    }
}
