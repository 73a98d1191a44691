//! Rules for objects shared by several entity types (table splitting).

use super::{
    app::{EntityTypeId, ForeignKeyId, MappingStrategy, PropertyId},
    db::{StoreObjectId, StoreObjectKind},
    mapping::TableMappingId,
    Schema,
};
use indexmap::IndexSet;

impl Schema {
    /// Foreign keys of the entity type linking its rows to rows of another
    /// entity type in the same object.
    ///
    /// Such a foreign key uses the primary key as its dependent properties,
    /// references the principal's primary key, is unique, and its principal
    /// (or a type derived from it) is mapped to the object too.
    pub fn row_internal_foreign_keys(
        &self,
        entity_type: EntityTypeId,
        object: StoreObjectId,
    ) -> Vec<ForeignKeyId> {
        if !matches!(object.kind(), StoreObjectKind::Table | StoreObjectKind::View) {
            return vec![];
        }

        let Some(primary_key) = self.app.primary_key(entity_type) else {
            return vec![];
        };

        let mapped = self
            .db
            .object(object)
            .mappings()
            .iter()
            .map(|id| self.mapping.table_mapping(id).entity_type)
            .collect::<Vec<_>>();

        self.app
            .foreign_keys(entity_type)
            .into_iter()
            .filter(|fk| {
                fk.unique
                    && fk.properties == primary_key.properties
                    && self.app.key(fk.principal_key).primary_key
                    && !self.app.is_same_or_ancestor(fk.principal, entity_type)
                    && !self.app.is_same_or_ancestor(entity_type, fk.principal)
                    && mapped
                        .iter()
                        .any(|other| self.app.is_same_or_ancestor(fk.principal, *other))
            })
            .map(|fk| fk.id)
            .collect()
    }

    /// True if the entity type shares the object as a dependent whose row
    /// part may be absent.
    pub fn is_optional_dependent(&self, entity_type: EntityTypeId, object: StoreObjectId) -> bool {
        let fks = self.row_internal_foreign_keys(entity_type, object);

        !fks.is_empty()
            && fks
                .iter()
                .all(|fk| !self.app.foreign_key(*fk).required_dependent)
    }

    /// Nullable properties, properties declared below the root of a TPH
    /// hierarchy, and properties of optional dependents sharing the object
    /// need a nullable column.
    pub(crate) fn is_column_nullable(&self, mapping: TableMappingId, property: PropertyId) -> bool {
        let app = &*self.app;
        let mapping = self.mapping.table_mapping(mapping);

        if app.is_primary_key(property) {
            return false;
        }

        if app.property(property).nullable {
            return true;
        }

        if app.mapping_strategy(mapping.entity_type) == MappingStrategy::Tph
            && mapping.includes_derived_types
            && property.entity_type != app.root(mapping.entity_type)
        {
            return true;
        }

        self.is_optional_dependent(mapping.entity_type, mapping.table)
    }

    /// Non-key properties of the entity type whose column on the object is
    /// also mapped by an entity type it depends on through row-internal
    /// foreign keys. Writes of these properties go through the principal.
    pub fn non_principal_shared_non_pk_properties(
        &self,
        entity_type: EntityTypeId,
        object: impl Into<StoreObjectId>,
    ) -> Vec<PropertyId> {
        let object = object.into();

        let mut principals = IndexSet::new();
        self.populate_principal_entity_types(entity_type, object, &mut principals);

        if principals.is_empty() {
            return vec![];
        }

        self.app
            .properties(entity_type)
            .into_iter()
            .filter(|property| !self.app.is_primary_key(*property))
            .filter(|property| {
                let Some(column) = self.find_column_for_property(object, *property) else {
                    return false;
                };

                column.property_mappings.iter().any(|id| {
                    let column_mapping = self.mapping.column_mapping(id);
                    let table_mapping = self.mapping.table_mapping(column_mapping.table_mapping);

                    principals.contains(&table_mapping.entity_type)
                })
            })
            .collect()
    }

    /// Entity types reached by following row-internal foreign keys towards
    /// the principal.
    fn populate_principal_entity_types(
        &self,
        entity_type: EntityTypeId,
        object: StoreObjectId,
        principals: &mut IndexSet<EntityTypeId>,
    ) {
        for fk in self.row_internal_foreign_keys(entity_type, object) {
            let principal = self.app.foreign_key(fk).principal;

            // the principal's mapped subtypes write the same rows
            let mapped = self
                .db
                .object(object)
                .mappings()
                .iter()
                .map(|id| self.mapping.table_mapping(id).entity_type)
                .filter(|other| self.app.is_same_or_ancestor(principal, *other))
                .collect::<Vec<_>>();

            for other in mapped {
                if principals.insert(other) {
                    self.populate_principal_entity_types(other, object, principals);
                }
            }
        }
    }
}
