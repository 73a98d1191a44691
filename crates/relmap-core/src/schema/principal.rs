//! Maintenance of the ordered mapping sets.
//!
//! Table mappings sit in their object's mapping set, column mappings in
//! their column's and property's sets, and both sort keys depend on the
//! table mapping's principal flags and column mappings. Changing either
//! removes the mapping from every set under the old key and reinserts it
//! under the new one.

use super::{
    cmp::Cmp,
    db::{ColumnKind, StoreObjectId},
    mapping::{ColumnMappingId, TableMappingId, TableMappingKind},
    Schema,
};
use indexmap::IndexSet;
use std::mem;
use tracing::{debug, trace};

impl Schema {
    /// Marks the table mapping as owning (or not) the rows of its shared
    /// object. A no-op when the flag already has this value.
    pub fn set_is_shared_table_principal(&mut self, id: TableMappingId, value: bool) {
        if self.mapping.table_mapping(id).is_shared_table_principal == Some(value) {
            return;
        }

        self.rekey(id, |schema| {
            schema.mapping.table_mapping_mut(id).is_shared_table_principal = Some(value)
        });
    }

    /// Marks the table mapping as the main (or a secondary) part of a split
    /// entity type. A no-op when the flag already has this value.
    pub fn set_is_split_entity_type_principal(&mut self, id: TableMappingId, value: bool) {
        if self.mapping.table_mapping(id).is_split_entity_type_principal == Some(value) {
            return;
        }

        self.rekey(id, |schema| {
            schema.mapping.table_mapping_mut(id).is_split_entity_type_principal = Some(value)
        });
    }

    /// Detaches the table mapping and its column mappings from the model.
    /// Columns left without mapped properties are dropped from their owner.
    ///
    /// The entity types still mapped to the object get their principal
    /// flags and column nullability derived again.
    pub fn remove_table_mapping(&mut self, id: TableMappingId) {
        let column_mappings = self.column_mappings_of(id);
        let object = self.mapping.table_mapping(id).table;

        // Unlink everything while the sort keys are intact, then tombstone.
        self.unlink_table_mapping(id);
        for column_mapping in &column_mappings {
            self.unlink_column_mapping(*column_mapping);
        }

        for column_mapping in column_mappings {
            let column = self.mapping.column_mapping(column_mapping).column;
            self.mapping.column_mappings[column_mapping.0] = None;

            self.db.columns[column.0].accessors.reset();

            let column = self.db.column(column);
            if column.property_mappings.is_empty() && !column.is_parameter() {
                let (owner, name, id) = (column.table, column.name.clone(), column.id);

                let base = self.db.object_mut(owner).base_mut();
                base.columns.remove(&name);
                base.column_order.retain(|c| *c != id);
            }
        }

        let mapping = self.mapping.table_mapping(id);
        let key = (mapping.entity_type, mapping.table.kind());
        let entity_type = mapping.entity_type;

        if let Some(ids) = self.mapping.entity_types.get_mut(&key) {
            ids.retain(|other| *other != id);
        }

        if self.mapping.main_table_mappings.get(&entity_type) == Some(&id) {
            self.mapping.main_table_mappings.shift_remove(&entity_type);
        }

        for other in self.mapping.table_mappings.iter_mut().flatten() {
            match &mut other.kind {
                TableMappingKind::Table {
                    insert_procedure,
                    update_procedure,
                    delete_procedure,
                } => {
                    for procedure in [insert_procedure, update_procedure, delete_procedure] {
                        if *procedure == Some(id) {
                            *procedure = None;
                        }
                    }
                }
                TableMappingKind::StoredProcedure { table_mapping, .. } => {
                    if *table_mapping == Some(id) {
                        *table_mapping = None;
                    }
                }
                _ => {}
            }
        }

        self.mapping.table_mappings[id.0] = None;

        self.refresh_shared_principals(object);
        self.refresh_nullability(object);

        debug!(table_mapping = ?id, "removed table mapping");
    }

    /// Picks the entity types owning the rows of the object. An entity type
    /// is principal unless it depends on another one there through a
    /// row-internal foreign key. Objects mapped by a single entity type
    /// carry no flags.
    pub(crate) fn refresh_shared_principals(&mut self, object: StoreObjectId) {
        let mappings = self.db.object(object).mappings().iter().collect::<Vec<_>>();

        let entity_types = mappings
            .iter()
            .map(|id| self.mapping.table_mapping(*id).entity_type)
            .collect::<IndexSet<_>>();
        let shared = entity_types.len() > 1;

        for id in mappings {
            let entity_type = self.mapping.table_mapping(id).entity_type;
            let principal = shared.then(|| {
                self.row_internal_foreign_keys(entity_type, object)
                    .is_empty()
            });

            if self.mapping.table_mapping(id).is_shared_table_principal == principal {
                continue;
            }

            self.rekey(id, |schema| {
                schema.mapping.table_mapping_mut(id).is_shared_table_principal = principal
            });

            debug!(
                object = %self.db.object(object).base().display_name(),
                entity_type = %self.app.entity_type(entity_type).name,
                ?principal,
                "shared object"
            );
        }
    }

    /// Derives the nullability of the object's columns from the properties
    /// still mapped to them.
    fn refresh_nullability(&mut self, object: StoreObjectId) {
        let columns = self.db.object(object).column_ids().to_vec();

        for column in columns {
            // Procedure parameters and results follow their own rules
            if self.db.column(column).kind != ColumnKind::Column {
                continue;
            }

            let nullable = self.db.column(column).property_mappings.iter().any(|id| {
                let column_mapping = self.mapping.column_mapping(id);
                self.is_column_nullable(column_mapping.table_mapping, column_mapping.property)
            });

            self.db.columns[column.0].is_nullable = nullable;
        }
    }

    /// Unlinks the table mapping and its column mappings under their current
    /// keys, applies `f`, then links them again under the new keys.
    fn rekey(&mut self, id: TableMappingId, f: impl FnOnce(&mut Schema)) {
        let column_mappings = self.column_mappings_of(id);

        self.unlink_table_mapping(id);
        for column_mapping in &column_mappings {
            self.unlink_column_mapping(*column_mapping);
        }

        f(self);

        self.link_table_mapping(id);
        for column_mapping in self.column_mappings_of(id) {
            self.link_column_mapping(column_mapping);

            // Accessors list their sources in column mapping order
            let column = self.mapping.column_mapping(column_mapping).column;
            self.db.columns[column.0].accessors.reset();
        }

        let mapping = self.mapping.table_mapping(id);
        trace!(
            table_mapping = ?id,
            shared_principal = ?mapping.is_shared_table_principal,
            split_principal = ?mapping.is_split_entity_type_principal,
            column_mappings = mapping.column_mappings.len(),
            "re-keyed table mapping"
        );
    }

    fn column_mappings_of(&self, id: TableMappingId) -> Vec<ColumnMappingId> {
        self.mapping
            .table_mapping(id)
            .column_mappings
            .iter()
            .collect()
    }

    /// Inserts the table mapping into its object's mapping set.
    pub(crate) fn link_table_mapping(&mut self, id: TableMappingId) {
        let object = self.mapping.table_mapping(id).table;

        let mut set = mem::take(&mut self.db.object_mut(object).base_mut().mappings);
        let inserted = set.insert_by(id, |a, b| Cmp::within(self).table_mapping_base(a, b));
        self.db.object_mut(object).base_mut().mappings = set;

        debug_assert!(inserted, "entity type mapped twice to the same object");
    }

    fn unlink_table_mapping(&mut self, id: TableMappingId) {
        let object = self.mapping.table_mapping(id).table;

        let mut set = mem::take(&mut self.db.object_mut(object).base_mut().mappings);
        set.remove_by(id, |a, b| Cmp::within(self).table_mapping_base(a, b));
        self.db.object_mut(object).base_mut().mappings = set;
    }

    /// Adds a new column mapping to its table mapping's set and links it to
    /// its column and property.
    ///
    /// The table mapping's sort key covers its column mappings, so the table
    /// mapping is re-keyed along with it.
    pub(crate) fn attach_column_mapping(&mut self, id: ColumnMappingId) {
        let table_mapping = self.mapping.column_mapping(id).table_mapping;

        self.rekey(table_mapping, |schema| {
            let mut set = mem::take(&mut schema.mapping.table_mapping_mut(table_mapping).column_mappings);
            set.insert_by(id, |a, b| Cmp::within(schema).column_mapping(a, b));
            schema.mapping.table_mapping_mut(table_mapping).column_mappings = set;
        });
    }

    fn link_column_mapping(&mut self, id: ColumnMappingId) {
        let column_mapping = self.mapping.column_mapping(id);
        let column = column_mapping.column;
        let key = (
            column_mapping.property,
            self.db.column(column).table.kind(),
        );

        let mut set = mem::take(&mut self.db.columns[column.0].property_mappings);
        set.insert_by(id, |a, b| Cmp::within(self).column_mapping(a, b));
        self.db.columns[column.0].property_mappings = set;

        let mut set = mem::take(self.mapping.properties.entry(key).or_default());
        set.insert_by(id, |a, b| Cmp::within(self).column_mapping(a, b));
        self.mapping.properties.insert(key, set);
    }

    fn unlink_column_mapping(&mut self, id: ColumnMappingId) {
        let column_mapping = self.mapping.column_mapping(id);
        let column = column_mapping.column;
        let key = (
            column_mapping.property,
            self.db.column(column).table.kind(),
        );

        let mut set = mem::take(&mut self.db.columns[column.0].property_mappings);
        set.remove_by(id, |a, b| Cmp::within(self).column_mapping(a, b));
        self.db.columns[column.0].property_mappings = set;

        if let Some(slot) = self.mapping.properties.get_mut(&key) {
            let mut set = mem::take(slot);
            set.remove_by(id, |a, b| Cmp::within(self).column_mapping(a, b));
            self.mapping.properties.insert(key, set);
        }
    }
}
