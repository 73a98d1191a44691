pub mod app;

mod builder;
pub use builder::Builder;

pub mod cmp;

pub mod compat;

pub mod db;

mod debug;
pub use debug::DebugOptions;

pub mod mapping;
use mapping::Mapping;

mod name;
pub use name::Name;

pub mod naming;

mod principal;

mod shared;

mod sorted;
pub use sorted::SortedIds;

mod verify;

use crate::{
    driver::{Capability, TypeMapping, TypeMappingSource},
    row::{ColumnAccessors, RowIndexValueFactory, RowKeyValueFactory},
    Error, Result,
};
use app::{EntityTypeId, PropertyId};
use db::{
    Column, ColumnId, StoreObjectId, StoreObjectIdentifier, TableId, TableIndexId,
    UniqueConstraintId,
};
use mapping::ColumnMappingId;
use std::sync::Arc;

/// The relational model: the logical model, the physical schema derived from
/// it, and the mapping between the two.
#[derive(Debug)]
pub struct Schema {
    /// Logical entity model
    pub app: Arc<app::Schema>,

    /// Physical schema
    pub db: db::Schema,

    /// Maps entity types and properties to store objects and columns
    pub mapping: Mapping,

    capability: Capability,

    type_mappings: Arc<dyn TypeMappingSource>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn capability(&self) -> &Capability {
        &self.capability
    }

    pub fn identifier(&self, object: StoreObjectId) -> StoreObjectIdentifier {
        self.db.object(object).identifier()
    }

    /// Column lookup by name. Missing names yield `None`.
    pub fn find_column(&self, object: impl Into<StoreObjectId>, name: &str) -> Option<&Column> {
        let id = self.db.object(object.into()).find_column_id(name)?;
        Some(self.db.column(id))
    }

    /// The column the property is stored in within the given object.
    pub fn find_column_for_property(
        &self,
        object: impl Into<StoreObjectId>,
        property: PropertyId,
    ) -> Option<&Column> {
        let object = object.into();

        self.mapping
            .property_mappings(property, object.kind())
            .iter()
            .map(|id| self.db.column(self.mapping.column_mapping(*id).column))
            .find(|column| column.table == object)
    }

    /// The columns storing the given properties within the object, or `None`
    /// if any of them is not stored there.
    pub fn columns_for_properties(
        &self,
        object: impl Into<StoreObjectId>,
        properties: &[PropertyId],
    ) -> Option<Vec<ColumnId>> {
        let object = object.into();

        properties
            .iter()
            .map(|property| {
                self.find_column_for_property(object, *property)
                    .map(|column| column.id)
            })
            .collect()
    }

    /// The table holding the entity type's own rows
    pub fn table_for(&self, entity_type: EntityTypeId) -> Option<TableId> {
        let id = self.mapping.main_table_mapping(entity_type)?;
        self.mapping.table_mapping(id).table.as_table()
    }

    /// The table and columns referenced by a logical foreign key, or `None`
    /// when the principal is not stored in a single table.
    pub fn principal_table_for(&self, fk: app::ForeignKeyId) -> Option<(TableId, Vec<ColumnId>)> {
        let fk = self.app.foreign_key(fk);
        let principal = fk.principal;
        let key = self.app.key(fk.principal_key);

        if self.app.mapping_strategy(principal) == app::MappingStrategy::Tpc
            && self.app.derived_types(principal).next().is_some()
        {
            return None;
        }

        let main = self.mapping.main_table_mapping(principal);
        let candidates = main.into_iter().chain(
            self.mapping
                .entity_type_mappings(principal, db::StoreObjectKind::Table)
                .iter()
                .copied(),
        );

        for id in candidates {
            let Some(table) = self.mapping.table_mapping(id).table.as_table() else {
                continue;
            };

            if let Some(columns) = self.columns_for_properties(table, &key.properties) {
                return Some((table, columns));
            }
        }

        None
    }

    /// The store type mapping of a column mapping, resolved on first use.
    pub fn type_mapping(&self, id: ColumnMappingId) -> Result<&TypeMapping> {
        let column_mapping = self.mapping.column_mapping(id);

        column_mapping.type_mapping.get_or_try_init(|| {
            let column = self.db.column(column_mapping.column);
            if let Some(type_mapping) = &column.type_mapping {
                return Ok(type_mapping.clone());
            }

            let property = self.app.property(column_mapping.property);
            self.type_mappings
                .find_mapping(property, &self.identifier(column.table))
        })
    }

    /// Reads the column's value from entity entries.
    ///
    /// Fails when the database capability has no dynamic code support.
    pub fn column_accessors(&self, id: ColumnId) -> Result<&ColumnAccessors> {
        let column = self.db.column(id);

        column.accessors.get_or_try_init(|| {
            if !self.capability.dynamic_code {
                return Err(Error::unsupported_feature(format!(
                    "accessors for column `{}` require dynamic code support",
                    column.name
                )));
            }

            let sources = column
                .property_mappings
                .iter()
                .map(|id| {
                    let column_mapping = self.mapping.column_mapping(id);
                    let table_mapping = self.mapping.table_mapping(column_mapping.table_mapping);
                    (table_mapping.entity_type, column_mapping.property)
                })
                .collect();

            Ok(ColumnAccessors::new(&column.name, sources))
        })
    }

    pub fn row_key_value_factory(&self, id: UniqueConstraintId) -> &RowKeyValueFactory {
        let constraint = self.db.unique_constraint(id);

        constraint
            .row_key_value_factory
            .get_or_init(|| RowKeyValueFactory::new(self.key_columns(&constraint.columns)))
    }

    pub fn row_index_value_factory(&self, id: TableIndexId) -> &RowIndexValueFactory {
        let index = self.db.index(id);

        index.row_index_value_factory.get_or_init(|| {
            RowIndexValueFactory::new(self.key_columns(&index.columns), index.is_unique)
        })
    }

    fn key_columns(&self, columns: &[ColumnId]) -> Vec<(String, crate::row::ValueComparer)> {
        columns
            .iter()
            .map(|id| {
                let column = self.db.column(*id);
                (column.name.clone(), column.comparer)
            })
            .collect()
    }
}
