use super::BuildSchema;
use crate::{
    cache::Cached,
    driver::TypeMapping,
    schema::{
        app::{EntityTypeId, MappingStrategy, PropertyId, StoreName, TableConfig},
        cmp::ColumnNameComparer,
        db::{
            self, Column, ColumnId, ColumnKind, SqlQuery, SqlQueryId, StoreFunction,
            StoreFunctionId, StoreFunctionParameter, StoreObjectId, StoreObjectIdentifier,
            StoreObjectKind, Table, TableBase, TableId, View, ViewId,
        },
        mapping::{ColumnMapping, ColumnMappingId, TableMapping, TableMappingId, TableMappingKind},
        SortedIds,
    },
    Error, Result,
};
use std::mem;
use tracing::{debug, trace};

/// A table an entity type is mapped to, and the properties it holds there
struct Target {
    table: StoreName,
    includes_derived_types: bool,
    split_principal: Option<bool>,
    properties: Vec<PropertyId>,

    /// The table holding the entity type's own rows
    main: bool,
}

impl BuildSchema<'_> {
    pub(super) fn build_table_mappings(&mut self) -> Result<()> {
        let app = self.app.clone();

        for entity in app.entity_types() {
            for target in self.table_targets(entity.id) {
                let table = self.table(&target.table);

                let id = self.add_table_mapping(
                    entity.id,
                    table.into(),
                    target.includes_derived_types,
                    target.split_principal,
                    TableMappingKind::table(),
                )?;

                if target.main {
                    self.schema.mapping.main_table_mappings.insert(entity.id, id);

                    let base = &mut self.schema.db.tables[table.0].base;
                    if base.comment.is_none() {
                        base.comment.clone_from(&entity.comment);
                    }
                }

                self.pending.push((id, target.properties));
            }
        }

        Ok(())
    }

    fn table_targets(&self, id: EntityTypeId) -> Vec<Target> {
        let app = &*self.app;
        let entity = app.entity_type(id);
        let primary_key = app
            .primary_key(id)
            .map(|key| key.properties.clone())
            .unwrap_or_default();

        let mut targets = vec![];

        match app.mapping_strategy(id) {
            MappingStrategy::Tph => {
                if let Some(table) = self.table_name(app.root(id)) {
                    targets.push(Target {
                        table,
                        includes_derived_types: true,
                        split_principal: None,
                        properties: app.properties(id),
                        main: true,
                    });
                }
            }
            MappingStrategy::Tpt => {
                // Each ancestor's table holds the key and the properties the
                // ancestor declares.
                for ancestor in app.ancestors(id) {
                    let Some(table) = self.table_name(ancestor) else {
                        continue;
                    };

                    let mut properties = primary_key.clone();
                    properties.extend(
                        app.entity_type(ancestor)
                            .properties
                            .iter()
                            .map(|property| property.id)
                            .filter(|property| !primary_key.contains(property)),
                    );

                    targets.push(Target {
                        table,
                        includes_derived_types: ancestor == id,
                        split_principal: None,
                        properties,
                        main: ancestor == id,
                    });
                }
            }
            MappingStrategy::Tpc => {
                if !entity.is_abstract {
                    if let Some(table) = self.table_name(id) {
                        targets.push(Target {
                            table,
                            includes_derived_types: false,
                            split_principal: None,
                            properties: app.properties(id),
                            main: true,
                        });
                    }
                }
            }
        }

        // Entity splitting moves fragment properties out of the main table.
        let Some(main) = targets.iter().position(|target| target.main) else {
            return targets;
        };

        let mut fragments = vec![];
        for ancestor in app.ancestors(id) {
            for fragment in &app.entity_type(ancestor).fragments {
                let moved = fragment
                    .properties
                    .iter()
                    .copied()
                    .filter(|property| {
                        !primary_key.contains(property) && targets[main].properties.contains(property)
                    })
                    .collect::<Vec<_>>();

                if moved.is_empty() {
                    continue;
                }

                targets[main]
                    .properties
                    .retain(|property| !moved.contains(property));

                let mut properties = primary_key.clone();
                properties.extend(moved);

                fragments.push(Target {
                    table: self.prefixed(&fragment.table),
                    includes_derived_types: targets[main].includes_derived_types,
                    split_principal: Some(false),
                    properties,
                    main: false,
                });
            }
        }

        if !fragments.is_empty() {
            targets[main].split_principal = Some(true);
            targets.extend(fragments);
        }

        targets
    }

    /// The table configured for the entity type, with the prefix and default
    /// schema applied
    fn table_name(&self, id: EntityTypeId) -> Option<StoreName> {
        let entity = self.app.entity_type(id);

        match &entity.table {
            TableConfig::Default => Some(
                self.prefixed(&StoreName::new(entity.name.plural_upper_camel_case())),
            ),
            TableConfig::Named(name) => Some(self.prefixed(name)),
            TableConfig::Unmapped => None,
        }
    }

    fn prefixed(&self, name: &StoreName) -> StoreName {
        StoreName {
            name: match &self.builder.table_name_prefix {
                Some(prefix) => format!("{prefix}{}", name.name),
                None => name.name.clone(),
            },
            schema: self.qualify(name.schema.as_ref()),
        }
    }

    pub(super) fn qualify(&self, schema: Option<&String>) -> Option<String> {
        schema.or(self.builder.default_schema.as_ref()).cloned()
    }

    /// Finds or creates the table
    fn table(&mut self, name: &StoreName) -> TableId {
        let identifier = StoreObjectIdentifier::table(&name.name, name.schema.clone());

        if let Some(StoreObjectId::Table(id)) = self.schema.db.find_object(&identifier) {
            return id;
        }

        let id = TableId(self.schema.db.tables.len());
        self.schema
            .db
            .tables
            .push(Table::new(id, &name.name, name.schema.as_deref()));
        self.schema.db.lookup.insert(identifier, id.into());

        debug!(table = %name.name, schema = ?name.schema, "created table");
        id
    }

    pub(super) fn add_table_mapping(
        &mut self,
        entity_type: EntityTypeId,
        object: StoreObjectId,
        includes_derived_types: bool,
        split_principal: Option<bool>,
        kind: TableMappingKind,
    ) -> Result<TableMappingId> {
        let mapping = &self.schema.mapping;
        let duplicate = mapping
            .entity_type_mappings(entity_type, object.kind())
            .iter()
            .any(|id| mapping.table_mapping(*id).table == object);

        if duplicate {
            return Err(Error::invalid_schema(format!(
                "entity type `{}` is mapped to `{}` more than once",
                self.app.entity_type(entity_type).name,
                self.schema.db.object(object).base().display_name()
            )));
        }

        let id = TableMappingId(self.schema.mapping.table_mappings.len());
        self.schema.mapping.table_mappings.push(Some(TableMapping {
            id,
            entity_type,
            table: object,
            includes_derived_types,
            is_shared_table_principal: None,
            is_split_entity_type_principal: split_principal,
            column_mappings: SortedIds::new(),
            kind,
        }));

        self.schema
            .mapping
            .entity_types
            .entry((entity_type, object.kind()))
            .or_default()
            .push(id);

        self.schema.link_table_mapping(id);

        debug!(
            entity_type = %self.app.entity_type(entity_type).name,
            object = %self.schema.db.object(object).base().display_name(),
            kind = %object.kind(),
            "mapped entity type"
        );

        Ok(id)
    }

    pub(super) fn build_view_mappings(&mut self) -> Result<()> {
        let app = self.app.clone();

        for entity in app.entity_types() {
            let tph = app.mapping_strategy(entity.id) == MappingStrategy::Tph;

            // Under TPH the nearest ancestor declaring a view provides it
            let declaring = if tph {
                app.ancestors(entity.id)
                    .into_iter()
                    .rev()
                    .find(|ancestor| app.entity_type(*ancestor).view.is_some())
            } else {
                entity.view.is_some().then_some(entity.id)
            };

            let Some(declaring) = declaring.map(|id| app.entity_type(id)) else {
                continue;
            };
            let Some(name) = &declaring.view else {
                continue;
            };

            let view = self.view(name, declaring.view_definition.as_deref());
            let id = self.add_table_mapping(entity.id, view.into(), tph, None, TableMappingKind::View)?;
            self.pending.push((id, app.properties(entity.id)));
        }

        Ok(())
    }

    fn view(&mut self, name: &StoreName, definition_sql: Option<&str>) -> ViewId {
        let schema = self.qualify(name.schema.as_ref());
        let identifier = StoreObjectIdentifier::view(&name.name, schema.clone());

        if let Some(StoreObjectId::View(id)) = self.schema.db.find_object(&identifier) {
            return id;
        }

        let id = ViewId(self.schema.db.views.len());
        self.schema.db.views.push(View {
            id,
            base: TableBase::new(&name.name, schema.as_deref()),
            definition_sql: definition_sql.map(str::to_string),
        });
        self.schema.db.lookup.insert(identifier, id.into());

        debug!(view = %name.name, "created view");
        id
    }

    pub(super) fn build_sql_query_mappings(&mut self) -> Result<()> {
        let app = self.app.clone();

        for entity in app.entity_types() {
            let tph = app.mapping_strategy(entity.id) == MappingStrategy::Tph;

            let declaring = if tph {
                app.ancestors(entity.id)
                    .into_iter()
                    .rev()
                    .find(|ancestor| app.entity_type(*ancestor).sql_query.is_some())
            } else {
                entity.sql_query.is_some().then_some(entity.id)
            };

            let Some(declaring) = declaring.map(|id| app.entity_type(id)) else {
                continue;
            };
            let Some(sql) = &declaring.sql_query else {
                continue;
            };

            let name = format!("{}.MappedSqlQuery", declaring.name);
            let query = self.sql_query(&name, sql);
            let id = self.add_table_mapping(
                entity.id,
                query.into(),
                tph,
                None,
                TableMappingKind::SqlQuery { is_default: true },
            )?;
            self.pending.push((id, app.properties(entity.id)));
        }

        Ok(())
    }

    fn sql_query(&mut self, name: &str, sql: &str) -> SqlQueryId {
        let identifier = StoreObjectIdentifier {
            kind: StoreObjectKind::SqlQuery,
            name: name.to_string(),
            schema: None,
        };

        if let Some(StoreObjectId::SqlQuery(id)) = self.schema.db.find_object(&identifier) {
            return id;
        }

        let id = SqlQueryId(self.schema.db.queries.len());
        self.schema.db.queries.push(SqlQuery {
            id,
            base: TableBase::new(name, None),
            sql: sql.to_string(),
        });
        self.schema.db.lookup.insert(identifier, id.into());

        debug!(query = %name, "created SQL query");
        id
    }

    /// Creates store functions, sharing one between logical functions with
    /// the same name, schema and parameter store types.
    pub(super) fn build_function_mappings(&mut self) -> Result<()> {
        let app = self.app.clone();
        let db = self.db;
        let storage_types = &db.storage_types;

        for function in &app.functions {
            let parameters = function
                .parameters
                .iter()
                .map(|parameter| {
                    db::Type::from_app(&parameter.ty, parameter.store_type.as_ref(), storage_types)
                })
                .collect::<Result<Vec<_>>>()?;
            let schema = self.qualify(function.schema.as_ref());

            let existing = self
                .schema
                .db
                .functions
                .iter()
                .find(|store| {
                    store.base.name == function.name
                        && store.base.schema == schema
                        && store.signature().into_iter().eq(parameters.iter())
                })
                .map(|store| store.id);

            let id = match existing {
                Some(id) => {
                    let store = &mut self.schema.db.functions[id.0];
                    store.db_functions.push(function.id);
                    for (i, parameter) in store.parameters.iter_mut().enumerate() {
                        parameter.db_function_parameters.push((function.id, i));
                    }

                    trace!(function = %function.model_name, store = %function.name, "consolidated overload");
                    id
                }
                None => {
                    let id = StoreFunctionId(self.schema.db.functions.len());
                    let return_type = function
                        .return_type
                        .map(|ty| db::Type::from_app(&ty, None, storage_types))
                        .transpose()?;

                    self.schema.db.functions.push(StoreFunction {
                        id,
                        base: TableBase::new(&function.name, schema.as_deref()),
                        parameters: function
                            .parameters
                            .iter()
                            .zip(parameters)
                            .enumerate()
                            .map(|(i, (parameter, store_type))| StoreFunctionParameter {
                                name: parameter.name.clone(),
                                store_type,
                                db_function_parameters: vec![(function.id, i)],
                            })
                            .collect(),
                        return_type,
                        is_builtin: function.is_builtin,
                        db_functions: vec![function.id],
                    });

                    debug!(function = %function.name, "created store function");
                    id
                }
            };

            let Some(entity_type) = function.returns else {
                continue;
            };

            let object = StoreObjectId::from(id);
            let mapped = self
                .schema
                .mapping
                .entity_type_mappings(entity_type, StoreObjectKind::Function)
                .iter()
                .any(|mapping| self.schema.mapping.table_mapping(*mapping).table == object);

            if mapped {
                continue;
            }

            let is_default =
                app.entity_type(entity_type).function.as_deref() == Some(function.model_name.as_str());
            let mapping = self.add_table_mapping(
                entity_type,
                object,
                true,
                None,
                TableMappingKind::Function { is_default },
            )?;
            self.pending.push((mapping, app.properties(entity_type)));
        }

        Ok(())
    }

    pub(super) fn build_columns(&mut self) -> Result<()> {
        for (mapping, properties) in mem::take(&mut self.pending) {
            for property in properties {
                self.map_property(mapping, property)?;
            }
        }

        Ok(())
    }

    /// Maps the property to the column of the same name in the mapping's
    /// object, creating the column when it does not exist yet.
    pub(super) fn map_property(
        &mut self,
        mapping: TableMappingId,
        property: PropertyId,
    ) -> Result<ColumnMappingId> {
        let app = self.app.clone();
        let object = self.schema.mapping.table_mapping(mapping).table;
        let identifier = self.schema.identifier(object);
        let definition = app.property(property);
        let name = definition.column_name_for(&identifier);

        let type_mapping = self.type_mappings().find_mapping(definition, &identifier)?;
        let nullable = self.schema.is_column_nullable(mapping, property);

        let column = match self.schema.db.object(object).find_column_id(name) {
            Some(id) => {
                self.merge_column(id, property, &type_mapping, nullable)?;
                id
            }
            None => {
                let explicit = definition.store_type_for(&identifier).is_some();
                let id = self.add_column(object, name, ColumnKind::Column, type_mapping.store_type.clone());
                let column = &mut self.schema.db.columns[id.0];
                column.is_nullable = nullable;
                column.comparer = type_mapping.comparer;
                column.facets = definition.facets.clone();
                if explicit {
                    column.type_mapping = Some(type_mapping);
                }
                id
            }
        };

        Ok(self.add_column_mapping(mapping, property, column))
    }

    pub(super) fn add_column(
        &mut self,
        object: StoreObjectId,
        name: &str,
        kind: ColumnKind,
        store_type: db::Type,
    ) -> ColumnId {
        let id = ColumnId(self.schema.db.columns.len());
        self.schema
            .db
            .columns
            .push(Column::new(id, name, object, kind, store_type));

        // Parameters are reached through their procedure, not by name.
        if !matches!(kind, ColumnKind::Parameter { .. }) {
            let base = self.schema.db.object_mut(object).base_mut();
            base.columns.insert(name.to_string(), id);
            base.column_order.push(id);
        }

        trace!(column = %name, ?kind, "created column");
        id
    }

    pub(super) fn add_column_mapping(
        &mut self,
        table_mapping: TableMappingId,
        property: PropertyId,
        column: ColumnId,
    ) -> ColumnMappingId {
        let id = ColumnMappingId(self.schema.mapping.column_mappings.len());
        self.schema.mapping.column_mappings.push(Some(ColumnMapping {
            id,
            property,
            column,
            table_mapping,
            type_mapping: Cached::new(),
        }));

        self.schema.attach_column_mapping(id);
        id
    }

    /// A second property stored in an existing column must agree on the
    /// store type.
    fn merge_column(
        &mut self,
        id: ColumnId,
        property: PropertyId,
        type_mapping: &TypeMapping,
        nullable: bool,
    ) -> Result<()> {
        let app = self.app.clone();
        let column = self.schema.db.column(id);

        if column.store_type != type_mapping.store_type {
            let describe = |property: PropertyId| {
                format!(
                    "'{}.{}'",
                    app.entity_type(property.entity_type).name,
                    app.property(property).name
                )
            };

            let existing = column
                .property_mappings
                .first()
                .map(|id| describe(self.schema.mapping.column_mapping(id).property))
                .unwrap_or_default();

            return Err(Error::invalid_schema(format!(
                "{existing} and {} are both mapped to column '{}' in '{}', but are configured \
                 with different store types ('{}' and '{}')",
                describe(property),
                column.name,
                self.schema.db.object(column.table).base().display_name(),
                column.store_type,
                type_mapping.store_type,
            )));
        }

        let facets = &app.property(property).facets;
        let column = &mut self.schema.db.columns[id.0];
        column.is_nullable |= nullable;
        column.facets.merge(facets);

        Ok(())
    }

    /// Decides which entity types own the rows of each shared object.
    pub(super) fn build_shared_principals(&mut self) {
        let objects = self
            .schema
            .db
            .objects()
            .map(|object| object.id())
            .collect::<Vec<_>>();

        for object in objects {
            self.schema.refresh_shared_principals(object);
        }
    }

    /// Key columns first, then the remaining columns by name.
    pub(super) fn order_columns(&mut self) {
        let db = &mut self.schema.db;

        for i in 0..db.tables.len() {
            let table = &db.tables[i];
            let primary_key = table
                .primary_key
                .map(|pk| {
                    db.unique_constraint(pk)
                        .columns
                        .iter()
                        .map(|column| db.column(*column).name.clone())
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();

            let comparer = ColumnNameComparer::new(primary_key);
            let mut order = table.base.column_order.clone();
            order.sort_by(|a, b| comparer.compare(&db.column(*a).name, &db.column(*b).name));

            db.tables[i].base.column_order = order;
        }
    }
}
