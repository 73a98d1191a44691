use super::BuildSchema;
use crate::{
    schema::{
        app::{
            self, EntityTypeId, ProcedureParameter, PropertyId, StoreOperation,
            StoredProcedureConfig, ValueGenerated,
        },
        db::{
            self, ColumnKind, StoreObjectIdentifier, StoreObjectKind, StoreStoredProcedure,
            StoredProcedureId, TableBase,
        },
        mapping::{TableMappingId, TableMappingKind},
    },
    Error, Result,
};
use std::collections::BTreeMap;
use tracing::debug;

impl BuildSchema<'_> {
    pub(super) fn build_procedures(&mut self) -> Result<()> {
        let app = self.app.clone();

        for entity in app.entity_types() {
            let configs = [
                (StoreOperation::Insert, &entity.insert_procedure),
                (StoreOperation::Update, &entity.update_procedure),
                (StoreOperation::Delete, &entity.delete_procedure),
            ];

            for (operation, config) in configs {
                let Some(config) = config else {
                    continue;
                };

                let Some(main) = self.schema.mapping.main_table_mapping(entity.id) else {
                    return Err(Error::invalid_schema(format!(
                        "entity type `{}` configures an {operation} stored procedure but is not \
                         mapped to a table",
                        entity.name
                    )));
                };

                self.build_procedure(entity.id, main, operation, config)?;
            }
        }

        Ok(())
    }

    fn build_procedure(
        &mut self,
        entity_type: EntityTypeId,
        main: TableMappingId,
        operation: StoreOperation,
        config: &StoredProcedureConfig,
    ) -> Result<()> {
        let app = self.app.clone();
        let table = self.schema.mapping.table_mapping(main).table;
        let table_identifier = self.schema.identifier(table);

        let name = config
            .name
            .clone()
            .unwrap_or_else(|| format!("{}_{operation}", app.entity_type(entity_type).name));
        let schema = config
            .schema
            .clone()
            .or_else(|| table_identifier.schema.clone());

        let identifier = StoreObjectIdentifier {
            kind: StoreObjectKind::StoredProcedure,
            name: name.clone(),
            schema: schema.clone(),
        };

        if self.schema.db.find_object(&identifier).is_some() {
            return Err(Error::invalid_schema(format!(
                "stored procedure `{name}` is configured for more than one operation"
            )));
        }

        let id = StoredProcedureId(self.schema.db.procedures.len());
        self.schema.db.procedures.push(StoreStoredProcedure {
            id,
            base: TableBase::new(&name, schema.as_deref()),
            parameters: vec![],
            parameter_lookup: BTreeMap::new(),
            result_columns: vec![],
            rows_affected_parameter: None,
            entity_type,
            operation,
        });
        self.schema.db.lookup.insert(identifier.clone(), id.into());

        let includes_derived_types = self.schema.mapping.table_mapping(main).includes_derived_types;
        let mapping = self.add_table_mapping(
            entity_type,
            id.into(),
            includes_derived_types,
            None,
            TableMappingKind::StoredProcedure {
                operation,
                table_mapping: Some(main),
            },
        )?;

        if let TableMappingKind::Table {
            insert_procedure,
            update_procedure,
            delete_procedure,
        } = &mut self.schema.mapping.table_mapping_mut(main).kind
        {
            let slot = match operation {
                StoreOperation::Insert => insert_procedure,
                StoreOperation::Update => update_procedure,
                StoreOperation::Delete => delete_procedure,
            };
            *slot = Some(mapping);
        }

        let (parameters, result_columns) = match &config.parameters {
            Some(parameters) => (parameters.clone(), config.result_columns.clone()),
            None => default_parameters(&app, operation, &self.mapped_properties(main)),
        };

        for (position, parameter) in parameters.iter().enumerate() {
            let name = match (&parameter.name, parameter.property) {
                (Some(name), _) => name.clone(),
                (None, Some(property)) => {
                    let column = app.property(property).column_name_for(&table_identifier);
                    if parameter.original_value {
                        format!("{column}_Original")
                    } else {
                        column.to_string()
                    }
                }
                (None, None) => "RowsAffected".to_string(),
            };

            if self.schema.db.procedure(id).parameter_lookup.contains_key(&name) {
                return Err(Error::invalid_schema(format!(
                    "stored procedure `{}` has more than one parameter named `{name}`",
                    identifier.name
                )));
            }

            let store_type = match parameter.property {
                Some(property) => {
                    self.type_mappings()
                        .find_mapping(app.property(property), &identifier)?
                        .store_type
                }
                None => db::Type::Integer(4),
            };

            let kind = ColumnKind::Parameter {
                position,
                direction: parameter.direction,
            };
            let column = self.add_column(id.into(), &name, kind, store_type);

            let procedure = &mut self.schema.db.procedures[id.0];
            procedure.parameters.push(column);
            procedure.parameter_lookup.insert(name, column);

            match parameter.property {
                Some(property) => {
                    self.schema.db.columns[column.0].is_nullable = app.property(property).nullable;
                    self.add_column_mapping(mapping, property, column);
                }
                None => self.schema.db.procedures[id.0].rows_affected_parameter = Some(column),
            }
        }

        for (position, property) in result_columns.into_iter().enumerate() {
            let definition = app.property(property);
            let name = definition.column_name_for(&table_identifier);

            if self.schema.db.procedure(id).base.columns.contains_key(name) {
                return Err(Error::invalid_schema(format!(
                    "stored procedure `{}` has more than one result column named `{name}`",
                    identifier.name
                )));
            }

            let store_type = self
                .type_mappings()
                .find_mapping(definition, &identifier)?
                .store_type;
            let column = self.add_column(id.into(), name, ColumnKind::ResultColumn { position }, store_type);

            self.schema.db.columns[column.0].is_nullable = definition.nullable;
            self.schema.db.procedures[id.0].result_columns.push(column);
            self.add_column_mapping(mapping, property, column);
        }

        debug!(
            procedure = %identifier.name,
            %operation,
            parameters = self.schema.db.procedure(id).parameters.len(),
            result_columns = self.schema.db.procedure(id).result_columns.len(),
            "created stored procedure"
        );

        Ok(())
    }

    /// Properties stored through the table mapping, in declaration order
    fn mapped_properties(&self, mapping: TableMappingId) -> Vec<PropertyId> {
        let table_mapping = self.schema.mapping.table_mapping(mapping);

        self.app
            .properties(table_mapping.entity_type)
            .into_iter()
            .filter(|property| {
                table_mapping
                    .column_mappings
                    .iter()
                    .any(|id| self.schema.mapping.column_mapping(id).property == *property)
            })
            .collect()
    }
}

/// Parameters and result columns derived from the stored properties.
///
/// Store generated values come back as result columns. Keys are matched on
/// their original values.
fn default_parameters(
    app: &app::Schema,
    operation: StoreOperation,
    properties: &[PropertyId],
) -> (Vec<ProcedureParameter>, Vec<PropertyId>) {
    let generated = |property: &PropertyId| app.property(*property).value_generated;
    let (keys, values): (Vec<PropertyId>, Vec<PropertyId>) = properties
        .iter()
        .copied()
        .partition(|property| app.is_primary_key(*property));

    let input = |properties: &[PropertyId]| {
        properties
            .iter()
            .filter(|property| generated(property) == ValueGenerated::Never)
            .map(|property| ProcedureParameter::input(*property))
            .collect::<Vec<_>>()
    };
    let original = || {
        keys.iter()
            .map(|property| ProcedureParameter::original(*property))
            .collect::<Vec<_>>()
    };

    match operation {
        StoreOperation::Insert => (
            input(properties),
            properties
                .iter()
                .copied()
                .filter(|property| generated(property) != ValueGenerated::Never)
                .collect(),
        ),
        StoreOperation::Update => (
            original().into_iter().chain(input(&values)).collect(),
            values
                .iter()
                .copied()
                .filter(|property| generated(property) == ValueGenerated::OnAddOrUpdate)
                .collect(),
        ),
        StoreOperation::Delete => (original(), vec![]),
    }
}
