mod constraints;
mod procedure;
mod table;

use super::{
    app::{self, PropertyId},
    db::TableId,
    mapping::{Mapping, TableMappingId},
    Schema,
};
use crate::{
    driver::{self, TypeMappingSource},
    Result,
};
use std::{collections::HashMap, sync::Arc};
use tracing::info;

#[derive(Debug, Default)]
pub struct Builder {
    /// If set, prefix all table names with this string
    table_name_prefix: Option<String>,

    /// Schema of objects that don't configure one
    default_schema: Option<String>,

    /// Resolves store types. Defaults to the database capability.
    type_mapping_source: Option<Arc<dyn TypeMappingSource>>,
}

/// Used to track state during the build process
struct BuildSchema<'a> {
    /// Build options
    builder: &'a Builder,

    db: &'a driver::Capability,

    app: Arc<app::Schema>,

    /// The model as it is built
    schema: Schema,

    /// Properties still to be mapped to columns, per table mapping
    pending: Vec<(TableMappingId, Vec<PropertyId>)>,

    /// Generated constraint names per table, used to uniquify new ones
    generated: HashMap<(TableId, ConstraintKind), Vec<(String, Logical)>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ConstraintKind {
    Key,
    ForeignKey,
    Index,
}

/// The logical construct a generated name was derived for
#[derive(Debug, Clone, Copy)]
enum Logical {
    Key(app::KeyId),
    ForeignKey(app::ForeignKeyId),
    Index(app::IndexId),
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.table_name_prefix = Some(prefix.to_string());
        self
    }

    pub fn default_schema(&mut self, schema: &str) -> &mut Self {
        self.default_schema = Some(schema.to_string());
        self
    }

    pub fn type_mapping_source(&mut self, source: Arc<dyn TypeMappingSource>) -> &mut Self {
        self.type_mapping_source = Some(source);
        self
    }

    /// Derives the relational model of `app` for the given database.
    pub fn build(&self, app: app::Schema, db: &driver::Capability) -> Result<Schema> {
        // Initial verification pass so the rest of the build can rely on
        // every reference resolving.
        app.verify()?;

        let app = Arc::new(app);
        let type_mappings = self
            .type_mapping_source
            .clone()
            .unwrap_or_else(|| Arc::new(db.clone()));

        let mut builder = BuildSchema {
            builder: self,
            db,
            app: app.clone(),
            schema: Schema {
                app,
                db: Default::default(),
                mapping: Mapping::default(),
                capability: db.clone(),
                type_mappings,
            },
            pending: vec![],
            generated: HashMap::new(),
        };

        // Link every entity type with the objects it is read from and
        // written to. Columns are created once all objects are known since
        // nullability depends on who else shares the object.
        builder.build_table_mappings()?;
        builder.build_view_mappings()?;
        builder.build_sql_query_mappings()?;
        builder.build_function_mappings()?;
        builder.build_columns()?;
        builder.build_shared_principals();
        builder.build_procedures()?;

        // Constraints reference keys, so keys go first.
        builder.build_keys()?;
        builder.build_foreign_keys()?;
        builder.build_indices()?;
        builder.build_check_constraints()?;

        builder.order_columns();

        let schema = builder.schema;

        // Verify the schema structure
        schema.verify()?;

        info!(
            tables = schema.db.tables.len(),
            views = schema.db.views.len(),
            functions = schema.db.functions.len(),
            procedures = schema.db.procedures.len(),
            queries = schema.db.queries.len(),
            "built relational model"
        );

        Ok(schema)
    }
}

impl BuildSchema<'_> {
    fn type_mappings(&self) -> Arc<dyn TypeMappingSource> {
        self.schema.type_mappings.clone()
    }

    fn max_identifier_length(&self) -> usize {
        self.db.max_identifier_length
    }
}
