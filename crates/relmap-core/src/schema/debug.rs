//! Indented text dumps of the relational model, for diagnostics. The format
//! is not stable.

use super::{
    app::Facets,
    db::{ColumnId, ColumnKind, StoreObjectId},
    mapping::{TableMappingId, TableMappingKind},
    Schema,
};
use std::fmt::{self, Write};

#[derive(Debug, Clone, Copy, Default)]
pub struct DebugOptions {
    /// Only render the header line
    pub single_line: bool,

    /// Include column and table facets
    pub include_annotations: bool,

    /// Leading spaces of the first line
    pub indent: usize,
}

impl Schema {
    pub fn to_debug_string(&self, options: DebugOptions) -> String {
        Model {
            schema: self,
            options,
        }
        .to_string()
    }

    pub fn object_debug_string(&self, object: StoreObjectId, options: DebugOptions) -> String {
        Object {
            schema: self,
            object,
            options,
        }
        .to_string()
    }
}

struct Model<'a> {
    schema: &'a Schema,
    options: DebugOptions,
}

struct Object<'a> {
    schema: &'a Schema,
    object: StoreObjectId,
    options: DebugOptions,
}

impl fmt::Display for Model<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:indent$}RelationalModel:", "", indent = self.options.indent)?;

        if self.options.single_line {
            return Ok(());
        }

        let options = DebugOptions {
            indent: self.options.indent + 2,
            ..self.options
        };

        for object in self.schema.db.objects() {
            let object = Object {
                schema: self.schema,
                object: object.id(),
                options,
            };
            write!(f, "\n{object}")?;
        }

        Ok(())
    }
}

impl fmt::Display for Object<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let schema = self.schema;
        let db = &schema.db;
        let object = db.object(self.object);
        let indent = self.options.indent;

        write!(
            f,
            "{:indent$}{}: {}",
            "",
            self.object.kind(),
            object.base().display_name()
        )?;

        if let StoreObjectId::Function(id) = self.object {
            let function = db.function(id);
            let parameters = function
                .parameters
                .iter()
                .map(|parameter| format!("{} {}", parameter.name, parameter.store_type))
                .collect::<Vec<_>>();

            write!(f, "({})", parameters.join(", "))?;

            if let Some(return_type) = &function.return_type {
                write!(f, " -> {return_type}")?;
            }
        }

        if self.options.single_line {
            return Ok(());
        }

        if self.options.include_annotations {
            if let Some(comment) = &object.base().comment {
                write!(f, "\n{:indent$}Comment: {comment}", "", indent = indent + 2)?;
            }
        }

        if let StoreObjectId::StoredProcedure(id) = self.object {
            let procedure = db.procedure(id);

            if !procedure.parameters.is_empty() {
                write!(f, "\n{:indent$}Parameters:", "", indent = indent + 2)?;
                for column in &procedure.parameters {
                    self.column(f, *column, indent + 4)?;
                }
            }
        }

        if !object.column_ids().is_empty() {
            let heading = match self.object {
                StoreObjectId::StoredProcedure(_) => "Result columns:",
                _ => "Columns:",
            };

            write!(f, "\n{:indent$}{heading}", "", indent = indent + 2)?;
            for column in object.column_ids() {
                self.column(f, *column, indent + 4)?;
            }
        }

        if let StoreObjectId::Table(id) = self.object {
            let table = db.table(id);

            if !table.unique_constraints.is_empty() {
                write!(f, "\n{:indent$}Keys:", "", indent = indent + 2)?;
                for id in table.unique_constraints.values() {
                    let key = db.unique_constraint(*id);
                    write!(
                        f,
                        "\n{:indent$}{} {}",
                        "",
                        key.name,
                        self.column_list(&key.columns),
                        indent = indent + 4
                    )?;
                    if key.is_primary_key {
                        f.write_str(" PrimaryKey")?;
                    }
                }
            }

            if !table.foreign_keys.is_empty() {
                write!(f, "\n{:indent$}Foreign keys:", "", indent = indent + 2)?;
                for id in &table.foreign_keys {
                    let fk = db.foreign_key(id);
                    write!(
                        f,
                        "\n{:indent$}{} {} -> {} {} {}",
                        "",
                        fk.name,
                        self.column_list(&fk.columns),
                        db.table(fk.principal_table).base.display_name(),
                        self.column_list(&fk.principal_columns),
                        fk.on_delete,
                        indent = indent + 4
                    )?;
                }
            }

            if !table.indices.is_empty() {
                write!(f, "\n{:indent$}Indexes:", "", indent = indent + 2)?;
                for id in table.indices.values() {
                    let index = db.index(*id);
                    write!(
                        f,
                        "\n{:indent$}{} {}",
                        "",
                        index.name,
                        self.column_list(&index.columns),
                        indent = indent + 4
                    )?;
                    if index.is_unique {
                        f.write_str(" Unique")?;
                    }
                    if let Some(filter) = &index.filter {
                        write!(f, " Filter: {filter}")?;
                    }
                }
            }

            if !table.check_constraints.is_empty() {
                write!(f, "\n{:indent$}Check constraints:", "", indent = indent + 2)?;
                for id in table.check_constraints.values() {
                    let check = db.check_constraint(*id);
                    write!(
                        f,
                        "\n{:indent$}{} \"{}\"",
                        "",
                        check.name,
                        check.sql,
                        indent = indent + 4
                    )?;
                }
            }
        }

        if !object.mappings().is_empty() {
            write!(f, "\n{:indent$}Mappings:", "", indent = indent + 2)?;
            for id in object.mappings() {
                self.mapping(f, id, indent + 4)?;
            }
        }

        Ok(())
    }
}

impl Object<'_> {
    fn column(&self, f: &mut fmt::Formatter<'_>, id: ColumnId, indent: usize) -> fmt::Result {
        let column = self.schema.db.column(id);

        write!(
            f,
            "\n{:indent$}{} ({}) {}",
            "",
            column.name,
            column.store_type,
            if column.is_nullable {
                "Nullable"
            } else {
                "NonNullable"
            }
        )?;

        if let ColumnKind::Parameter { direction, .. } = column.kind {
            write!(f, " {direction:?}")?;
        }

        if self.options.include_annotations {
            annotations(f, &column.facets, indent + 2)?;
        }

        Ok(())
    }

    fn mapping(&self, f: &mut fmt::Formatter<'_>, id: TableMappingId, indent: usize) -> fmt::Result {
        let schema = self.schema;
        let mapping = schema.mapping.table_mapping(id);

        write!(
            f,
            "\n{:indent$}{} - {}",
            "",
            schema.app.entity_type(mapping.entity_type).name,
            schema.db.object(mapping.table).base().display_name()
        )?;

        if mapping.includes_derived_types {
            f.write_str(" IncludesDerivedTypes")?;
        }

        match mapping.is_shared_table_principal {
            Some(true) => f.write_str(" IsSharedTablePrincipal")?,
            Some(false) => f.write_str(" !IsSharedTablePrincipal")?,
            None => {}
        }

        match mapping.is_split_entity_type_principal {
            Some(true) => f.write_str(" IsSplitEntityTypePrincipal")?,
            Some(false) => f.write_str(" !IsSplitEntityTypePrincipal")?,
            None => {}
        }

        match mapping.kind {
            TableMappingKind::Function { is_default: true }
            | TableMappingKind::SqlQuery { is_default: true } => f.write_str(" IsDefault")?,
            TableMappingKind::StoredProcedure { operation, .. } => write!(f, " {operation}")?,
            _ => {}
        }

        Ok(())
    }

    fn column_list(&self, columns: &[ColumnId]) -> String {
        let mut out = String::from("{");

        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            // Writing to a String cannot fail
            let _ = write!(out, "'{}'", self.schema.db.column(*column).name);
        }

        out.push('}');
        out
    }
}

fn annotations(f: &mut fmt::Formatter<'_>, facets: &Facets, indent: usize) -> fmt::Result {
    let entries = [
        ("Comment", &facets.comment),
        ("DefaultValueSql", &facets.default_sql),
        ("ComputedColumnSql", &facets.computed_sql),
        ("Collation", &facets.collation),
    ];

    for (name, value) in entries {
        if let Some(value) = value {
            write!(f, "\n{:indent$}{name}: {value}", "")?;
        }
    }

    Ok(())
}
