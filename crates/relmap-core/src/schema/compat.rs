//! Whether several logical constraints can share one physical constraint.
//!
//! Each check returns `Ok(false)` on a mismatch, or with `should_throw` an
//! error describing the mismatch.

use super::{
    app::{ForeignKeyId, IndexId, KeyId},
    db::{ColumnId, TableId},
    Schema,
};
use crate::{Error, ForeignKeyMismatch, IndexMismatch, Result};

pub fn foreign_keys_are_compatible(
    schema: &Schema,
    a: ForeignKeyId,
    b: ForeignKeyId,
    table: TableId,
    name: &str,
    should_throw: bool,
) -> Result<bool> {
    let (fa, fb) = (schema.app.foreign_key(a), schema.app.foreign_key(b));
    let (pa, pb) = (schema.principal_table_for(a), schema.principal_table_for(b));

    let principal_name = |principal: &Option<(TableId, Vec<ColumnId>)>| {
        principal
            .as_ref()
            .map(|(table, _)| schema.db.table(*table).base.display_name())
            .unwrap_or_default()
    };

    let mismatch = if pa.as_ref().map(|p| p.0) != pb.as_ref().map(|p| p.0) {
        Some(ForeignKeyMismatch::PrincipalTable {
            first: principal_name(&pa),
            second: principal_name(&pb),
        })
    } else if !same_columns(schema, table, &fa.properties, &fb.properties) {
        Some(ForeignKeyMismatch::Columns {
            first: column_names(schema, table, &fa.properties),
            second: column_names(schema, table, &fb.properties),
        })
    } else if pa.as_ref().map(|p| &p.1) != pb.as_ref().map(|p| &p.1) {
        let names = |principal: &Option<(TableId, Vec<ColumnId>)>| {
            principal
                .as_ref()
                .map(|(_, columns)| format_columns(schema, columns))
                .unwrap_or_default()
        };
        Some(ForeignKeyMismatch::PrincipalColumns {
            first: names(&pa),
            second: names(&pb),
        })
    } else if fa.unique != fb.unique {
        Some(ForeignKeyMismatch::Uniqueness)
    } else if fa.delete_behavior != fb.delete_behavior {
        Some(ForeignKeyMismatch::DeleteBehavior {
            first: fa.delete_behavior.to_string(),
            second: fb.delete_behavior.to_string(),
        })
    } else {
        None
    };

    let Some(mismatch) = mismatch else {
        return Ok(true);
    };

    if !should_throw {
        return Ok(false);
    }

    Err(Error::duplicate_foreign_key(
        schema.app.format_properties(&fa.properties),
        schema.app.entity_type(a.entity_type).name.to_string(),
        schema.app.format_properties(&fb.properties),
        schema.app.entity_type(b.entity_type).name.to_string(),
        schema.db.table(table).base.display_name(),
        name,
        mismatch,
    ))
}

pub fn indexes_are_compatible(
    schema: &Schema,
    a: IndexId,
    b: IndexId,
    table: TableId,
    name: &str,
    should_throw: bool,
) -> Result<bool> {
    let (ia, ib) = (schema.app.index(a), schema.app.index(b));

    let mismatch = if !same_columns(schema, table, &ia.properties, &ib.properties) {
        Some(IndexMismatch::Columns {
            first: column_names(schema, table, &ia.properties),
            second: column_names(schema, table, &ib.properties),
        })
    } else if ia.unique != ib.unique {
        Some(IndexMismatch::Uniqueness)
    } else if ia.is_descending() != ib.is_descending() {
        Some(IndexMismatch::SortOrder)
    } else if ia.filter != ib.filter {
        Some(IndexMismatch::Filter {
            first: ia.filter.clone().unwrap_or_default(),
            second: ib.filter.clone().unwrap_or_default(),
        })
    } else {
        None
    };

    let Some(mismatch) = mismatch else {
        return Ok(true);
    };

    if !should_throw {
        return Ok(false);
    }

    Err(Error::duplicate_index(
        schema.app.format_properties(&ia.properties),
        schema.app.entity_type(a.entity_type).name.to_string(),
        schema.app.format_properties(&ib.properties),
        schema.app.entity_type(b.entity_type).name.to_string(),
        schema.db.table(table).base.display_name(),
        name,
        mismatch,
    ))
}

pub fn keys_are_compatible(
    schema: &Schema,
    a: KeyId,
    b: KeyId,
    table: TableId,
    name: &str,
    should_throw: bool,
) -> Result<bool> {
    let (ka, kb) = (schema.app.key(a), schema.app.key(b));

    if same_columns(schema, table, &ka.properties, &kb.properties) {
        return Ok(true);
    }

    if !should_throw {
        return Ok(false);
    }

    Err(Error::duplicate_key(
        schema.app.format_properties(&ka.properties),
        schema.app.entity_type(a.entity_type).name.to_string(),
        schema.app.format_properties(&kb.properties),
        schema.app.entity_type(b.entity_type).name.to_string(),
        schema.db.table(table).base.display_name(),
        name,
        column_names(schema, table, &ka.properties),
        column_names(schema, table, &kb.properties),
    ))
}

fn same_columns(
    schema: &Schema,
    table: TableId,
    a: &[super::app::PropertyId],
    b: &[super::app::PropertyId],
) -> bool {
    schema.columns_for_properties(table, a) == schema.columns_for_properties(table, b)
}

fn column_names(schema: &Schema, table: TableId, properties: &[super::app::PropertyId]) -> String {
    let columns = properties
        .iter()
        .map(|property| {
            schema
                .find_column_for_property(table, *property)
                .map(|column| column.name.as_str())
                .unwrap_or("?")
        })
        .collect::<Vec<_>>();

    format!("{{'{}'}}", columns.join("', '"))
}

fn format_columns(schema: &Schema, columns: &[ColumnId]) -> String {
    let names = columns
        .iter()
        .map(|id| schema.db.column(*id).name.as_str())
        .collect::<Vec<_>>();

    format!("{{'{}'}}", names.join("', '"))
}

