use super::{BuildSchema, ConstraintKind, Logical};
use crate::{
    cache::Cached,
    schema::{
        app::{ForeignKeyId, IndexId, KeyId},
        cmp::Cmp,
        compat,
        db::{
            CheckConstraint, CheckConstraintId, ColumnId, ForeignKeyConstraint,
            ForeignKeyConstraintId, TableId, TableIndex, TableIndexId, UniqueConstraint,
            UniqueConstraintId,
        },
        naming,
    },
    Error, Result,
};
use std::mem;
use tracing::debug;

impl BuildSchema<'_> {
    pub(super) fn build_keys(&mut self) -> Result<()> {
        let app = self.app.clone();

        for table in self.table_ids() {
            for entity_type in self.mapped_entity_types(table) {
                for key in app.keys(entity_type) {
                    self.map_key(table, key.id)?;
                }
            }
        }

        Ok(())
    }

    fn map_key(&mut self, table: TableId, key: KeyId) -> Result<()> {
        let app = self.app.clone();
        let definition = app.key(key);

        let Some(columns) = self.schema.columns_for_properties(table, &definition.properties) else {
            return Ok(());
        };

        let mapped = self
            .schema
            .db
            .table(table)
            .unique_constraints
            .values()
            .any(|id| self.schema.db.unique_constraint(*id).mapped_keys.contains(&key));

        if mapped {
            return Ok(());
        }

        let table_name = self.schema.db.table(table).base.name.clone();

        if definition.primary_key {
            let name = match &definition.name {
                Some(name) => name.clone(),
                None => naming::truncate(
                    &naming::primary_key_name(&table_name),
                    self.max_identifier_length(),
                    None,
                ),
            };

            if let Some(existing) = self.schema.db.table(table).primary_key {
                let constraint = self.schema.db.unique_constraint(existing);
                let first = constraint.mapped_keys[0];

                if constraint.name != name {
                    return Err(Error::invalid_schema(format!(
                        "the keys {} on '{}' and {} on '{}' are both mapped to the primary key \
                         of '{}' but with different names ('{}' and '{}')",
                        app.format_properties(&app.key(first).properties),
                        app.entity_type(first.entity_type).name,
                        app.format_properties(&definition.properties),
                        app.entity_type(key.entity_type).name,
                        table_name,
                        constraint.name,
                        name,
                    )));
                }

                compat::keys_are_compatible(&self.schema, first, key, table, &name, true)?;
                self.schema.db.unique_constraints[existing.0].mapped_keys.push(key);
                return Ok(());
            }

            let id = self.add_unique_constraint(table, name, columns, true, key);
            self.schema.db.tables[table.0].primary_key = Some(id);
            return Ok(());
        }

        let name = match &definition.name {
            Some(name) => name.clone(),
            None => {
                let base = naming::alternate_key_name(&table_name, &self.column_names(&columns));
                self.generated_name(table, ConstraintKind::Key, &base, Logical::Key(key))
            }
        };

        if let Some(existing) = self.schema.db.table(table).unique_constraints.get(&name).copied() {
            let first = self.schema.db.unique_constraint(existing).mapped_keys[0];
            compat::keys_are_compatible(&self.schema, first, key, table, &name, true)?;
            self.schema.db.unique_constraints[existing.0].mapped_keys.push(key);
        } else {
            self.add_unique_constraint(table, name.clone(), columns, false, key);
        }

        if definition.name.is_none() {
            self.record(table, ConstraintKind::Key, name, Logical::Key(key));
        }

        Ok(())
    }

    fn add_unique_constraint(
        &mut self,
        table: TableId,
        name: String,
        columns: Vec<ColumnId>,
        is_primary_key: bool,
        key: KeyId,
    ) -> UniqueConstraintId {
        let id = UniqueConstraintId(self.schema.db.unique_constraints.len());

        debug!(table = %self.schema.db.table(table).base.name, key = %name, is_primary_key, "created unique constraint");

        self.schema.db.tables[table.0]
            .unique_constraints
            .insert(name.clone(), id);
        self.schema.db.unique_constraints.push(UniqueConstraint {
            id,
            name,
            table,
            columns,
            is_primary_key,
            mapped_keys: vec![key],
            row_key_value_factory: Cached::new(),
        });

        id
    }

    pub(super) fn build_foreign_keys(&mut self) -> Result<()> {
        let app = self.app.clone();

        for table in self.table_ids() {
            for entity_type in self.mapped_entity_types(table) {
                // Row-internal foreign keys link parts of the same row.
                let internal = self
                    .schema
                    .row_internal_foreign_keys(entity_type, table.into());

                for fk in app.foreign_keys(entity_type) {
                    if !internal.contains(&fk.id) {
                        self.map_foreign_key(table, fk.id)?;
                    }
                }
            }
        }

        Ok(())
    }

    fn map_foreign_key(&mut self, table: TableId, fk: ForeignKeyId) -> Result<()> {
        let app = self.app.clone();
        let definition = app.foreign_key(fk);

        let Some(columns) = self.schema.columns_for_properties(table, &definition.properties) else {
            return Ok(());
        };

        let Some((principal_table, principal_columns)) = self.schema.principal_table_for(fk) else {
            return Ok(());
        };

        let mapped = self
            .schema
            .db
            .table(table)
            .foreign_keys
            .iter()
            .any(|id| self.schema.db.foreign_key(id).mapped_foreign_keys.contains(&fk));

        if mapped {
            return Ok(());
        }

        let db = &self.schema.db;
        let Some(principal_unique_constraint) = db
            .table(principal_table)
            .unique_constraints
            .values()
            .copied()
            .find(|id| db.unique_constraint(*id).columns == principal_columns)
        else {
            return Err(Error::invalid_schema(format!(
                "the foreign key {} on '{}' references {} on '{}', which is not mapped to a \
                 unique constraint of '{}'",
                app.format_properties(&definition.properties),
                app.entity_type(fk.entity_type).name,
                app.format_properties(&app.key(definition.principal_key).properties),
                app.entity_type(definition.principal).name,
                db.table(principal_table).base.display_name(),
            )));
        };

        let name = match &definition.name {
            Some(name) => name.clone(),
            None => {
                let base = naming::foreign_key_name(
                    &db.table(table).base.name,
                    &db.table(principal_table).base.name,
                    &self.column_names(&columns),
                );
                self.generated_name(table, ConstraintKind::ForeignKey, &base, Logical::ForeignKey(fk))
            }
        };

        let existing = self
            .schema
            .db
            .table(table)
            .foreign_keys
            .iter()
            .find(|id| self.schema.db.foreign_key(*id).name == name);

        if let Some(existing) = existing {
            let first = self.schema.db.foreign_key(existing).mapped_foreign_keys[0];
            compat::foreign_keys_are_compatible(&self.schema, first, fk, table, &name, true)?;
            self.schema.db.foreign_keys[existing.0].mapped_foreign_keys.push(fk);
        } else {
            let id = ForeignKeyConstraintId(self.schema.db.foreign_keys.len());
            self.schema.db.foreign_keys.push(ForeignKeyConstraint {
                id,
                name: name.clone(),
                table,
                principal_table,
                columns,
                principal_columns,
                principal_unique_constraint,
                on_delete: definition.delete_behavior.into(),
                mapped_foreign_keys: vec![fk],
            });

            let mut set = mem::take(&mut self.schema.db.tables[table.0].foreign_keys);
            set.insert_by(id, |a, b| Cmp::within(&self.schema).foreign_key(a, b));
            self.schema.db.tables[table.0].foreign_keys = set;

            let mut set = mem::take(&mut self.schema.db.tables[principal_table.0].referencing_foreign_keys);
            set.insert_by(id, |a, b| Cmp::within(&self.schema).foreign_key(a, b));
            self.schema.db.tables[principal_table.0].referencing_foreign_keys = set;

            debug!(table = %self.schema.db.table(table).base.name, foreign_key = %name, "created foreign key");
        }

        if definition.name.is_none() {
            self.record(table, ConstraintKind::ForeignKey, name, Logical::ForeignKey(fk));
        }

        Ok(())
    }

    pub(super) fn build_indices(&mut self) -> Result<()> {
        let app = self.app.clone();

        for table in self.table_ids() {
            for entity_type in self.mapped_entity_types(table) {
                for index in app.indices(entity_type) {
                    self.map_index(table, index.id)?;
                }
            }
        }

        Ok(())
    }

    fn map_index(&mut self, table: TableId, index: IndexId) -> Result<()> {
        let app = self.app.clone();
        let definition = app.index(index);

        let Some(columns) = self.schema.columns_for_properties(table, &definition.properties) else {
            return Ok(());
        };

        let mapped = self
            .schema
            .db
            .table(table)
            .indices
            .values()
            .any(|id| self.schema.db.index(*id).mapped_indices.contains(&index));

        if mapped {
            return Ok(());
        }

        let name = match &definition.name {
            Some(name) => name.clone(),
            None => {
                let base = naming::index_name(
                    &self.schema.db.table(table).base.name,
                    &self.column_names(&columns),
                );
                self.generated_name(table, ConstraintKind::Index, &base, Logical::Index(index))
            }
        };

        if let Some(existing) = self.schema.db.table(table).indices.get(&name).copied() {
            let first = self.schema.db.index(existing).mapped_indices[0];
            compat::indexes_are_compatible(&self.schema, first, index, table, &name, true)?;
            self.schema.db.indices[existing.0].mapped_indices.push(index);
        } else {
            let id = TableIndexId(self.schema.db.indices.len());
            self.schema.db.indices.push(TableIndex {
                id,
                name: name.clone(),
                table,
                columns,
                is_unique: definition.unique,
                is_descending: definition.is_descending(),
                filter: definition.filter.clone(),
                mapped_indices: vec![index],
                row_index_value_factory: Cached::new(),
            });
            self.schema.db.tables[table.0].indices.insert(name.clone(), id);

            debug!(table = %self.schema.db.table(table).base.name, index = %name, "created index");
        }

        if definition.name.is_none() {
            self.record(table, ConstraintKind::Index, name, Logical::Index(index));
        }

        Ok(())
    }

    pub(super) fn build_check_constraints(&mut self) -> Result<()> {
        let app = self.app.clone();
        let max_len = self.max_identifier_length();

        for table in self.table_ids() {
            let table_name = self.schema.db.table(table).base.name.clone();

            for entity_type in self.mapped_entity_types(table) {
                for check in app.check_constraints(entity_type) {
                    let name = check.constraint_name.clone().unwrap_or_else(|| {
                        naming::truncate(
                            &naming::check_constraint_name(&table_name, &check.name),
                            max_len,
                            None,
                        )
                    });

                    let existing = self.schema.db.table(table).check_constraints.get(&name).copied();

                    if let Some(existing) = existing {
                        let constraint = &mut self.schema.db.check_constraints[existing.0];

                        if constraint.sql != check.sql {
                            return Err(Error::invalid_schema(format!(
                                "the check constraints on '{}' and '{}' are both mapped to \
                                 '{}.{}' but with different SQL ('{}' and '{}')",
                                app.entity_type(constraint.entity_types[0]).name,
                                app.entity_type(check.entity_type).name,
                                table_name,
                                name,
                                constraint.sql,
                                check.sql,
                            )));
                        }

                        if !constraint.entity_types.contains(&check.entity_type) {
                            constraint.entity_types.push(check.entity_type);
                        }
                        continue;
                    }

                    let id = CheckConstraintId(self.schema.db.check_constraints.len());
                    self.schema.db.check_constraints.push(CheckConstraint {
                        id,
                        name: name.clone(),
                        table,
                        sql: check.sql.clone(),
                        entity_types: vec![check.entity_type],
                    });
                    self.schema.db.tables[table.0]
                        .check_constraints
                        .insert(name, id);
                }
            }
        }

        Ok(())
    }

    fn table_ids(&self) -> Vec<TableId> {
        (0..self.schema.db.tables.len()).map(TableId).collect()
    }

    /// Entity types mapped to the table, principals first
    fn mapped_entity_types(&self, table: TableId) -> Vec<crate::schema::app::EntityTypeId> {
        let mut entity_types = vec![];

        for id in self.schema.db.table(table).base.mappings.iter() {
            let entity_type = self.schema.mapping.table_mapping(id).entity_type;
            if !entity_types.contains(&entity_type) {
                entity_types.push(entity_type);
            }
        }

        entity_types
    }

    fn column_names(&self, columns: &[ColumnId]) -> Vec<&str> {
        columns
            .iter()
            .map(|id| self.schema.db.column(*id).name.as_str())
            .collect()
    }

    /// Picks a name for a generated constraint of the table. A candidate is
    /// taken when a generated sibling of the same kind already uses it
    /// (ignoring case) and cannot share it with `logical`.
    fn generated_name(
        &self,
        table: TableId,
        kind: ConstraintKind,
        base: &str,
        logical: Logical,
    ) -> String {
        let siblings = self
            .generated
            .get(&(table, kind))
            .map(Vec::as_slice)
            .unwrap_or_default();

        naming::uniquify(base, self.max_identifier_length(), |candidate| {
            siblings.iter().any(|(name, other)| {
                name.eq_ignore_ascii_case(candidate) && !self.compatible(table, *other, logical, name)
            })
        })
    }

    fn compatible(&self, table: TableId, a: Logical, b: Logical, name: &str) -> bool {
        let schema = &self.schema;
        let compatible = match (a, b) {
            (Logical::Key(a), Logical::Key(b)) => {
                compat::keys_are_compatible(schema, a, b, table, name, false)
            }
            (Logical::ForeignKey(a), Logical::ForeignKey(b)) => {
                compat::foreign_keys_are_compatible(schema, a, b, table, name, false)
            }
            (Logical::Index(a), Logical::Index(b)) => {
                compat::indexes_are_compatible(schema, a, b, table, name, false)
            }
            _ => Ok(false),
        };

        matches!(compatible, Ok(true))
    }

    fn record(&mut self, table: TableId, kind: ConstraintKind, name: String, logical: Logical) {
        self.generated
            .entry((table, kind))
            .or_default()
            .push((name, logical));
    }
}
