use super::{cmp::Cmp, Schema, SortedIds};
use crate::{Error, Result};
use std::cmp::Ordering;

struct Verify<'a> {
    schema: &'a Schema,
}

impl Schema {
    pub(super) fn verify(&self) -> Result<()> {
        Verify { schema: self }.verify()
    }
}

impl Verify<'_> {
    fn verify(&self) -> Result<()> {
        debug_assert!(self.verify_sets_sorted());

        self.verify_each_mapped_table_has_primary_key()?;
        self.verify_primary_key_columns_not_nullable();
        self.verify_foreign_key_arity();
        self.verify_columns_are_mapped();
        self.verify_store_types()?;
        Ok(())
    }

    fn verify_sets_sorted(&self) -> bool {
        let cmp = Cmp::within(self.schema);

        for object in self.schema.db.objects() {
            assert!(
                is_sorted(object.mappings(), |a, b| cmp.table_mapping_base(a, b)),
                "mappings of `{}` are out of order",
                object.name()
            );
        }

        for column in &self.schema.db.columns {
            assert!(
                is_sorted(&column.property_mappings, |a, b| cmp.column_mapping(a, b)),
                "property mappings of column `{}` are out of order",
                column.name
            );
        }

        for mapping in self.schema.mapping.table_mappings() {
            assert!(is_sorted(&mapping.column_mappings, |a, b| cmp
                .column_mapping(a, b)));
        }

        for table in &self.schema.db.tables {
            assert!(is_sorted(&table.foreign_keys, |a, b| cmp.foreign_key(a, b)));
            assert!(is_sorted(&table.referencing_foreign_keys, |a, b| cmp
                .foreign_key(a, b)));
        }

        true
    }

    fn verify_each_mapped_table_has_primary_key(&self) -> Result<()> {
        for table in &self.schema.db.tables {
            if table.primary_key.is_some() {
                continue;
            }

            if let Some(mapping) = table.base.mappings.first() {
                let entity_type = self.schema.mapping.table_mapping(mapping).entity_type;

                return Err(Error::invalid_schema(format!(
                    "table `{}` has no primary key, but entity type `{}` is mapped to it",
                    table.base.display_name(),
                    self.schema.app.entity_type(entity_type).name
                )));
            }
        }

        Ok(())
    }

    fn verify_primary_key_columns_not_nullable(&self) {
        for table in &self.schema.db.tables {
            let Some(primary_key) = table.primary_key else {
                continue;
            };

            for column in &self.schema.db.unique_constraint(primary_key).columns {
                assert!(
                    !self.schema.db.column(*column).is_nullable,
                    "primary key column `{}` of `{}` is nullable",
                    self.schema.db.column(*column).name,
                    table.base.name
                );
            }
        }
    }

    fn verify_foreign_key_arity(&self) {
        for fk in &self.schema.db.foreign_keys {
            assert_eq!(
                fk.columns.len(),
                fk.principal_columns.len(),
                "foreign key `{}` has mismatched column counts",
                fk.name
            );
        }
    }

    fn verify_columns_are_mapped(&self) {
        for object in self.schema.db.objects() {
            for column in object.column_ids() {
                let column = self.schema.db.column(*column);

                assert!(
                    !column.property_mappings.is_empty(),
                    "column `{}` of `{}` stores no property",
                    column.name,
                    object.name()
                );
            }
        }
    }

    fn verify_store_types(&self) -> Result<()> {
        for column in &self.schema.db.columns {
            column.store_type.verify(&self.schema.capability)?;
        }

        Ok(())
    }
}

fn is_sorted<I: Copy + PartialEq>(set: &SortedIds<I>, mut cmp: impl FnMut(I, I) -> Ordering) -> bool {
    set.as_slice()
        .windows(2)
        .all(|pair| cmp(pair[0], pair[1]) != Ordering::Greater)
}
