//! Total orders over the schema graph.
//!
//! Every ordered set in the graph is sorted with one of these comparers, and
//! they compare by names and structure rather than by ids. That makes them
//! usable across two independently built schemas: [`Cmp::new`] takes the
//! schema of each side.

use super::{
    db::{
        CheckConstraintId, ColumnId, ForeignKeyConstraintId, HasColumns, TableId, TableIndexId,
        UniqueConstraintId,
    },
    mapping::{ColumnMappingId, TableMappingId},
    Schema,
};
use std::cmp::Ordering;

/// Ordinal string ordering
pub fn names(a: &str, b: &str) -> Ordering {
    a.cmp(b)
}

/// Column name lists: shorter lists first, then element-wise
pub fn column_names<A: AsRef<str>, B: AsRef<str>>(a: &[A], b: &[B]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| {
        a.iter()
            .zip(b)
            .map(|(a, b)| names(a.as_ref(), b.as_ref()))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    })
}

/// Orders `(name, schema, columns)` identities. Absent schemas sort first.
pub fn identity<A: AsRef<str>, B: AsRef<str>>(
    a: (&str, Option<&str>, &[A]),
    b: (&str, Option<&str>, &[B]),
) -> Ordering {
    names(a.0, b.0)
        .then_with(|| a.1.cmp(&b.1))
        .then_with(|| column_names(a.2, b.2))
}

/// Orders column names of a table: primary key columns first in key order,
/// then the other columns by name.
#[derive(Debug, Clone, Default)]
pub struct ColumnNameComparer {
    primary_key: Vec<String>,
}

impl ColumnNameComparer {
    pub fn new<S: Into<String>>(primary_key: impl IntoIterator<Item = S>) -> Self {
        Self {
            primary_key: primary_key.into_iter().map(Into::into).collect(),
        }
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let position = |name: &str| self.primary_key.iter().position(|key| key == name);

        match (position(a), position(b)) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => names(a, b),
        }
    }
}

/// Sorts `true` before `false` before absent.
fn principal_rank(value: Option<bool>) -> u8 {
    match value {
        Some(true) => 0,
        Some(false) => 1,
        None => 2,
    }
}

/// Compares entities of schema `x` with entities of schema `y`.
#[derive(Clone, Copy)]
pub struct Cmp<'a> {
    x: &'a Schema,
    y: &'a Schema,
}

impl<'a> Cmp<'a> {
    pub fn new(x: &'a Schema, y: &'a Schema) -> Self {
        Self { x, y }
    }

    /// Compares entities of the same schema
    pub fn within(schema: &'a Schema) -> Self {
        Self::new(schema, schema)
    }

    /// Primary key properties first, then by owning table mapping, property
    /// name, column name and declaring entity type name.
    pub fn column_mapping(&self, a: ColumnMappingId, b: ColumnMappingId) -> Ordering {
        let (x, y) = (self.x, self.y);
        let (ma, mb) = (x.mapping.column_mapping(a), y.mapping.column_mapping(b));
        let (pa, pb) = (x.app.property(ma.property), y.app.property(mb.property));

        y.app
            .is_primary_key(mb.property)
            .cmp(&x.app.is_primary_key(ma.property))
            .then_with(|| self.table_mapping_base(ma.table_mapping, mb.table_mapping))
            .then_with(|| names(&pa.name, &pb.name))
            .then_with(|| names(&x.db.column(ma.column).name, &y.db.column(mb.column).name))
            .then_with(|| {
                names(
                    &x.app.entity_type(pa.id.entity_type).name.upper_camel_case(),
                    &y.app.entity_type(pb.id.entity_type).name.upper_camel_case(),
                )
            })
    }

    /// Orders the mappings of one object: shared-table principals first,
    /// mappings including derived types first, split principals first, then
    /// by entity type, object and column mappings.
    pub fn table_mapping_base(&self, a: TableMappingId, b: TableMappingId) -> Ordering {
        let (x, y) = (self.x, self.y);
        let (ma, mb) = (x.mapping.table_mapping(a), y.mapping.table_mapping(b));

        principal_rank(ma.is_shared_table_principal)
            .cmp(&principal_rank(mb.is_shared_table_principal))
            .then_with(|| mb.includes_derived_types.cmp(&ma.includes_derived_types))
            .then_with(|| {
                principal_rank(ma.is_split_entity_type_principal)
                    .cmp(&principal_rank(mb.is_split_entity_type_principal))
            })
            .then_with(|| {
                names(
                    &x.app.entity_type(ma.entity_type).name.upper_camel_case(),
                    &y.app.entity_type(mb.entity_type).name.upper_camel_case(),
                )
            })
            .then_with(|| {
                let (oa, ob) = (x.db.object(ma.table), y.db.object(mb.table));
                names(oa.name(), ob.name()).then_with(|| oa.schema().cmp(&ob.schema()))
            })
            .then_with(|| ma.column_mappings.len().cmp(&mb.column_mappings.len()))
            .then_with(|| {
                ma.column_mappings
                    .iter()
                    .zip(mb.column_mappings.iter())
                    .map(|(ca, cb)| {
                        let (ca, cb) = (x.mapping.column_mapping(ca), y.mapping.column_mapping(cb));
                        names(&x.app.property(ca.property).name, &y.app.property(cb.property).name)
                            .then_with(|| {
                                names(&x.db.column(ca.column).name, &y.db.column(cb.column).name)
                            })
                    })
                    .find(|ordering| ordering.is_ne())
                    .unwrap_or(Ordering::Equal)
            })
    }

    /// The base ordering, then the insert, update and delete procedure
    /// mappings.
    pub fn table_mapping(&self, a: TableMappingId, b: TableMappingId) -> Ordering {
        let (pa, pb) = (
            self.x.mapping.table_mapping(a).procedures(),
            self.y.mapping.table_mapping(b).procedures(),
        );

        self.table_mapping_base(a, b).then_with(|| {
            pa.iter()
                .zip(pb.iter())
                .map(|(pa, pb)| match (pa, pb) {
                    (None, None) => Ordering::Equal,
                    (None, Some(_)) => Ordering::Less,
                    (Some(_), None) => Ordering::Greater,
                    (Some(pa), Some(pb)) => self.table_mapping_base(*pa, *pb),
                })
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        })
    }

    /// By name, owner, store type and nullability.
    pub fn column(&self, a: ColumnId, b: ColumnId) -> Ordering {
        let (ca, cb) = (self.x.db.column(a), self.y.db.column(b));
        let (oa, ob) = (self.x.db.object(ca.table), self.y.db.object(cb.table));

        names(&ca.name, &cb.name)
            .then_with(|| names(oa.name(), ob.name()))
            .then_with(|| oa.schema().cmp(&ob.schema()))
            .then_with(|| names(&ca.store_type.to_string(), &cb.store_type.to_string()))
            .then_with(|| ca.is_nullable.cmp(&cb.is_nullable))
    }

    /// By name, columns, principal columns, principal table name, table
    /// name, principal schema and schema.
    pub fn foreign_key(&self, a: ForeignKeyConstraintId, b: ForeignKeyConstraintId) -> Ordering {
        let (x, y) = (self.x, self.y);
        let (fa, fb) = (x.db.foreign_key(a), y.db.foreign_key(b));
        let (pa, pb) = (x.db.table(fa.principal_table), y.db.table(fb.principal_table));
        let (ta, tb) = (x.db.table(fa.table), y.db.table(fb.table));

        names(&fa.name, &fb.name)
            .then_with(|| column_names(&column_list(x, &fa.columns), &column_list(y, &fb.columns)))
            .then_with(|| {
                column_names(
                    &column_list(x, &fa.principal_columns),
                    &column_list(y, &fb.principal_columns),
                )
            })
            .then_with(|| names(pa.name(), pb.name()))
            .then_with(|| names(ta.name(), tb.name()))
            .then_with(|| pa.schema().cmp(&pb.schema()))
            .then_with(|| ta.schema().cmp(&tb.schema()))
    }

    /// By name, columns, table name and schema.
    pub fn unique_constraint(&self, a: UniqueConstraintId, b: UniqueConstraintId) -> Ordering {
        let (x, y) = (self.x, self.y);
        let (ua, ub) = (x.db.unique_constraint(a), y.db.unique_constraint(b));

        names(&ua.name, &ub.name)
            .then_with(|| column_names(&column_list(x, &ua.columns), &column_list(y, &ub.columns)))
            .then_with(|| self.tables(ua.table, ub.table))
    }

    /// By name, columns, uniqueness, sort order, filter, table name and
    /// schema.
    pub fn index(&self, a: TableIndexId, b: TableIndexId) -> Ordering {
        let (x, y) = (self.x, self.y);
        let (ia, ib) = (x.db.index(a), y.db.index(b));

        names(&ia.name, &ib.name)
            .then_with(|| column_names(&column_list(x, &ia.columns), &column_list(y, &ib.columns)))
            .then_with(|| ia.is_unique.cmp(&ib.is_unique))
            .then_with(|| ia.is_descending.cmp(&ib.is_descending))
            .then_with(|| ia.filter.cmp(&ib.filter))
            .then_with(|| self.tables(ia.table, ib.table))
    }

    /// By name, SQL, table name and schema.
    pub fn check_constraint(&self, a: CheckConstraintId, b: CheckConstraintId) -> Ordering {
        let (ca, cb) = (self.x.db.check_constraint(a), self.y.db.check_constraint(b));

        names(&ca.name, &cb.name)
            .then_with(|| names(&ca.sql, &cb.sql))
            .then_with(|| self.tables(ca.table, cb.table))
    }

    fn tables(&self, a: TableId, b: TableId) -> Ordering {
        let (ta, tb) = (self.x.db.table(a), self.y.db.table(b));
        names(ta.name(), tb.name()).then_with(|| ta.schema().cmp(&tb.schema()))
    }
}

fn column_list<'a>(schema: &'a Schema, columns: &[ColumnId]) -> Vec<&'a str> {
    columns
        .iter()
        .map(|id| schema.db.column(*id).name.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_name_lists() {
        assert_eq!(column_names(&["B"], &["A", "B"]), Ordering::Less);
        assert_eq!(column_names(&["A", "C"], &["A", "B"]), Ordering::Greater);
        assert_eq!(column_names(&["A", "B"], &["A", "B"]), Ordering::Equal);
        assert_eq!(column_names::<&str, &str>(&[], &[]), Ordering::Equal);
    }

    #[test]
    fn identities() {
        let columns = &["Id"][..];
        assert_eq!(
            identity(("PK", None, columns), ("PK", Some("dbo"), columns)),
            Ordering::Less
        );
        assert_eq!(
            identity(("AK", Some("dbo"), columns), ("PK", None, columns)),
            Ordering::Less
        );
        assert_eq!(
            identity(("PK", None, &["Id", "TenantId"][..]), ("PK", None, columns)),
            Ordering::Greater
        );
    }

    #[test]
    fn primary_key_columns_first() {
        let comparer = ColumnNameComparer::new(["Id", "TenantId"]);
        let mut columns = vec!["Age", "TenantId", "Name", "Id"];
        columns.sort_by(|a, b| comparer.compare(a, b));

        assert_eq!(columns, ["Id", "TenantId", "Age", "Name"]);
    }

    #[test]
    fn principal_flags() {
        let mut flags = vec![None, Some(false), Some(true)];
        flags.sort_by_key(|flag| principal_rank(*flag));
        assert_eq!(flags, [Some(true), Some(false), None]);
    }
}
