use super::{ColumnId, SqlQueryId, StoreFunctionId, StoredProcedureId, TableId, ViewId};
use crate::schema::{mapping::TableMappingId, SortedIds};
use std::{collections::BTreeMap, fmt};

/// Identifies any object that has columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StoreObjectId {
    Table(TableId),
    View(ViewId),
    Function(StoreFunctionId),
    StoredProcedure(StoredProcedureId),
    SqlQuery(SqlQueryId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StoreObjectKind {
    Table,
    View,
    Function,
    StoredProcedure,
    SqlQuery,
}

/// Identifies a store object by kind and qualified name.
///
/// Unlike [`StoreObjectId`], this does not depend on a built schema, so it is
/// how the logical model refers to store objects. Store functions are
/// overloadable, so several of them may share an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StoreObjectIdentifier {
    pub kind: StoreObjectKind,
    pub name: String,
    pub schema: Option<String>,
}

/// State shared by every object that has columns
#[derive(Debug, Clone, PartialEq)]
pub struct TableBase {
    pub name: String,

    pub schema: Option<String>,

    /// Columns by name
    pub columns: BTreeMap<String, ColumnId>,

    /// Columns in their presentation order
    pub column_order: Vec<ColumnId>,

    /// Entity types mapped to this object, principals first
    pub mappings: SortedIds<TableMappingId>,

    pub comment: Option<String>,
}

/// Objects owning columns and mappings.
pub trait HasColumns {
    fn id(&self) -> StoreObjectId;

    fn base(&self) -> &TableBase;

    fn base_mut(&mut self) -> &mut TableBase;

    fn name(&self) -> &str {
        &self.base().name
    }

    fn schema(&self) -> Option<&str> {
        self.base().schema.as_deref()
    }

    fn identifier(&self) -> StoreObjectIdentifier {
        let base = self.base();
        StoreObjectIdentifier {
            kind: self.id().kind(),
            name: base.name.clone(),
            schema: base.schema.clone(),
        }
    }

    /// Column lookup by name. Missing names yield `None`.
    fn find_column_id(&self, name: &str) -> Option<ColumnId> {
        self.base().columns.get(name).copied()
    }

    fn column_ids(&self) -> &[ColumnId] {
        &self.base().column_order
    }

    fn mappings(&self) -> &SortedIds<TableMappingId> {
        &self.base().mappings
    }
}

impl StoreObjectId {
    pub fn kind(self) -> StoreObjectKind {
        match self {
            StoreObjectId::Table(_) => StoreObjectKind::Table,
            StoreObjectId::View(_) => StoreObjectKind::View,
            StoreObjectId::Function(_) => StoreObjectKind::Function,
            StoreObjectId::StoredProcedure(_) => StoreObjectKind::StoredProcedure,
            StoreObjectId::SqlQuery(_) => StoreObjectKind::SqlQuery,
        }
    }

    pub fn as_table(self) -> Option<TableId> {
        match self {
            StoreObjectId::Table(id) => Some(id),
            _ => None,
        }
    }
}

impl StoreObjectIdentifier {
    pub fn table(name: impl Into<String>, schema: Option<String>) -> Self {
        Self {
            kind: StoreObjectKind::Table,
            name: name.into(),
            schema,
        }
    }

    pub fn view(name: impl Into<String>, schema: Option<String>) -> Self {
        Self {
            kind: StoreObjectKind::View,
            ..Self::table(name, schema)
        }
    }
}

impl TableBase {
    pub(crate) fn new(name: &str, schema: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            schema: schema.map(str::to_string),
            columns: BTreeMap::new(),
            column_order: vec![],
            mappings: SortedIds::new(),
            comment: None,
        }
    }

    /// Schema-qualified name, e.g. `dbo.Orders`
    pub fn display_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{schema}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

impl From<TableId> for StoreObjectId {
    fn from(value: TableId) -> Self {
        StoreObjectId::Table(value)
    }
}

impl From<ViewId> for StoreObjectId {
    fn from(value: ViewId) -> Self {
        StoreObjectId::View(value)
    }
}

impl From<StoreFunctionId> for StoreObjectId {
    fn from(value: StoreFunctionId) -> Self {
        StoreObjectId::Function(value)
    }
}

impl From<StoredProcedureId> for StoreObjectId {
    fn from(value: StoredProcedureId) -> Self {
        StoreObjectId::StoredProcedure(value)
    }
}

impl From<SqlQueryId> for StoreObjectId {
    fn from(value: SqlQueryId) -> Self {
        StoreObjectId::SqlQuery(value)
    }
}

impl fmt::Display for StoreObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StoreObjectKind::Table => "Table",
            StoreObjectKind::View => "View",
            StoreObjectKind::Function => "Function",
            StoreObjectKind::StoredProcedure => "StoredProcedure",
            StoreObjectKind::SqlQuery => "SqlQuery",
        })
    }
}
