use super::{
    CheckConstraint, CheckConstraintId, Column, ColumnId, ForeignKeyConstraint,
    ForeignKeyConstraintId, HasColumns, SqlQuery, SqlQueryId, StoreFunction, StoreFunctionId,
    StoreObjectId, StoreObjectIdentifier, StoreObjectKind, StoreStoredProcedure,
    StoredProcedureId, Table, TableId, TableIndex, TableIndexId, UniqueConstraint,
    UniqueConstraintId, View, ViewId,
};
use std::collections::BTreeMap;

/// The physical schema graph.
///
/// Objects live in per-kind arenas and refer to each other by id.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Schema {
    pub tables: Vec<Table>,
    pub views: Vec<View>,
    pub functions: Vec<StoreFunction>,
    pub procedures: Vec<StoreStoredProcedure>,
    pub queries: Vec<SqlQuery>,

    /// Columns of every object, including procedure parameters
    pub columns: Vec<Column>,

    pub foreign_keys: Vec<ForeignKeyConstraint>,
    pub unique_constraints: Vec<UniqueConstraint>,
    pub indices: Vec<TableIndex>,
    pub check_constraints: Vec<CheckConstraint>,

    /// Non-function objects by identifier
    pub(crate) lookup: BTreeMap<StoreObjectIdentifier, StoreObjectId>,
}

impl Schema {
    pub fn table(&self, id: impl Into<TableId>) -> &Table {
        self.tables.get(id.into().0).expect("invalid table ID")
    }

    pub fn view(&self, id: ViewId) -> &View {
        self.views.get(id.0).expect("invalid view ID")
    }

    pub fn function(&self, id: StoreFunctionId) -> &StoreFunction {
        self.functions.get(id.0).expect("invalid function ID")
    }

    pub fn procedure(&self, id: StoredProcedureId) -> &StoreStoredProcedure {
        self.procedures.get(id.0).expect("invalid stored procedure ID")
    }

    pub fn query(&self, id: SqlQueryId) -> &SqlQuery {
        self.queries.get(id.0).expect("invalid SQL query ID")
    }

    pub fn column(&self, id: impl Into<ColumnId>) -> &Column {
        self.columns.get(id.into().0).expect("invalid column ID")
    }

    pub fn foreign_key(&self, id: ForeignKeyConstraintId) -> &ForeignKeyConstraint {
        self.foreign_keys.get(id.0).expect("invalid foreign key ID")
    }

    pub fn unique_constraint(&self, id: UniqueConstraintId) -> &UniqueConstraint {
        self.unique_constraints
            .get(id.0)
            .expect("invalid unique constraint ID")
    }

    // NOTE: this is unlikely to confuse users given the context.
    #[allow(clippy::should_implement_trait)]
    pub fn index(&self, id: TableIndexId) -> &TableIndex {
        self.indices.get(id.0).expect("invalid index ID")
    }

    pub fn check_constraint(&self, id: CheckConstraintId) -> &CheckConstraint {
        self.check_constraints
            .get(id.0)
            .expect("invalid check constraint ID")
    }

    /// Any object with columns
    pub fn object(&self, id: StoreObjectId) -> &dyn HasColumns {
        match id {
            StoreObjectId::Table(id) => self.table(id),
            StoreObjectId::View(id) => self.view(id),
            StoreObjectId::Function(id) => self.function(id),
            StoreObjectId::StoredProcedure(id) => self.procedure(id),
            StoreObjectId::SqlQuery(id) => self.query(id),
        }
    }

    pub(crate) fn object_mut(&mut self, id: StoreObjectId) -> &mut dyn HasColumns {
        match id {
            StoreObjectId::Table(id) => &mut self.tables[id.0],
            StoreObjectId::View(id) => &mut self.views[id.0],
            StoreObjectId::Function(id) => &mut self.functions[id.0],
            StoreObjectId::StoredProcedure(id) => &mut self.procedures[id.0],
            StoreObjectId::SqlQuery(id) => &mut self.queries[id.0],
        }
    }

    /// Looks up a table, view, stored procedure or SQL query.
    pub fn find_object(&self, identifier: &StoreObjectIdentifier) -> Option<StoreObjectId> {
        self.lookup.get(identifier).copied()
    }

    pub fn find_table(&self, name: &str, schema: Option<&str>) -> Option<&Table> {
        let identifier = StoreObjectIdentifier {
            kind: StoreObjectKind::Table,
            name: name.to_string(),
            schema: schema.map(str::to_string),
        };

        match self.find_object(&identifier)? {
            StoreObjectId::Table(id) => Some(self.table(id)),
            _ => None,
        }
    }

    pub fn find_view(&self, name: &str, schema: Option<&str>) -> Option<&View> {
        let identifier = StoreObjectIdentifier::view(name, schema.map(str::to_string));

        match self.find_object(&identifier)? {
            StoreObjectId::View(id) => Some(self.view(id)),
            _ => None,
        }
    }

    /// Store functions with the given name, one per overload
    pub fn find_functions<'a>(
        &'a self,
        name: &'a str,
        schema: Option<&'a str>,
    ) -> impl Iterator<Item = &'a StoreFunction> + 'a {
        self.functions
            .iter()
            .filter(move |function| function.name() == name && function.schema() == schema)
    }

    /// Every object with columns, tables first
    pub fn objects(&self) -> impl Iterator<Item = &dyn HasColumns> + '_ {
        let tables = self.tables.iter().map(|t| t as &dyn HasColumns);
        let views = self.views.iter().map(|v| v as &dyn HasColumns);
        let functions = self.functions.iter().map(|f| f as &dyn HasColumns);
        let procedures = self.procedures.iter().map(|p| p as &dyn HasColumns);
        let queries = self.queries.iter().map(|q| q as &dyn HasColumns);

        tables
            .chain(views)
            .chain(functions)
            .chain(procedures)
            .chain(queries)
    }

    /// The columns of the object, in presentation order
    pub fn columns_of(&self, id: StoreObjectId) -> impl Iterator<Item = &Column> + '_ {
        self.object(id)
            .column_ids()
            .iter()
            .map(move |column| self.column(*column))
    }
}
