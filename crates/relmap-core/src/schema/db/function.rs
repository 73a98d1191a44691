use super::{HasColumns, StoreObjectId, TableBase, Type};
use crate::schema::app::FunctionId;
use std::fmt;

/// A function in the database.
///
/// Logical functions with the same name, schema and parameter store types
/// share one store function.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreFunction {
    pub id: StoreFunctionId,

    /// Columns of the returned rows, for table-valued functions
    pub base: TableBase,

    pub parameters: Vec<StoreFunctionParameter>,

    /// Store type of a scalar result
    pub return_type: Option<Type>,

    pub is_builtin: bool,

    /// The logical functions backed by this one
    pub db_functions: Vec<FunctionId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreFunctionParameter {
    pub name: String,

    pub store_type: Type,

    /// Logical function parameters bound to this one, as (function, position)
    pub db_function_parameters: Vec<(FunctionId, usize)>,
}

#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct StoreFunctionId(pub usize);

impl StoreFunction {
    pub fn find_parameter(&self, name: &str) -> Option<&StoreFunctionParameter> {
        self.parameters.iter().find(|parameter| parameter.name == name)
    }

    /// The parameter store types, which together with the name and schema
    /// identify an overload.
    pub fn signature(&self) -> Vec<&Type> {
        self.parameters.iter().map(|parameter| &parameter.store_type).collect()
    }
}

impl HasColumns for StoreFunction {
    fn id(&self) -> StoreObjectId {
        self.id.into()
    }

    fn base(&self) -> &TableBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut TableBase {
        &mut self.base
    }
}

impl fmt::Debug for StoreFunctionId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "StoreFunctionId({})", self.0)
    }
}
