use super::{EntityTypeId, Type};
use crate::schema::db;
use std::fmt;

/// A function callable from queries and backed by a store function.
#[derive(Debug, Clone)]
pub struct DbFunction {
    pub id: FunctionId,

    /// Unique name within the model. Overloads share a store name but have
    /// distinct model names.
    pub model_name: String,

    /// Store function name
    pub name: String,

    pub schema: Option<String>,

    pub parameters: Vec<FunctionParameter>,

    /// Scalar return type
    pub return_type: Option<Type>,

    /// For table-valued functions, the entity type of the returned rows
    pub returns: Option<EntityTypeId>,

    /// Provided by the database rather than user defined
    pub is_builtin: bool,

    pub is_nullable: bool,
}

#[derive(Debug, Clone)]
pub struct FunctionParameter {
    pub name: String,
    pub ty: Type,
    pub store_type: Option<db::Type>,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct FunctionId(pub usize);

impl DbFunction {
    pub fn new(model_name: &str, name: &str) -> Self {
        Self {
            id: FunctionId(usize::MAX),
            model_name: model_name.to_string(),
            name: name.to_string(),
            schema: None,
            parameters: vec![],
            return_type: None,
            returns: None,
            is_builtin: false,
            is_nullable: true,
        }
    }

    pub fn parameter(mut self, name: &str, ty: Type) -> Self {
        self.parameters.push(FunctionParameter {
            name: name.to_string(),
            ty,
            store_type: None,
        });
        self
    }
}

impl fmt::Debug for FunctionId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "FunctionId({})", self.0)
    }
}
