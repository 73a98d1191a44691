use super::PropertyId;
use std::fmt;

/// Stored procedure configuration for one write operation of an entity type.
#[derive(Debug, Clone, Default)]
pub struct StoredProcedureConfig {
    /// Defaults to `{EntityType}_{Operation}`
    pub name: Option<String>,

    pub schema: Option<String>,

    /// Explicit parameter list. `None` derives the parameters from the
    /// entity type's properties.
    pub parameters: Option<Vec<ProcedureParameter>>,

    /// Explicit result columns, only read with explicit parameters.
    pub result_columns: Vec<PropertyId>,
}

#[derive(Debug, Clone)]
pub struct ProcedureParameter {
    /// The property bound to the parameter. `None` for a rows-affected
    /// parameter.
    pub property: Option<PropertyId>,

    /// Defaults to the property's column name
    pub name: Option<String>,

    pub direction: ParameterDirection,

    /// Binds the value the property had when it was loaded
    pub original_value: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ParameterDirection {
    #[default]
    Input,
    Output,
    InputOutput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StoreOperation {
    Insert,
    Update,
    Delete,
}

impl ProcedureParameter {
    pub fn input(property: PropertyId) -> Self {
        Self {
            property: Some(property),
            name: None,
            direction: ParameterDirection::Input,
            original_value: false,
        }
    }

    pub fn original(property: PropertyId) -> Self {
        Self {
            original_value: true,
            ..Self::input(property)
        }
    }

    pub fn rows_affected() -> Self {
        Self {
            property: None,
            name: None,
            direction: ParameterDirection::Output,
            original_value: false,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
