use crate::{
    row::ValueComparer,
    schema::{app, db, db::StoreObjectIdentifier},
    Capability, Result,
};

use std::fmt;

/// How values of a property are stored in a particular column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapping {
    /// The database storage type
    pub store_type: db::Type,

    /// The application type being stored
    pub ty: app::Type,

    /// How stored values are compared for equality
    pub comparer: ValueComparer,
}

/// Resolves the storage of a property within a specific store object.
///
/// The store object matters: a property may use a different store type in a
/// view or a function result than in its table.
pub trait TypeMappingSource: Send + Sync + fmt::Debug {
    fn find_mapping(
        &self,
        property: &app::Property,
        object: &StoreObjectIdentifier,
    ) -> Result<TypeMapping>;
}

impl TypeMappingSource for Capability {
    fn find_mapping(
        &self,
        property: &app::Property,
        object: &StoreObjectIdentifier,
    ) -> Result<TypeMapping> {
        let store_type =
            db::Type::from_app(&property.ty, property.store_type_for(object), &self.storage_types)?;
        store_type.verify(self)?;

        let comparer = match property.facets.collation.as_deref() {
            Some(collation) if is_case_insensitive(collation) => ValueComparer::CaseInsensitive,
            _ => ValueComparer::Default,
        };

        Ok(TypeMapping {
            store_type,
            ty: property.ty.clone(),
            comparer,
        })
    }
}

fn is_case_insensitive(collation: &str) -> bool {
    let collation = collation.to_ascii_uppercase();
    collation == "NOCASE" || collation.contains("_CI")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collation_names() {
        assert!(is_case_insensitive("NOCASE"));
        assert!(is_case_insensitive("SQL_Latin1_General_CP1_CI_AS"));
        assert!(is_case_insensitive("utf8mb4_general_ci"));
        assert!(!is_case_insensitive("BINARY"));
        assert!(!is_case_insensitive("Latin1_General_CS_AS"));
    }
}
