use super::EntityTypeId;

#[derive(Debug, Clone)]
pub struct CheckConstraint {
    /// The entity type declaring the constraint
    pub entity_type: EntityTypeId,

    /// Model-level name, used to derive the constraint name
    pub name: String,

    /// Explicit constraint name
    pub constraint_name: Option<String>,

    pub sql: String,
}
