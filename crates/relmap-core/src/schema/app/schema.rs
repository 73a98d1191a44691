use super::{
    CheckConstraint, DbFunction, DeleteBehavior, EntityType, EntityTypeId, ForeignKey,
    ForeignKeyId, FunctionId, Index, IndexId, Key, KeyId, MappingStrategy, Property, PropertyId,
    Type,
};
use crate::{Error, Result};
use indexmap::IndexMap;

#[derive(Debug, Default, Clone)]
pub struct Schema {
    pub entity_types: IndexMap<EntityTypeId, EntityType>,

    pub functions: Vec<DbFunction>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entity_type(&mut self, name: &str) -> EntityTypeId {
        self.insert_entity_type(name, None)
    }

    pub fn add_derived_entity_type(&mut self, name: &str, base: EntityTypeId) -> EntityTypeId {
        self.insert_entity_type(name, Some(base))
    }

    fn insert_entity_type(&mut self, name: &str, base: Option<EntityTypeId>) -> EntityTypeId {
        let id = EntityTypeId(self.entity_types.len());
        self.entity_types
            .insert(id, EntityType::new(id, name, base));
        id
    }

    pub fn add_property(&mut self, entity_type: EntityTypeId, name: &str, ty: Type) -> PropertyId {
        let entity = self.entity_type_mut(entity_type);
        let id = PropertyId {
            entity_type,
            index: entity.properties.len(),
        };
        entity.properties.push(Property::new(id, name, ty));
        id
    }

    /// Declares the primary key. Must be called on a root type.
    pub fn set_primary_key(&mut self, entity_type: EntityTypeId, properties: &[PropertyId]) -> KeyId {
        let entity = self.entity_type_mut(entity_type);
        entity.keys.retain(|key| !key.primary_key);
        Self::push_key(entity, properties, true)
    }

    pub fn add_key(&mut self, entity_type: EntityTypeId, properties: &[PropertyId]) -> KeyId {
        Self::push_key(self.entity_type_mut(entity_type), properties, false)
    }

    fn push_key(entity: &mut EntityType, properties: &[PropertyId], primary_key: bool) -> KeyId {
        let id = KeyId {
            entity_type: entity.id,
            index: entity.keys.len(),
        };
        entity.keys.push(Key {
            id,
            properties: properties.to_vec(),
            primary_key,
            name: None,
        });
        id
    }

    /// Adds a foreign key referencing the principal's primary key.
    pub fn add_foreign_key(
        &mut self,
        entity_type: EntityTypeId,
        properties: &[PropertyId],
        principal: EntityTypeId,
    ) -> ForeignKeyId {
        let principal_key = self
            .primary_key(principal)
            .map(|key| key.id)
            .unwrap_or(KeyId {
                entity_type: principal,
                index: usize::MAX,
            });

        let entity = self.entity_type_mut(entity_type);
        let id = ForeignKeyId {
            entity_type,
            index: entity.foreign_keys.len(),
        };
        entity.foreign_keys.push(ForeignKey {
            id,
            properties: properties.to_vec(),
            principal,
            principal_key,
            required: false,
            required_dependent: false,
            unique: false,
            delete_behavior: DeleteBehavior::default(),
            name: None,
        });
        id
    }

    pub fn add_index(&mut self, entity_type: EntityTypeId, properties: &[PropertyId]) -> IndexId {
        let entity = self.entity_type_mut(entity_type);
        let id = IndexId {
            entity_type,
            index: entity.indices.len(),
        };
        entity.indices.push(Index {
            id,
            properties: properties.to_vec(),
            unique: false,
            name: None,
            descending: vec![],
            filter: None,
        });
        id
    }

    pub fn add_check_constraint(&mut self, entity_type: EntityTypeId, name: &str, sql: &str) {
        self.entity_type_mut(entity_type)
            .check_constraints
            .push(CheckConstraint {
                entity_type,
                name: name.to_string(),
                constraint_name: None,
                sql: sql.to_string(),
            });
    }

    pub fn add_function(&mut self, mut function: DbFunction) -> FunctionId {
        function.id = FunctionId(self.functions.len());
        let id = function.id;
        self.functions.push(function);
        id
    }

    pub fn entity_types(&self) -> impl Iterator<Item = &EntityType> {
        self.entity_types.values()
    }

    pub fn entity_type(&self, id: impl Into<EntityTypeId>) -> &EntityType {
        self.entity_types
            .get(&id.into())
            .expect("invalid entity type ID")
    }

    pub fn entity_type_mut(&mut self, id: impl Into<EntityTypeId>) -> &mut EntityType {
        self.entity_types
            .get_mut(&id.into())
            .expect("invalid entity type ID")
    }

    pub fn find_entity_type(&self, name: &str) -> Option<&EntityType> {
        self.entity_types()
            .find(|entity| entity.name.upper_camel_case() == name)
    }

    pub fn property(&self, id: PropertyId) -> &Property {
        self.entity_type(id.entity_type)
            .properties
            .get(id.index)
            .expect("invalid property ID")
    }

    pub fn property_mut(&mut self, id: PropertyId) -> &mut Property {
        self.entity_type_mut(id.entity_type)
            .properties
            .get_mut(id.index)
            .expect("invalid property ID")
    }

    pub fn key(&self, id: KeyId) -> &Key {
        self.entity_type(id.entity_type)
            .keys
            .get(id.index)
            .expect("invalid key ID")
    }

    pub fn key_mut(&mut self, id: KeyId) -> &mut Key {
        self.entity_type_mut(id.entity_type)
            .keys
            .get_mut(id.index)
            .expect("invalid key ID")
    }

    pub fn foreign_key(&self, id: ForeignKeyId) -> &ForeignKey {
        self.entity_type(id.entity_type)
            .foreign_keys
            .get(id.index)
            .expect("invalid foreign key ID")
    }

    pub fn foreign_key_mut(&mut self, id: ForeignKeyId) -> &mut ForeignKey {
        self.entity_type_mut(id.entity_type)
            .foreign_keys
            .get_mut(id.index)
            .expect("invalid foreign key ID")
    }

    // NOTE: this is unlikely to confuse users given the context.
    #[allow(clippy::should_implement_trait)]
    pub fn index(&self, id: IndexId) -> &Index {
        self.entity_type(id.entity_type)
            .indices
            .get(id.index)
            .expect("invalid index ID")
    }

    pub fn index_mut(&mut self, id: IndexId) -> &mut Index {
        self.entity_type_mut(id.entity_type)
            .indices
            .get_mut(id.index)
            .expect("invalid index ID")
    }

    pub fn function(&self, id: FunctionId) -> &DbFunction {
        self.functions.get(id.0).expect("invalid function ID")
    }

    pub fn find_function(&self, model_name: &str) -> Option<&DbFunction> {
        self.functions
            .iter()
            .find(|function| function.model_name == model_name)
    }

    /// The root of the entity type's hierarchy
    pub fn root(&self, id: EntityTypeId) -> EntityTypeId {
        let mut id = id;
        while let Some(base) = self.entity_type(id).base {
            id = base;
        }
        id
    }

    /// The entity type and its ancestors, root first
    pub fn ancestors(&self, id: EntityTypeId) -> Vec<EntityTypeId> {
        let mut ret = vec![id];
        let mut id = id;
        while let Some(base) = self.entity_type(id).base {
            ret.push(base);
            id = base;
        }
        ret.reverse();
        ret
    }

    /// True if `ancestor` is `id` or one of its base types
    pub fn is_same_or_ancestor(&self, ancestor: EntityTypeId, id: EntityTypeId) -> bool {
        self.ancestors(id).contains(&ancestor)
    }

    /// Types deriving directly from `id`
    pub fn derived_types(&self, id: EntityTypeId) -> impl Iterator<Item = &EntityType> + '_ {
        self.entity_types()
            .filter(move |entity| entity.base == Some(id))
    }

    pub fn mapping_strategy(&self, id: EntityTypeId) -> MappingStrategy {
        self.entity_type(self.root(id)).mapping_strategy
    }

    /// All properties of the entity type, inherited ones first
    pub fn properties(&self, id: EntityTypeId) -> Vec<PropertyId> {
        self.ancestors(id)
            .into_iter()
            .flat_map(|ancestor| self.entity_type(ancestor).properties.iter().map(|p| p.id))
            .collect()
    }

    /// The hierarchy's primary key
    pub fn primary_key(&self, id: EntityTypeId) -> Option<&Key> {
        self.entity_type(self.root(id))
            .keys
            .iter()
            .find(|key| key.primary_key)
    }

    pub fn is_primary_key(&self, property: PropertyId) -> bool {
        self.primary_key(property.entity_type)
            .is_some_and(|key| key.properties.contains(&property))
    }

    /// Keys declared on the entity type and its ancestors
    pub fn keys(&self, id: EntityTypeId) -> Vec<&Key> {
        self.ancestors(id)
            .into_iter()
            .flat_map(|ancestor| &self.entity_type(ancestor).keys)
            .collect()
    }

    /// Foreign keys declared on the entity type and its ancestors
    pub fn foreign_keys(&self, id: EntityTypeId) -> Vec<&ForeignKey> {
        self.ancestors(id)
            .into_iter()
            .flat_map(|ancestor| &self.entity_type(ancestor).foreign_keys)
            .collect()
    }

    /// Indexes declared on the entity type and its ancestors
    pub fn indices(&self, id: EntityTypeId) -> Vec<&Index> {
        self.ancestors(id)
            .into_iter()
            .flat_map(|ancestor| &self.entity_type(ancestor).indices)
            .collect()
    }

    /// Check constraints declared on the entity type and its ancestors
    pub fn check_constraints(&self, id: EntityTypeId) -> Vec<&CheckConstraint> {
        self.ancestors(id)
            .into_iter()
            .flat_map(|ancestor| &self.entity_type(ancestor).check_constraints)
            .collect()
    }

    /// Renders property names as `{'A', 'B'}`
    pub fn format_properties(&self, properties: &[PropertyId]) -> String {
        let names = properties
            .iter()
            .map(|id| format!("'{}'", self.property(*id).name))
            .collect::<Vec<_>>();
        format!("{{{}}}", names.join(", "))
    }

    /// Checks that all references resolve and mapped hierarchies have keys.
    pub(crate) fn verify(&self) -> Result<()> {
        for entity in self.entity_types() {
            if let Some(base) = entity.base {
                if !self.entity_types.contains_key(&base) || base >= entity.id {
                    return Err(Error::invalid_schema(format!(
                        "base type {base:?} of `{}` must be declared before it",
                        entity.name
                    )));
                }
            }
        }

        for entity in self.entity_types() {
            let context = || crate::err!("verifying entity type `{}`", entity.name);

            for (i, property) in entity.properties.iter().enumerate() {
                assert_eq!(property.id.entity_type, entity.id);
                assert_eq!(property.id.index, i);
            }

            for key in &entity.keys {
                if key.properties.is_empty() {
                    return Err(Error::invalid_schema("key has no properties").context(context()));
                }
                self.verify_properties(entity.id, &key.properties)
                    .map_err(|err| err.context(context()))?;
            }

            if entity.base.is_some() && entity.keys.iter().any(|key| key.primary_key) {
                return Err(Error::invalid_schema(
                    "primary key must be declared on the root type",
                )
                .context(context()));
            }

            if entity.base.is_none()
                && entity.table != super::TableConfig::Unmapped
                && self.primary_key(entity.id).is_none()
            {
                return Err(Error::invalid_schema(format!(
                    "entity type `{}` is mapped to a table but has no primary key",
                    entity.name
                )));
            }

            for fk in &entity.foreign_keys {
                self.verify_properties(entity.id, &fk.properties)
                    .map_err(|err| err.context(context()))?;

                if !self.entity_types.contains_key(&fk.principal) {
                    return Err(Error::invalid_schema(format!(
                        "foreign key {} references a missing entity type",
                        self.format_properties(&fk.properties)
                    ))
                    .context(context()));
                }

                let principal_key = self
                    .entity_type(fk.principal_key.entity_type)
                    .keys
                    .get(fk.principal_key.index)
                    .ok_or_else(|| {
                        Error::invalid_schema(format!(
                            "foreign key {} references a missing key",
                            self.format_properties(&fk.properties)
                        ))
                    })
                    .map_err(|err| err.context(context()))?;

                if principal_key.properties.len() != fk.properties.len() {
                    return Err(Error::invalid_schema(format!(
                        "foreign key {} has {} properties but the principal key has {}",
                        self.format_properties(&fk.properties),
                        fk.properties.len(),
                        principal_key.properties.len()
                    ))
                    .context(context()));
                }
            }

            for index in &entity.indices {
                self.verify_properties(entity.id, &index.properties)
                    .map_err(|err| err.context(context()))?;
            }

            for fragment in &entity.fragments {
                self.verify_properties(entity.id, &fragment.properties)
                    .map_err(|err| err.context(context()))?;
            }

            if let Some(function) = &entity.function {
                if self.find_function(function).is_none() {
                    return Err(Error::invalid_schema(format!(
                        "function `{function}` does not exist"
                    ))
                    .context(context()));
                }
            }
        }

        for function in &self.functions {
            if let Some(returns) = function.returns {
                if !self.entity_types.contains_key(&returns) {
                    return Err(Error::invalid_schema(format!(
                        "function `{}` returns a missing entity type",
                        function.model_name
                    )));
                }
            }
        }

        Ok(())
    }

    /// Properties must belong to the entity type or one of its ancestors.
    fn verify_properties(&self, entity_type: EntityTypeId, properties: &[PropertyId]) -> Result<()> {
        let ancestors = self.ancestors(entity_type);

        for property in properties {
            let valid = ancestors.contains(&property.entity_type)
                && property.index < self.entity_type(property.entity_type).properties.len();

            if !valid {
                return Err(Error::invalid_schema(format!(
                    "property {property:?} is not defined on this type"
                )));
            }
        }

        Ok(())
    }
}
