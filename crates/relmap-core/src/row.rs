//! Runtime values used by the derived per-column and per-constraint helpers.

use crate::schema::app::{EntityTypeId, PropertyId};
use std::collections::{BTreeMap, HashMap};

/// A stored value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Value {
    Null,
    Bool(bool),
    I64(i64),
    String(String),
    Bytes(Vec<u8>),
}

/// A row of a store object, keyed by column name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: BTreeMap<String, Value>,
}

/// The tracked state of one entity instance
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub entity_type: EntityTypeId,
    pub values: HashMap<PropertyId, Value>,
}

/// How stored values of a column compare
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ValueComparer {
    #[default]
    Default,

    /// Strings compare ignoring ASCII case
    CaseInsensitive,
}

/// Reads the value a column would receive from an entity entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnAccessors {
    column: String,

    /// Properties stored in the column and the entity types they were mapped
    /// for, in column mapping order
    sources: Vec<(EntityTypeId, PropertyId)>,
}

/// Extracts the value of a key constraint from a row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowKeyValueFactory {
    key: KeyColumns,
}

/// Extracts the value of an index from a row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowIndexValueFactory {
    key: KeyColumns,
    is_unique: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct KeyColumns {
    columns: Vec<(String, ValueComparer)>,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::I64(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: &str, value: impl Into<Value>) {
        self.values.insert(column.to_string(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }
}

impl Entry {
    pub fn new(entity_type: EntityTypeId) -> Self {
        Self {
            entity_type,
            values: HashMap::new(),
        }
    }

    pub fn with(mut self, property: PropertyId, value: impl Into<Value>) -> Self {
        self.values.insert(property, value.into());
        self
    }
}

impl ValueComparer {
    /// The representative of the value's equivalence class
    pub fn normalize(&self, value: &Value) -> Value {
        match (self, value) {
            (ValueComparer::CaseInsensitive, Value::String(s)) => {
                Value::String(s.to_ascii_lowercase())
            }
            _ => value.clone(),
        }
    }

    pub fn equals(&self, a: &Value, b: &Value) -> bool {
        self.normalize(a) == self.normalize(b)
    }
}

impl ColumnAccessors {
    pub(crate) fn new(column: &str, sources: Vec<(EntityTypeId, PropertyId)>) -> Self {
        Self {
            column: column.to_string(),
            sources,
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// The entry's value for this column.
    ///
    /// Prefers a property mapped for the entry's own entity type, then any
    /// mapped property the entry has a value for.
    pub fn current_value<'a>(&self, entry: &'a Entry) -> Option<&'a Value> {
        self.sources
            .iter()
            .filter(|(entity_type, _)| *entity_type == entry.entity_type)
            .chain(self.sources.iter())
            .find_map(|(_, property)| entry.values.get(property))
    }
}

impl KeyColumns {
    fn value(&self, row: &Row) -> Option<Vec<Value>> {
        self.columns
            .iter()
            .map(|(column, comparer)| match row.get(column) {
                Some(value) if !value.is_null() => Some(comparer.normalize(value)),
                _ => None,
            })
            .collect()
    }

    fn find_duplicate(&self, rows: &[Row]) -> Option<(usize, usize)> {
        let mut seen = HashMap::new();

        for (i, row) in rows.iter().enumerate() {
            let Some(value) = self.value(row) else {
                continue;
            };

            if let Some(first) = seen.insert(value, i) {
                return Some((first, i));
            }
        }

        None
    }
}

impl RowKeyValueFactory {
    pub(crate) fn new(columns: Vec<(String, ValueComparer)>) -> Self {
        Self {
            key: KeyColumns { columns },
        }
    }

    /// The key of the row, or `None` if any key column is null or missing.
    pub fn create_key_value(&self, row: &Row) -> Option<Vec<Value>> {
        self.key.value(row)
    }

    /// The first pair of rows with the same key
    pub fn find_duplicate(&self, rows: &[Row]) -> Option<(usize, usize)> {
        self.key.find_duplicate(rows)
    }
}

impl RowIndexValueFactory {
    pub(crate) fn new(columns: Vec<(String, ValueComparer)>, is_unique: bool) -> Self {
        Self {
            key: KeyColumns { columns },
            is_unique,
        }
    }

    /// The index entry of the row, or `None` if any indexed column is null or
    /// missing.
    pub fn create_index_value(&self, row: &Row) -> Option<Vec<Value>> {
        self.key.value(row)
    }

    /// The first pair of rows violating the index. Non-unique indexes are
    /// never violated.
    pub fn find_duplicate(&self, rows: &[Row]) -> Option<(usize, usize)> {
        if !self.is_unique {
            return None;
        }

        self.key.find_duplicate(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory(is_unique: bool) -> RowIndexValueFactory {
        RowIndexValueFactory::new(
            vec![
                ("TenantId".to_string(), ValueComparer::Default),
                ("Email".to_string(), ValueComparer::CaseInsensitive),
            ],
            is_unique,
        )
    }

    #[test]
    fn null_component_yields_no_key() {
        let factory = factory(true);
        let row = Row::new().with("TenantId", 1i64).with("Email", Value::Null);
        assert_eq!(factory.create_index_value(&row), None);

        let row = Row::new().with("TenantId", 1i64);
        assert_eq!(factory.create_index_value(&row), None);
    }

    #[test]
    fn case_insensitive_duplicates() {
        let rows = [
            Row::new().with("TenantId", 1i64).with("Email", "a@example.com"),
            Row::new().with("TenantId", 2i64).with("Email", "a@example.com"),
            Row::new().with("TenantId", 1i64).with("Email", "A@Example.com"),
        ];

        assert_eq!(factory(true).find_duplicate(&rows), Some((0, 2)));
        assert_eq!(factory(false).find_duplicate(&rows), None);
    }

    #[test]
    fn accessors_prefer_own_entity_type() {
        let car = EntityTypeId(0);
        let details = EntityTypeId(1);
        let car_name = PropertyId {
            entity_type: car,
            index: 1,
        };
        let details_name = PropertyId {
            entity_type: details,
            index: 1,
        };

        let accessors = ColumnAccessors::new("Name", vec![(car, car_name), (details, details_name)]);

        let entry = Entry::new(details)
            .with(car_name, "car")
            .with(details_name, "details");
        assert_eq!(accessors.current_value(&entry), Some(&Value::from("details")));

        let entry = Entry::new(details).with(car_name, "car");
        assert_eq!(accessors.current_value(&entry), Some(&Value::from("car")));
    }
}
