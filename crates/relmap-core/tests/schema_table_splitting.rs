use pretty_assertions::assert_eq;
use relmap_core::row::{Entry, Value};
use relmap_core::schema::app::{self, EntityTypeId, MappingFragment, PropertyId, StoreName, TableConfig, Type};
use relmap_core::schema::db::{StoreObjectId, StoreObjectKind};
use relmap_core::schema::mapping::TableMappingId;
use relmap_core::schema::DebugOptions;
use relmap_core::{Capability, Schema};

struct Cars {
    app: app::Schema,
    car: EntityTypeId,
    car_name: PropertyId,
    details: EntityTypeId,
    details_name: PropertyId,
}

/// `Car` and `CarDetails` share the `Cars` table, linked by their primary
/// keys. Both declare a `Name` property stored in the same column.
fn cars(required_dependent: bool) -> Cars {
    let mut app = app::Schema::new();

    let car = app.add_entity_type("Car");
    let id = app.add_property(car, "Id", Type::I32);
    let car_name = app.add_property(car, "Name", Type::String);
    app.set_primary_key(car, &[id]);

    let details = app.add_entity_type("CarDetails");
    app.entity_type_mut(details).table = TableConfig::Named("Cars".into());
    let details_id = app.add_property(details, "Id", Type::I32);
    let details_name = app.add_property(details, "Name", Type::String);
    app.add_property(details, "Description", Type::String);
    app.set_primary_key(details, &[details_id]);

    let fk = app.add_foreign_key(details, &[details_id], car);
    let fk = app.foreign_key_mut(fk);
    fk.unique = true;
    fk.required = true;
    fk.required_dependent = required_dependent;

    Cars {
        app,
        car,
        car_name,
        details,
        details_name,
    }
}

fn build(app: app::Schema) -> Schema {
    Schema::builder().build(app, &Capability::SQLITE).unwrap()
}

fn cars_table(schema: &Schema) -> StoreObjectId {
    schema.db.find_table("Cars", None).unwrap().id.into()
}

fn table_mapping(schema: &Schema, entity_type: EntityTypeId) -> TableMappingId {
    let mappings = schema
        .mapping
        .entity_type_mappings(entity_type, StoreObjectKind::Table);
    assert_eq!(mappings.len(), 1);
    mappings[0]
}

fn mapped_entity_types(schema: &Schema, object: StoreObjectId) -> Vec<String> {
    schema
        .db
        .object(object)
        .mappings()
        .iter()
        .map(|id| {
            let entity_type = schema.mapping.table_mapping(id).entity_type;
            schema.app.entity_type(entity_type).name.to_string()
        })
        .collect()
}

#[test]
fn entity_types_share_one_table() {
    let Cars { app, .. } = cars(false);
    let schema = build(app);

    assert_eq!(schema.db.tables.len(), 1);

    let cars = cars_table(&schema);
    assert_eq!(mapped_entity_types(&schema, cars), ["Car", "CarDetails"]);

    let names = schema
        .db
        .columns_of(cars)
        .map(|column| column.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, ["Id", "Description", "Name"]);

    let id = schema.find_column(cars, "Id").unwrap();
    assert_eq!(id.property_mappings.len(), 2);
}

#[test]
fn dependent_is_not_the_principal() {
    let Cars {
        app, car, details, ..
    } = cars(false);
    let schema = build(app);

    let car = schema.mapping.table_mapping(table_mapping(&schema, car));
    let details = schema.mapping.table_mapping(table_mapping(&schema, details));
    assert_eq!(car.is_shared_table_principal(), Some(true));
    assert_eq!(details.is_shared_table_principal(), Some(false));

    let dump = schema.object_debug_string(cars_table(&schema), DebugOptions::default());
    assert!(dump.contains("\n    Car - Cars IncludesDerivedTypes IsSharedTablePrincipal"));
    assert!(dump.contains("\n    CarDetails - Cars IncludesDerivedTypes !IsSharedTablePrincipal"));
}

#[test]
fn linking_foreign_key_is_not_a_constraint() {
    let Cars { app, details, .. } = cars(false);
    let schema = build(app);
    let cars = cars_table(&schema);

    let fks = schema.row_internal_foreign_keys(details, cars);
    assert_eq!(fks.len(), 1);

    let table = schema.db.find_table("Cars", None).unwrap();
    assert!(table.foreign_keys.is_empty());
    assert!(table.referencing_foreign_keys.is_empty());

    // Both primary keys share one constraint
    let primary_key = schema.db.unique_constraint(table.primary_key.unwrap());
    assert_eq!(primary_key.name, "PK_Cars");
    assert_eq!(primary_key.mapped_keys.len(), 2);
    assert_eq!(
        table.unique_constraints.keys().collect::<Vec<_>>(),
        ["PK_Cars"]
    );
}

#[test]
fn optional_dependent_columns_are_nullable() {
    let Cars { app, details, .. } = cars(false);
    let schema = build(app);
    let cars = cars_table(&schema);

    assert!(schema.is_optional_dependent(details, cars));
    assert!(!schema.find_column(cars, "Id").unwrap().is_nullable);
    assert!(schema.find_column(cars, "Description").unwrap().is_nullable);

    // Car stores a required name in the same column, the dependent may not
    assert!(schema.find_column(cars, "Name").unwrap().is_nullable);
}

#[test]
fn required_dependent_columns_follow_properties() {
    let Cars { app, details, .. } = cars(true);
    let schema = build(app);
    let cars = cars_table(&schema);

    assert!(!schema.is_optional_dependent(details, cars));
    assert!(!schema.find_column(cars, "Description").unwrap().is_nullable);
    assert!(!schema.find_column(cars, "Name").unwrap().is_nullable);
}

#[test]
fn shared_columns_of_the_dependent() {
    let Cars {
        app,
        car,
        details,
        details_name,
        ..
    } = cars(false);
    let schema = build(app);
    let cars = cars_table(&schema);

    assert_eq!(
        schema.non_principal_shared_non_pk_properties(details, cars),
        [details_name]
    );
    assert!(schema.non_principal_shared_non_pk_properties(car, cars).is_empty());
}

#[test]
fn principal_toggle_reorders_mappings() {
    let Cars {
        app, car, details, ..
    } = cars(false);
    let mut schema = build(app);
    let cars = cars_table(&schema);
    let car = table_mapping(&schema, car);
    let details = table_mapping(&schema, details);

    let original_db = schema.db.clone();
    let original_mapping = schema.mapping.clone();

    // Setting the current value changes nothing
    schema.set_is_shared_table_principal(details, false);
    assert_eq!(schema.mapping, original_mapping);
    assert_eq!(schema.db, original_db);

    schema.set_is_shared_table_principal(details, true);
    assert_eq!(mapped_entity_types(&schema, cars), ["Car", "CarDetails"]);

    schema.set_is_shared_table_principal(car, false);
    assert_eq!(schema.db.object(cars).mappings().as_slice(), [details, car]);

    // Column mappings follow their table mapping
    let name = schema.find_column(cars, "Name").unwrap();
    let first = schema.mapping.column_mapping(name.property_mappings.first().unwrap());
    assert_eq!(first.table_mapping, details);

    schema.set_is_shared_table_principal(car, true);
    schema.set_is_shared_table_principal(details, false);
    assert_eq!(schema.mapping, original_mapping);
    assert_eq!(schema.db, original_db);
}

#[test]
fn removing_a_mapping_drops_its_columns() {
    let Cars {
        app, car, details, ..
    } = cars(false);
    let mut schema = build(app);
    let cars = cars_table(&schema);
    let details_mapping = table_mapping(&schema, details);

    schema.remove_table_mapping(details_mapping);

    assert_eq!(mapped_entity_types(&schema, cars), ["Car"]);
    assert!(schema
        .mapping
        .entity_type_mappings(details, StoreObjectKind::Table)
        .is_empty());
    assert_eq!(schema.mapping.main_table_mapping(details), None);
    assert_eq!(schema.table_for(details), None);
    assert!(schema.table_for(car).is_some());

    assert!(schema.find_column(cars, "Description").is_none());
    let names = schema
        .db
        .columns_of(cars)
        .map(|column| column.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, ["Id", "Name"]);

    let name = schema.find_column(cars, "Name").unwrap();
    assert_eq!(name.property_mappings.len(), 1);
    assert_eq!(schema.mapping.table_mappings().count(), 1);
}

#[test]
fn removing_the_dependent_clears_shared_state() {
    let Cars {
        app,
        car,
        details,
        details_name,
        ..
    } = cars(false);
    let mut schema = build(app);
    let cars = cars_table(&schema);
    let name = schema.find_column(cars, "Name").unwrap().id;

    let entry = Entry::new(details).with(details_name, "sedan details");
    let accessors = schema.column_accessors(name).unwrap();
    assert_eq!(
        accessors.current_value(&entry),
        Some(&Value::from("sedan details"))
    );

    schema.remove_table_mapping(table_mapping(&schema, details));

    // Car is the only entity type left in the table
    let car = schema.mapping.table_mapping(table_mapping(&schema, car));
    assert_eq!(car.is_shared_table_principal(), None);

    // The optional dependent no longer forces the column to be nullable
    assert!(!schema.db.column(name).is_nullable);

    let accessors = schema.column_accessors(name).unwrap();
    assert_eq!(accessors.current_value(&entry), None);

    let dump = schema.object_debug_string(cars, DebugOptions::default());
    assert!(dump.contains("\n    Car - Cars IncludesDerivedTypes"));
    assert!(!dump.contains("IsSharedTablePrincipal"));
}

#[test]
fn removing_the_principal_clears_shared_state() {
    let Cars { app, car, details, .. } = cars(false);
    let mut schema = build(app);
    let cars = cars_table(&schema);

    schema.remove_table_mapping(table_mapping(&schema, car));

    let details = schema.mapping.table_mapping(table_mapping(&schema, details));
    assert_eq!(details.is_shared_table_principal(), None);
    assert!(!schema.is_optional_dependent(details.entity_type, cars));
    assert!(!schema.find_column(cars, "Description").unwrap().is_nullable);
    assert!(!schema.find_column(cars, "Name").unwrap().is_nullable);
}

#[test]
fn principal_toggle_refreshes_accessors() {
    let Cars {
        app,
        car,
        car_name,
        details,
        details_name,
    } = cars(false);
    let mut schema = build(app);
    let cars = cars_table(&schema);
    let name = schema.find_column(cars, "Name").unwrap().id;

    // An entry of neither type reads the first mapped property
    let entry = Entry::new(EntityTypeId(usize::MAX))
        .with(car_name, "sedan")
        .with(details_name, "sedan details");
    assert_eq!(
        schema.column_accessors(name).unwrap().current_value(&entry),
        Some(&Value::from("sedan"))
    );

    let car = table_mapping(&schema, car);
    let details = table_mapping(&schema, details);
    schema.set_is_shared_table_principal(car, false);
    schema.set_is_shared_table_principal(details, true);

    assert_eq!(
        schema.column_accessors(name).unwrap().current_value(&entry),
        Some(&Value::from("sedan details"))
    );
}

#[test]
fn entity_splitting() {
    let mut app = app::Schema::new();

    let customer = app.add_entity_type("Customer");
    let id = app.add_property(customer, "Id", Type::I32);
    app.add_property(customer, "Name", Type::String);
    let address = app.add_property(customer, "Address", Type::String);
    app.set_primary_key(customer, &[id]);
    app.entity_type_mut(customer).fragments.push(MappingFragment {
        table: StoreName::new("CustomerDetails"),
        properties: vec![address],
    });

    let schema = build(app);

    let main = schema.table_for(customer).unwrap();
    assert_eq!(schema.db.table(main).base.name, "Customers");

    let mappings = schema
        .mapping
        .entity_type_mappings(customer, StoreObjectKind::Table)
        .iter()
        .map(|id| schema.mapping.table_mapping(*id))
        .collect::<Vec<_>>();
    assert_eq!(mappings.len(), 2);
    assert_eq!(mappings[0].is_split_entity_type_principal(), Some(true));
    assert_eq!(mappings[1].is_split_entity_type_principal(), Some(false));
    assert_eq!(mappings[0].is_shared_table_principal(), None);

    let columns = |name: &str| {
        let table = schema.db.find_table(name, None).unwrap();
        schema
            .db
            .columns_of(table.id.into())
            .map(|column| column.name.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(columns("Customers"), ["Id", "Name"]);
    assert_eq!(columns("CustomerDetails"), ["Id", "Address"]);

    let details = schema.db.find_table("CustomerDetails", None).unwrap();
    let primary_key = schema.db.unique_constraint(details.primary_key.unwrap());
    assert_eq!(primary_key.name, "PK_CustomerDetails");
}
