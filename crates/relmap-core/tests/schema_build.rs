use pretty_assertions::assert_eq;
use relmap_core::schema::app::{self, DeleteBehavior, Type};
use relmap_core::schema::db::{HasColumns, ReferentialAction, StoreObjectId};
use relmap_core::schema::DebugOptions;
use relmap_core::{Capability, Schema};

fn shop() -> app::Schema {
    let mut app = app::Schema::new();

    let customer = app.add_entity_type("Customer");
    let id = app.add_property(customer, "Id", Type::I32);
    app.add_property(customer, "Name", Type::String);
    app.set_primary_key(customer, &[id]);

    let order = app.add_entity_type("Order");
    let id = app.add_property(order, "Id", Type::I32);
    let customer_id = app.add_property(order, "CustomerId", Type::I32);
    let date = app.add_property(order, "Date", Type::DateTime);
    app.property_mut(date).nullable = true;
    app.set_primary_key(order, &[id]);

    let fk = app.add_foreign_key(order, &[customer_id], customer);
    app.foreign_key_mut(fk).delete_behavior = DeleteBehavior::Cascade;
    app.add_index(order, &[date]);

    app
}

fn build(app: app::Schema) -> Schema {
    Schema::builder().build(app, &Capability::SQLITE).unwrap()
}

fn column_names(schema: &Schema, table: &str) -> Vec<String> {
    let table = schema.db.find_table(table, None).unwrap();
    schema
        .db
        .columns_of(table.id.into())
        .map(|column| column.name.clone())
        .collect()
}

#[test]
fn tables_are_named_after_pluralized_entity_types() {
    let schema = build(shop());

    let names = schema
        .db
        .tables
        .iter()
        .map(|table| table.base.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, ["Customers", "Orders"]);
}

#[test]
fn key_columns_come_first() {
    let schema = build(shop());

    assert_eq!(column_names(&schema, "Customers"), ["Id", "Name"]);
    assert_eq!(column_names(&schema, "Orders"), ["Id", "CustomerId", "Date"]);
}

#[test]
fn constraints_get_default_names() {
    let schema = build(shop());
    let orders = schema.db.find_table("Orders", None).unwrap();

    let primary_key = schema.db.unique_constraint(orders.primary_key.unwrap());
    assert_eq!(primary_key.name, "PK_Orders");
    assert!(primary_key.is_primary_key);

    let fks = orders
        .foreign_keys
        .iter()
        .map(|id| schema.db.foreign_key(id))
        .collect::<Vec<_>>();
    assert_eq!(fks.len(), 1);
    assert_eq!(fks[0].name, "FK_Orders_Customers_CustomerId");
    assert_eq!(fks[0].on_delete, ReferentialAction::Cascade);

    let customers = schema.db.find_table("Customers", None).unwrap();
    assert_eq!(
        customers.referencing_foreign_keys.as_slice(),
        orders.foreign_keys.as_slice()
    );
    assert_eq!(
        fks[0].principal_unique_constraint,
        customers.primary_key.unwrap()
    );

    assert!(orders.indices.contains_key("IX_Orders_Date"));
}

#[test]
fn nullability_follows_properties() {
    let schema = build(shop());
    let orders = schema.db.find_table("Orders", None).unwrap().id;

    assert!(!schema.find_column(orders, "CustomerId").unwrap().is_nullable);
    assert!(schema.find_column(orders, "Date").unwrap().is_nullable);
}

#[test]
fn columns_are_identified_by_name() {
    let app = shop();
    let order = app.find_entity_type("Order").unwrap();
    let customer_id = order.property("CustomerId").unwrap().id;

    let schema = build(app);
    let orders = schema.db.find_table("Orders", None).unwrap().id;

    let by_name = schema.find_column(orders, "CustomerId").unwrap();
    let by_property = schema.find_column_for_property(orders, customer_id).unwrap();
    assert_eq!(by_name.id, by_property.id);

    assert!(schema.find_column(orders, "Missing").is_none());
}

#[test]
fn building_twice_gives_equal_models() {
    let a = build(shop());
    let b = build(shop());

    assert_eq!(a.db, b.db);
    assert_eq!(a.mapping, b.mapping);
    assert!(!std::ptr::eq(&a.db, &b.db));
}

#[test]
fn prefix_and_default_schema() {
    let schema = Schema::builder()
        .table_name_prefix("tbl_")
        .default_schema("sales")
        .build(shop(), &Capability::POSTGRESQL)
        .unwrap();

    let orders = schema.db.find_table("tbl_Orders", Some("sales")).unwrap();
    assert_eq!(orders.base.display_name(), "sales.tbl_Orders");
    assert!(schema.db.find_table("tbl_Orders", None).is_none());

    let fk = schema.db.foreign_key(orders.foreign_keys.first().unwrap());
    assert_eq!(fk.name, "FK_tbl_Orders_tbl_Customers_CustomerId");
}

#[test]
fn long_names_are_truncated() {
    let capability = Capability {
        max_identifier_length: 12,
        ..Capability::SQLITE
    };
    let schema = Schema::builder().build(shop(), &capability).unwrap();
    let orders = schema.db.find_table("Orders", None).unwrap();

    let fk = schema.db.foreign_key(orders.foreign_keys.first().unwrap());
    assert_eq!(fk.name, "FK_Orders_C~");
    assert!(orders.indices.contains_key("IX_Orders_D~"));

    let customers = schema.db.find_table("Customers", None).unwrap();
    assert_eq!(
        schema.db.unique_constraint(customers.primary_key.unwrap()).name,
        "PK_Customers"
    );
}

#[test]
fn mapped_root_without_key_is_rejected() {
    let mut app = app::Schema::new();
    let tag = app.add_entity_type("Tag");
    app.add_property(tag, "Label", Type::String);

    let err = Schema::builder()
        .build(app, &Capability::SQLITE)
        .unwrap_err();
    assert!(err.is_invalid_schema());
}

#[test]
fn unmapped_types_have_no_table() {
    let mut app = shop();
    let customer = app.find_entity_type("Customer").unwrap().id;
    app.entity_type_mut(customer).table = app::TableConfig::Unmapped;

    let schema = build(app);

    assert!(schema.db.find_table("Customers", None).is_none());
    assert!(schema.table_for(customer).is_none());

    // The foreign key has no principal table to reference.
    let orders = schema.db.find_table("Orders", None).unwrap();
    assert!(orders.foreign_keys.is_empty());
}

#[test]
fn conflicting_store_types_are_rejected() {
    let mut app = app::Schema::new();
    let vehicle = app.add_entity_type("Vehicle");
    let id = app.add_property(vehicle, "Id", Type::I32);
    app.set_primary_key(vehicle, &[id]);

    let car = app.add_derived_entity_type("Car", vehicle);
    app.add_property(car, "Code", Type::String);

    let boat = app.add_derived_entity_type("Boat", vehicle);
    app.add_property(boat, "Code", Type::I64);

    let err = Schema::builder()
        .build(app, &Capability::SQLITE)
        .unwrap_err();

    assert!(err.is_invalid_schema());
    assert!(err.to_string().contains("'Car.Code' and 'Boat.Code'"));
    assert!(err.to_string().contains("('TEXT' and 'BIGINT')"));
}

#[test]
fn unsupported_store_types_are_rejected() {
    let mut app = shop();
    let customer = app.find_entity_type("Customer").unwrap();
    let name = customer.property("Name").unwrap().id;
    app.property_mut(name).store_type = Some(relmap_core::schema::db::Type::VarChar(100_000));

    let err = Schema::builder()
        .build(app, &Capability::MYSQL)
        .unwrap_err();
    assert!(err.is_unsupported_feature());
}

#[test]
fn debug_string() {
    let schema = build(shop());
    let orders = schema.db.find_table("Orders", None).unwrap().id;

    assert_eq!(
        schema.object_debug_string(StoreObjectId::Table(orders), DebugOptions::default()),
        "\
Table: Orders
  Columns:
    Id (INTEGER) NonNullable
    CustomerId (INTEGER) NonNullable
    Date (TEXT) Nullable
  Keys:
    PK_Orders {'Id'} PrimaryKey
  Foreign keys:
    FK_Orders_Customers_CustomerId {'CustomerId'} -> Customers {'Id'} CASCADE
  Indexes:
    IX_Orders_Date {'Date'}
  Mappings:
    Order - Orders IncludesDerivedTypes"
    );
}

#[test]
fn debug_string_options() {
    let mut app = shop();
    let customer = app.find_entity_type("Customer").unwrap();
    let name = customer.property("Name").unwrap().id;
    app.property_mut(name).facets.comment = Some("Display name".to_string());

    let schema = build(app);
    let customers = schema.db.find_table("Customers", None).unwrap().id;

    let single_line = DebugOptions {
        single_line: true,
        indent: 2,
        ..DebugOptions::default()
    };
    assert_eq!(
        schema.object_debug_string(customers.into(), single_line),
        "  Table: Customers"
    );
    assert_eq!(schema.to_debug_string(single_line), "  RelationalModel:");

    let annotated = DebugOptions {
        include_annotations: true,
        ..DebugOptions::default()
    };
    let out = schema.object_debug_string(customers.into(), annotated);
    assert!(out.contains("    Name (TEXT) NonNullable\n      Comment: Display name"));

    let model = schema.to_debug_string(DebugOptions::default());
    assert!(model.starts_with("RelationalModel:\n  Table: Customers\n"));
    assert!(model.contains("\n  Table: Orders\n"));
}

#[test]
fn tables_expose_their_columns() {
    let schema = build(shop());
    let customers = schema.db.find_table("Customers", None).unwrap();

    assert_eq!(customers.name(), "Customers");
    assert_eq!(customers.column_ids().len(), 2);
    assert_eq!(customers.mappings().len(), 1);
}
