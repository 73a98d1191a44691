use pretty_assertions::assert_eq;
use relmap_core::schema::app::{
    self, DbFunction, ProcedureParameter, StoreName, StoreOperation, StoredProcedureConfig,
    TableConfig, Type, ValueGenerated,
};
use relmap_core::schema::db::{
    self, ColumnKind, HasColumns, StoreObjectId, StoreObjectIdentifier, StoreObjectKind,
    StoredProcedureId,
};
use relmap_core::schema::mapping::TableMappingKind;
use relmap_core::schema::DebugOptions;
use relmap_core::{Capability, Schema};

fn build(app: app::Schema) -> Schema {
    Schema::builder().build(app, &Capability::SQLITE).unwrap()
}

fn column_names(schema: &Schema, object: StoreObjectId) -> Vec<String> {
    schema
        .db
        .columns_of(object)
        .map(|column| column.name.clone())
        .collect()
}

#[test]
fn hierarchy_reads_from_root_view() {
    let mut app = app::Schema::new();

    let post = app.add_entity_type("Post");
    let id = app.add_property(post, "Id", Type::I32);
    app.add_property(post, "Title", Type::String);
    app.set_primary_key(post, &[id]);
    app.entity_type_mut(post).view = Some(StoreName::new("PostsView"));
    app.entity_type_mut(post).view_definition = Some("SELECT * FROM Posts".to_string());

    let featured = app.add_derived_entity_type("FeaturedPost", post);
    app.add_property(featured, "Rank", Type::I32);

    let schema = build(app);

    let view = schema.db.find_view("PostsView", None).unwrap();
    assert_eq!(view.definition_sql.as_deref(), Some("SELECT * FROM Posts"));
    assert_eq!(column_names(&schema, view.id.into()), ["Id", "Title", "Rank"]);

    let mappings = schema.mapping.entity_type_mappings(featured, StoreObjectKind::View);
    assert_eq!(mappings.len(), 1);
    let mapping = schema.mapping.table_mapping(mappings[0]);
    assert_eq!(mapping.table, StoreObjectId::View(view.id));
    assert_eq!(mapping.kind, TableMappingKind::View);
    assert!(mapping.includes_derived_types);

    let rank = schema.find_column(view.id, "Rank").unwrap();
    assert!(rank.is_nullable);

    // Views carry no constraints, the table still gets its key
    let posts = schema.db.find_table("Posts", None).unwrap();
    assert!(posts.primary_key.is_some());
}

#[test]
fn keyless_view() {
    let mut app = app::Schema::new();

    let summary = app.add_entity_type("BlogSummary");
    app.add_property(summary, "Title", Type::String);
    app.add_property(summary, "PostCount", Type::I32);
    app.entity_type_mut(summary).table = TableConfig::Unmapped;
    app.entity_type_mut(summary).view = Some(StoreName::new("BlogSummaries").with_schema("blog"));

    let schema = build(app);

    assert!(schema.db.tables.is_empty());
    assert_eq!(schema.table_for(summary), None);

    let view = schema.db.find_view("BlogSummaries", Some("blog")).unwrap();
    assert_eq!(view.base.display_name(), "blog.BlogSummaries");
    assert_eq!(column_names(&schema, view.id.into()), ["Title", "PostCount"]);
}

#[test]
fn sql_query_mapping() {
    let mut app = app::Schema::new();

    let report = app.add_entity_type("Report");
    app.add_property(report, "Name", Type::String);
    app.add_property(report, "Total", Type::Decimal);
    app.entity_type_mut(report).table = TableConfig::Unmapped;
    app.entity_type_mut(report).sql_query = Some("SELECT Name, Total FROM Sales".to_string());

    let schema = build(app);

    let identifier = StoreObjectIdentifier {
        kind: StoreObjectKind::SqlQuery,
        name: "Report.MappedSqlQuery".to_string(),
        schema: None,
    };
    let Some(StoreObjectId::SqlQuery(query)) = schema.db.find_object(&identifier) else {
        panic!("query not registered");
    };

    assert_eq!(schema.db.query(query).sql, "SELECT Name, Total FROM Sales");
    assert_eq!(column_names(&schema, query.into()), ["Name", "Total"]);

    let mappings = schema.mapping.entity_type_mappings(report, StoreObjectKind::SqlQuery);
    let mapping = schema.mapping.table_mapping(mappings[0]);
    assert_eq!(mapping.kind, TableMappingKind::SqlQuery { is_default: true });

    let dump = schema.object_debug_string(query.into(), DebugOptions::default());
    assert!(dump.contains("Report - Report.MappedSqlQuery IncludesDerivedTypes IsDefault"));
}

#[test]
fn overloads_share_a_store_function() {
    let mut app = app::Schema::new();

    let by_id = app.add_function(DbFunction::new("LookupById", "Lookup").parameter("key", Type::I32));
    let by_number =
        app.add_function(DbFunction::new("LookupByNumber", "Lookup").parameter("number", Type::I32));
    let by_name =
        app.add_function(DbFunction::new("LookupByName", "Lookup").parameter("name", Type::String));

    let mut length = DbFunction::new("Length", "LEN").parameter("value", Type::String);
    length.return_type = Some(Type::I32);
    length.is_builtin = true;
    app.add_function(length);

    let schema = build(app);

    let overloads = schema.db.find_functions("Lookup", None).collect::<Vec<_>>();
    assert_eq!(overloads.len(), 2);

    let integer = overloads[0];
    assert_eq!(integer.db_functions, [by_id, by_number]);
    assert_eq!(integer.signature(), [&db::Type::Integer(4)]);
    assert_eq!(integer.parameters[0].name, "key");
    assert_eq!(
        integer.parameters[0].db_function_parameters,
        [(by_id, 0), (by_number, 0)]
    );

    let text = overloads[1];
    assert_eq!(text.db_functions, [by_name]);
    assert_eq!(text.signature(), [&db::Type::Text]);

    let length = schema.db.find_functions("LEN", None).next().unwrap();
    assert_eq!(length.return_type, Some(db::Type::Integer(4)));
    assert!(length.is_builtin);

    // Functions are not reachable through the object lookup
    assert_eq!(
        schema.db.find_object(&StoreObjectIdentifier {
            kind: StoreObjectKind::Function,
            name: "Lookup".to_string(),
            schema: None,
        }),
        None
    );
}

#[test]
fn table_valued_functions() {
    let mut app = app::Schema::new();

    let order = app.add_entity_type("Order");
    let id = app.add_property(order, "Id", Type::I32);
    app.add_property(order, "Total", Type::I64);
    app.set_primary_key(order, &[id]);
    app.entity_type_mut(order).function = Some("RecentOrders".to_string());

    let mut recent = DbFunction::new("RecentOrders", "RecentOrders").parameter("days", Type::I32);
    recent.returns = Some(order);
    app.add_function(recent);

    let mut top = DbFunction::new("TopOrders", "TopOrders").parameter("count", Type::I32);
    top.returns = Some(order);
    app.add_function(top);

    let schema = build(app);

    let mappings = schema
        .mapping
        .entity_type_mappings(order, StoreObjectKind::Function)
        .iter()
        .map(|id| {
            let mapping = schema.mapping.table_mapping(*id);
            (
                schema.db.object(mapping.table).name().to_string(),
                mapping.kind,
            )
        })
        .collect::<Vec<_>>();
    assert_eq!(
        mappings,
        [
            (
                "RecentOrders".to_string(),
                TableMappingKind::Function { is_default: true }
            ),
            (
                "TopOrders".to_string(),
                TableMappingKind::Function { is_default: false }
            ),
        ]
    );

    let recent = schema.db.find_functions("RecentOrders", None).next().unwrap();
    assert_eq!(column_names(&schema, recent.id.into()), ["Id", "Total"]);
    assert!(recent.find_parameter("days").is_some());
    assert!(recent.find_parameter("Id").is_none());

    // The table is unaffected
    let orders = schema.db.find_table("Orders", None).unwrap();
    assert_eq!(column_names(&schema, orders.id.into()), ["Id", "Total"]);
}

fn car_with_procedures() -> app::Schema {
    let mut app = app::Schema::new();

    let car = app.add_entity_type("Car");
    let id = app.add_property(car, "Id", Type::I32);
    app.property_mut(id).value_generated = ValueGenerated::OnAdd;
    app.add_property(car, "Name", Type::String);
    let version = app.add_property(car, "Version", Type::I64);
    app.property_mut(version).value_generated = ValueGenerated::OnAddOrUpdate;
    app.set_primary_key(car, &[id]);

    let entity = app.entity_type_mut(car);
    entity.insert_procedure = Some(StoredProcedureConfig::default());
    entity.update_procedure = Some(StoredProcedureConfig::default());
    entity.delete_procedure = Some(StoredProcedureConfig::default());

    app
}

fn procedure(schema: &Schema, name: &str) -> StoredProcedureId {
    let identifier = StoreObjectIdentifier {
        kind: StoreObjectKind::StoredProcedure,
        name: name.to_string(),
        schema: None,
    };

    match schema.db.find_object(&identifier) {
        Some(StoreObjectId::StoredProcedure(id)) => id,
        other => panic!("expected stored procedure `{name}`, found {other:?}"),
    }
}

fn parameter_names(schema: &Schema, id: StoredProcedureId) -> Vec<String> {
    schema
        .db
        .procedure(id)
        .parameters
        .iter()
        .map(|column| schema.db.column(*column).name.clone())
        .collect()
}

#[test]
fn default_procedure_parameters() {
    let schema = build(car_with_procedures());

    let insert = procedure(&schema, "Car_Insert");
    assert_eq!(parameter_names(&schema, insert), ["Name"]);
    assert_eq!(column_names(&schema, insert.into()), ["Id", "Version"]);
    assert_eq!(schema.db.procedure(insert).operation, StoreOperation::Insert);

    let update = procedure(&schema, "Car_Update");
    assert_eq!(parameter_names(&schema, update), ["Id_Original", "Name"]);
    assert_eq!(column_names(&schema, update.into()), ["Version"]);

    let delete = procedure(&schema, "Car_Delete");
    assert_eq!(parameter_names(&schema, delete), ["Id_Original"]);
    assert!(schema.db.procedure(delete).result_columns.is_empty());

    // Parameters are not part of the column set
    assert!(schema.find_column(insert, "Name").is_none());
    let name = schema.db.procedure(insert).find_parameter("Name").unwrap();
    assert_eq!(
        schema.db.column(name).kind,
        ColumnKind::Parameter {
            position: 0,
            direction: app::ParameterDirection::Input,
        }
    );
    assert_eq!(schema.db.column(name).property_mappings.len(), 1);
}

#[test]
fn procedures_are_linked_to_the_table_mapping() {
    let app = car_with_procedures();
    let car = app.find_entity_type("Car").unwrap().id;
    let schema = build(app);

    let main = schema.mapping.main_table_mapping(car).unwrap();
    let [insert, update, delete] = schema.mapping.table_mapping(main).procedures();

    for (mapping, operation, name) in [
        (insert, StoreOperation::Insert, "Car_Insert"),
        (update, StoreOperation::Update, "Car_Update"),
        (delete, StoreOperation::Delete, "Car_Delete"),
    ] {
        let mapping = schema.mapping.table_mapping(mapping.unwrap());
        assert_eq!(
            mapping.kind,
            TableMappingKind::StoredProcedure {
                operation,
                table_mapping: Some(main),
            }
        );
        assert_eq!(mapping.table, StoreObjectId::from(procedure(&schema, name)));
    }

    let dump = schema.object_debug_string(procedure(&schema, "Car_Update").into(), DebugOptions::default());
    assert_eq!(
        dump,
        "StoredProcedure: Car_Update\
         \n  Parameters:\
         \n    Id_Original (INTEGER) NonNullable Input\
         \n    Name (TEXT) NonNullable Input\
         \n  Result columns:\
         \n    Version (BIGINT) NonNullable\
         \n  Mappings:\
         \n    Car - Car_Update IncludesDerivedTypes Update"
    );
}

#[test]
fn explicit_procedure_parameters() {
    let mut app = app::Schema::new();

    let car = app.add_entity_type("Car");
    let id = app.add_property(car, "Id", Type::I32);
    app.set_primary_key(car, &[id]);
    app.entity_type_mut(car).table = TableConfig::Named(StoreName::new("Cars").with_schema("fleet"));
    app.entity_type_mut(car).delete_procedure = Some(StoredProcedureConfig {
        name: Some("RemoveCar".to_string()),
        schema: None,
        parameters: Some(vec![
            ProcedureParameter::original(id).named("car_id"),
            ProcedureParameter::rows_affected(),
        ]),
        result_columns: vec![],
    });

    let schema = build(app);

    let identifier = StoreObjectIdentifier {
        kind: StoreObjectKind::StoredProcedure,
        name: "RemoveCar".to_string(),
        // Procedures default to the schema of their table
        schema: Some("fleet".to_string()),
    };
    let Some(StoreObjectId::StoredProcedure(delete)) = schema.db.find_object(&identifier) else {
        panic!("procedure not registered");
    };

    assert_eq!(parameter_names(&schema, delete), ["car_id", "RowsAffected"]);

    let procedure = schema.db.procedure(delete);
    let rows_affected = schema.db.column(procedure.rows_affected_parameter.unwrap());
    assert_eq!(rows_affected.name, "RowsAffected");
    assert_eq!(rows_affected.store_type, db::Type::Integer(4));
    assert!(rows_affected.property_mappings.is_empty());
}

#[test]
fn duplicate_parameter_names_are_rejected() {
    let mut app = app::Schema::new();

    let car = app.add_entity_type("Car");
    let id = app.add_property(car, "Id", Type::I32);
    let name = app.add_property(car, "Name", Type::String);
    app.set_primary_key(car, &[id]);
    app.entity_type_mut(car).insert_procedure = Some(StoredProcedureConfig {
        parameters: Some(vec![
            ProcedureParameter::input(name),
            ProcedureParameter::input(name),
        ]),
        ..Default::default()
    });

    let err = Schema::builder()
        .build(app, &Capability::SQLITE)
        .unwrap_err();
    assert!(err.is_invalid_schema());
    assert!(err
        .to_string()
        .contains("stored procedure `Car_Insert` has more than one parameter named `Name`"));
}

#[test]
fn procedures_need_a_table() {
    let mut app = app::Schema::new();

    let report = app.add_entity_type("Report");
    app.add_property(report, "Name", Type::String);
    app.entity_type_mut(report).table = TableConfig::Unmapped;
    app.entity_type_mut(report).insert_procedure = Some(StoredProcedureConfig::default());

    let err = Schema::builder()
        .build(app, &Capability::SQLITE)
        .unwrap_err();
    assert!(err.is_invalid_schema());
    assert!(err.to_string().contains("is not mapped to a table"));
}
