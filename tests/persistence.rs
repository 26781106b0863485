//! Cross-instance behavior: everything an engine persists must be visible
//! to a second engine opened on the same directory, while the query cache
//! stays private to each instance.

use flatdb::{AutoConfirm, Database, JsonStorage, Record, Selection, Value};

fn specs(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn reopened_database_sees_persisted_state() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut db = Database::open(JsonStorage::new(dir.path())).unwrap();
        db.create_table("users", &specs(&["name:str", "age:int"]))
            .unwrap();
        db.insert("users", &[Value::Str("Ann".into()), Value::Int(30)])
            .unwrap();
    }

    let mut db = Database::open(JsonStorage::new(dir.path())).unwrap();
    let info = db.info("users").unwrap();
    assert_eq!(info.record_count, 1);
    assert_eq!(info.columns.len(), 3);

    match db.select("users", Some("name = Ann")).unwrap() {
        Selection::Rows(rows) => {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].id(), Some(1));
            assert_eq!(rows[0].get("age"), Some(&Value::Int(30)));
        }
        other => panic!("expected rows, got {other:?}"),
    }
}

#[test]
fn query_cache_is_scoped_to_one_instance() {
    let dir = tempfile::tempdir().unwrap();

    let mut first = Database::open(JsonStorage::new(dir.path())).unwrap();
    first
        .create_table("users", &specs(&["name:str"]))
        .unwrap();
    first
        .insert("users", &[Value::Str("Ann".into())])
        .unwrap();

    // Memoize the read, then change the data underneath it.
    assert!(matches!(
        first.select("users", Some("name = Ann")).unwrap(),
        Selection::Rows(_)
    ));
    first
        .update("users", "name = Annie", "name = Ann")
        .unwrap();

    // The first instance keeps serving its stale entry.
    assert!(matches!(
        first.select("users", Some("name = Ann")).unwrap(),
        Selection::Rows(_)
    ));

    // A fresh instance has a cold cache and sees the truth.
    let mut second = Database::open(JsonStorage::new(dir.path())).unwrap();
    assert_eq!(
        second.select("users", Some("name = Ann")).unwrap(),
        Selection::NoMatch
    );
}

#[test]
fn persisted_documents_use_flat_formats() {
    let dir = tempfile::tempdir().unwrap();

    let mut db = Database::open(JsonStorage::new(dir.path())).unwrap();
    db.create_table("users", &specs(&["name:str", "active:bool"]))
        .unwrap();
    db.insert("users", &[Value::Str("Ann".into()), Value::Bool(true)])
        .unwrap();

    let meta = std::fs::read_to_string(dir.path().join("db_meta.json")).unwrap();
    let catalog: serde_json::Value = serde_json::from_str(&meta).unwrap();
    assert_eq!(
        catalog["users"],
        serde_json::json!(["ID:int", "name:str", "active:bool"])
    );

    let data = std::fs::read_to_string(dir.path().join("data/users.json")).unwrap();
    let records: serde_json::Value = serde_json::from_str(&data).unwrap();
    assert_eq!(
        records,
        serde_json::json!([{"ID": 1, "name": "Ann", "active": true}])
    );
}

#[test]
fn dropping_a_table_keeps_its_data_document() {
    let dir = tempfile::tempdir().unwrap();

    let mut db = Database::open(JsonStorage::new(dir.path())).unwrap();
    db.create_table("users", &specs(&["name:str"])).unwrap();
    db.insert("users", &[Value::Str("Ann".into())]).unwrap();
    db.drop_table("users", &AutoConfirm(true)).unwrap();

    // The schema entry is gone but the contents file survives, so a
    // re-created table resurrects the old records and continues their IDs.
    assert!(db.list_tables().is_none());
    db.create_table("users", &specs(&["name:str"])).unwrap();
    let records = db.insert("users", &[Value::Str("Bo".into())]).unwrap();
    assert_eq!(
        records.iter().filter_map(Record::id).collect::<Vec<_>>(),
        vec![1, 2]
    );
}
