#![allow(clippy::unwrap_used, clippy::expect_used)]

use mirg_core::logging_facility::init_test_capture;
use mirg_core::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_DURATION_MS, FIELD_ERR_CODE, FIELD_MIGRATION_KEY,
    FIELD_PENDING_COUNT, FIELD_SCHEMA_VERSION,
};
use mirg_store::{Registry, Runner};
use rusqlite::Connection;

#[test]
fn test_up_logs_boundaries_and_migration_keys() {
    let capture = init_test_capture();
    let mut conn = Connection::open_in_memory().unwrap();

    let mut registry = Registry::new();
    registry.add_sql_migration(1, "one", "CREATE TABLE one (id INTEGER)", None);
    registry.add_sql_migration(2, "two", "CREATE TABLE two (id INTEGER)", None);
    Runner::new(&mut conn, &registry).up().unwrap();

    assert_eq!(capture.find("up", EVENT_START).len(), 1);
    let end = capture.find("up", EVENT_END);
    assert_eq!(end.len(), 1);
    assert_eq!(end[0].field(FIELD_SCHEMA_VERSION), Some("2"));
    let duration: u64 = end[0].field(FIELD_DURATION_MS).unwrap().parse().unwrap();
    assert!(duration < 60_000);

    let applied_keys: Vec<String> = capture
        .events()
        .iter()
        .filter_map(|e| e.field(FIELD_MIGRATION_KEY).map(str::to_string))
        .collect();
    assert_eq!(applied_keys, vec!["1", "2"]);

    let version_event = capture
        .events()
        .into_iter()
        .find(|e| e.field(FIELD_PENDING_COUNT).is_some())
        .expect("current version event");
    assert_eq!(version_event.field(FIELD_PENDING_COUNT), Some("2"));
    assert_eq!(version_event.field(FIELD_SCHEMA_VERSION), Some("0"));

    // A failing run ends with exactly one end_error event
    capture.clear();
    registry.add_sql_migration(3, "bad", "CREATE INDEX nope ON missing (x)", None);
    Runner::new(&mut conn, &registry).up().unwrap_err();

    let errors = capture.find("up", EVENT_END_ERROR);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field(FIELD_ERR_CODE), Some("ERR_MIGRATION_FAILED"));
    assert!(errors[0].field(FIELD_DURATION_MS).is_some());
    assert!(capture.find("up", EVENT_END).is_empty());
}
