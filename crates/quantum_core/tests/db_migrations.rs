use quantum_core::db::migrations::latest_version;
use quantum_core::db::open_store_db;

#[test]
fn open_reports_latest_schema_version() {
    let conn = open_store_db().unwrap();
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
    assert!(latest_version() >= 1);
}

#[test]
fn migration_creates_all_collection_tables() {
    let conn = open_store_db().unwrap();

    for table in [
        "workspace",
        "pages",
        "blocks",
        "roadmap_tasks",
        "calendar_events",
    ] {
        let exists: i64 = conn
            .query_row(
                "SELECT EXISTS(
                    SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
                );",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(exists, 1, "missing table {table}");
    }
}

#[test]
fn blocks_table_has_expected_columns() {
    let conn = open_store_db().unwrap();

    let mut stmt = conn.prepare("PRAGMA table_info(blocks);").unwrap();
    let mut rows = stmt.query([]).unwrap();
    let mut columns = Vec::new();
    while let Some(row) = rows.next().unwrap() {
        let column_name: String = row.get(1).unwrap();
        columns.push(column_name);
    }

    for column in [
        "block_uuid",
        "page_uuid",
        "parent_uuid",
        "kind",
        "content",
        "checked",
        "is_expanded",
        "language",
        "position",
    ] {
        assert!(columns.contains(&column.to_string()), "missing {column}");
    }
}

#[test]
fn foreign_keys_are_enabled() {
    let conn = open_store_db().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}
