use robodesk_grid::error::GridError;
use robodesk_grid::spreadsheet::Spreadsheet;
use robodesk_grid::tables::{DEFAULT_TABLE_NAME, TablePayload, TableStore};

fn payload(name: &str, cells: &[(&str, &str)]) -> TablePayload {
    TablePayload {
        name: Some(name.to_string()),
        data: cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

#[test]
fn create_assigns_increasing_ids() {
    let mut store = TableStore::new();
    let first = store.create(payload("One", &[("0_0", "a")]));
    let second = store.create(payload("Two", &[]));

    assert!(second.id > first.id);
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(first.id).unwrap().data["0_0"], "a");
    assert_eq!(first.created_at, first.updated_at);
}

#[test]
fn missing_names_fall_back_to_default() {
    let mut store = TableStore::new();
    assert_eq!(
        store.create(TablePayload::default()).name,
        DEFAULT_TABLE_NAME
    );
    assert_eq!(store.create(payload("  Budget  ", &[])).name, "Budget");
    assert_eq!(store.create(payload("   ", &[])).name, "");
}

#[test]
fn update_keeps_given_name_verbatim() {
    let mut store = TableStore::new();
    let table = store.create(payload("Draft", &[]));

    let renamed = store.update(table.id, payload(" Final ", &[])).unwrap();
    assert_eq!(renamed.name, " Final ");

    let unnamed = store.update(table.id, TablePayload::default()).unwrap();
    assert_eq!(unnamed.name, DEFAULT_TABLE_NAME);
}

#[test]
fn update_replaces_name_and_data() {
    let mut store = TableStore::new();
    let table = store.create(payload("Draft", &[("0_0", "old")]));

    let updated = store
        .update(table.id, payload("Final", &[("1_1", "new")]))
        .unwrap();

    assert_eq!(updated.name, "Final");
    assert!(!updated.data.contains_key("0_0"));
    assert_eq!(updated.data["1_1"], "new");
    assert!(updated.updated_at >= table.updated_at);
    assert_eq!(updated.created_at, table.created_at);
}

#[test]
fn unknown_ids_are_not_found() {
    let mut store = TableStore::new();
    assert!(matches!(store.get(42), Err(GridError::TableNotFound(42))));
    assert!(matches!(
        store.update(42, TablePayload::default()),
        Err(GridError::TableNotFound(42))
    ));
}

#[test]
fn list_puts_most_recent_first() {
    let mut store = TableStore::new();
    let a = store.create(payload("a", &[]));
    let b = store.create(payload("b", &[]));
    let c = store.create(payload("c", &[]));
    store.update(a.id, payload("a2", &[])).unwrap();

    let ids: Vec<u64> = store.list().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![a.id, c.id, b.id]);
}

#[test]
fn payload_json_matches_wire_format() {
    let mut sheet = Spreadsheet::new(30, 12);
    sheet.rename("Contacts");
    sheet.set_cell(2, 3, "Ivan").unwrap();

    let json = serde_json::to_value(sheet.to_payload()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "name": "Contacts", "data": { "2_3": "Ivan" } })
    );

    let parsed: TablePayload = serde_json::from_str(r#"{"data": {"0_1": "x"}}"#).unwrap();
    assert_eq!(parsed.name, None);
    assert_eq!(parsed.data["0_1"], "x");
}

#[test]
fn stored_table_reopens_into_a_grid() {
    let mut sheet = Spreadsheet::new(30, 12);
    sheet.set_cell(0, 0, "kept").unwrap();

    let mut store = TableStore::new();
    let saved = store.create(sheet.to_payload());

    let mut reopened = Spreadsheet::new(30, 12);
    reopened.load_payload(&store.get(saved.id).unwrap().payload());
    assert_eq!(reopened.get_cell(0, 0).unwrap(), "kept");
}
