use robodesk_grid::error::GridError;
use robodesk_grid::spreadsheet::Spreadsheet;
use robodesk_grid::widths::{
    AVG_GLYPH_WIDTH, MAX_WIDTH, MIN_WIDTH, MeasureError, TEXT_PADDING, TextMeasure,
    estimate_width,
};
use robodesk_grid::GridConfig;
use robodesk_grid::config::DEFAULT_NAME;
use robodesk_grid::font::FontMeasure;
use robodesk_grid::tables::DEFAULT_TABLE_NAME;

// Helper function to check a cell and the width of its column
fn assert_cell(sheet: &Spreadsheet, row: usize, col: usize, expected: &str) {
    assert_eq!(
        sheet.get_cell(row, col).unwrap(),
        expected,
        "cell ({row}, {col})"
    );
    let width = sheet.width_of(col).unwrap();
    assert!((MIN_WIDTH..=MAX_WIDTH).contains(&width), "width {width} out of bounds");
}

#[test]
fn default_grid_is_30_by_12() {
    let sheet = Spreadsheet::default();
    assert_eq!(sheet.rows(), 30);
    assert_eq!(sheet.cols(), 12);
    assert_eq!(sheet.name, GridConfig::default().name);
    assert_eq!(sheet.column_widths(), vec![MIN_WIDTH; 12]);
}

#[test]
fn set_cell_then_get_cell() {
    let mut sheet = Spreadsheet::new(30, 12);
    for (r, c, text) in [(0, 0, "A"), (29, 11, "corner"), (7, 3, "Привет, мир")] {
        sheet.set_cell(r, c, text).unwrap();
        assert_cell(&sheet, r, c, text);
    }
    assert_cell(&sheet, 1, 1, "");
}

#[test]
fn rejected_edit_changes_nothing() {
    let mut sheet = Spreadsheet::new(2, 2);
    let long = "x".repeat(20);

    assert!(matches!(
        sheet.set_cell(2, 0, &long),
        Err(GridError::OutOfRange { .. })
    ));
    assert!(matches!(
        sheet.set_cell(0, 2, &long),
        Err(GridError::OutOfRange { .. })
    ));
    assert_eq!(sheet.filled_cells(), 0);
    assert_eq!(sheet.column_widths(), vec![MIN_WIDTH; 2]);
}

#[test]
fn auto_fit_grows_and_never_shrinks() {
    let mut sheet = Spreadsheet::new(5, 3);

    let mut last = sheet.width_of(1).unwrap();
    for len in [1, 8, 12, 20, 30, 33] {
        sheet.set_cell(0, 1, &"w".repeat(len)).unwrap();
        let width = sheet.width_of(1).unwrap();
        assert!(width >= last);
        assert!(width <= MAX_WIDTH);
        last = width;
    }
    assert_eq!(last, 33 * AVG_GLYPH_WIDTH + TEXT_PADDING);

    sheet.set_cell(0, 1, "w").unwrap();
    assert_eq!(sheet.width_of(1).unwrap(), last);

    // Other columns are untouched.
    assert_eq!(sheet.width_of(0).unwrap(), MIN_WIDTH);
    assert_eq!(sheet.width_of(2).unwrap(), MIN_WIDTH);
}

#[test]
fn text_wider_than_max_leaves_width_alone() {
    let mut sheet = Spreadsheet::new(5, 3);
    sheet.set_cell(0, 0, &"w".repeat(15)).unwrap();
    let before = sheet.width_of(0).unwrap();

    sheet.set_cell(1, 0, &"w".repeat(200)).unwrap();
    assert_eq!(sheet.width_of(0).unwrap(), before);
}

#[test]
fn manual_resize_raises_lowers_and_clamps() {
    let mut sheet = Spreadsheet::new(5, 3);

    assert_eq!(sheet.resize_column(0, 200).unwrap(), 200);
    assert_eq!(sheet.resize_column(0, 100).unwrap(), 100);
    assert_eq!(sheet.resize_column(0, 10).unwrap(), MIN_WIDTH);
    assert_eq!(sheet.resize_column(0, 10_000).unwrap(), MAX_WIDTH);
    assert_eq!(sheet.width_of(0).unwrap(), MAX_WIDTH);

    assert!(matches!(
        sheet.resize_column(3, 100),
        Err(GridError::ColumnOutOfRange { col: 3, cols: 3 })
    ));
}

#[test]
fn manual_width_survives_smaller_auto_fit_but_not_larger() {
    let mut sheet = Spreadsheet::new(5, 3);
    sheet.resize_column(2, 150).unwrap();

    sheet.set_cell(0, 2, "short").unwrap();
    assert_eq!(sheet.width_of(2).unwrap(), 150);

    let wide = "w".repeat(25);
    sheet.set_cell(1, 2, &wide).unwrap();
    assert_eq!(sheet.width_of(2).unwrap(), estimate_width(&wide));
}

#[test]
fn clear_resets_cells_and_widths() {
    let mut sheet = Spreadsheet::new(4, 4);
    sheet.set_cell(0, 0, &"w".repeat(20)).unwrap();
    sheet.set_cell(3, 3, "x").unwrap();
    sheet.resize_column(1, 220).unwrap();

    sheet.clear();

    for r in 0..4 {
        for c in 0..4 {
            assert_eq!(sheet.get_cell(r, c).unwrap(), "");
        }
    }
    assert_eq!(sheet.column_widths(), vec![MIN_WIDTH; 4]);
}

#[test]
fn snapshot_ignores_edits_made_after_capture() {
    let mut sheet = Spreadsheet::new(2, 2);
    sheet.set_cell(0, 0, "A").unwrap();
    let snapshot = sheet.snapshot();

    sheet.set_cell(0, 0, "changed").unwrap();
    sheet.resize_column(1, 200).unwrap();
    sheet.rename("renamed");

    assert_eq!(snapshot.cells.get(0, 0).unwrap(), "A");
    assert_eq!(snapshot.widths, vec![MIN_WIDTH; 2]);
    assert_ne!(snapshot.name, "renamed");
    assert_eq!(snapshot.to_csv(), "\u{feff}A,\n,\n");
}

struct NoFontBackend;

impl TextMeasure for NoFontBackend {
    fn measure(&self, _text: &str) -> Result<u32, MeasureError> {
        Err(MeasureError::Unavailable("headless".to_string()))
    }
}

#[test]
fn failing_measurement_never_rejects_an_edit() {
    let mut sheet = Spreadsheet::with_measure(3, 3, Box::new(NoFontBackend));
    let text = "w".repeat(20);

    sheet.set_cell(1, 1, &text).unwrap();

    assert_eq!(sheet.get_cell(1, 1).unwrap(), text);
    assert_eq!(sheet.width_of(1).unwrap(), estimate_width(&text));
}

struct Doubled;

impl TextMeasure for Doubled {
    fn measure(&self, text: &str) -> Result<u32, MeasureError> {
        Ok(text.chars().count() as u32 * 14)
    }
}

#[test]
fn custom_measurement_drives_auto_fit() {
    let mut sheet = Spreadsheet::with_measure(3, 3, Box::new(Doubled));
    sheet.set_cell(0, 0, "0123456789").unwrap();
    assert_eq!(sheet.width_of(0).unwrap(), 140);
}

#[test]
fn payload_round_trips_through_load() {
    let mut sheet = Spreadsheet::new(30, 12);
    sheet.rename("Budget");
    sheet.set_cell(0, 0, "Item").unwrap();
    sheet.set_cell(4, 11, "Total, RUB").unwrap();

    let payload = sheet.to_payload();
    assert_eq!(payload.name.as_deref(), Some("Budget"));
    assert_eq!(payload.data.len(), 2);
    assert_eq!(payload.data["4_11"], "Total, RUB");

    let mut other = Spreadsheet::new(30, 12);
    other.set_cell(9, 9, "stale").unwrap();
    assert_eq!(other.load_payload(&payload), 2);

    assert_eq!(other.name, "Budget");
    assert_eq!(other.get_cell(0, 0).unwrap(), "Item");
    assert_eq!(other.get_cell(4, 11).unwrap(), "Total, RUB");
    assert_eq!(other.get_cell(9, 9).unwrap(), "");
    assert_eq!(other.export_csv(), sheet.export_csv());
}

#[test]
fn load_skips_bad_keys() {
    let mut payload = Spreadsheet::new(2, 2).to_payload();
    payload.name = Some("Imported".to_string());
    payload.data.insert("0_0".to_string(), "ok".to_string());
    payload.data.insert("5_5".to_string(), "outside".to_string());
    payload.data.insert("A1".to_string(), "malformed".to_string());
    payload.data.insert("1_1".to_string(), String::new());

    let mut sheet = Spreadsheet::new(2, 2);
    assert_eq!(sheet.load_payload(&payload), 1);
    assert_eq!(sheet.get_cell(0, 0).unwrap(), "ok");
    assert_eq!(sheet.filled_cells(), 1);
}

#[test]
fn export_filenames_follow_table_name() {
    let mut sheet = Spreadsheet::new(2, 2);
    sheet.rename("Q3 report");
    let snapshot = sheet.snapshot();
    assert_eq!(snapshot.csv_filename(), "Q3 report.csv");
    assert_eq!(snapshot.png_filename(), "Q3 report.png");
}

#[test]
fn nameless_payload_loads_with_default_table_name() {
    let mut payload = Spreadsheet::new(2, 2).to_payload();
    payload.name = None;
    payload.data.insert("1_0".to_string(), "x".to_string());

    let mut sheet = Spreadsheet::new(2, 2);
    assert_eq!(sheet.load_payload(&payload), 1);
    assert_eq!(sheet.name, DEFAULT_TABLE_NAME);
}

#[test]
fn font_metrics_config_sizes_with_embedded_font() {
    let config = GridConfig::new(5, 3, "Fonts").with_font_metrics(true);
    let mut sheet = Spreadsheet::from_config(&config);
    let text = "Наименование товара";
    sheet.set_cell(0, 1, text).unwrap();

    assert_eq!(
        sheet.width_of(1).unwrap(),
        FontMeasure.measure(text).unwrap()
    );
    assert!(sheet.width_of(1).unwrap() > MIN_WIDTH);
}

#[test]
fn default_name_is_new_table() {
    assert_eq!(Spreadsheet::new(1, 1).name, DEFAULT_NAME);
    assert_eq!(DEFAULT_NAME, "Новая таблица");
}
