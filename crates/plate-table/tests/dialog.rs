use std::rc::Rc;

use gpui_plate_table::{
    CellCoord, CellStyle, ClickTarget, DialogTarget, InputKind, LocalHost, Point, StyleField,
    TableBlock, TableConfig, TableData, TableStyle,
};
use pretty_assertions::assert_eq;

fn table(rows: usize, cols: usize) -> TableBlock {
    TableBlock::new(
        false,
        Rc::new(LocalHost::new()),
        TableData::default(),
        TableConfig::new(rows, cols),
    )
}

#[test]
fn table_border_color_cascades_to_every_cell() {
    let mut table = table(3, 3);
    assert!(table.open_table_dialog());
    assert!(table.change_dialog_field(StyleField::BorderColor, "#112233"));

    assert_eq!(table.grid().table_style().border_color, "#112233");
    for style in table.grid().styles().iter().flatten() {
        assert_eq!(style.border_color, "#112233");
    }

    assert!(table.close_dialog());
    assert!(table.dialog().is_none());
    assert_eq!(
        table.get_data().table_properties.unwrap().border_color,
        "#112233"
    );
}

#[test]
fn table_background_overrides_distinct_cell_backgrounds() {
    let mut table = table(2, 2);
    let colors = ["#ff0000", "#00ff00", "#0000ff", "#fff3bf"];
    for (i, color) in colors.iter().enumerate() {
        let cell = CellCoord::new(i / 2 + 1, i % 2 + 1);
        table.set_cell_style(cell, CellStyle::new(*color, "#e8e8eb", "1px"));
    }

    table.open_table_dialog();
    assert!(table.change_dialog_field(StyleField::BackgroundColor, "#112233"));

    let backgrounds: Vec<&str> = table
        .grid()
        .styles()
        .iter()
        .flatten()
        .map(|style| style.background_color.as_str())
        .collect();
    assert_eq!(backgrounds, vec!["#112233"; 4]);
}

#[test]
fn cancelled_cell_dialog_matches_the_snapshot() {
    let mut table = table(2, 2);
    let cell = CellCoord::new(2, 1);
    table.set_cell_style(cell, CellStyle::new("#fafafa", "#dddddd", "2px"));
    let snapshot = table.grid().cell_style(cell).cloned();

    assert!(table.open_cell_dialog(cell));
    table.change_dialog_field(StyleField::BorderWidth, "5px");
    assert_eq!(table.grid().cell_style(cell).unwrap().border_width, "5px");

    assert!(table.cancel_dialog());
    assert_eq!(table.grid().cell_style(cell).cloned(), snapshot);
}

#[test]
fn cancel_restores_cell_and_table_styles() {
    let mut table = table(2, 2);
    let custom = CellStyle::new("#fff3bf", "#e8e8eb", "3px");
    table.set_cell_style(CellCoord::new(2, 2), custom.clone());
    let before = table.grid().styles().to_vec();

    table.open_table_dialog();
    table.change_dialog_field(StyleField::BorderWidth, "5");
    table.change_dialog_field(StyleField::BackgroundColor, "#000000");
    assert_eq!(table.grid().cell_style(CellCoord::new(2, 2)).unwrap().border_width, "5px");

    assert!(table.cancel_dialog());
    assert_eq!(table.grid().styles(), before.as_slice());
    assert_eq!(table.grid().table_style(), &TableStyle::default());
    assert_eq!(table.grid().cell_style(CellCoord::new(2, 2)), Some(&custom));
}

#[test]
fn cell_dialog_edits_only_its_cell() {
    let mut table = table(2, 2);
    assert!(table.open_cell_dialog(CellCoord::new(1, 2)));

    let dialog = table.dialog().unwrap();
    assert_eq!(dialog.target(), DialogTarget::Cell { row: 1, column: 2 });
    let width = &dialog.properties()[2];
    assert_eq!(width.input, InputKind::Number);
    assert_eq!(width.value, "1");

    table.change_dialog_field(StyleField::BackgroundColor, "#ff0000");
    assert_eq!(
        table.grid().cell_style(CellCoord::new(1, 2)).unwrap().background_color,
        "#ff0000"
    );
    assert_eq!(
        table.grid().cell_style(CellCoord::new(1, 1)).unwrap().background_color,
        "#ffffff"
    );

    table.cancel_dialog();
    assert_eq!(
        table.grid().cell_style(CellCoord::new(1, 2)),
        Some(&CellStyle::default())
    );
}

#[test]
fn cell_dialog_for_missing_cell_does_not_open() {
    let mut table = table(2, 2);
    assert!(!table.open_cell_dialog(CellCoord::new(3, 1)));
    assert!(!table.open_cell_dialog(CellCoord::NONE));
    assert!(table.dialog().is_none());
}

#[test]
fn structural_change_closes_dialog_without_rollback() {
    let mut table = table(2, 2);
    table.open_table_dialog();
    table.change_dialog_field(StyleField::BorderColor, "#abcdef");

    table.add_row(None, false);
    assert!(table.dialog().is_none());
    assert!(!table.cancel_dialog());
    assert_eq!(table.grid().table_style().border_color, "#abcdef");
    assert_eq!(
        table.grid().cell_style(CellCoord::new(3, 1)).unwrap().border_color,
        "#abcdef"
    );
}

#[test]
fn enter_on_the_last_row_keeps_a_cell_dialog_but_closes_the_table_dialog() {
    let mut table = table(2, 2);
    assert!(table.open_cell_dialog(CellCoord::new(2, 1)));
    table.focus_cell(2, 1);
    table.on_enter(false);
    assert_eq!(
        table.dialog().map(|dialog| dialog.target()),
        Some(DialogTarget::Cell { row: 2, column: 1 })
    );

    table.open_table_dialog();
    table.focus_cell(3, 1);
    table.on_enter(false);
    assert_eq!(table.grid().row_count(), 4);
    assert!(table.dialog().is_none());
    assert!(table.grid().is_consistent());
}

#[test]
fn context_menu_leads_to_the_cell_dialog() {
    let mut table = table(2, 3);
    assert!(table.on_context_menu(CellCoord::new(2, 3), Point::new(210.0, 55.0)));
    assert!(table.is_cell_popover_open());

    let view = table.get_wrapper();
    let popover = view.cell_popover.unwrap();
    assert_eq!(popover.position, Point::new(210.0, 55.0));
    assert_eq!(popover.items[0].label, "Cell Properties");

    assert!(table.choose_cell_properties());
    assert!(!table.is_cell_popover_open());
    assert_eq!(
        table.dialog().map(|dialog| dialog.target()),
        Some(DialogTarget::Cell { row: 2, column: 3 })
    );
}

#[test]
fn outside_clicks_close_the_dialog_unless_inside_it() {
    let mut table = table(2, 2);
    table.open_table_dialog();

    table.on_document_click(&ClickTarget {
        inside_properties_dialog: true,
        ..ClickTarget::outside_wrapper()
    });
    assert!(table.dialog().is_some());

    table.on_document_click(&ClickTarget {
        inside_settings_zone: true,
        ..ClickTarget::outside_wrapper()
    });
    assert!(table.dialog().is_some());

    table.on_document_click(&ClickTarget::outside_wrapper());
    assert!(table.dialog().is_none());
}

#[test]
fn dialog_labels_are_translated() {
    let host = LocalHost::new()
        .with_translation("Table Properties", "Tabelleneigenschaften")
        .with_translation("Border Color", "Rahmenfarbe");
    let mut table = TableBlock::new(
        false,
        Rc::new(host),
        TableData::default(),
        TableConfig::default(),
    );
    table.open_table_dialog();

    let dialog = table.dialog().unwrap();
    assert_eq!(dialog.heading(), "Tabelleneigenschaften");
    assert_eq!(dialog.properties()[1].label, "Rahmenfarbe");
    assert_eq!(dialog.properties()[1].id, "border-color");
}
