use std::rc::Rc;
use std::time::{Duration, Instant};

use gpui_plate_table::{
    Axis, CellCoord, GridLayout, LocalHost, MAX_PROBES, Point, TableBlock, TableConfig, TableData,
    TrackLayout, locate_hovered_cell, search_axis,
};
use proptest::prelude::*;

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

fn table(rows: usize, cols: usize) -> TableBlock {
    TableBlock::new(
        false,
        Rc::new(LocalHost::new()),
        TableData::default(),
        TableConfig::new(rows, cols),
    )
}

proptest! {
    #![proptest_config(config())]
    #[test]
    fn hovered_column_contains_the_pointer(
        widths in prop::collection::vec(1.0f32..200.0, 1..80),
        fraction in 0.0f32..=1.0,
    ) {
        let layout = TrackLayout::new(&widths, &[40.0]);
        let x = layout.size().width * fraction;
        let lookup = locate_hovered_cell(&layout, Point::new(x, 10.0), 1, widths.len(), CellCoord::NONE);

        let bounds = layout.cell_bounds(lookup.cell).unwrap();
        prop_assert!(bounds.left() <= x && x <= bounds.right());
        prop_assert_eq!(lookup.cell.row, 1);
        prop_assert!(lookup.column_probes <= MAX_PROBES);
    }

    #[test]
    fn hovered_row_contains_the_pointer(
        heights in prop::collection::vec(4.0f32..120.0, 1..80),
        fraction in 0.0f32..=1.0,
    ) {
        let layout = TrackLayout::new(&[100.0, 100.0], &heights);
        let y = layout.size().height * fraction;
        let lookup = locate_hovered_cell(&layout, Point::new(150.0, y), heights.len(), 2, CellCoord::NONE);

        let bounds = layout.cell_bounds(lookup.cell).unwrap();
        prop_assert!(bounds.top() <= y && y <= bounds.bottom());
        prop_assert_eq!(lookup.cell.column, 2);
    }
}

#[test]
fn thousand_columns_resolve_within_probe_limit() {
    let layout = TrackLayout::uniform(1, 1000, 20.0, 30.0);
    for column in [1, 2, 499, 500, 501, 777, 999, 1000] {
        let x = (column as f32 - 0.5) * 20.0;
        let lookup = locate_hovered_cell(&layout, Point::new(x, 5.0), 1, 1000, CellCoord::NONE);
        assert_eq!(lookup.cell.column, column);
        assert!(lookup.column_probes <= MAX_PROBES);
    }
}

#[test]
fn pointer_inside_previous_cell_skips_the_search() {
    let layout = TrackLayout::uniform(3, 3, 50.0, 20.0);
    let previous = CellCoord::new(2, 2);
    let lookup = locate_hovered_cell(&layout, Point::new(70.0, 30.0), 3, 3, previous);
    assert!(lookup.cached);
    assert_eq!(lookup.cell, previous);
    assert_eq!(lookup.row_probes + lookup.column_probes, 0);
}

#[test]
fn negative_coordinates_keep_the_previous_axis() {
    let layout = TrackLayout::uniform(3, 3, 50.0, 20.0);
    let lookup = locate_hovered_cell(&layout, Point::new(-5.0, 45.0), 3, 3, CellCoord::new(1, 2));
    assert_eq!(lookup.cell, CellCoord::new(3, 2));
    assert_eq!(lookup.column_probes, 0);
}

#[test]
fn missing_spans_report_nothing_found() {
    let search = search_axis(5, 12.0, |_| None);
    assert_eq!(search.index, 0);
    assert_eq!(search.probes, 0);
}

#[test]
fn pointer_moves_are_throttled_with_trailing_delivery() {
    let mut table = table(3, 3);
    table.set_layout(TrackLayout::uniform(3, 3, 50.0, 20.0));
    let start = Instant::now();

    assert!(table.on_pointer_move(Point::new(10.0, 10.0), start));
    assert_eq!(table.selection().hovered(), CellCoord::new(1, 1));

    assert!(!table.on_pointer_move(Point::new(60.0, 30.0), start + Duration::from_millis(20)));
    assert!(!table.on_pointer_move(Point::new(120.0, 50.0), start + Duration::from_millis(40)));
    assert_eq!(table.selection().hovered(), CellCoord::new(1, 1));
    assert!(table.pointer_deadline().is_some());

    assert!(!table.on_pointer_idle(start + Duration::from_millis(100)));
    assert!(table.on_pointer_idle(start + Duration::from_millis(150)));
    assert_eq!(table.selection().hovered(), CellCoord::new(3, 3));
    assert!(table.pointer_deadline().is_none());
}

#[test]
fn toolboxes_follow_the_hovered_cell() {
    let mut table = table(2, 4);
    table.set_layout(TrackLayout::uniform(2, 4, 100.0, 40.0));
    table.on_pointer_move(Point::new(250.0, 60.0), Instant::now());

    // (400 - 34) / 8 * (1 + 2 * 2)
    let column = table.toolbox(Axis::Column).offset().unwrap();
    assert!((column - 228.75).abs() < 1e-3);
    assert_eq!(table.toolbox(Axis::Row).offset(), Some(60.0));
}

#[test]
fn stale_layout_is_ignored_until_replaced() {
    let mut table = table(2, 2);
    table.set_layout(TrackLayout::uniform(2, 2, 50.0, 20.0));
    table.add_row(None, false);

    let now = Instant::now();
    assert!(!table.on_pointer_move(Point::new(10.0, 50.0), now));

    table.set_layout(TrackLayout::uniform(3, 2, 50.0, 20.0));
    assert!(table.on_pointer_move(Point::new(10.0, 50.0), now + Duration::from_secs(1)));
    assert_eq!(table.selection().hovered(), CellCoord::new(3, 1));
}
