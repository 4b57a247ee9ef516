use std::rc::Rc;

use gpui_plate_table::{
    CellCoord, CellStyle, Grid, LocalHost, TableBlock, TableConfig, TableData, TableStyle,
};
use pretty_assertions::assert_eq;
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

#[derive(Debug, Clone)]
enum Mutation {
    InsertRow(Option<usize>),
    InsertColumn(Option<usize>),
    DeleteRow(usize),
    DeleteColumn(usize),
}

fn arb_mutation() -> impl Strategy<Value = Mutation> {
    prop_oneof![
        prop::option::of(0usize..8).prop_map(Mutation::InsertRow),
        prop::option::of(0usize..8).prop_map(Mutation::InsertColumn),
        (0usize..8).prop_map(Mutation::DeleteRow),
        (0usize..8).prop_map(Mutation::DeleteColumn),
    ]
}

proptest! {
    #![proptest_config(config())]
    #[test]
    fn styles_always_mirror_cells(
        rows in 1usize..5,
        cols in 1usize..5,
        ops in prop::collection::vec(arb_mutation(), 0..40),
    ) {
        let mut grid = Grid::new(rows, cols, TableStyle::default());
        for op in ops {
            match op {
                Mutation::InsertRow(index) => { grid.insert_row(index); }
                Mutation::InsertColumn(index) => { grid.insert_column(index); }
                Mutation::DeleteRow(index) => { grid.delete_row(index); }
                Mutation::DeleteColumn(index) => { grid.delete_column(index); }
            }
            prop_assert!(grid.is_consistent());
            prop_assert!(grid.row_count() >= 1);
            prop_assert!(grid.column_count() >= 1);
        }
    }
}

fn labelled(rows: usize, cols: usize) -> Grid {
    let content: Vec<Vec<String>> = (1..=rows)
        .map(|r| (1..=cols).map(|c| format!("r{r}c{c}")).collect())
        .collect();
    let styles: Vec<Vec<CellStyle>> = (1..=rows)
        .map(|r| {
            (1..=cols)
                .map(|c| CellStyle::new(format!("#{r}{c}0000"), "#e8e8eb", "1px"))
                .collect()
        })
        .collect();
    Grid::from_parts(rows, cols, &content, &styles, TableStyle::default())
}

fn contents(grid: &Grid) -> Vec<Vec<String>> {
    grid.rows()
        .iter()
        .map(|row| row.iter().map(|cell| cell.content.clone()).collect())
        .collect()
}

#[test]
fn inserted_row_lands_at_index_with_styles_in_lockstep() {
    let mut grid = labelled(2, 2);
    assert_eq!(grid.insert_row(Some(2)), 2);

    assert_eq!(
        contents(&grid),
        vec![
            vec!["r1c1".to_string(), "r1c2".to_string()],
            vec![String::new(), String::new()],
            vec!["r2c1".to_string(), "r2c2".to_string()],
        ]
    );
    assert_eq!(grid.cell_style(CellCoord::new(3, 1)).unwrap().background_color, "#210000");
    assert_eq!(grid.cell_style(CellCoord::new(2, 2)), Some(&TableStyle::default()));
}

#[test]
fn out_of_range_insert_appends() {
    let mut grid = labelled(2, 3);
    assert_eq!(grid.insert_column(Some(9)), 4);
    assert_eq!(grid.insert_column(Some(0)), 5);
    assert_eq!(grid.insert_row(None), 3);
    assert_eq!(grid.column_count(), 5);
    assert!(grid.is_consistent());
}

#[test]
fn new_column_uses_the_table_style() {
    let table_style = CellStyle::new("#fafafa", "#112233", "2px");
    let mut grid = Grid::new(2, 2, table_style.clone());
    grid.insert_column(Some(1));
    assert_eq!(grid.cell_style(CellCoord::new(2, 1)), Some(&table_style));
}

#[test]
fn delete_column_removes_cells_and_styles() {
    let mut grid = labelled(2, 3);
    assert!(grid.delete_column(2));
    assert_eq!(
        contents(&grid),
        vec![
            vec!["r1c1".to_string(), "r1c3".to_string()],
            vec!["r2c1".to_string(), "r2c3".to_string()],
        ]
    );
    assert_eq!(grid.cell_style(CellCoord::new(2, 2)).unwrap().background_color, "#230000");
}

#[test]
fn last_row_and_column_cannot_be_deleted() {
    let mut grid = Grid::new(1, 1, TableStyle::default());
    assert!(!grid.delete_row(1));
    assert!(!grid.delete_column(1));
    assert_eq!((grid.row_count(), grid.column_count()), (1, 1));
}

#[test]
fn out_of_range_delete_is_a_no_op() {
    let mut grid = labelled(2, 2);
    let before = grid.clone();
    assert!(!grid.delete_row(0));
    assert!(!grid.delete_row(3));
    assert!(!grid.delete_column(5));
    assert_eq!(grid, before);
}

#[test]
fn heading_mark_follows_the_first_row() {
    let mut grid = labelled(2, 2);
    grid.set_headings(Some("Heading".to_string()));
    grid.insert_row(Some(1));

    assert!(grid.rows()[0].iter().all(|cell| cell.heading() == Some("Heading")));
    assert!(grid.rows()[1].iter().all(|cell| cell.heading().is_none()));

    grid.delete_row(1);
    assert_eq!(grid.rows()[0][0].content, "r1c1");
    assert_eq!(grid.rows()[0][0].heading(), Some("Heading"));
}

#[test]
fn widget_shifts_focus_past_inserted_rows() {
    let data = TableData {
        content: vec![
            vec!["a".into(), "b".into()],
            vec!["c".into(), "d".into()],
        ],
        ..TableData::default()
    };
    let mut table = TableBlock::new(false, Rc::new(LocalHost::new()), data, TableConfig::default());
    table.focus_cell(2, 2);

    table.add_row(Some(1), false);
    assert_eq!(table.focused_cell(), CellCoord::new(3, 2));

    table.delete_column(1);
    assert_eq!(table.focused_cell(), CellCoord::new(3, 1));

    table.delete_row(3);
    assert!(table.focused_cell().is_none());
}

#[test]
fn add_with_focus_requests_first_new_cell() {
    let mut table = TableBlock::new(
        false,
        Rc::new(LocalHost::new()),
        TableData::default(),
        TableConfig::new(2, 2),
    );

    assert_eq!(table.add_column(Some(2), true), Some(2));
    assert_eq!(table.take_focus_request(), Some(CellCoord::new(1, 2)));
    assert_eq!(table.take_focus_request(), None);

    assert_eq!(table.add_row(None, true), Some(3));
    assert_eq!(table.take_focus_request(), Some(CellCoord::new(3, 1)));
}
