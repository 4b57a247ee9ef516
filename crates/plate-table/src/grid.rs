use serde::{Deserialize, Serialize};

use crate::style::{CellStyle, StyleField, TableStyle};

/// 1-based positional cell address. `0` on either axis means "none".
///
/// Coordinates are not stable identities: deleting row 2 renumbers every
/// row after it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: usize,
    pub column: usize,
}

impl CellCoord {
    pub const NONE: CellCoord = CellCoord { row: 0, column: 0 };

    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    pub fn is_none(&self) -> bool {
        self.row == 0 || self.column == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub content: String,
    heading: Option<String>,
}

impl Cell {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            heading: None,
        }
    }

    /// Placeholder label shown while the cell is part of the heading row.
    pub fn heading(&self) -> Option<&str> {
        self.heading.as_deref()
    }
}

/// Rows of cells plus the parallel per-cell style structure.
///
/// `styles` always has exactly the same shape as `rows`; every mutation
/// resizes both before returning.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub(crate) rows: Vec<Vec<Cell>>,
    pub(crate) styles: Vec<Vec<CellStyle>>,
    pub(crate) columns: usize,
    pub(crate) table_style: TableStyle,
    pub(crate) heading_label: Option<String>,
}

impl Grid {
    /// Blank grid where every cell starts with a copy of the table style.
    pub fn new(rows: usize, columns: usize, table_style: TableStyle) -> Self {
        let rows = rows.max(1);
        let columns = columns.max(1);
        Self {
            rows: vec![vec![Cell::default(); columns]; rows],
            styles: vec![vec![table_style.clone(); columns]; rows],
            columns,
            table_style,
            heading_label: None,
        }
    }

    /// Builds a grid of `rows x columns`, filling it from row-major content and
    /// styles. Missing content is blank and missing styles get the default
    /// record; anything beyond the requested size is dropped.
    pub fn from_parts(
        rows: usize,
        columns: usize,
        content: &[Vec<String>],
        styles: &[Vec<CellStyle>],
        table_style: TableStyle,
    ) -> Self {
        let mut grid = Self::new(rows, columns, table_style);
        for (r, row) in grid.rows.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                if let Some(text) = content.get(r).and_then(|row| row.get(c)) {
                    cell.content = text.clone();
                }
            }
        }
        for (r, row) in grid.styles.iter_mut().enumerate() {
            for (c, style) in row.iter_mut().enumerate() {
                *style = styles
                    .get(r)
                    .and_then(|row| row.get(c))
                    .cloned()
                    .unwrap_or_default();
            }
        }
        grid
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn styles(&self) -> &[Vec<CellStyle>] {
        &self.styles
    }

    pub fn table_style(&self) -> &TableStyle {
        &self.table_style
    }

    pub fn contains(&self, coord: CellCoord) -> bool {
        (1..=self.row_count()).contains(&coord.row) && (1..=self.columns).contains(&coord.column)
    }

    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        if coord.is_none() {
            return None;
        }
        self.rows.get(coord.row - 1)?.get(coord.column - 1)
    }

    pub fn cell_style(&self, coord: CellCoord) -> Option<&CellStyle> {
        if coord.is_none() {
            return None;
        }
        self.styles.get(coord.row - 1)?.get(coord.column - 1)
    }

    pub(crate) fn cell_style_mut(&mut self, coord: CellCoord) -> Option<&mut CellStyle> {
        if coord.is_none() {
            return None;
        }
        self.styles.get_mut(coord.row - 1)?.get_mut(coord.column - 1)
    }

    pub fn set_cell_content(&mut self, coord: CellCoord, content: impl Into<String>) -> bool {
        if coord.is_none() {
            return false;
        }
        let Some(cell) = self
            .rows
            .get_mut(coord.row - 1)
            .and_then(|row| row.get_mut(coord.column - 1))
        else {
            return false;
        };
        cell.content = content.into();
        true
    }

    pub fn set_cell_style(&mut self, coord: CellCoord, style: CellStyle) -> bool {
        match self.cell_style_mut(coord) {
            Some(slot) => {
                *slot = style;
                true
            }
            None => false,
        }
    }

    /// Sets one table field and overwrites it on every cell.
    pub fn set_table_style_field(&mut self, field: StyleField, value: &str) {
        self.table_style.set(field, value);
        let value = self.table_style.get(field).to_string();
        for style in self.styles.iter_mut().flatten() {
            style.set(field, &value);
        }
    }

    /// Replaces the table style and every cell style with it.
    pub fn set_table_style(&mut self, style: TableStyle) {
        for slot in self.styles.iter_mut().flatten() {
            *slot = style.clone();
        }
        self.table_style = style;
    }

    /// Restores a table style together with a full style snapshot. The
    /// snapshot is ignored when its shape no longer matches the grid.
    pub(crate) fn restore_styles(&mut self, table: TableStyle, cells: Vec<Vec<CellStyle>>) -> bool {
        let same_shape = cells.len() == self.rows.len()
            && cells.iter().all(|row| row.len() == self.columns);
        if !same_shape {
            tracing::warn!("style snapshot no longer matches the grid, not restoring");
            return false;
        }
        self.table_style = table;
        self.styles = cells;
        true
    }

    pub fn headings_enabled(&self) -> bool {
        self.heading_label.is_some()
    }

    /// Turns the heading row on (with its placeholder label) or off.
    pub fn set_headings(&mut self, label: Option<String>) {
        self.strip_headings();
        self.heading_label = label;
        self.mark_headings();
    }

    pub(crate) fn strip_headings(&mut self) {
        for cell in self.rows.iter_mut().flatten() {
            cell.heading = None;
        }
    }

    pub(crate) fn mark_headings(&mut self) {
        let Some(label) = self.heading_label.clone() else {
            return;
        };
        if let Some(first) = self.rows.first_mut() {
            for cell in first {
                cell.heading = Some(label.clone());
            }
        }
    }

    /// `true` when the style structure mirrors the cell structure exactly.
    pub fn is_consistent(&self) -> bool {
        self.styles.len() == self.rows.len()
            && self.rows.iter().all(|row| row.len() == self.columns)
            && self.styles.iter().all(|row| row.len() == self.columns)
    }
}
