use serde::{Deserialize, Serialize};

use crate::geometry::GridLayout;
use crate::grid::CellCoord;
use crate::toolbox::{Axis, Toolbox, column_toolbox_offset, row_toolbox_offset};

/// Hover and toolbox selection, all 1-based with `0` meaning none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    pub hovered_row: usize,
    pub hovered_column: usize,
    pub selected_row: usize,
    pub selected_column: usize,
}

impl SelectionState {
    pub fn hovered(&self) -> CellCoord {
        CellCoord::new(self.hovered_row, self.hovered_column)
    }

    pub fn is_row_menu_showing(&self) -> bool {
        self.selected_row != 0
    }

    pub fn is_column_menu_showing(&self) -> bool {
        self.selected_column != 0
    }
}

/// Cell currently holding editable focus.
pub type FocusedCell = CellCoord;

/// Row and column toolboxes plus the selection they lock.
///
/// At most one of the two menus is open at any time; opening one closes the
/// other, and `selected_*` is non-zero exactly while that menu is open.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionController {
    state: SelectionState,
    row_toolbox: Toolbox,
    column_toolbox: Toolbox,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionController {
    pub fn new() -> Self {
        Self {
            state: SelectionState::default(),
            row_toolbox: Toolbox::new(Axis::Row),
            column_toolbox: Toolbox::new(Axis::Column),
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn toolbox(&self, axis: Axis) -> &Toolbox {
        match axis {
            Axis::Row => &self.row_toolbox,
            Axis::Column => &self.column_toolbox,
        }
    }

    pub(crate) fn toolbox_mut(&mut self, axis: Axis) -> &mut Toolbox {
        match axis {
            Axis::Row => &mut self.row_toolbox,
            Axis::Column => &mut self.column_toolbox,
        }
    }

    /// Index locked by the open menu on `axis`, `0` when closed.
    pub fn selected(&self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.state.selected_row,
            Axis::Column => self.state.selected_column,
        }
    }

    pub fn set_hovered(&mut self, cell: CellCoord) {
        self.state.hovered_row = cell.row;
        self.state.hovered_column = cell.column;
    }

    /// Opens the menu on `axis` for the hovered index, closing the other
    /// axis first. `count` is the number of rows (or columns). A menu that is
    /// already open keeps its locked index.
    pub fn open(&mut self, axis: Axis, count: usize) -> bool {
        if self.selected(axis) != 0 {
            return true;
        }
        let hovered = match axis {
            Axis::Row => self.state.hovered_row,
            Axis::Column => self.state.hovered_column,
        };
        if !(1..=count).contains(&hovered) {
            tracing::debug!(?axis, hovered, count, "toolbox open ignored, nothing hovered");
            return false;
        }

        match axis {
            Axis::Row => {
                self.close(Axis::Column);
                self.state.selected_row = hovered;
            }
            Axis::Column => {
                self.close(Axis::Row);
                self.state.selected_column = hovered;
            }
        }
        self.toolbox_mut(axis).open();
        true
    }

    /// Unselects and hides the toolbox on `axis`.
    pub fn close(&mut self, axis: Axis) {
        match axis {
            Axis::Row => self.state.selected_row = 0,
            Axis::Column => self.state.selected_column = 0,
        }
        self.toolbox_mut(axis).hide();
    }

    pub fn close_all(&mut self) {
        self.close(Axis::Row);
        self.close(Axis::Column);
    }

    /// Repositions the togglers for `at`. An axis whose menu is open keeps its
    /// position.
    pub fn update_positions(
        &mut self,
        layout: &dyn GridLayout,
        columns: usize,
        at: CellCoord,
    ) {
        if !self.state.is_column_menu_showing() && (1..=columns).contains(&at.column) {
            let offset = column_toolbox_offset(at.column, columns, layout.size().width);
            self.column_toolbox.show_at(offset);
        }

        if !self.state.is_row_menu_showing() && at.row > 0 && at.column <= columns {
            if let Some(row) = layout.row_bounds(at.row) {
                self.row_toolbox.show_at(row_toolbox_offset(row));
            }
        }
    }

    /// Drops hover indices that no longer exist after a structural change.
    pub fn clamp_hovered(&mut self, rows: usize, columns: usize) {
        if self.state.hovered_row > rows {
            self.state.hovered_row = rows;
        }
        if self.state.hovered_column > columns {
            self.state.hovered_column = columns;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_menu_keeps_its_locked_index() {
        let mut selection = SelectionController::new();
        selection.set_hovered(CellCoord::new(2, 1));
        assert!(selection.open(Axis::Row, 4));

        selection.set_hovered(CellCoord::new(4, 1));
        assert!(selection.open(Axis::Row, 4));
        assert_eq!(selection.selected(Axis::Row), 2);
    }
}
