use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::grid::{CellCoord, Grid};
use crate::host::{HostApi, IconName};
use crate::style::{CellStyle, StyleField, TableStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DialogTarget {
    Cell { row: usize, column: usize },
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Color,
    Number,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogProperty {
    pub field: StyleField,
    pub id: String,
    pub label: String,
    pub input: InputKind,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
enum Snapshot {
    Cell(CellStyle),
    Table {
        table: TableStyle,
        cells: Vec<Vec<CellStyle>>,
    },
}

/// An open dialog: its target, the form it shows, and what cancel restores.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDialog {
    target: DialogTarget,
    heading: String,
    properties: Vec<DialogProperty>,
    snapshot: Snapshot,
}

impl StyleDialog {
    pub fn target(&self) -> DialogTarget {
        self.target
    }

    pub fn heading(&self) -> &str {
        &self.heading
    }

    pub fn properties(&self) -> &[DialogProperty] {
        &self.properties
    }
}

fn properties_for(style: &CellStyle, id_prefix: &str, api: &dyn HostApi) -> Vec<DialogProperty> {
    StyleField::ALL
        .into_iter()
        .map(|field| {
            let (id, label, input) = match field {
                StyleField::BackgroundColor => {
                    ("background-color", "Background Color", InputKind::Color)
                }
                StyleField::BorderColor => ("border-color", "Border Color", InputKind::Color),
                StyleField::BorderWidth => ("border-width", "Border Width", InputKind::Number),
            };
            let value = match input {
                InputKind::Number => format_number(style.border_width_px()),
                InputKind::Color => style.get(field).to_string(),
            };
            DialogProperty {
                field,
                id: format!("{id_prefix}{id}"),
                label: api.translate(label),
                input,
                value,
            }
        })
        .collect()
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Owns the single open style dialog, if any. Field changes apply to the
/// grid immediately; cancel restores the snapshot, close keeps the live state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DialogController {
    open: Option<StyleDialog>,
}

impl DialogController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&StyleDialog> {
        self.open.as_ref()
    }

    /// Opens the dialog for one cell, discarding any other open dialog
    /// without restoring it.
    pub fn open_cell(&mut self, grid: &Grid, cell: CellCoord, api: &dyn HostApi) -> bool {
        let Some(style) = grid.cell_style(cell) else {
            tracing::debug!(?cell, "cell dialog: no such cell");
            return false;
        };
        self.close();
        self.open = Some(StyleDialog {
            target: DialogTarget::Cell {
                row: cell.row,
                column: cell.column,
            },
            heading: api.translate("Cell Properties"),
            properties: properties_for(style, "cell-", api),
            snapshot: Snapshot::Cell(style.clone()),
        });
        tracing::debug!(?cell, "cell dialog opened");
        true
    }

    /// Opens the table-wide dialog, discarding any other open dialog.
    pub fn open_table(&mut self, grid: &Grid, api: &dyn HostApi) {
        self.close();
        self.open = Some(StyleDialog {
            target: DialogTarget::Table,
            heading: api.translate("Table Properties"),
            properties: properties_for(grid.table_style(), "", api),
            snapshot: Snapshot::Table {
                table: grid.table_style().clone(),
                cells: grid.styles().to_vec(),
            },
        });
        tracing::debug!("table dialog opened");
    }

    /// Applies one field edit to the grid right away.
    pub fn change(&mut self, grid: &mut Grid, field: StyleField, value: &str) -> bool {
        let Some(dialog) = self.open.as_mut() else {
            return false;
        };

        let applied = match dialog.target {
            DialogTarget::Cell { row, column } => {
                match grid.cell_style_mut(CellCoord::new(row, column)) {
                    Some(style) => {
                        style.set(field, value);
                        true
                    }
                    None => false,
                }
            }
            DialogTarget::Table => {
                grid.set_table_style_field(field, value);
                true
            }
        };

        if applied {
            if let Some(property) = dialog.properties.iter_mut().find(|p| p.field == field) {
                property.value = value.to_string();
            }
        }
        applied
    }

    /// Restores the snapshot and closes the dialog.
    pub fn cancel(&mut self, grid: &mut Grid) -> bool {
        let Some(dialog) = self.open.take() else {
            return false;
        };
        tracing::debug!(dialog = ?dialog.target, "style dialog cancelled");
        match (dialog.target, dialog.snapshot) {
            (DialogTarget::Cell { row, column }, Snapshot::Cell(style)) => {
                grid.set_cell_style(CellCoord::new(row, column), style)
            }
            (DialogTarget::Table, Snapshot::Table { table, cells }) => {
                grid.restore_styles(table, cells)
            }
            _ => false,
        }
    }

    /// Closes the dialog, keeping whatever was applied.
    pub fn close(&mut self) -> bool {
        match self.open.take() {
            Some(dialog) => {
                tracing::debug!(dialog = ?dialog.target, "style dialog closed");
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopoverItem {
    pub label: String,
    pub icon: String,
}

/// Context menu opened by right-clicking a cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellPopover {
    position: Option<Point>,
}

impl CellPopover {
    pub fn is_open(&self) -> bool {
        self.position.is_some()
    }

    /// Position relative to the grid origin while open.
    pub fn position(&self) -> Option<Point> {
        self.position
    }

    pub fn open_at(&mut self, position: Point) {
        self.position = Some(position);
    }

    pub fn close(&mut self) {
        self.position = None;
    }

    pub fn items(api: &dyn HostApi) -> Vec<PopoverItem> {
        vec![PopoverItem {
            label: api.translate("Cell Properties"),
            icon: api.render_icon(IconName::CellProperties),
        }]
    }
}
