use serde::Serialize;

use crate::dialog::{DialogProperty, DialogTarget, PopoverItem};
use crate::geometry::Point;
use crate::host::WidgetId;
use crate::style::{CellStyle, TableStyle};
use crate::toolbox::{Axis, ToolboxItem, ToolboxPhase};

/// Everything a renderer needs to draw one table block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub widget: WidgetId,
    pub read_only: bool,
    pub with_headings: bool,
    pub table_style: TableStyle,
    pub rows: Vec<RowView>,
    pub row_toolbox: ToolboxView,
    pub column_toolbox: ToolboxView,
    /// Icon for the add-row/add-column buttons; `None` when they are hidden.
    pub add_button_icon: Option<String>,
    pub cell_popover: Option<PopoverView>,
    pub dialog: Option<DialogView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowView {
    pub selected: bool,
    pub cells: Vec<CellView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellView {
    pub content: String,
    pub style: CellStyle,
    pub editable: bool,
    pub heading: Option<String>,
    /// Part of the selected column.
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolboxView {
    pub axis: Axis,
    pub phase: ToolboxPhase,
    pub offset: Option<f32>,
    pub items: Vec<ToolboxItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopoverView {
    pub position: Point,
    pub items: Vec<PopoverItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogView {
    pub target: DialogTarget,
    pub heading: String,
    pub properties: Vec<DialogProperty>,
}
