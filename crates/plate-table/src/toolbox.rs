use serde::{Deserialize, Serialize};

use crate::geometry::Bounds;
use crate::host::{HostApi, IconName};

/// Width reserved for the toolbox toggler along the column axis.
pub const TOOLBOX_ICON_SIZE: f32 = 34.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Row,
    Column,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolboxAction {
    /// Add a row above / a column to the left of the selection.
    InsertBefore,
    /// Add a row below / a column to the right of the selection.
    InsertAfter,
    Delete,
}

impl ToolboxAction {
    pub fn requires_confirmation(self) -> bool {
        matches!(self, ToolboxAction::Delete)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolboxItem {
    pub action: ToolboxAction,
    pub label: String,
    pub icon: String,
    pub confirmation_required: bool,
    pub hidden: bool,
}

/// Menu items for one axis. `count` is the current number of rows (or
/// columns); delete is hidden while only one is left.
pub fn toolbox_items(axis: Axis, count: usize, api: &dyn HostApi) -> Vec<ToolboxItem> {
    let entries = match axis {
        Axis::Column => [
            (ToolboxAction::InsertBefore, "Add column to left", IconName::NewToLeft),
            (ToolboxAction::InsertAfter, "Add column to right", IconName::NewToRight),
            (ToolboxAction::Delete, "Delete column", IconName::Cross),
        ],
        Axis::Row => [
            (ToolboxAction::InsertBefore, "Add row above", IconName::NewToUp),
            (ToolboxAction::InsertAfter, "Add row below", IconName::NewToDown),
            (ToolboxAction::Delete, "Delete row", IconName::Cross),
        ],
    };

    entries
        .into_iter()
        .map(|(action, label, icon)| ToolboxItem {
            action,
            label: api.translate(label),
            icon: api.render_icon(icon),
            confirmation_required: action.requires_confirmation(),
            hidden: action == ToolboxAction::Delete && count <= 1,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum ToolboxPhase {
    #[default]
    Idle,
    /// Toggler shown next to the hovered row/column, menu closed.
    Hovered,
    /// Menu open and locked to the selected index.
    Open { armed: Option<ToolboxAction> },
}

/// What a click on a menu item resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemClick {
    /// First click on a destructive item, nothing executed yet.
    Armed,
    Execute(ToolboxAction),
    Ignored,
}

/// Floating toggler + menu for one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Toolbox {
    axis: Axis,
    phase: ToolboxPhase,
    offset: Option<f32>,
}

impl Toolbox {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            phase: ToolboxPhase::Idle,
            offset: None,
        }
    }

    pub fn phase(&self) -> ToolboxPhase {
        self.phase
    }

    /// Offset of the toggler along the axis, in pixels from the grid origin.
    pub fn offset(&self) -> Option<f32> {
        self.offset
    }

    pub fn is_open(&self) -> bool {
        matches!(self.phase, ToolboxPhase::Open { .. })
    }

    pub fn armed(&self) -> Option<ToolboxAction> {
        match self.phase {
            ToolboxPhase::Open { armed } => armed,
            _ => None,
        }
    }

    /// Moves the toggler. Ignored while the menu is open so it does not
    /// follow the pointer.
    pub fn show_at(&mut self, offset: f32) -> bool {
        if self.is_open() {
            return false;
        }
        self.phase = ToolboxPhase::Hovered;
        self.offset = Some(offset);
        true
    }

    pub fn open(&mut self) {
        tracing::debug!(axis = ?self.axis, "toolbox opened");
        self.phase = ToolboxPhase::Open { armed: None };
    }

    /// Closes the menu (disarming any pending confirmation) and hides the
    /// toggler.
    pub fn hide(&mut self) {
        if self.is_open() {
            tracing::debug!(axis = ?self.axis, "toolbox closed");
        }
        self.phase = ToolboxPhase::Idle;
        self.offset = None;
    }

    /// Resolves a click on `item`. Destructive items need two clicks in the
    /// same open session.
    pub fn click(&mut self, item: &ToolboxItem) -> ItemClick {
        let ToolboxPhase::Open { armed } = self.phase else {
            return ItemClick::Ignored;
        };
        if item.hidden {
            return ItemClick::Ignored;
        }
        if item.confirmation_required && armed != Some(item.action) {
            self.phase = ToolboxPhase::Open {
                armed: Some(item.action),
            };
            return ItemClick::Armed;
        }
        ItemClick::Execute(item.action)
    }
}

/// Horizontal toggler offset for 1-based `column` of `columns`: the centre of
/// the column in a track that leaves room for the toggler itself.
pub fn column_toolbox_offset(column: usize, columns: usize, grid_width: f32) -> f32 {
    if columns == 0 {
        return 0.0;
    }
    let step = (grid_width - TOOLBOX_ICON_SIZE).max(0.0) / (columns as f32 * 2.0);
    step * (1.0 + (column.saturating_sub(1) as f32) * 2.0)
}

/// Vertical toggler offset: the middle of the row, rounded up.
pub fn row_toolbox_offset(row: Bounds) -> f32 {
    (row.top() + row.size.height / 2.0).ceil()
}
