use std::rc::Rc;
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::TableConfig;
use crate::dialog::{CellPopover, DialogController, DialogTarget, StyleDialog};
use crate::document::{TableData, is_blank};
use crate::error::TableError;
use crate::geometry::{GridLayout, Point, locate_hovered_cell};
use crate::grid::{CellCoord, Grid};
use crate::host::{ClickSubscription, ClickTarget, HostApi, IconName, WidgetId};
use crate::plugin::{CommandRegistry, TablePlugin};
use crate::selection::{FocusedCell, SelectionController, SelectionState};
use crate::style::{CellStyle, StyleField, TableStyle};
use crate::throttle::{POINTER_THROTTLE, Throttle};
use crate::toolbox::{Axis, ItemClick, Toolbox, ToolboxAction, toolbox_items};
use crate::view::{CellView, DialogView, PopoverView, RowView, TableView, ToolboxView};

/// How a key press inside the table should be treated by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Let the host's default behaviour run.
    Default,
    /// Handled here; suppress the default behaviour.
    Handled,
    /// Keep the event from bubbling out of the table.
    StopPropagation,
}

/// An editable table block.
///
/// All state lives here and is mutated synchronously from the host's event
/// handlers; structural changes finish (styles included) before any later
/// geometry or selection read.
pub struct TableBlock {
    id: WidgetId,
    read_only: bool,
    api: Rc<dyn HostApi>,
    grid: Grid,
    selection: SelectionController,
    focused: FocusedCell,
    focus_request: Option<CellCoord>,
    dialogs: DialogController,
    popover: CellPopover,
    layout: Option<Box<dyn GridLayout>>,
    pointer: Throttle<Point>,
    click_subscription: Option<ClickSubscription>,
    registry: CommandRegistry,
    revision: u64,
}

impl TableBlock {
    pub fn new(read_only: bool, api: Rc<dyn HostApi>, data: TableData, config: TableConfig) -> Self {
        let (rows, columns) = config.initial_size(&data);
        if data.content.iter().any(|row| row.len() != columns) {
            tracing::warn!(columns, "ragged table content, padding short rows");
        }

        let table_style = data.table_properties.clone().unwrap_or_default();
        let mut grid = Grid::from_parts(
            rows,
            columns,
            &data.content,
            &data.cell_properties,
            table_style,
        );
        if data.with_headings {
            grid.set_headings(Some(api.translate("Heading")));
        }

        let id = WidgetId::next();
        let click_subscription = (!read_only).then(|| ClickSubscription::new(api.clone(), id));

        tracing::debug!(?id, rows, columns, read_only, "table block created");

        Self {
            id,
            read_only,
            api,
            grid,
            selection: SelectionController::new(),
            focused: CellCoord::NONE,
            focus_request: None,
            dialogs: DialogController::new(),
            popover: CellPopover::default(),
            layout: None,
            pointer: Throttle::new(POINTER_THROTTLE),
            click_subscription,
            registry: CommandRegistry::table(),
            revision: 0,
        }
    }

    /// Builds a block from the host's raw JSON data and config objects.
    pub fn from_json(
        read_only: bool,
        api: Rc<dyn HostApi>,
        data: Value,
        config: &Value,
    ) -> Result<Self, TableError> {
        let data = if data.is_null() {
            TableData::default()
        } else {
            TableData::from_value(data)?
        };
        Ok(Self::new(read_only, api, data, TableConfig::from_value(config)))
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn selection(&self) -> SelectionState {
        self.selection.state()
    }

    pub fn toolbox(&self, axis: Axis) -> &Toolbox {
        self.selection.toolbox(axis)
    }

    pub fn focused_cell(&self) -> FocusedCell {
        self.focused
    }

    /// Cell the host should move editing focus to, if any. Cleared on read.
    pub fn take_focus_request(&mut self) -> Option<CellCoord> {
        self.focus_request.take()
    }

    pub fn dialog(&self) -> Option<&StyleDialog> {
        self.dialogs.current()
    }

    pub fn is_cell_popover_open(&self) -> bool {
        self.popover.is_open()
    }

    /// Bumped on every visible change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn notify(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Render snapshot of the whole block.
    pub fn get_wrapper(&self) -> TableView {
        let state = self.selection.state();
        let api = self.api.as_ref();

        let rows = self
            .grid
            .rows()
            .iter()
            .zip(self.grid.styles())
            .enumerate()
            .map(|(r, (cells, styles))| RowView {
                selected: state.selected_row == r + 1,
                cells: cells
                    .iter()
                    .zip(styles)
                    .enumerate()
                    .map(|(c, (cell, style))| CellView {
                        content: cell.content.clone(),
                        style: style.clone(),
                        editable: !self.read_only,
                        heading: cell.heading().map(str::to_string),
                        selected: state.selected_column == c + 1,
                    })
                    .collect(),
            })
            .collect();

        let toolbox_view = |axis: Axis, count: usize| {
            let toolbox = self.selection.toolbox(axis);
            ToolboxView {
                axis,
                phase: toolbox.phase(),
                offset: toolbox.offset(),
                items: toolbox_items(axis, count, api),
            }
        };

        TableView {
            widget: self.id,
            read_only: self.read_only,
            with_headings: self.grid.headings_enabled(),
            table_style: self.grid.table_style().clone(),
            rows,
            row_toolbox: toolbox_view(Axis::Row, self.grid.row_count()),
            column_toolbox: toolbox_view(Axis::Column, self.grid.column_count()),
            add_button_icon: (!self.read_only).then(|| api.render_icon(IconName::Plus)),
            cell_popover: self.popover.position().map(|position| PopoverView {
                position,
                items: CellPopover::items(api),
            }),
            dialog: self.dialogs.current().map(|dialog| DialogView {
                target: dialog.target(),
                heading: dialog.heading().to_string(),
                properties: dialog.properties().to_vec(),
            }),
        }
    }

    /// The document to persist. Rows whose cells carry no visible text are
    /// left out together with their styles.
    pub fn get_data(&self) -> TableData {
        let mut content = Vec::with_capacity(self.grid.row_count());
        let mut cell_properties = Vec::with_capacity(self.grid.row_count());

        for (cells, styles) in self.grid.rows().iter().zip(self.grid.styles()) {
            if cells.iter().all(|cell| is_blank(&cell.content)) {
                continue;
            }
            content.push(cells.iter().map(|cell| cell.content.clone()).collect());
            cell_properties.push(styles.clone());
        }

        TableData {
            content,
            cell_properties,
            table_properties: Some(self.grid.table_style().clone()),
            with_headings: self.grid.headings_enabled(),
        }
    }

    /// Releases the document click subscription. Safe to call more than once.
    pub fn destroy(&mut self) {
        if self.click_subscription.take().is_some() {
            tracing::debug!(id = ?self.id, "table block destroyed");
        }
    }

    pub fn set_headings(&mut self, enabled: bool) {
        if self.read_only {
            return;
        }
        let label = enabled.then(|| self.api.translate("Heading"));
        self.grid.set_headings(label);
        self.notify();
    }

    /// Installs the geometry measured by the host after rendering.
    pub fn set_layout(&mut self, layout: impl GridLayout + 'static) {
        self.layout = Some(Box::new(layout));
        self.refresh_toolboxes();
    }

    /// Pointer moved over the grid (`pointer` relative to its origin). Moves
    /// are throttled; returns `true` when this one was handled.
    pub fn on_pointer_move(&mut self, pointer: Point, now: Instant) -> bool {
        if self.read_only {
            return false;
        }
        match self.pointer.offer(now, pointer) {
            Some(pointer) => self.hover(pointer),
            None => false,
        }
    }

    /// Delivers the newest throttled pointer move once its window is over.
    pub fn on_pointer_idle(&mut self, now: Instant) -> bool {
        match self.pointer.poll(now) {
            Some(pointer) if !self.read_only => self.hover(pointer),
            _ => false,
        }
    }

    /// When the host should call [`TableBlock::on_pointer_idle`] next.
    pub fn pointer_deadline(&self) -> Option<Instant> {
        self.pointer.deadline()
    }

    fn hover(&mut self, pointer: Point) -> bool {
        let rows = self.grid.row_count();
        let columns = self.grid.column_count();
        let Some(layout) = layout_in_step(&self.layout, &self.grid) else {
            tracing::trace!("pointer move ignored, layout not in step with the grid");
            return false;
        };

        let lookup = locate_hovered_cell(layout, pointer, rows, columns, self.selection.state().hovered());
        self.selection.set_hovered(lookup.cell);
        self.selection.update_positions(layout, columns, lookup.cell);
        self.notify();
        true
    }

    fn update_toolboxes_position(&mut self, at: CellCoord) {
        let columns = self.grid.column_count();
        if let Some(layout) = layout_in_step(&self.layout, &self.grid) {
            self.selection.update_positions(layout, columns, at);
        }
    }

    fn refresh_toolboxes(&mut self) {
        let hovered = self.selection.state().hovered();
        self.update_toolboxes_position(hovered);
    }

    fn axis_count(&self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.grid.row_count(),
            Axis::Column => self.grid.column_count(),
        }
    }

    /// Toggler click: opens the menu for the hovered row or column, or
    /// closes it when it is already open. The other axis closes. Returns
    /// whether the menu is open afterwards.
    pub fn open_toolbox(&mut self, axis: Axis) -> bool {
        if self.read_only {
            return false;
        }
        if self.selection.selected(axis) != 0 {
            self.close_toolbox(axis);
            return false;
        }
        let opened = self.selection.open(axis, self.axis_count(axis));
        if opened {
            self.refresh_toolboxes();
            self.notify();
        }
        opened
    }

    pub fn close_toolbox(&mut self, axis: Axis) {
        self.selection.close(axis);
        self.refresh_toolboxes();
        self.notify();
    }

    /// Closes both menus, disarms confirmations and closes the cell popover.
    pub fn hide_toolboxes(&mut self) {
        self.selection.close_all();
        self.refresh_toolboxes();
        self.popover.close();
        self.notify();
    }

    /// Click on a menu item of the open toolbox on `axis`.
    pub fn click_toolbox_item(&mut self, axis: Axis, action: ToolboxAction) -> ItemClick {
        if self.read_only {
            return ItemClick::Ignored;
        }
        let count = self.axis_count(axis);
        let Some(item) = toolbox_items(axis, count, self.api.as_ref())
            .into_iter()
            .find(|item| item.action == action)
        else {
            return ItemClick::Ignored;
        };

        let outcome = self.selection.toolbox_mut(axis).click(&item);
        match outcome {
            ItemClick::Armed => {
                tracing::debug!(?axis, ?action, "confirmation armed");
                self.notify();
            }
            ItemClick::Execute(action) => {
                let selected = self.selection.selected(axis);
                match (axis, action) {
                    (Axis::Row, ToolboxAction::InsertBefore) => {
                        self.add_row(Some(selected), true);
                    }
                    (Axis::Row, ToolboxAction::InsertAfter) => {
                        self.add_row(Some(selected + 1), true);
                    }
                    (Axis::Row, ToolboxAction::Delete) => {
                        self.delete_row(selected);
                    }
                    (Axis::Column, ToolboxAction::InsertBefore) => {
                        self.add_column(Some(selected), true);
                    }
                    (Axis::Column, ToolboxAction::InsertAfter) => {
                        self.add_column(Some(selected + 1), true);
                    }
                    (Axis::Column, ToolboxAction::Delete) => {
                        self.delete_column(selected);
                    }
                }
                self.hide_toolboxes();
            }
            ItemClick::Ignored => {}
        }
        outcome
    }

    /// Inserts a row before 1-based `index` (appends when out of range).
    /// Returns the new row's index, `None` when read-only.
    pub fn add_row(&mut self, index: Option<usize>, set_focus: bool) -> Option<usize> {
        if self.read_only {
            return None;
        }
        let row = self.grid.insert_row(index);
        if !self.focused.is_none() && self.focused.row >= row {
            self.focused.row += 1;
        }
        if set_focus {
            self.request_focus(CellCoord::new(row, 1));
        }
        self.after_structure_change();
        Some(row)
    }

    /// Inserts a column before 1-based `index` (appends when out of range).
    /// With `set_focus` its first cell takes focus.
    pub fn add_column(&mut self, index: Option<usize>, set_focus: bool) -> Option<usize> {
        if self.read_only {
            return None;
        }
        let column = self.grid.insert_column(index);
        if !self.focused.is_none() && self.focused.column >= column {
            self.focused.column += 1;
        }
        if set_focus {
            self.request_focus(CellCoord::new(1, column));
        }
        self.after_structure_change();
        Some(column)
    }

    pub fn delete_row(&mut self, index: usize) -> bool {
        if self.read_only || !self.grid.delete_row(index) {
            return false;
        }
        if self.focused.row == index {
            self.focused = CellCoord::NONE;
        } else if self.focused.row > index {
            self.focused.row -= 1;
        }
        self.after_structure_change();
        true
    }

    pub fn delete_column(&mut self, index: usize) -> bool {
        if self.read_only || !self.grid.delete_column(index) {
            return false;
        }
        if self.focused.column == index {
            self.focused = CellCoord::NONE;
        } else if self.focused.column > index {
            self.focused.column -= 1;
        }
        self.after_structure_change();
        true
    }

    fn after_structure_change(&mut self) {
        // Snapshots and cell targets refer to the old shape.
        self.dialogs.close();
        self.popover.close();
        self.selection.close_all();
        self.selection
            .clamp_hovered(self.grid.row_count(), self.grid.column_count());
        self.refresh_toolboxes();
        self.notify();
    }

    /// Row appended by Enter. Existing indices keep their meaning, so open
    /// menus and a cell dialog stay; a table dialog's snapshot would no longer
    /// match the grid and is closed.
    fn append_row_from_keyboard(&mut self) {
        self.grid.insert_row(None);
        let table_dialog = self
            .dialogs
            .current()
            .is_some_and(|dialog| dialog.target() == DialogTarget::Table);
        if table_dialog {
            self.dialogs.close();
        }
        self.refresh_toolboxes();
        self.notify();
    }

    fn request_focus(&mut self, cell: CellCoord) {
        self.focused = cell;
        self.focus_request = Some(cell);
    }

    /// Document-wide click delivered through the click subscription.
    pub fn on_document_click(&mut self, target: &ClickTarget) {
        if self.read_only {
            return;
        }

        let outside_toolboxes = target.inside_grid || !target.inside_wrapper;
        if outside_toolboxes {
            self.hide_toolboxes();
        }

        let add_button = target.add_row_button.is_some() || target.add_column_button.is_some();
        let keeps_dialog = target.inside_properties_dialog || target.inside_settings_zone;
        if !keeps_dialog && (outside_toolboxes || add_button) && self.dialogs.close() {
            self.notify();
        }

        if target.add_row_button == Some(self.id) {
            self.add_row(None, true);
            self.hide_toolboxes();
        } else if target.add_column_button == Some(self.id) {
            self.add_column(None, true);
            self.hide_toolboxes();
        }
    }

    /// A cell received editing focus.
    pub fn focus_cell(&mut self, row: usize, column: usize) -> bool {
        let cell = CellCoord::new(row, column);
        if !self.grid.contains(cell) {
            return false;
        }
        self.focused = cell;
        true
    }

    /// Enter moves to the same column of the next row, appending a row from
    /// the last one. Shift+Enter is left to the host.
    pub fn on_enter(&mut self, shift: bool) -> KeyOutcome {
        if self.read_only || shift {
            return KeyOutcome::Default;
        }
        let focused = self.focused;
        if focused.is_none() {
            return KeyOutcome::Handled;
        }

        let next = CellCoord::new(focused.row + 1, focused.column);
        if focused.row < self.grid.row_count() {
            self.request_focus(next);
        } else {
            self.append_row_from_keyboard();
            self.request_focus(next);
        }
        self.notify();
        KeyOutcome::Handled
    }

    /// Tab keeps moving between cells instead of leaving the block.
    pub fn on_tab(&self) -> KeyOutcome {
        if self.read_only {
            KeyOutcome::Default
        } else {
            KeyOutcome::StopPropagation
        }
    }

    /// Right click on a cell: opens the cell popover at `pointer` (relative
    /// to the grid).
    pub fn on_context_menu(&mut self, cell: CellCoord, pointer: Point) -> bool {
        if self.read_only || !self.grid.contains(cell) {
            return false;
        }
        self.popover.close();
        self.popover.open_at(pointer);
        self.focused = cell;
        self.notify();
        true
    }

    /// The popover's "Cell Properties" item: opens the style dialog for the
    /// focused cell.
    pub fn choose_cell_properties(&mut self) -> bool {
        if !self.popover.is_open() {
            return false;
        }
        self.popover.close();
        let focused = self.focused;
        let opened = self.open_cell_dialog(focused);
        self.notify();
        opened
    }

    pub fn open_cell_dialog(&mut self, cell: CellCoord) -> bool {
        if self.read_only {
            return false;
        }
        let opened = self.dialogs.open_cell(&self.grid, cell, self.api.as_ref());
        if opened {
            self.notify();
        }
        opened
    }

    pub fn open_table_dialog(&mut self) -> bool {
        if self.read_only {
            return false;
        }
        self.dialogs.open_table(&self.grid, self.api.as_ref());
        self.notify();
        true
    }

    /// Live edit from the open dialog.
    pub fn change_dialog_field(&mut self, field: StyleField, value: &str) -> bool {
        let changed = self.dialogs.change(&mut self.grid, field, value);
        if changed {
            self.notify();
        }
        changed
    }

    /// Reverts everything the open dialog changed and closes it.
    pub fn cancel_dialog(&mut self) -> bool {
        let cancelled = self.dialogs.cancel(&mut self.grid);
        self.notify();
        cancelled
    }

    /// Closes the open dialog, keeping its edits.
    pub fn close_dialog(&mut self) -> bool {
        let closed = self.dialogs.close();
        if closed {
            self.notify();
        }
        closed
    }

    /// Cell markup edited by the user.
    pub fn set_cell_content(&mut self, cell: CellCoord, content: impl Into<String>) -> bool {
        if self.read_only {
            return false;
        }
        let changed = self.grid.set_cell_content(cell, content);
        if changed {
            self.notify();
        }
        changed
    }

    pub fn set_cell_style(&mut self, cell: CellCoord, style: CellStyle) -> bool {
        if self.read_only {
            return false;
        }
        let changed = self.grid.set_cell_style(cell, style);
        if changed {
            self.notify();
        }
        changed
    }

    /// Replaces the table style, overwriting every cell's style with it.
    pub fn set_table_style(&mut self, style: TableStyle) -> bool {
        if self.read_only {
            return false;
        }
        self.grid.set_table_style(style);
        self.notify();
        true
    }
}

impl TableBlock {
    pub fn register_plugin(&mut self, plugin: &dyn TablePlugin) -> Result<(), TableError> {
        self.registry.register_plugin(plugin)
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn run_command(&mut self, id: &str, args: Option<Value>) -> Result<(), TableError> {
        let Some(command) = self.registry.command(id) else {
            return Err(TableError::UnknownCommand(id.to_string()));
        };
        if command.mutating && self.read_only {
            return Err(TableError::ReadOnly);
        }
        tracing::debug!(command = id, "running table command");
        (command.handler)(self, args)
    }

    pub fn run_query_json(&self, id: &str, args: Option<Value>) -> Result<Value, TableError> {
        let Some(query) = self.registry.query(id) else {
            return Err(TableError::UnknownQuery(id.to_string()));
        };
        (query.handler)(self, args)
    }

    pub fn run_query<T>(&self, id: &str, args: Option<Value>) -> Result<T, TableError>
    where
        T: DeserializeOwned,
    {
        let value = self.run_query_json(id, args)?;
        Ok(serde_json::from_value(value)?)
    }
}

fn layout_in_step<'a>(
    layout: &'a Option<Box<dyn GridLayout>>,
    grid: &Grid,
) -> Option<&'a dyn GridLayout> {
    let layout = layout.as_deref()?;
    (layout.row_count() == grid.row_count() && layout.column_count() == grid.column_count())
        .then_some(layout)
}
