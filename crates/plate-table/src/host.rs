use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Marker classes the host uses to tell which part of a table was clicked.
pub mod class {
    pub const WRAPPER: &str = "tc-wrap";
    pub const TABLE: &str = "tc-table";
    pub const ADD_ROW: &str = "tc-add-row";
    pub const ADD_COLUMN: &str = "tc-add-column";
    pub const PROPERTIES_DIALOG: &str = "tc-properties-dialog";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WidgetId(pub u64);

impl WidgetId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        WidgetId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconName {
    Plus,
    NewToLeft,
    NewToRight,
    NewToUp,
    NewToDown,
    Cross,
    CellProperties,
}

impl IconName {
    pub fn as_str(self) -> &'static str {
        match self {
            IconName::Plus => "plus",
            IconName::NewToLeft => "new-to-left",
            IconName::NewToRight => "new-to-right",
            IconName::NewToUp => "new-to-up",
            IconName::NewToDown => "new-to-down",
            IconName::Cross => "cross",
            IconName::CellProperties => "cell-properties",
        }
    }
}

/// Services the editor framework hosting the table provides.
pub trait HostApi {
    /// Localized string for `key`.
    fn translate(&self, key: &str) -> String {
        key.to_string()
    }

    /// Markup (or asset reference) the host renders for an icon.
    fn render_icon(&self, icon: IconName) -> String {
        icon.as_str().to_string()
    }

    /// Class marking the host's own block-settings UI. Clicks inside it never
    /// close an open style dialog.
    fn settings_button_class(&self) -> &str {
        "ce-settings"
    }

    /// Starts delivering document-wide clicks for `widget`.
    fn subscribe_document_clicks(&self, widget: WidgetId) -> SubscriptionId;

    fn unsubscribe_document_clicks(&self, id: SubscriptionId);
}

/// Document click registration owned by one widget. Dropping it deregisters.
pub struct ClickSubscription {
    id: SubscriptionId,
    api: Rc<dyn HostApi>,
}

impl ClickSubscription {
    pub fn new(api: Rc<dyn HostApi>, widget: WidgetId) -> Self {
        let id = api.subscribe_document_clicks(widget);
        tracing::debug!(?widget, ?id, "subscribed to document clicks");
        Self { id, api }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl Drop for ClickSubscription {
    fn drop(&mut self) {
        tracing::debug!(id = ?self.id, "unsubscribed from document clicks");
        self.api.unsubscribe_document_clicks(self.id);
    }
}

/// Where a document click landed, from the point of view of one widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickTarget {
    /// Inside the cell area of any table.
    pub inside_grid: bool,
    /// Inside the wrapper of any table (grid, toolboxes, add buttons).
    pub inside_wrapper: bool,
    pub inside_properties_dialog: bool,
    pub inside_settings_zone: bool,
    /// Owner of the add-row button that was clicked, if any.
    pub add_row_button: Option<WidgetId>,
    /// Owner of the add-column button that was clicked, if any.
    pub add_column_button: Option<WidgetId>,
}

impl ClickTarget {
    /// Classifies a click from the clicked element's ancestry, innermost
    /// first. Each entry is the element's class list and the table widget that
    /// owns it, when known. The settings zone is recognized by
    /// [`HostApi::settings_button_class`].
    pub fn from_ancestry<'a, I>(ancestry: I, api: &dyn HostApi) -> Self
    where
        I: IntoIterator<Item = (&'a [&'a str], Option<WidgetId>)>,
    {
        let settings_class = api.settings_button_class();
        let mut target = ClickTarget::default();
        for (classes, owner) in ancestry {
            for &class_name in classes {
                match class_name {
                    class::TABLE => target.inside_grid = true,
                    class::WRAPPER => target.inside_wrapper = true,
                    class::PROPERTIES_DIALOG => target.inside_properties_dialog = true,
                    class::ADD_ROW if target.add_row_button.is_none() => {
                        target.add_row_button = owner;
                    }
                    class::ADD_COLUMN if target.add_column_button.is_none() => {
                        target.add_column_button = owner;
                    }
                    other if other == settings_class => target.inside_settings_zone = true,
                    _ => {}
                }
            }
        }
        target
    }

    pub fn outside_wrapper() -> Self {
        ClickTarget::default()
    }
}

/// In-process host: identity translations and a local click registry.
#[derive(Debug, Default)]
pub struct LocalHost {
    next_id: Cell<u64>,
    active: RefCell<Vec<(SubscriptionId, WidgetId)>>,
    translations: RefCell<Vec<(String, String)>>,
}

impl LocalHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_translation(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.translations
            .borrow_mut()
            .push((key.into(), value.into()));
        self
    }

    /// Widgets currently registered for document clicks.
    pub fn subscribers(&self) -> Vec<WidgetId> {
        self.active.borrow().iter().map(|(_, w)| *w).collect()
    }
}

impl HostApi for LocalHost {
    fn translate(&self, key: &str) -> String {
        self.translations
            .borrow()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| key.to_string())
    }

    fn subscribe_document_clicks(&self, widget: WidgetId) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get() + 1);
        self.next_id.set(id.0);
        self.active.borrow_mut().push((id, widget));
        id
    }

    fn unsubscribe_document_clicks(&self, id: SubscriptionId) {
        let mut active = self.active.borrow_mut();
        let before = active.len();
        active.retain(|(sub, _)| *sub != id);
        if active.len() == before {
            tracing::warn!(?id, "unsubscribe for unknown click subscription");
        }
    }
}
