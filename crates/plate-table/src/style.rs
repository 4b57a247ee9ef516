use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";
pub const DEFAULT_BORDER_COLOR: &str = "#e8e8eb";
pub const DEFAULT_BORDER_WIDTH: &str = "1px";

/// Visual properties of a single cell.
///
/// The same record doubles as the table-wide style: changing a table field
/// overwrites that field on every cell, there is no inherited layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellStyle {
    pub background_color: String,
    pub border_color: String,
    pub border_width: String,
}

pub type TableStyle = CellStyle;

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            border_color: DEFAULT_BORDER_COLOR.to_string(),
            border_width: DEFAULT_BORDER_WIDTH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleField {
    BackgroundColor,
    BorderColor,
    BorderWidth,
}

impl StyleField {
    pub const ALL: [StyleField; 3] = [
        StyleField::BackgroundColor,
        StyleField::BorderColor,
        StyleField::BorderWidth,
    ];

    /// Key used for this field in the persisted document.
    pub fn key(self) -> &'static str {
        match self {
            StyleField::BackgroundColor => "backgroundColor",
            StyleField::BorderColor => "borderColor",
            StyleField::BorderWidth => "borderWidth",
        }
    }

    fn default_value(self) -> &'static str {
        match self {
            StyleField::BackgroundColor => DEFAULT_BACKGROUND_COLOR,
            StyleField::BorderColor => DEFAULT_BORDER_COLOR,
            StyleField::BorderWidth => DEFAULT_BORDER_WIDTH,
        }
    }
}

impl CellStyle {
    pub fn new(
        background_color: impl Into<String>,
        border_color: impl Into<String>,
        border_width: impl Into<String>,
    ) -> Self {
        Self {
            background_color: background_color.into(),
            border_color: border_color.into(),
            border_width: border_width.into(),
        }
    }

    pub fn get(&self, field: StyleField) -> &str {
        match field {
            StyleField::BackgroundColor => &self.background_color,
            StyleField::BorderColor => &self.border_color,
            StyleField::BorderWidth => &self.border_width,
        }
    }

    /// Sets a field. Border widths given as bare numbers get a `px` unit.
    pub fn set(&mut self, field: StyleField, value: &str) {
        match field {
            StyleField::BackgroundColor => self.background_color = value.to_string(),
            StyleField::BorderColor => self.border_color = value.to_string(),
            StyleField::BorderWidth => self.border_width = normalize_border_width(value),
        }
    }

    /// Border width as a number of pixels, `0.0` when it can't be parsed.
    pub fn border_width_px(&self) -> f64 {
        self.border_width
            .trim()
            .trim_end_matches("px")
            .trim()
            .parse::<f64>()
            .unwrap_or(0.0)
    }

    /// Builds a style from an untrusted JSON value, falling back to the
    /// default for anything missing or malformed.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            if !value.is_null() {
                tracing::warn!(?value, "cell style is not an object, using defaults");
            }
            return Self::default();
        };

        let mut style = Self::default();
        for field in StyleField::ALL {
            match obj.get(field.key()) {
                Some(Value::String(s)) if !s.trim().is_empty() => style.set(field, s),
                Some(Value::Number(n)) if field == StyleField::BorderWidth => {
                    style.set(field, &n.to_string())
                }
                None | Some(Value::Null) => {}
                Some(other) => {
                    tracing::warn!(
                        field = field.key(),
                        value = ?other,
                        "malformed style field, using default {}",
                        field.default_value()
                    );
                }
            }
        }
        style
    }
}

impl<'de> Deserialize<'de> for CellStyle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

fn normalize_border_width(value: &str) -> String {
    let value = value.trim();
    if !value.is_empty() && value.parse::<f64>().is_ok() {
        format!("{value}px")
    } else {
        value.to_string()
    }
}
