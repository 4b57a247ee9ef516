use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::TableError;
use crate::style::{CellStyle, TableStyle};

/// The persisted table document, as the host stores it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableData {
    #[serde(default, deserialize_with = "lenient_content")]
    pub content: Vec<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_styles")]
    pub cell_properties: Vec<Vec<CellStyle>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_properties: Option<TableStyle>,
    #[serde(default)]
    pub with_headings: bool,
}

impl TableData {
    pub fn from_json_str(s: &str) -> Result<Self, TableError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_value(value: Value) -> Result<Self, TableError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, TableError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Widest row in `content`.
    pub fn content_columns(&self) -> usize {
        self.content.iter().map(Vec::len).max().unwrap_or(0)
    }
}

fn lenient_content<'de, D>(deserializer: D) -> Result<Vec<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(rows) = value else {
        if !value.is_null() {
            tracing::warn!("table content is not an array, ignoring it");
        }
        return Ok(Vec::new());
    };

    Ok(rows
        .into_iter()
        .map(|row| match row {
            Value::Array(cells) => cells.into_iter().map(cell_text).collect(),
            other => {
                tracing::warn!(row = ?other, "table content row is not an array");
                Vec::new()
            }
        })
        .collect())
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn lenient_styles<'de, D>(deserializer: D) -> Result<Vec<Vec<CellStyle>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(rows) = value else {
        return Ok(Vec::new());
    };

    Ok(rows
        .iter()
        .map(|row| match row {
            Value::Array(cells) => cells.iter().map(CellStyle::from_value).collect(),
            _ => Vec::new(),
        })
        .collect())
}

/// Visible text of a cell's markup: tags dropped, common entities decoded.
pub fn text_content(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(start) = rest.find('<') {
        text.push_str(&rest[..start]);
        rest = match rest[start..].find('>') {
            Some(end) => &rest[start + end + 1..],
            None => "",
        };
    }
    text.push_str(rest);

    const ENTITIES: [(&str, &str); 6] = [
        ("&nbsp;", "\u{a0}"),
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&quot;", "\""),
        ("&#39;", "'"),
        ("&amp;", "&"),
    ];
    ENTITIES
        .iter()
        .fold(text, |acc, (entity, ch)| acc.replace(entity, ch))
}

/// `true` when the markup has no visible text.
pub fn is_blank(html: &str) -> bool {
    text_content(html).trim().is_empty()
}
