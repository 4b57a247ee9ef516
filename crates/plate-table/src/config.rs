use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::document::TableData;

pub const DEFAULT_ROWS: usize = 2;
pub const DEFAULT_COLS: usize = 2;

/// Block configuration. Only consulted when the document has no content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default, deserialize_with = "positive_count")]
    pub rows: Option<usize>,
    #[serde(default, deserialize_with = "positive_count")]
    pub cols: Option<usize>,
}

impl TableConfig {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows: (rows > 0).then_some(rows),
            cols: (cols > 0).then_some(cols),
        }
    }

    /// Reads a host config object, ignoring anything unusable.
    pub fn from_value(value: &Value) -> Self {
        Self {
            rows: value.get("rows").and_then(parse_count),
            cols: value.get("cols").and_then(parse_count),
        }
    }

    /// `(rows, cols)` of the initial grid: the document's shape when it has
    /// content, otherwise the configured size, otherwise 2x2.
    pub fn initial_size(&self, data: &TableData) -> (usize, usize) {
        let content_rows = data.content.len();
        let content_cols = data.content_columns();
        let rows = if content_rows > 0 {
            content_rows
        } else {
            self.rows.unwrap_or(DEFAULT_ROWS)
        };
        let cols = if content_cols > 0 {
            content_cols
        } else {
            self.cols.unwrap_or(DEFAULT_COLS)
        };
        (rows, cols)
    }
}

fn positive_count<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_count(&value))
}

/// Accepts positive numbers and strings with a leading positive integer
/// (`"3"`, `"3 rows"`).
fn parse_count(value: &Value) -> Option<usize> {
    let parsed = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 1.0).map(|f| f as u64)),
        Value::String(s) => {
            let s = s.trim_start();
            let digits: String = s.chars().take_while(char::is_ascii_digit).collect();
            digits.parse::<u64>().ok()
        }
        Value::Null => return None,
        _ => None,
    };

    match parsed {
        Some(n) if n > 0 => usize::try_from(n).ok(),
        _ => {
            tracing::warn!(?value, "ignoring non-positive table size in config");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_strings_are_accepted() {
        let config = TableConfig::from_value(&serde_json::json!({ "rows": "4", "cols": 3.7 }));
        assert_eq!(config, TableConfig::new(4, 3));
    }

    #[test]
    fn invalid_sizes_fall_back_to_defaults() {
        let config: TableConfig =
            serde_json::from_value(serde_json::json!({ "rows": -1, "cols": "abc" })).unwrap();
        assert_eq!(config.initial_size(&TableData::default()), (2, 2));
    }
}
