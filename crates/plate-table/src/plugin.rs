use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::TableError;
use crate::grid::CellCoord;
use crate::style::{CellStyle, TableStyle};
use crate::table::TableBlock;

pub type CommandHandler =
    Arc<dyn Fn(&mut TableBlock, Option<Value>) -> Result<(), TableError> + Send + Sync>;

pub type QueryHandler =
    Arc<dyn Fn(&TableBlock, Option<Value>) -> Result<Value, TableError> + Send + Sync>;

#[derive(Clone)]
pub struct CommandSpec {
    pub id: String,
    pub label: String,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub args_example: Option<Value>,
    pub hidden: bool,
    /// Refused with [`TableError::ReadOnly`] on read-only tables.
    pub mutating: bool,
    pub handler: CommandHandler,
}

impl CommandSpec {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        handler: impl Fn(&mut TableBlock, Option<Value>) -> Result<(), TableError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: None,
            keywords: Vec::new(),
            args_example: None,
            hidden: false,
            mutating: true,
            handler: Arc::new(handler),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn args_example(mut self, args_example: Value) -> Self {
        self.args_example = Some(args_example);
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn mutating(mut self, mutating: bool) -> Self {
        self.mutating = mutating;
        self
    }
}

#[derive(Clone)]
pub struct QuerySpec {
    pub id: String,
    pub description: Option<String>,
    pub handler: QueryHandler,
}

impl QuerySpec {
    pub fn new(
        id: impl Into<String>,
        handler: impl Fn(&TableBlock, Option<Value>) -> Result<Value, TableError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            description: None,
            handler: Arc::new(handler),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A bundle of commands and queries registered on a table.
pub trait TablePlugin: Send + Sync {
    fn id(&self) -> &'static str;
    fn commands(&self) -> Vec<CommandSpec> {
        Vec::new()
    }
    fn queries(&self) -> Vec<QuerySpec> {
        Vec::new()
    }
}

#[derive(Clone, Default)]
pub struct CommandRegistry {
    commands: HashMap<String, CommandSpec>,
    queries: HashMap<String, QuerySpec>,
}

impl CommandRegistry {
    pub fn new<'a>(
        plugins: impl IntoIterator<Item = &'a dyn TablePlugin>,
    ) -> Result<Self, TableError> {
        let mut registry = Self::default();
        for plugin in plugins {
            registry.register_plugin(plugin)?;
        }
        Ok(registry)
    }

    /// Registry with the built-in table commands.
    pub fn table() -> Self {
        Self::new([&TableCommandsPlugin as &dyn TablePlugin]).unwrap_or_else(|err| {
            tracing::error!(%err, "built-in table commands failed to register");
            Self::default()
        })
    }

    pub fn register_plugin(&mut self, plugin: &dyn TablePlugin) -> Result<(), TableError> {
        let commands = plugin.commands();
        let queries = plugin.queries();

        if let Some(cmd) = commands.iter().find(|cmd| self.commands.contains_key(&cmd.id)) {
            return Err(TableError::DuplicateCommand(cmd.id.clone()));
        }
        if let Some(query) = queries.iter().find(|query| self.queries.contains_key(&query.id)) {
            return Err(TableError::DuplicateQuery(query.id.clone()));
        }

        for cmd in commands {
            self.commands.insert(cmd.id.clone(), cmd);
        }
        for query in queries {
            self.queries.insert(query.id.clone(), query);
        }

        tracing::debug!(plugin = plugin.id(), "table plugin registered");
        Ok(())
    }

    pub fn commands(&self) -> &HashMap<String, CommandSpec> {
        &self.commands
    }

    pub fn command(&self, id: &str) -> Option<CommandSpec> {
        self.commands.get(id).cloned()
    }

    pub fn queries(&self) -> &HashMap<String, QuerySpec> {
        &self.queries
    }

    pub fn query(&self, id: &str) -> Option<QuerySpec> {
        self.queries.get(id).cloned()
    }
}

#[derive(Deserialize)]
struct OptionalIndexArgs {
    #[serde(default)]
    index: Option<usize>,
}

#[derive(Deserialize)]
struct IndexArgs {
    index: usize,
}

#[derive(Deserialize)]
struct HeadingsArgs {
    enabled: bool,
}

#[derive(Deserialize)]
struct CellArgs {
    row: usize,
    column: usize,
}

#[derive(Deserialize)]
struct CellContentArgs {
    row: usize,
    column: usize,
    content: String,
}

#[derive(Deserialize)]
struct CellStyleArgs {
    row: usize,
    column: usize,
    style: CellStyle,
}

#[derive(Deserialize)]
struct TableStyleArgs {
    style: TableStyle,
}

fn parse_args<T: DeserializeOwned>(id: &str, args: Option<Value>) -> Result<T, TableError> {
    let args = match args {
        None | Some(Value::Null) => Value::Object(Default::default()),
        Some(args) => args,
    };
    serde_json::from_value(args).map_err(|err| invalid_args(id, err.to_string()))
}

fn invalid_args(id: &str, reason: impl Into<String>) -> TableError {
    TableError::InvalidArgs {
        id: id.to_string(),
        reason: reason.into(),
    }
}

fn require_cell(id: &str, table: &TableBlock, row: usize, column: usize) -> Result<CellCoord, TableError> {
    let cell = CellCoord::new(row, column);
    if table.grid().contains(cell) {
        Ok(cell)
    } else {
        Err(invalid_args(id, format!("no cell at row {row}, column {column}")))
    }
}

fn require_index(id: &str, index: usize, count: usize) -> Result<usize, TableError> {
    if (1..=count).contains(&index) {
        Ok(index)
    } else {
        Err(invalid_args(id, format!("index {index} is outside 1..={count}")))
    }
}

struct TableCommandsPlugin;

impl TablePlugin for TableCommandsPlugin {
    fn id(&self) -> &'static str {
        "table"
    }

    fn commands(&self) -> Vec<CommandSpec> {
        vec![
            CommandSpec::new("table.add_row", "Add row", |table, args| {
                let args: OptionalIndexArgs = parse_args("table.add_row", args)?;
                table.add_row(args.index, true);
                Ok(())
            })
            .description("Insert a row before the given 1-based index, or append one.")
            .keywords(["table", "row", "insert"])
            .args_example(serde_json::json!({ "index": 1 })),
            CommandSpec::new("table.add_column", "Add column", |table, args| {
                let args: OptionalIndexArgs = parse_args("table.add_column", args)?;
                table.add_column(args.index, true);
                Ok(())
            })
            .description("Insert a column before the given 1-based index, or append one.")
            .keywords(["table", "column", "insert"])
            .args_example(serde_json::json!({ "index": 1 })),
            CommandSpec::new("table.delete_row", "Delete row", |table, args| {
                let id = "table.delete_row";
                let args: IndexArgs = parse_args(id, args)?;
                let index = require_index(id, args.index, table.grid().row_count())?;
                table.delete_row(index);
                Ok(())
            })
            .description("Delete a row. The last remaining row is kept.")
            .keywords(["table", "row", "delete", "remove"])
            .args_example(serde_json::json!({ "index": 2 })),
            CommandSpec::new("table.delete_column", "Delete column", |table, args| {
                let id = "table.delete_column";
                let args: IndexArgs = parse_args(id, args)?;
                let index = require_index(id, args.index, table.grid().column_count())?;
                table.delete_column(index);
                Ok(())
            })
            .description("Delete a column. The last remaining column is kept.")
            .keywords(["table", "column", "delete", "remove"])
            .args_example(serde_json::json!({ "index": 2 })),
            CommandSpec::new("table.set_headings", "Toggle headings", |table, args| {
                let args: HeadingsArgs = parse_args("table.set_headings", args)?;
                table.set_headings(args.enabled);
                Ok(())
            })
            .description("Mark the first row as headings.")
            .keywords(["table", "heading", "header"])
            .args_example(serde_json::json!({ "enabled": true })),
            CommandSpec::new("table.set_cell_content", "Set cell content", |table, args| {
                let id = "table.set_cell_content";
                let args: CellContentArgs = parse_args(id, args)?;
                let cell = require_cell(id, table, args.row, args.column)?;
                table.set_cell_content(cell, args.content);
                Ok(())
            })
            .hidden(true)
            .args_example(serde_json::json!({ "row": 1, "column": 1, "content": "Name" })),
            CommandSpec::new("table.set_cell_style", "Set cell style", |table, args| {
                let id = "table.set_cell_style";
                let args: CellStyleArgs = parse_args(id, args)?;
                let cell = require_cell(id, table, args.row, args.column)?;
                table.set_cell_style(cell, args.style);
                Ok(())
            })
            .description("Replace one cell's background, border color and border width.")
            .keywords(["table", "cell", "style", "color", "border"])
            .args_example(serde_json::json!({
                "row": 1,
                "column": 1,
                "style": { "backgroundColor": "#fff3bf", "borderColor": "#e8e8eb", "borderWidth": "2px" }
            })),
            CommandSpec::new("table.set_table_style", "Set table style", |table, args| {
                let args: TableStyleArgs = parse_args("table.set_table_style", args)?;
                table.set_table_style(args.style);
                Ok(())
            })
            .description("Replace the table style and apply it to every cell.")
            .keywords(["table", "style", "color", "border"])
            .args_example(serde_json::json!({
                "style": { "backgroundColor": "#ffffff", "borderColor": "#112233", "borderWidth": "1px" }
            })),
        ]
    }

    fn queries(&self) -> Vec<QuerySpec> {
        vec![
            QuerySpec::new("table.size", |table, _args| {
                Ok(serde_json::json!({
                    "rows": table.grid().row_count(),
                    "columns": table.grid().column_count(),
                }))
            })
            .description("Row and column count."),
            QuerySpec::new("table.selection", |table, _args| {
                Ok(serde_json::to_value(table.selection())?)
            })
            .description("Hovered and selected row/column indices."),
            QuerySpec::new("table.data", |table, _args| {
                Ok(serde_json::to_value(table.get_data())?)
            })
            .description("The document as it would be saved."),
            QuerySpec::new("table.cell_style", |table, args| {
                let id = "table.cell_style";
                let args: CellArgs = parse_args(id, args)?;
                let cell = require_cell(id, table, args.row, args.column)?;
                let style = table
                    .grid()
                    .cell_style(cell)
                    .ok_or_else(|| invalid_args(id, "cell has no style"))?;
                Ok(serde_json::to_value(style)?)
            })
            .description("Style of one cell."),
        ]
    }
}
