mod config;
mod dialog;
mod document;
mod error;
mod geometry;
mod grid;
mod host;
mod mutation;
mod plugin;
mod selection;
mod style;
mod table;
mod throttle;
mod toolbox;
mod view;

pub use crate::config::*;
pub use crate::dialog::*;
pub use crate::document::*;
pub use crate::error::*;
pub use crate::geometry::*;
pub use crate::grid::*;
pub use crate::host::*;
pub use crate::plugin::*;
pub use crate::selection::*;
pub use crate::style::*;
pub use crate::table::*;
pub use crate::throttle::*;
pub use crate::toolbox::*;
pub use crate::view::*;
