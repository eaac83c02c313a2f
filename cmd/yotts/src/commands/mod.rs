//! CLI commands module.

mod config;
mod menu;
mod util;

pub use config::ConfigCommand;
pub use menu::MenuCommand;

pub(crate) use util::*;
