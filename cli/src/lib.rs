pub mod charts;
pub mod commands;
pub mod config;
pub mod context;
pub mod logging;
pub mod repl;
pub mod save;
pub mod terminal;

pub use context::CliContext;
pub use repl::readline;
