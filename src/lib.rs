pub mod cli;
pub mod commands;
pub mod config;

pub use cli::{Cli, Commands, DraftAction};
pub use commands::{run, CommandError};
pub use config::{Config, ConfigError};
