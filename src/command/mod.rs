mod commands;
mod history;

use crate::error::StoreError;

pub use commands::Command;
pub use history::History;

/// Result of executing a command: whether the document changed
pub type CommandResult = Result<bool, StoreError>;
