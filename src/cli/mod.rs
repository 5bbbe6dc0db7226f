//! CLI command handling module
//!
//! Handles all CLI subcommands and argument parsing.

mod commands;
mod logging;
mod version;

pub use commands::{
    ConfigSubcommand, OutputArgs, handle_config_command, handle_details_command,
    handle_status_command,
};
pub use logging::init_logging;
pub use version::display_version;
