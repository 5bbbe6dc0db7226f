//! fleetpulse - health pulses and detail panels for multi-cluster application topologies
//!
//! Loads a saved topology document and prints the pulse of its nodes or the
//! detail panel of one node.

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::{ConfigSubcommand, OutputArgs};
use fleetpulse::models::PulseStatus;
use std::path::PathBuf;

/// fleetpulse - health pulses and detail panels for multi-cluster application topologies
#[derive(Parser, Debug)]
#[command(name = "fleetpulse")]
#[command(about = "Health pulses and detail panels for multi-cluster application topologies", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    /// Configuration directory (defaults to FLEETPULSE_CONFIG_DIR or ~/.config/fleetpulse)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Print node pulses of a topology document
    Status {
        /// Topology document (.json, .yaml or .yml)
        file: PathBuf,
        /// Only this node (id or name)
        #[arg(long, short = 'n')]
        node: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print the detail panel of one node
    Details {
        /// Topology document (.json, .yaml or .yml)
        file: PathBuf,
        /// Node id or name
        #[arg(long, short = 'n')]
        node: String,
        /// Pulses to show status rows for (e.g. green,red); all when empty
        #[arg(long, value_delimiter = ',')]
        filter: Vec<PulseStatus>,
        /// Reference time for pod ages (RFC 3339)
        #[arg(long)]
        now: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_file = cli::init_logging(args.debug);
    if let Some(ref log_path) = log_file {
        eprintln!(
            "Debug logging enabled. Logs written to: {}",
            log_path.display()
        );
    }

    let config_dir = args.config_dir.as_deref();
    match args.command {
        Command::Status { file, node, output } => {
            cli::handle_status_command(config_dir, &file, node.as_deref(), &output)
        }
        Command::Details {
            file,
            node,
            filter,
            now,
            output,
        } => cli::handle_details_command(
            config_dir,
            &file,
            &node,
            &filter,
            now.as_deref(),
            &output,
        ),
        Command::Config { subcommand } => cli::handle_config_command(config_dir, subcommand),
        Command::Version => {
            cli::display_version();
            Ok(())
        }
    }
}
