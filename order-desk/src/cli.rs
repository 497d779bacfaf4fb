//! Command line

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Headless order desk for restaurant owners
#[derive(Parser, Debug)]
#[command(name = "order-desk", version, about, long_about = None)]
pub struct Cli {
    /// Owner user id; replaces the stored session when it differs
    #[arg(long, env = "DESK_USER_ID")]
    pub user_id: Option<String>,

    /// Persist the session here instead of keeping it in memory
    #[arg(long, env = "DESK_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Restaurant to work on (must be owned by the user)
    #[arg(long, env = "DESK_RESTAURANT_ID")]
    pub restaurant: Option<String>,

    /// Write logs to a daily rolling file in this directory
    #[arg(long, env = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log filter, overrides RUST_LOG
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Poll orders and log changes until Ctrl-C (default)
    Watch,
    /// List owned restaurants
    Restaurants,
    /// Accept an order
    Accept { order_id: String },
    /// Accept an order and start preparing it
    Prepare { order_id: String },
    /// Mark an order ready for the courier
    Pickup { order_id: String },
    /// Open the active restaurant
    Open,
    /// Close the active restaurant
    Close,
    /// Clear the stored session
    Logout,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Watch)
    }
}
