//! CLI interface for the driver admin console

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::dashboard::Tab;

#[derive(Parser)]
#[command(name = "driver-admin")]
#[command(version)]
#[command(about = "Review and approve driver verification requests", long_about = None)]
pub struct Cli {
    /// Path to driver-admin.toml (searched upward from the current directory by default)
    #[arg(long, global = true, env = "DRIVER_ADMIN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default driver-admin.toml configuration file
    Init,

    /// Log in as an administrator
    Login {
        /// Admin username (prompted when omitted)
        #[arg(short, long)]
        username: Option<String>,

        /// Admin password (prompted when omitted)
        #[arg(short, long, env = "DRIVER_ADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Keep me signed in
        #[arg(long)]
        remember_me: bool,
    },

    /// Log out and forget the stored token
    Logout,

    /// Show the logged in administrator
    Whoami,

    /// Review driver verification requests
    Drivers {
        #[command(subcommand)]
        action: DriversAction,
    },
}

#[derive(Subcommand)]
pub enum DriversAction {
    /// List drivers
    List {
        /// Tab to show
        #[arg(short, long, default_value = "pending")]
        tab: Tab,

        /// Case-insensitive search on the driver's full name
        #[arg(short, long, default_value = "")]
        search: String,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Run document verification for a driver
    Verify {
        /// Driver ID
        id: String,
    },

    /// Approve a driver
    Approve {
        /// Driver ID
        id: String,
    },

    /// Reject a driver
    Reject {
        /// Driver ID
        id: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}
