//! CLI interface for MediFlow

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};

use crate::auth::models::Role;

#[derive(Parser)]
#[command(name = "mediflow")]
#[command(author = "Krakaw")]
#[command(version = "0.1.0")]
#[command(about = "Hospital dashboard session and access control", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new mediflow.toml configuration file
    Init,

    /// Log in and store the session token
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Role to log in as (Admin, Doctor, Staff)
        #[arg(short, long)]
        role: Role,

        /// Password (prompted for when omitted)
        #[arg(short, long, env = "MEDIFLOW_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// End the current session
    Logout,

    /// Show the current session
    Whoami {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// List the navigation links visible to the current session
    Nav,

    /// Navigate to a dashboard path and report what the guard decides
    Open {
        /// Path such as /beds or /illness
        path: String,
    },

    /// Create an account on the authentication backend
    Register {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Role for the new account (Admin, Doctor, Staff)
        #[arg(short, long)]
        role: Role,

        /// Password (prompted for when omitted)
        #[arg(short, long, env = "MEDIFLOW_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Start the development authentication server
    ServeAuth {
        /// Host to bind to (defaults to config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (defaults to config)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
