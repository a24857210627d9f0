//! Command-line interface definition for research-sync
//!
//! This module defines the CLI structure using clap's derive API. Each
//! subcommand drives one store action against the research API.

use clap::{Parser, Subcommand};

use crate::config::StorageBackend;

/// research-sync - client for the research assistant API
///
/// Sign in, browse research sessions and drive analyst research from the
/// terminal. The bearer token is persisted between runs.
#[derive(Parser, Debug, Clone)]
#[command(name = "research-sync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Override the API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Override the token storage backend (keyring, file, memory)
    #[arg(long, global = true)]
    pub storage: Option<StorageBackend>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Sign in with email and password
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long, env = "RESEARCH_SYNC_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account and sign in
    Register {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "RESEARCH_SYNC_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and forget the stored token
    Logout,

    /// Show who is signed in
    Status,

    /// List research sessions
    Sessions,

    /// Show the message history of a session
    History {
        /// Session identifier
        session_id: String,
    },

    /// Start a research session on a topic
    Research {
        /// Research topic
        topic: String,

        /// Number of analyst personas to generate
        #[arg(short, long, default_value_t = 3)]
        analysts: u32,
    },

    /// Send analyst feedback for a session
    Feedback {
        /// Session identifier
        session_id: String,

        /// Feedback text; "approve" accepts the proposed analysts
        feedback: String,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
