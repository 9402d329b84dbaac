//! Command-line interface for liftlog.

use clap::{Parser, Subcommand};

/// liftlog - personal fitness tracking server
#[derive(Parser)]
#[command(name = "liftlog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the API and room server (default)
    #[command(alias = "daemon", alias = "-d")]
    Serve,

    /// Write a default config.toml in the working directory
    Init,

    /// Validate the configuration and open the database
    CheckConfig,

    /// Create an account
    CreateUser {
        username: String,

        email: String,

        #[arg(long)]
        password: String,

        /// Grant the admin role
        #[arg(long)]
        admin: bool,
    },
}
