//! FaceGate CLI - Local authentication in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{face, login, register, reset, status};

/// FaceGate - password and face authentication for a local machine
#[derive(Parser)]
#[command(name = "fg", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new user
    Register {
        /// Username (case-sensitive, unique)
        username: String,
        /// Email address for password resets
        email: String,
    },

    /// Log in with username and password
    Login {
        /// Username
        username: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Password reset code lifecycle
    Reset {
        #[command(subcommand)]
        command: reset::ResetCommands,
    },

    /// Face authentication
    Face {
        #[command(subcommand)]
        command: face::FaceCommands,
    },

    /// Show directory status and summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Register { username, email } => register::run(&username, &email),
        Commands::Login { username, json } => login::run(&username, json),
        Commands::Reset { command } => reset::run(command),
        Commands::Face { command } => face::run(command),
        Commands::Status { json } => status::run(json),
    }
}
