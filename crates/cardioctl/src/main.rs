//! CardioIntelli control CLI.
//!
//! Records cardiovascular vitals readings and presents the risk
//! assessment produced by the core pipeline.

mod commands;

use anyhow::Result;
use cardio_core::types::Gender;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cardioctl")]
#[command(about = "CardioIntelli - cardiovascular risk tracking", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new user and log in
    Register {
        username: String,

        /// Age in years
        #[arg(long)]
        age: u32,

        /// Gender (male/female/other)
        #[arg(long)]
        gender: Gender,
    },

    /// Log in as an existing user
    Login { username: String },

    /// Log out of the current session
    Logout,

    /// Show the currently logged-in user
    Whoami,

    /// Submit a new vitals reading and get a risk assessment
    Submit {
        /// Age in years (defaults to the profile age)
        #[arg(long)]
        age: Option<u32>,

        /// Gender (defaults to the profile gender)
        #[arg(long)]
        gender: Option<Gender>,

        /// Heart rate in BPM
        #[arg(long)]
        heart_rate: u32,

        /// Systolic blood pressure in mmHg
        #[arg(long)]
        systolic: u32,

        /// Diastolic blood pressure in mmHg
        #[arg(long)]
        diastolic: u32,
    },

    /// Show historical readings
    History,

    /// Show the risk threshold reference table
    Thresholds,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Register {
            username,
            age,
            gender,
        } => commands::register(&username, age, gender),
        Commands::Login { username } => commands::login(&username),
        Commands::Logout => commands::logout(),
        Commands::Whoami => commands::whoami(),
        Commands::Submit {
            age,
            gender,
            heart_rate,
            systolic,
            diastolic,
        } => commands::submit(age, gender, heart_rate, systolic, diastolic).await,
        Commands::History => commands::history(),
        Commands::Thresholds => commands::thresholds(),
    }
}
