//! Rollo - A Matrix bot rolling dice, flipping coins, and consulting the
//! magic 8-ball.
//!
//! # Overview
//!
//! Rollo answers `!roll` commands in the Matrix rooms it is invited to.
//! Every invocation produces one randomized outcome, announced with a
//! message and a matching picture.
//!
//! # Bot Commands
//!
//! - `!roll` - Roll a number between 1 and 100
//! - `!roll d6` - Roll a six-sided die
//! - `!roll d20` - Roll a twenty-sided die
//! - `!roll coin` - Flip a coin
//! - `!roll blame` - Point at a random member of the room
//! - `!roll 8ball <question>` - Ask the magic 8-ball
//!
//! Invalid commands get a private usage notice instead of a room reply.
//!
//! # Configuration
//!
//! Create a `config.yaml` file with the Matrix account settings:
//!
//! ```yaml
//! matrix:
//!   user_id: "@rollo:matrix.org"
//!   password: "your-password"
//!   passphrase: "your-recovery-passphrase"
//! ```
//!
//! Any value can be overridden with a `ROLLO_`-prefixed environment
//! variable:
//!
//! ```bash
//! export ROLLO_MATRIX__PASSWORD="secret-from-env"
//! ```
//!
//! # Usage
//!
//! ```bash
//! rollo --config config.yaml --data ./rollo-data
//! ```
//!
//! # Architecture
//!
//! - [`bot`] - Wiring between the Matrix sync loop and the command core
//! - [`commands`] - Command parsing, outcome generation and formatting
//! - [`config`] - YAML configuration with environment variable overrides
//! - [`matrix`] - Matrix client, session persistence and synchronization
//! - [`utils`] - Path helpers
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (default: `info`)

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use crate::{bot::Bot, config::Config};

mod bot;
mod commands;
mod config;
mod matrix;
mod utils;

/// Command-line arguments for the Rollo bot.
///
/// Most configuration lives in the YAML file (see [`config::Config`]); the
/// command line only locates the file and the data directory.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file.
    ///
    /// The file holds the Matrix account credentials. See the [`config`]
    /// module for the expected format and the environment override scheme.
    #[arg(short, long)]
    config: String,

    /// Path to the directory for storing persistent data.
    ///
    /// Contains the Matrix session (authentication tokens, encryption
    /// keys). Treat it like a credential store: anyone with this data can
    /// impersonate the bot and decrypt its messages.
    #[arg(short, long)]
    data: String,
}

/// Main entry point for the Rollo bot.
///
/// Initializes logging, loads the configuration, connects to Matrix and
/// runs the sync loop until the process is terminated. Configuration and
/// connection failures are logged and abort startup.
#[tokio::main]
async fn main() {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("Starting rollo {}...", env!("CARGO_PKG_VERSION"));

    // Parse command line arguments
    let args = Args::parse();

    // Load configuration with environment variable overrides
    let config: Config = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config file: {}", e);
            return;
        }
    };

    // Launch bot
    let bot = match Bot::new(config, &args).await {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to initialize bot: {}", e);
            return;
        }
    };
    bot.start().await;
}
