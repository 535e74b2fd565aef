//! Bot wiring between Matrix and the command core.
//!
//! This module provides the main [`Bot`] implementation. It connects the
//! Matrix sync loop to the [`Roller`]: every incoming text message is
//! inspected, `!roll` invocations are handed to the command core, and
//! everything else is ignored.
//!
//! # Command Processing Flow
//!
//! ```text
//! Matrix message → Roller::parse → Invocation → Roller::handle → reply
//! ```
//!
//! Each message is processed in its own tokio task so the sync loop never
//! blocks on membership lookups or delivery. A fresh random source is
//! created per invocation; outcomes carry no state across invocations.

use std::sync::Arc;

use log::error;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::{
    Args,
    commands::{Invocation, Roller},
    config::Config,
    matrix::{MatrixClient, UserCredentials},
    utils::get_path,
};

/// Context for processing one Matrix message.
struct MessageContext {
    /// The message body text
    body: String,
    /// The Matrix room ID where the message was sent
    room_id: String,
    /// The Matrix user ID who sent the message
    sender_id: String,
    /// Thread-safe reference to the Matrix client
    matrix_client: Arc<MatrixClient>,
    /// Thread-safe reference to the command handler
    roller: Arc<Roller>,
}

/// Main bot structure connecting Matrix messaging with the command core.
///
/// The bot owns the Matrix client and the [`Roller`]. The client plays two
/// roles: it is the invocation source (through its sync loop) and the
/// collaborator implementation the core delivers replies and resolves
/// memberships through.
///
/// # Examples
///
/// ```no_run
/// # use rollo::bot::Bot;
/// # use rollo::config::Config;
/// # use rollo::Args;
/// # async fn run(args: Args) -> Result<(), anyhow::Error> {
/// let config = Config::load("config.yaml")?;
/// let bot = Bot::new(config, &args).await?;
/// bot.start().await; // Runs until process termination
/// # Ok(())
/// # }
/// ```
pub struct Bot {
    /// Matrix client used for syncing, delivery and membership lookups.
    matrix_client: Arc<MatrixClient>,

    /// Command parser and outcome generator.
    ///
    /// Stateless apart from its message parser, safely shared across the
    /// per-message tasks.
    roller: Arc<Roller>,
}

impl Bot {
    /// Creates a new Bot instance from configuration and command line
    /// arguments.
    ///
    /// Connects to Matrix, restoring the previous session when one exists
    /// in the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the Matrix client cannot be created (login
    /// failure, network error, corrupted session).
    pub async fn new(config: Config, args: &Args) -> Result<Self, anyhow::Error> {
        let matrix_client = Arc::new(
            MatrixClient::new(
                &UserCredentials {
                    user_id: config.matrix.user_id,
                    password: config.matrix.password,
                    passphrase: config.matrix.passphrase,
                },
                &get_path(&args.data, "session"),
            )
            .await?,
        );

        let roller = Arc::new(Roller::new());

        Ok(Bot {
            matrix_client,
            roller,
        })
    }

    /// Starts the bot and processes messages until the process terminates.
    pub async fn start(self) {
        let matrix_client = Arc::clone(&self.matrix_client);
        let roller = Arc::clone(&self.roller);

        let on_message = move |body: String, room_id: String, sender_id: String| {
            let ctx = MessageContext {
                body,
                room_id,
                sender_id,
                matrix_client: Arc::clone(&matrix_client),
                roller: Arc::clone(&roller),
            };
            Self::handle_message(ctx)
        };

        if let Err(e) = self.matrix_client.sync(on_message).await {
            error!("matrix sync failed: {:?}", e);
        }
    }

    /// Handles one incoming Matrix message.
    ///
    /// Spawns a task so the sync loop keeps draining events while the
    /// invocation waits on membership lookups or delivery. Non-command
    /// messages return without doing anything.
    fn handle_message(ctx: MessageContext) {
        tokio::spawn(async move {
            // Not a !roll command, nothing to do
            let Some(args) = ctx.roller.parse(&ctx.body) else {
                return;
            };

            let invocation = Invocation {
                args,
                sender: ctx.sender_id,
                room_id: ctx.room_id,
            };

            // StdRng is used instead of thread_rng so the future stays Send
            let mut rng = StdRng::from_entropy();

            if let Err(e) = ctx
                .roller
                .handle(
                    &invocation,
                    ctx.matrix_client.as_ref(),
                    ctx.matrix_client.as_ref(),
                    &mut rng,
                )
                .await
            {
                error!("failed to process roll invocation: {:?}", e);
            }
        });
    }
}
