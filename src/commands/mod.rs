//! Command parsing, outcome generation and response formatting.
//!
//! This module is the heart of the bot: it turns a `!roll` message into a
//! randomized outcome and hands the formatted reply to the host for delivery.
//!
//! # Overview
//!
//! Processing happens in two phases:
//!
//! 1. **Parsing** - [`Roller::parse`] decides whether a message body is a
//!    `!roll` invocation at all and extracts its argument tokens
//! 2. **Handling** - [`Roller::handle`] dispatches the tokens to one of the
//!    outcome generators and delivers exactly one reply per invocation
//!
//! # Command Structure
//!
//! All commands follow the format: `!roll [subcommand] [args...]`
//!
//! | Command | Outcome |
//! |---------|---------|
//! | *(none)* | Random number between 1 and 100 |
//! | `d6` | Six-sided die roll |
//! | `d20` | Twenty-sided die roll |
//! | `coin` | Coin flip (head or tail) |
//! | `blame` | Random member of the room |
//! | `8ball <question>` | Magic 8-ball answer to the question |
//!
//! Anything else, including `8ball` without a question, earns the sender a
//! private usage notice instead of a room reply.
//!
//! # Collaborators
//!
//! The core never talks to Matrix directly. Delivery goes through the
//! [`Notifier`] trait and room membership lookup through the
//! [`RoomDirectory`] trait; both are implemented by the host and mocked in
//! tests.
//!
//! # Module Organization
//!
//! - [`roller`] - Orchestrator routing invocations to generators
//! - [`command`] - Sub-command enum and token dispatch
//! - [`actions`] - One generator per sub-command
//! - [`markdown_response`] - User-visible message strings
//! - [`avatars`] - Image-reference selection for each outcome

use mockall::automock;

mod actions;
mod avatars;
mod command;
mod markdown_response;
mod roller;

pub use crate::commands::command::{CommandParseError, Die, RollCommand};
pub use crate::commands::roller::Roller;

/// One user-issued `!roll` command event.
///
/// Carries everything a generator needs: the argument tokens (without the
/// `!roll` keyword itself), the Matrix user ID of the sender, and the room
/// the command was issued in. Invocations are immutable once built.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Argument tokens following the `!roll` keyword, in order
    pub args: Vec<String>,
    /// Matrix user ID of the invoking user
    pub sender: String,
    /// Matrix room ID where the command was issued
    pub room_id: String,
}

/// A randomized result paired with its presentation.
///
/// Every generator produces the message text and the avatar reference
/// together in a single call; neither ever exists without the other. The
/// outcome is handed to the [`Notifier`] and then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Markdown-formatted message announcing the result
    pub message: String,
    /// URL of the image shown next to the message
    pub avatar_url: String,
}

/// A member of a Matrix room, as reported by the [`RoomDirectory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Fully qualified Matrix user ID
    pub user_id: String,
    /// Display name, falling back to the localpart of the user ID
    pub name: String,
}

/// Room membership lookup, provided by the host.
///
/// The blame generator is the only caller; membership is fetched on demand
/// and never cached by the core.
#[automock]
pub trait RoomDirectory {
    /// Returns the current members of a room. May be empty.
    async fn get_members(&self, room_id: &str) -> Result<Vec<Member>, anyhow::Error>;
}

/// Reply delivery, provided by the host.
///
/// Both methods are awaited once per invocation at most; failures propagate
/// unchanged to the caller, the core neither retries nor suppresses them.
#[automock]
pub trait Notifier {
    /// Broadcasts an outcome to the room. Each outcome renders as its own
    /// message, never merged with adjacent ones.
    async fn broadcast(&self, room_id: &str, outcome: &Outcome) -> Result<(), anyhow::Error>;
    /// Sends a notice visible only to the given user.
    async fn notify_user(
        &self,
        room_id: &str,
        user_id: &str,
        body: &str,
    ) -> Result<(), anyhow::Error>;
}
