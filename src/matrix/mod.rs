//! Matrix protocol integration for the bot.
//!
//! Everything Matrix-specific lives in this module: client setup with
//! end-to-end encryption, session persistence, the sync loop, and the
//! delivery/membership implementations the command core calls through its
//! collaborator traits.
//!
//! # Architecture
//!
//! The module is structured around [`client::MatrixClient`] which coordinates:
//! - **Encryption**: cross-signing and key management via the encryption submodule
//! - **Session**: login and session restoration via the session submodule
//! - **Sync**: real-time event handling via the sync submodule
//!
//! `MatrixClient` implements the core's
//! [`Notifier`](crate::commands::Notifier) and
//! [`RoomDirectory`](crate::commands::RoomDirectory) traits, so the command
//! core never depends on `matrix-sdk` types.

mod client;
mod encryption;
mod session;
mod sync;

pub use crate::matrix::client::MatrixClient;

/// User credentials for a Matrix account
#[derive(Debug, Clone)]
pub struct UserCredentials {
    /// User ID of the matrix account
    pub user_id: String,
    /// Password of the matrix account
    pub password: String,
    /// Passphrase to recover the matrix account secrets
    pub passphrase: String,
}
