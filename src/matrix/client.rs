//! Matrix client wrapper for bot messaging and synchronization.
//!
//! This module provides the high-level [`MatrixClient`] used by the rest of
//! the bot. It wraps the Matrix SDK client, drives synchronization, and
//! implements the command core's collaborator traits:
//!
//! - [`Notifier`]: room broadcasts and private notices
//! - [`RoomDirectory`]: joined-member lookup for the blame outcome

use anyhow::anyhow;
use log::{debug, error, info};
use matrix_sdk::{
    Client, RoomMemberships,
    ruma::{RoomId, UserId, events::room::message::RoomMessageEventContent},
};

use crate::commands::{Member, Notifier, Outcome, RoomDirectory};
use crate::matrix::{
    UserCredentials, encryption::setup_client, session::MatrixSession, sync::MatrixSync,
};

/// High-level Matrix client for the bot.
///
/// Manages an authenticated Matrix SDK client with synchronization
/// capabilities. Delivery and membership lookups are exposed through the
/// [`Notifier`] and [`RoomDirectory`] trait implementations rather than as
/// inherent methods, so the command core can be tested against mocks.
pub struct MatrixClient {
    /// Synchronization service for handling real-time events
    matrix_sync: MatrixSync,
    /// Underlying Matrix SDK client
    client: Client,
}

impl MatrixClient {
    /// Creates and initializes a new Matrix client.
    ///
    /// Restores the previous session from the session path when one exists,
    /// performs a fresh login with full encryption setup otherwise, then
    /// sets the bot's display name.
    ///
    /// # Arguments
    ///
    /// * `user_credentials` - User ID, password and recovery passphrase
    /// * `session_path` - Directory for session data and the SQLite store
    ///
    /// # Errors
    ///
    /// Returns an error if session loading, login or the encryption setup
    /// fails.
    pub async fn new(
        user_credentials: &UserCredentials,
        session_path: &str,
    ) -> Result<Self, anyhow::Error> {
        let matrix_session = MatrixSession::new(session_path)
            .await
            .map_err(|e| anyhow!("failed to create matrix session: {:?}", e))?;

        let client = setup_client(user_credentials, &matrix_session)
            .await
            .map_err(|e| anyhow!("failed to setup matrix client: {:?}", e))?;

        client.account().set_display_name(Some("Rollo")).await?;

        let matrix_sync = MatrixSync::new(&client, &matrix_session);

        Ok(MatrixClient {
            matrix_sync,
            client,
        })
    }

    /// Starts the Matrix synchronization loop.
    ///
    /// Invokes the provided callback for each incoming text message in a
    /// joined room. The loop runs until the process terminates; invitations
    /// are joined automatically and sync tokens are persisted for
    /// continuity.
    ///
    /// # Arguments
    ///
    /// * `on_message` - Callback invoked with `(body, room_id, sender_id)`
    ///   for each text message
    pub async fn sync<F>(&self, on_message: F) -> Result<(), anyhow::Error>
    where
        F: Fn(String, String, String) + Send + Sync + 'static + Clone,
    {
        match self.matrix_sync.sync(on_message).await {
            Ok(_) => info!("matrix sync ended successfully"),
            Err(e) => error!("matrix sync ended with error: {:?}", e),
        }

        Ok(())
    }

    /// Resolves a room the client has already seen.
    fn get_room(&self, room_id: &str) -> Result<matrix_sdk::Room, anyhow::Error> {
        let room_id = RoomId::parse(room_id)?;
        self.client
            .get_room(&room_id)
            .ok_or_else(|| anyhow!("unknown room {}", room_id))
    }
}

impl Notifier for MatrixClient {
    /// Sends the outcome to the room as a markdown message.
    ///
    /// The avatar reference is rendered as an inline image above the text.
    /// Every outcome goes out as its own room event, so clients display each
    /// reply separately.
    async fn broadcast(&self, room_id: &str, outcome: &Outcome) -> Result<(), anyhow::Error> {
        let room = self.get_room(room_id)?;

        let body = format!("![avatar]({})\n\n{}", outcome.avatar_url, outcome.message);
        room.send(RoomMessageEventContent::text_markdown(body))
            .await?;

        Ok(())
    }

    /// Sends a notice visible only to the given user.
    ///
    /// Matrix has no ephemeral room messages, so the notice goes to the
    /// direct-message room with the user, created on first use.
    async fn notify_user(
        &self,
        room_id: &str,
        user_id: &str,
        body: &str,
    ) -> Result<(), anyhow::Error> {
        debug!("private notice for {} (invoked in {})", user_id, room_id);

        let user_id = UserId::parse(user_id)?;
        let dm_room = match self.client.get_dm_room(&user_id) {
            Some(room) => room,
            None => self.client.create_dm(&user_id).await?,
        };

        dm_room
            .send(RoomMessageEventContent::notice_markdown(body))
            .await?;

        Ok(())
    }
}

impl RoomDirectory for MatrixClient {
    /// Returns the joined members of the room.
    ///
    /// Member names are the display names when set, the localpart of the
    /// user ID otherwise.
    async fn get_members(&self, room_id: &str) -> Result<Vec<Member>, anyhow::Error> {
        let room = self.get_room(room_id)?;
        let members = room.members(RoomMemberships::JOIN).await?;

        debug!("room {} has {} joined members", room_id, members.len());

        Ok(members
            .iter()
            .map(|member| Member {
                user_id: member.user_id().to_string(),
                name: member
                    .display_name()
                    .map(ToOwned::to_owned)
                    .unwrap_or_else(|| member.user_id().localpart().to_owned()),
            })
            .collect())
    }
}
