//! Matrix synchronization and event handling.
//!
//! This module drives the sync loop of the bot: it catches up on events
//! received while offline, joins rooms on invitation, and forwards incoming
//! text messages to the command handler.

use anyhow::Result;
use std::sync::Arc;

use log::{error, info, warn};
use matrix_sdk::{
    Client, LoopCtrl, Room, RoomState,
    config::SyncSettings,
    ruma::{
        api::client::filter::FilterDefinition,
        events::room::{
            member::StrippedRoomMemberEvent,
            message::{MessageType, OriginalSyncRoomMessageEvent},
        },
    },
};
use tokio::time::{Duration, sleep};

use crate::matrix::session::MatrixSession;

/// Manages Matrix client synchronization and event processing.
///
/// Wraps a Matrix [`Client`] together with the session manager so sync
/// tokens survive restarts. Event handlers are registered lazily when
/// [`MatrixSync::sync`] is called.
pub struct MatrixSync {
    /// The matrix client
    client: Client,
    /// The matrix session
    session: MatrixSession,
}

impl MatrixSync {
    /// Creates a new MatrixSync instance.
    ///
    /// Does not start synchronizing; call [`MatrixSync::sync`] for that.
    pub fn new(client: &Client, session: &MatrixSession) -> Self {
        MatrixSync {
            client: client.to_owned(),
            session: session.to_owned(),
        }
    }

    /// Starts the synchronization loop.
    ///
    /// The sequence is:
    /// 1. Register the auto-join handler for room invitations
    /// 2. Run an initial sync, retried until it succeeds, to process events
    ///    received while the bot was offline
    /// 3. Register the message handler with the provided callback
    /// 4. Enter the continuous sync loop, persisting the token after each
    ///    successful sync
    ///
    /// The message handler only sees new messages: it is registered after
    /// the initial sync, so the bot never replays commands from the backlog.
    ///
    /// # Arguments
    ///
    /// * `on_message` - Callback invoked for each text message in a joined
    ///   room with `(body, room_id, sender_id)`
    ///
    /// # Errors
    ///
    /// Returns an error if the continuous sync loop fails. Token
    /// persistence errors are logged and do not stop the loop.
    pub async fn sync<F>(&self, on_message: F) -> Result<()>
    where
        F: Fn(String, String, String) + Send + Sync + 'static + Clone,
    {
        info!("start syncing");

        // Auto join rooms when invited
        self.client.add_event_handler(auto_join_rooms);

        // Enable room members lazy-loading
        // See <https://spec.matrix.org/v1.6/client-server-api/#lazy-loading-room-members>.
        let filter = FilterDefinition::with_lazy_loading();
        let mut sync_settings = SyncSettings::default().filter(filter.into());

        // Resume from the last sync token if the session has one
        if let Some(sync_token) = self.session.get_sync_token() {
            sync_settings = sync_settings.token(sync_token);
        }

        // Initial sync, mainly to pick up invitations received while offline
        let next_batch = loop {
            match self.client.sync_once(sync_settings.clone()).await {
                Ok(response) => break response.next_batch,
                Err(error) => {
                    error!("an error occurred during initial sync: {error}, retrying");
                }
            }
        };
        if let Err(err) = self.session.persist_sync_token(next_batch.clone()).await {
            error!("failed to persist sync token: {:?}", err);
        }
        sync_settings = sync_settings.token(next_batch);

        let on_message_arc = Arc::new(on_message);

        // Listen to incoming room messages. Registered after the initial
        // sync so only new messages are handled.
        self.client.add_event_handler({
            let on_message = Arc::clone(&on_message_arc);
            move |event: OriginalSyncRoomMessageEvent, room: Room| async move {
                on_room_message(event, room, &on_message).await
            }
        });

        self.client
            .sync_with_result_callback(sync_settings, |sync_result| async move {
                let response = sync_result?;

                // Persist the token each time to be able to restore the session
                if let Err(err) = self.session.persist_sync_token(response.next_batch).await {
                    error!("failed to persist sync token: {:?}", err);
                }

                Ok(LoopCtrl::Continue)
            })
            .await?;

        Ok(())
    }
}

/// Automatically joins rooms when the bot receives an invitation.
///
/// Joining right after the invite can race the server; failed joins are
/// retried with exponential backoff up to one hour.
/// See <https://github.com/matrix-org/synapse/issues/4345>.
async fn auto_join_rooms(room_member: StrippedRoomMemberEvent, client: Client, room: Room) {
    let Some(user_id) = client.user_id() else {
        warn!("could not get user id from client");
        return;
    };

    // Ignore if the invite is not for us
    if room_member.state_key != user_id {
        return;
    }

    tokio::spawn(async move {
        info!("auto joining room {}", room.room_id());
        let mut delay = 2;

        while let Err(err) = room.join().await {
            error!(
                "failed to join room {} ({err:?}), retrying in {delay}s",
                room.room_id()
            );

            sleep(Duration::from_secs(delay)).await;
            delay *= 2;

            if delay > 3600 {
                error!("can't join room {} ({err:?})", room.room_id());
                return;
            }
        }
        info!("successfully joined room {}", room.room_id());
    });
}

/// Forwards a room message to the user callback.
///
/// Messages from non-joined rooms and non-text messages (images, files,
/// etc.) are silently ignored.
async fn on_room_message<F>(event: OriginalSyncRoomMessageEvent, room: Room, on_message: &Arc<F>)
where
    F: Fn(String, String, String) + Send + Sync + 'static,
{
    if room.state() != RoomState::Joined {
        return;
    }

    // Only handle text messages
    let MessageType::Text(text_content) = event.content.msgtype else {
        return;
    };

    on_message(
        text_content.body,
        room.room_id().to_string(),
        event.sender.to_string(),
    );
}
