//! Blame generator.
//!
//! Picks a random member of the invoking room. The membership list is
//! fetched by the caller through the
//! [`RoomDirectory`](crate::commands::RoomDirectory) collaborator; this
//! generator is a pure selection over the list it is given.

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::commands::{Member, Outcome, avatars, markdown_response::format_blame};

/// Points at a uniformly chosen member of the room.
///
/// Returns `None` when the member list is empty; the caller answers with a
/// private notice in that case instead of drawing over nothing.
pub fn handle_blame<R: Rng>(members: &[Member], rng: &mut R) -> Option<Outcome> {
    let who = members.choose(rng)?;

    debug!("blame landed on {}", who.user_id);

    Some(Outcome {
        message: format_blame(&who.name),
        avatar_url: avatars::default_avatar(),
    })
}
