//! Dice roll generator.
//!
//! Rolls one of the supported dice ([`Die::D6`], [`Die::D20`]). Unlike the
//! number roll, the avatar is picked per face value, so every result shows
//! the matching die picture.

use log::debug;
use rand::Rng;

use crate::commands::{
    Die, Invocation, Outcome, avatars, markdown_response::format_dice_roll,
};

/// Rolls the given die for the invoking user.
///
/// The value is uniform in `[1, faces]` and selects one of `faces` avatar
/// references for that die type.
pub fn handle_dice<R: Rng>(invocation: &Invocation, die: Die, rng: &mut R) -> Outcome {
    let value = rng.gen_range(1..=die.faces());

    debug!("{} roll for {}: {}", die.slug(), invocation.sender, value);

    Outcome {
        message: format_dice_roll(&invocation.sender, value),
        avatar_url: avatars::die_face(die, value),
    }
}
