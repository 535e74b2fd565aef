//! Avatar reference selection.
//!
//! The bot never fetches or validates images; it only computes which
//! reference belongs to an outcome. All references live under a fixed
//! raw-assets base URL, laid out as one directory per outcome family:
//!
//! ```text
//! assets/generic/default.png
//! assets/d6/d1.png .. d6.png
//! assets/d20/d1.png .. d20.png
//! assets/coin/head.png, tail.png
//! assets/8ball/affirmative.png, uncertain.png, negative.png
//! ```

use crate::commands::Die;
use crate::commands::actions::{CoinFace, Sentiment};

/// Base URL of the image assets shipped with the bot repository.
const ASSETS_BASE_URL: &str = "https://raw.githubusercontent.com/rollo-bot/rollo/main/assets";

/// Default avatar, used by the outcomes without a per-value image.
pub fn default_avatar() -> String {
    format!("{}/generic/default.png", ASSETS_BASE_URL)
}

/// Avatar showing the rolled face of a die. One reference per face value,
/// so a die with `f` faces has `f` possible references.
pub fn die_face(die: Die, value: u32) -> String {
    format!("{}/{}/d{}.png", ASSETS_BASE_URL, die.slug(), value)
}

/// Avatar showing a coin face. Exactly two references exist.
pub fn coin_face(face: CoinFace) -> String {
    format!("{}/coin/{}.png", ASSETS_BASE_URL, face.label())
}

/// Avatar for a magic 8-ball sentiment tier. Exactly three references exist.
pub fn sentiment(sentiment: Sentiment) -> String {
    format!("{}/8ball/{}.png", ASSETS_BASE_URL, sentiment.slug())
}
