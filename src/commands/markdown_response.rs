//! Markdown response formatters.
//!
//! Every user-visible string of the bot lives here, one function per
//! message, so the outcome generators stay free of string literals.

/// Formats the number roll announcement.
pub fn format_number_roll(user: &str, value: u32) -> String {
    format!("{} rolls *{}* (1-100)", user, value)
}

/// Formats the dice roll announcement.
pub fn format_dice_roll(user: &str, value: u32) -> String {
    format!("{} rolls *{}*", user, value)
}

/// Formats the coin flip announcement.
///
/// # Arguments
///
/// * `user` - The invoking user
/// * `face` - The face label, `head` or `tail`
pub fn format_coin_flip(user: &str, face: &str) -> String {
    format!("{} flips a coin... *{}*!", user, face)
}

/// Formats the blame announcement for the selected member.
pub fn format_blame(name: &str) -> String {
    format!("Everybody looks at @{}", name)
}

/// Formats the magic 8-ball answer.
///
/// The question is rendered in italics on the first line, the answer in
/// bold on the second.
pub fn format_eightball(user: &str, question: &str, answer: &str) -> String {
    format!(
        "{} asks: _{}_\nThe mighty ball replies: *{}*",
        user, question, answer
    )
}

/// Formats the usage notice listing the whole command surface.
///
/// Sent privately to the invoking user for unknown sub-commands and for
/// `8ball` without a question.
pub fn format_usage() -> String {
    "Wrong command: use `!roll` or `!roll d6|d20|coin|blame|8ball <question>`".to_owned()
}

/// Formats the notice sent when a blame draw finds an empty room.
pub fn format_no_one_to_blame() -> String {
    "There is no one to blame in this room.".to_owned()
}
