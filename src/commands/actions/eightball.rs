//! Magic 8-ball generator.
//!
//! Draws one of the twenty classic answers and pairs it with an avatar
//! matching the sentiment of the draw.

use log::debug;
use rand::Rng;

use crate::commands::{
    Invocation, Outcome, avatars, markdown_response::format_eightball,
};

/// The twenty classic answers, in canonical order: ten affirmative, five
/// non-committal, five negative. The [`Sentiment`] tiers depend on this
/// ordering.
static ANSWERS: [&str; 20] = [
    "It is certain.",
    "It is decidedly so.",
    "Without a doubt.",
    "Yes definitely.",
    "You may rely on it.",
    "As I see it, yes.",
    "Most likely.",
    "Outlook good.",
    "Yes.",
    "Signs point to yes.",
    "Reply hazy, try again.",
    "Ask again later.",
    "Better not tell you now.",
    "Cannot predict now.",
    "Concentrate and ask again.",
    "Don't count on it.",
    "My reply is no.",
    "My sources say no.",
    "Outlook not so good.",
    "Very doubtful.",
];

/// Coarse sentiment of an answer, used to pick the avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Affirmative,
    Uncertain,
    Negative,
}

impl Sentiment {
    /// Tier of the answer at the given index of the table.
    ///
    /// The tiers are ordinal on the index, matching the canonical ordering
    /// of the table: `[0, 9]` affirmative, `[10, 14]` uncertain, `[15, 19]`
    /// negative.
    pub fn of_index(index: usize) -> Self {
        match index {
            0..=9 => Sentiment::Affirmative,
            10..=14 => Sentiment::Uncertain,
            _ => Sentiment::Negative,
        }
    }

    /// Tier name as used in the asset directory layout.
    pub fn slug(self) -> &'static str {
        match self {
            Sentiment::Affirmative => "affirmative",
            Sentiment::Uncertain => "uncertain",
            Sentiment::Negative => "negative",
        }
    }
}

/// Answers the question with a uniformly drawn entry of the table.
pub fn handle_eightball<R: Rng>(
    invocation: &Invocation,
    question: &str,
    rng: &mut R,
) -> Outcome {
    let index = rng.gen_range(0..ANSWERS.len());
    let sentiment = Sentiment::of_index(index);

    debug!(
        "8ball answer {} ({:?}) for {}",
        index, sentiment, invocation.sender
    );

    Outcome {
        message: format_eightball(&invocation.sender, question, ANSWERS[index]),
        avatar_url: avatars::sentiment(sentiment),
    }
}
