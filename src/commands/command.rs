//! Sub-command definitions and token dispatch.
//!
//! This module converts the argument tokens of a `!roll` invocation into a
//! structured [`RollCommand`] so that the unhandled-token case is a parse
//! error instead of a runtime branch fallthrough.

use log::debug;

/// A die type the bot knows how to roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Die {
    /// Six-sided die
    D6,
    /// Twenty-sided die
    D20,
}

impl Die {
    /// Number of faces of the die.
    pub fn faces(self) -> u32 {
        match self {
            Die::D6 => 6,
            Die::D20 => 20,
        }
    }

    /// Short name of the die, as used in the command surface and in the
    /// asset directory layout (`d6`, `d20`).
    pub fn slug(self) -> &'static str {
        match self {
            Die::D6 => "d6",
            Die::D20 => "d20",
        }
    }
}

/// A parsed `!roll` sub-command.
///
/// Exactly one variant per outcome generator. Dispatch is an exhaustive
/// match, so adding a variant forces every caller to handle it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollCommand {
    /// Roll a number between 1 and 100 (no sub-command given)
    Number,
    /// Roll a die with the given number of faces
    Dice(Die),
    /// Flip a coin
    Coin,
    /// Point at a random member of the room
    Blame,
    /// Ask the magic 8-ball a question
    ///
    /// # Fields
    ///
    /// * `String` - The question, tokens joined with single spaces
    EightBall(String),
}

/// Errors produced by sub-command dispatch.
///
/// Both variants lead to the same usage notice; they are kept separate so
/// tests can pin down which rule rejected the invocation.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandParseError {
    /// The first token is not a recognized sub-command
    UnknownSubcommand,
    /// `8ball` was invoked without a question
    MissingQuestion,
}

impl RollCommand {
    /// Maps an ordered argument token list to a sub-command.
    ///
    /// An empty list is the plain `!roll` invocation and rolls a number.
    /// The question handed to [`RollCommand::EightBall`] is rebuilt from the
    /// tokens after the `8ball` keyword, never by trimming a prefix from the
    /// joined string, so it cannot drift out of sync with the keyword.
    ///
    /// # Arguments
    ///
    /// * `args` - Argument tokens following the `!roll` keyword
    ///
    /// # Errors
    ///
    /// * [`CommandParseError::UnknownSubcommand`] - First token is not one of
    ///   `d6`, `d20`, `coin`, `blame`, `8ball`
    /// * [`CommandParseError::MissingQuestion`] - `8ball` with nothing after it
    ///
    /// # Examples
    ///
    /// ```
    /// # use rollo::commands::{Die, RollCommand};
    /// let args = vec!["d20".to_string()];
    /// assert_eq!(RollCommand::from_args(&args), Ok(RollCommand::Dice(Die::D20)));
    /// ```
    pub fn from_args(args: &[String]) -> Result<Self, CommandParseError> {
        if args.is_empty() {
            return Ok(RollCommand::Number);
        }

        debug!("dispatching roll arguments: {:?}", args);

        match args[0].as_str() {
            "d6" => Ok(RollCommand::Dice(Die::D6)),
            "d20" => Ok(RollCommand::Dice(Die::D20)),
            "coin" => Ok(RollCommand::Coin),
            "blame" => Ok(RollCommand::Blame),
            "8ball" => Ok(RollCommand::EightBall(Self::parse_question(args)?)),
            _ => Err(CommandParseError::UnknownSubcommand),
        }
    }

    fn parse_question(args: &[String]) -> Result<String, CommandParseError> {
        // 2 tokens minimum: the 8ball keyword and at least one question word
        if args.len() < 2 {
            return Err(CommandParseError::MissingQuestion);
        }

        Ok(args[1..].join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_from_args_empty_rolls_number() {
        let result = RollCommand::from_args(&[]);
        assert_eq!(result, Ok(RollCommand::Number));
    }

    #[test]
    fn test_from_args_d6() {
        let result = RollCommand::from_args(&args(&["d6"]));
        assert_eq!(result, Ok(RollCommand::Dice(Die::D6)));
    }

    #[test]
    fn test_from_args_d20() {
        let result = RollCommand::from_args(&args(&["d20"]));
        assert_eq!(result, Ok(RollCommand::Dice(Die::D20)));
    }

    #[test]
    fn test_from_args_coin() {
        let result = RollCommand::from_args(&args(&["coin"]));
        assert_eq!(result, Ok(RollCommand::Coin));
    }

    #[test]
    fn test_from_args_blame() {
        let result = RollCommand::from_args(&args(&["blame"]));
        assert_eq!(result, Ok(RollCommand::Blame));
    }

    #[test]
    fn test_from_args_eightball_recovers_question() {
        let result = RollCommand::from_args(&args(&["8ball", "will", "it", "rain"]));
        assert_eq!(
            result,
            Ok(RollCommand::EightBall("will it rain".to_string()))
        );
    }

    #[test]
    fn test_from_args_eightball_single_word_question() {
        let result = RollCommand::from_args(&args(&["8ball", "really?"]));
        assert_eq!(result, Ok(RollCommand::EightBall("really?".to_string())));
    }

    #[test]
    fn test_from_args_eightball_without_question() {
        let result = RollCommand::from_args(&args(&["8ball"]));
        assert_eq!(result, Err(CommandParseError::MissingQuestion));
    }

    #[test]
    fn test_from_args_unknown_subcommand() {
        let result = RollCommand::from_args(&args(&["foo"]));
        assert_eq!(result, Err(CommandParseError::UnknownSubcommand));
    }

    #[test]
    fn test_from_args_unknown_die_size() {
        let result = RollCommand::from_args(&args(&["d12"]));
        assert_eq!(result, Err(CommandParseError::UnknownSubcommand));
    }

    #[test]
    fn test_die_faces() {
        assert_eq!(Die::D6.faces(), 6);
        assert_eq!(Die::D20.faces(), 20);
    }

    #[test]
    fn test_die_slug() {
        assert_eq!(Die::D6.slug(), "d6");
        assert_eq!(Die::D20.slug(), "d20");
    }
}
