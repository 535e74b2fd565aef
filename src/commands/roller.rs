//! Invocation orchestration.
//!
//! This module provides the [`Roller`] struct, the entry point of the
//! command core. It recognizes `!roll` messages, dispatches them to the
//! outcome generators and delivers the reply through the host collaborators.
//!
//! # Flow
//!
//! ```text
//! Matrix message → parse() → argument tokens → handle() → Notifier
//! ```
//!
//! Every handled invocation produces exactly one reply: either a broadcast
//! outcome, or a private notice when the arguments are invalid or the room
//! has no one to blame.

use command_parser::Parser;
use log::debug;
use rand::Rng;

use crate::commands::{
    Invocation, Notifier, RollCommand, RoomDirectory,
    actions::{handle_blame, handle_coin, handle_dice, handle_eightball, handle_number},
    markdown_response::{format_no_one_to_blame, format_usage},
};

/// Orchestrator for `!roll` invocations.
///
/// The Roller is stateless apart from its message parser and can be shared
/// freely across tasks. Randomness is injected per call so deterministic
/// sequences can be supplied in tests.
pub struct Roller {
    /// Message parser for the `!`-prefixed command surface
    parser: Parser,
}

impl Roller {
    /// Creates a new Roller with a parser recognizing `!` as the command
    /// prefix and `-` as the option prefix.
    pub fn new() -> Self {
        let parser = Parser::new('!', '-');
        Roller { parser }
    }

    /// Extracts the argument tokens of a `!roll` invocation from a message
    /// body.
    ///
    /// Returns `None` for anything that is not a `!roll` command: regular
    /// chat messages, malformed commands and commands addressed to another
    /// bot. Those messages must be ignored silently.
    ///
    /// # Examples
    ///
    /// ```
    /// # use rollo::commands::Roller;
    /// let roller = Roller::new();
    /// assert_eq!(roller.parse("!roll d6"), Some(vec!["d6".to_string()]));
    /// assert_eq!(roller.parse("hello there"), None);
    /// ```
    pub fn parse(&self, body: &str) -> Option<Vec<String>> {
        // The parser ignores the last word of its input, so a dummy word is
        // appended to keep the real arguments intact
        let body = body.to_string() + " dummy";

        // Failing to parse is the normal case for non-command messages
        let command = self.parser.parse(&body).ok()?;

        // Ignore commands addressed to other bots
        if command.name != "roll" {
            return None;
        }

        debug!("parsed roll invocation: {:?}", command.arguments);

        Some(command.arguments)
    }

    /// Processes one invocation end to end.
    ///
    /// Dispatches the argument tokens, runs the matching generator and hands
    /// the reply to the notifier. Invalid arguments and the empty-room blame
    /// case turn into a private notice to the sender; they are not errors.
    ///
    /// # Arguments
    ///
    /// * `invocation` - The command event to process
    /// * `directory` - Membership lookup, consulted by the blame generator only
    /// * `notifier` - Reply delivery
    /// * `rng` - Random source used for the outcome draw
    ///
    /// # Errors
    ///
    /// Any failure from the directory or the notifier is returned unchanged.
    /// The core does not retry.
    pub async fn handle<D, N, R>(
        &self,
        invocation: &Invocation,
        directory: &D,
        notifier: &N,
        rng: &mut R,
    ) -> Result<(), anyhow::Error>
    where
        D: RoomDirectory,
        N: Notifier,
        R: Rng,
    {
        let command = match RollCommand::from_args(&invocation.args) {
            Ok(command) => command,
            Err(error) => {
                debug!(
                    "rejected roll arguments {:?}: {:?}",
                    invocation.args, error
                );
                return notifier
                    .notify_user(&invocation.room_id, &invocation.sender, &format_usage())
                    .await;
            }
        };

        let outcome = match command {
            RollCommand::Number => handle_number(invocation, rng),
            RollCommand::Dice(die) => handle_dice(invocation, die, rng),
            RollCommand::Coin => handle_coin(invocation, rng),
            RollCommand::EightBall(question) => handle_eightball(invocation, &question, rng),
            RollCommand::Blame => {
                let members = directory.get_members(&invocation.room_id).await?;
                match handle_blame(&members, rng) {
                    Some(outcome) => outcome,
                    // Nobody to point at in an empty room
                    None => {
                        return notifier
                            .notify_user(
                                &invocation.room_id,
                                &invocation.sender,
                                &format_no_one_to_blame(),
                            )
                            .await;
                    }
                }
            }
        };

        notifier.broadcast(&invocation.room_id, &outcome).await
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::commands::{Member, MockNotifier, MockRoomDirectory};

    fn create_invocation(tokens: &[&str]) -> Invocation {
        Invocation {
            args: tokens.iter().map(ToString::to_string).collect(),
            sender: "@alice:example.com".to_string(),
            room_id: "!room:example.com".to_string(),
        }
    }

    fn create_rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_parse_no_arguments() {
        let roller = Roller::new();
        assert_eq!(roller.parse("!roll"), Some(vec![]));
    }

    #[test]
    fn test_parse_with_arguments() {
        let roller = Roller::new();
        assert_eq!(
            roller.parse("!roll 8ball will it rain"),
            Some(vec![
                "8ball".to_string(),
                "will".to_string(),
                "it".to_string(),
                "rain".to_string()
            ])
        );
    }

    #[test]
    fn test_parse_not_a_command() {
        let roller = Roller::new();
        assert_eq!(roller.parse("This is just a regular message"), None);
    }

    #[test]
    fn test_parse_other_bot() {
        let roller = Roller::new();
        assert_eq!(roller.parse("!other_bot d6"), None);
    }

    #[tokio::test]
    async fn test_handle_number_broadcasts_once() {
        let roller = Roller::new();
        let invocation = create_invocation(&[]);
        let directory = MockRoomDirectory::new();

        let mut notifier = MockNotifier::new();
        notifier
            .expect_broadcast()
            .withf(|room_id, outcome| {
                room_id == "!room:example.com"
                    && outcome.message.contains("@alice:example.com rolls")
                    && !outcome.avatar_url.is_empty()
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let result = roller
            .handle(&invocation, &directory, &notifier, &mut create_rng())
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_handle_dice_broadcasts_once() {
        let roller = Roller::new();
        let invocation = create_invocation(&["d6"]);
        let directory = MockRoomDirectory::new();

        let mut notifier = MockNotifier::new();
        notifier
            .expect_broadcast()
            .withf(|_, outcome| outcome.avatar_url.contains("/d6/"))
            .times(1)
            .returning(|_, _| Ok(()));

        let result = roller
            .handle(&invocation, &directory, &notifier, &mut create_rng())
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_handle_unknown_subcommand_notifies_sender() {
        let roller = Roller::new();
        let invocation = create_invocation(&["foo"]);
        let directory = MockRoomDirectory::new();

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify_user()
            .withf(|room_id, user_id, body| {
                room_id == "!room:example.com"
                    && user_id == "@alice:example.com"
                    && body.contains("Wrong command")
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let result = roller
            .handle(&invocation, &directory, &notifier, &mut create_rng())
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_handle_eightball_without_question_notifies_sender() {
        let roller = Roller::new();
        let invocation = create_invocation(&["8ball"]);
        let directory = MockRoomDirectory::new();

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify_user()
            .withf(|_, _, body| body.contains("Wrong command"))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let result = roller
            .handle(&invocation, &directory, &notifier, &mut create_rng())
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_handle_blame_broadcasts_a_member() {
        let roller = Roller::new();
        let invocation = create_invocation(&["blame"]);

        let mut directory = MockRoomDirectory::new();
        directory
            .expect_get_members()
            .with(mockall::predicate::eq("!room:example.com"))
            .times(1)
            .returning(|_| {
                Ok(vec![Member {
                    user_id: "@bob:example.com".to_string(),
                    name: "Bob".to_string(),
                }])
            });

        let mut notifier = MockNotifier::new();
        notifier
            .expect_broadcast()
            .withf(|_, outcome| outcome.message == "Everybody looks at @Bob")
            .times(1)
            .returning(|_, _| Ok(()));

        let result = roller
            .handle(&invocation, &directory, &notifier, &mut create_rng())
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_handle_blame_empty_room_notifies_sender() {
        let roller = Roller::new();
        let invocation = create_invocation(&["blame"]);

        let mut directory = MockRoomDirectory::new();
        directory
            .expect_get_members()
            .times(1)
            .returning(|_| Ok(vec![]));

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify_user()
            .withf(|_, user_id, body| {
                user_id == "@alice:example.com" && body.contains("no one to blame")
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let result = roller
            .handle(&invocation, &directory, &notifier, &mut create_rng())
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_handle_blame_directory_error_propagates() {
        let roller = Roller::new();
        let invocation = create_invocation(&["blame"]);

        let mut directory = MockRoomDirectory::new();
        directory
            .expect_get_members()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("membership lookup failed")));

        let notifier = MockNotifier::new();

        let result = roller
            .handle(&invocation, &directory, &notifier, &mut create_rng())
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_handle_delivery_error_propagates() {
        let roller = Roller::new();
        let invocation = create_invocation(&["coin"]);
        let directory = MockRoomDirectory::new();

        let mut notifier = MockNotifier::new();
        notifier
            .expect_broadcast()
            .times(1)
            .returning(|_, _| Err(anyhow::anyhow!("delivery failed")));

        let result = roller
            .handle(&invocation, &directory, &notifier, &mut create_rng())
            .await;
        assert!(result.is_err());
    }
}
