//! Number roll generator.
//!
//! The default outcome for a plain `!roll` with no sub-command: a number
//! between 1 and 100, announced with the default avatar.

use log::debug;
use rand::Rng;

use crate::commands::{
    Invocation, Outcome, avatars, markdown_response::format_number_roll,
};

/// Rolls a number in `[1, 100]` for the invoking user.
pub fn handle_number<R: Rng>(invocation: &Invocation, rng: &mut R) -> Outcome {
    let value = rng.gen_range(1..=100);

    debug!("number roll for {}: {}", invocation.sender, value);

    Outcome {
        message: format_number_roll(&invocation.sender, value),
        avatar_url: avatars::default_avatar(),
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn create_invocation() -> Invocation {
        Invocation {
            args: vec![],
            sender: "@alice:example.com".to_string(),
            room_id: "!room:example.com".to_string(),
        }
    }

    #[test]
    fn test_handle_number_value_in_range() {
        let invocation = create_invocation();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..1000 {
            let outcome = handle_number(&invocation, &mut rng);
            let value: u32 = outcome
                .message
                .split('*')
                .nth(1)
                .expect("message contains a starred value")
                .parse()
                .expect("starred value is a number");
            assert!((1..=100).contains(&value));
        }
    }

    #[test]
    fn test_handle_number_message_shape() {
        let invocation = create_invocation();
        let mut rng = StdRng::seed_from_u64(7);

        let outcome = handle_number(&invocation, &mut rng);
        assert!(outcome.message.starts_with("@alice:example.com rolls *"));
        assert!(outcome.message.ends_with("* (1-100)"));
    }

    #[test]
    fn test_handle_number_pairs_message_with_avatar() {
        let invocation = create_invocation();
        let mut rng = StdRng::seed_from_u64(7);

        let outcome = handle_number(&invocation, &mut rng);
        assert!(!outcome.message.is_empty());
        assert_eq!(outcome.avatar_url, avatars::default_avatar());
    }
}
