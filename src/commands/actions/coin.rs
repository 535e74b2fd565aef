//! Coin flip generator.

use log::debug;
use rand::Rng;

use crate::commands::{
    Invocation, Outcome, avatars, markdown_response::format_coin_flip,
};

/// The two faces of the coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinFace {
    Head,
    Tail,
}

impl CoinFace {
    /// Face label as shown in the message and in the asset file name.
    pub fn label(self) -> &'static str {
        match self {
            CoinFace::Head => "head",
            CoinFace::Tail => "tail",
        }
    }
}

/// Flips a coin for the invoking user.
pub fn handle_coin<R: Rng>(invocation: &Invocation, rng: &mut R) -> Outcome {
    let face = if rng.gen_bool(0.5) {
        CoinFace::Head
    } else {
        CoinFace::Tail
    };

    debug!("coin flip for {}: {}", invocation.sender, face.label());

    Outcome {
        message: format_coin_flip(&invocation.sender, face.label()),
        avatar_url: avatars::coin_face(face),
    }
}
