//! Outcome generators.
//!
//! One generator per sub-command. Each generator draws from the injected
//! random source and returns an [`Outcome`](crate::commands::Outcome) whose
//! message and avatar reference are built together, in a single call.
//!
//! # Generator Pattern
//!
//! Generators are plain synchronous functions over `&mut impl Rng`; the only
//! asynchronous step in the pipeline, the membership lookup for blame, is
//! performed by the caller so [`handle_blame`] stays a pure selection over
//! the supplied member list.
//!
//! # Available Generators
//!
//! - [`handle_number`] - Number between 1 and 100
//! - [`handle_dice`] - Die roll with a per-face avatar
//! - [`handle_coin`] - Coin flip
//! - [`handle_blame`] - Random room member
//! - [`handle_eightball`] - Magic 8-ball answer with a sentiment avatar

mod blame;
mod coin;
mod dice;
mod eightball;
mod number;

pub use crate::commands::actions::{
    blame::handle_blame, coin::CoinFace, coin::handle_coin, dice::handle_dice,
    eightball::Sentiment, eightball::handle_eightball, number::handle_number,
};
