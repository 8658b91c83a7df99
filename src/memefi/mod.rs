// Memefi boss-fight bot.

pub mod boost;
pub mod boss;
pub mod client;
pub mod combo;
pub mod game;
pub mod model;
pub mod tap;
pub mod tap_bot;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{GraphqlClient, MemefiApi};
pub use game::MemefiBot;
