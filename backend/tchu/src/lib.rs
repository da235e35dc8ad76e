//! Rules engine of tCHu, a two-player rail-network board game on a map of
//! Switzerland.
//!
//! Game values are immutable: every transition returns a new value, and
//! invalid transitions return a [`error::RulesError`]. The [`manager::Manager`]
//! drives two [`player::Player`]s through whole games.

pub mod bag;
pub mod bot;
pub mod card;
pub mod card_state;
pub mod constants;
pub mod deck;
pub mod error;
pub mod game_phase;
pub mod game_state;
pub mod info;
pub mod manager;
pub mod map;
pub mod partition;
pub mod player;
pub mod player_state;
pub mod route;
pub mod station;
pub mod ticket;
pub mod trail;

#[macro_use]
extern crate lazy_static;
