use crate::game_state::PlayerId;

use thiserror::Error;

/// Broken preconditions of the rules engine.
///
/// These are never part of normal play: they mean the caller (usually a
/// [`crate::player::Player`] implementation, or the code driving the
/// engine) asked for something the rules can't express. Legal-but-failed
/// moves, such as a route the player can't afford, are reported as plain
/// values instead.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RulesError {
    #[error("Cannot take a card from an empty deck.")]
    EmptyDeck,

    #[error("Requested {count} cards, but the deck holds {size}.")]
    CountOutOfRange { count: usize, size: usize },

    #[error("Face-up slot {0} does not exist.")]
    SlotOutOfRange(usize),

    #[error("A deck of {size} cards is too small, at least {required} are needed.")]
    DeckTooSmall { size: usize, required: usize },

    #[error("Cannot recreate the deck from the discards while it still holds {0} cards.")]
    DeckNotEmpty(usize),

    #[error("Route {0} is not a tunnel.")]
    NotATunnel(String),

    #[error("Exactly 3 cards must be drawn to claim a tunnel, but {0} were drawn.")]
    InvalidDrawnCardsCount(usize),

    #[error("Cannot ask for {0} additional cards, only 1 to 3 are possible.")]
    InvalidAdditionalCardsCount(usize),

    #[error("Initial claim cards must be non-empty and use at most two kinds of cards.")]
    InvalidInitialClaimCards,

    #[error("Route {route} needs {length} cars, but only {cars} are left.")]
    NotEnoughCars { route: String, length: u8, cars: u8 },

    #[error("The given cards are not all in the player's hand.")]
    CardsNotInHand,

    #[error("{0} already holds tickets.")]
    TicketsAlreadyChosen(PlayerId),

    #[error("Kept tickets must be part of the tickets drawn.")]
    TicketsNotOffered,

    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    #[error("Invalid trip: {0}")]
    InvalidTrip(String),

    #[error("Invalid ticket: {0}")]
    InvalidTicket(String),

    #[error("A player starts with exactly 4 cards, but {0} were given.")]
    InvalidInitialCards(usize),

    #[error("Station {id} is out of range (partition of {size} stations).")]
    StationOutOfRange { id: usize, size: usize },
}

/// Short-hand for results of rule operations.
pub type RulesResult<T> = Result<T, RulesError>;
