//! Rule constants shared by the whole engine.

/// Number of colored wagon cards of each color.
pub const CAR_CARDS_COUNT: usize = 12;

/// Number of locomotive cards.
pub const LOCOMOTIVE_CARDS_COUNT: usize = 14;

/// Total number of cards in the game.
pub const TOTAL_CARDS_COUNT: usize = 8 * CAR_CARDS_COUNT + LOCOMOTIVE_CARDS_COUNT;

/// Number of face-up card slots.
pub const FACE_UP_CARDS_COUNT: usize = 5;

/// Number of cards dealt to each player when the game starts.
pub const INITIAL_CARDS_COUNT: usize = 4;

/// Number of tickets offered to each player when the game starts.
pub const INITIAL_TICKETS_COUNT: usize = 5;

/// Number of tickets a player may discard from their initial offer.
pub const DISCARDABLE_TICKETS_COUNT: usize = 2;

/// Number of tickets offered on a ticket-drawing turn.
pub const IN_GAME_TICKETS_COUNT: usize = 3;

/// Number of cards drawn on a card-drawing turn.
pub const CARD_DRAWS_PER_TURN: usize = 2;

/// Number of cars each player starts with.
pub const INITIAL_CAR_COUNT: u8 = 40;

/// When a player is left with this many cars (or fewer), the last round begins.
pub const LAST_TURN_CAR_COUNT: u8 = 2;

/// Number of cards revealed from the deck when someone attempts to claim a tunnel.
pub const ADDITIONAL_TUNNEL_CARDS: usize = 3;

pub const MIN_ROUTE_LENGTH: u8 = 1;
pub const MAX_ROUTE_LENGTH: u8 = 6;

/// Points granted for claiming a route, indexed by route length.
/// Index 0 is never a valid route length.
pub const ROUTE_CLAIM_POINTS: [i32; MAX_ROUTE_LENGTH as usize + 1] = [i32::MIN, 1, 2, 4, 7, 10, 15];

/// Bonus granted to the player(s) owning the longest trail.
pub const LONGEST_TRAIL_BONUS_POINTS: i32 = 10;
