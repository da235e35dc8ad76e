use crate::bag::SortedBag;
use crate::card::Card;
use crate::game_state::{PlayerId, PlayerMap, PublicGameState};
use crate::player_state::PlayerState;
use crate::route::Route;
use crate::ticket::Ticket;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// The three kinds of turns a player can take.
#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TurnKind {
    DrawTickets,
    DrawCards,
    ClaimRoute,
}

/// Where a player draws a card from.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawSlot {
    /// One of the 5 face-up slots, `0..5`.
    FaceUp(usize),
    /// The top of the deck, blindly.
    Deck,
}

/// What a player wants to do once a game is over.
#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EndChoice {
    PlayAgain,
    Quit,
}

/// A participant of the game, driven by the [`crate::manager::Manager`].
///
/// Calls are synchronous and never overlap: the manager waits for each answer
/// before moving on. Answers that break the rules (e.g. keeping a ticket that
/// was not offered) abort the game.
pub trait Player {
    /// Tells the player who they are, and the names of everyone.
    fn init_players(&mut self, own_id: PlayerId, names: &PlayerMap<String>);

    /// A message to show the player, see [`crate::info::Info`].
    fn receive_info(&mut self, info: &str);

    /// The latest public state, and the player's own complete state.
    fn update_state(&mut self, state: &PublicGameState, own_state: &PlayerState);

    /// The tickets offered to the player at the start of the game.
    fn set_initial_ticket_choice(&mut self, tickets: &SortedBag<Ticket>);

    /// Which of the tickets of [`Player::set_initial_ticket_choice`] the
    /// player keeps. At most 2 can be discarded.
    fn choose_initial_tickets(&mut self) -> SortedBag<Ticket>;

    fn next_turn(&mut self) -> TurnKind;

    /// Which of `options` the player keeps, possibly none.
    fn choose_tickets(&mut self, options: &SortedBag<Ticket>) -> SortedBag<Ticket>;

    fn draw_slot(&mut self) -> DrawSlot;

    /// The route the player wants to claim.
    fn claimed_route(&mut self) -> Route;

    /// The cards the player initially plays for [`Player::claimed_route`].
    fn initial_claim_cards(&mut self) -> SortedBag<Card>;

    /// The additional cards the player pays for a tunnel, picked among
    /// `options`. An empty bag gives up on the route.
    fn choose_additional_cards(&mut self, options: &[SortedBag<Card>]) -> SortedBag<Card>;

    /// Shows the outcome of the game, and asks whether to play another one.
    fn display_end_screen(&mut self, _text: &str) -> EndChoice {
        EndChoice::Quit
    }

    /// The session is over.
    fn end_game(&mut self) {}
}

/// Someone watching the game, who is never asked anything.
pub trait Spectator {
    fn init_spectator(&mut self, names: &PlayerMap<String>);

    fn set_state(&mut self, state: &PublicGameState);

    fn receive_info(&mut self, info: &str);
}
