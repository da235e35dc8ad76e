use crate::bag::SortedBag;
use crate::card::{Card, ALL_CARDS};
use crate::card_state::{CardState, PublicCardState};
use crate::constants::{FACE_UP_CARDS_COUNT, INITIAL_CARDS_COUNT, LAST_TURN_CAR_COUNT};
use crate::deck::Deck;
use crate::error::{RulesError, RulesResult};
use crate::player_state::{PlayerState, PublicPlayerState};
use crate::route::Route;
use crate::ticket::Ticket;

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Identifies one of the two players.
///
/// # JSON
/// Player ids are serialized as their ordinal, `0` or `1`.
#[derive(
  Clone, Copy, Debug, Deserialize_repr, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize_repr,
)]
#[repr(u8)]
pub enum PlayerId {
  Player1 = 0,
  Player2 = 1,
}

impl PlayerId {
  pub const ALL: [PlayerId; 2] = [PlayerId::Player1, PlayerId::Player2];
  pub const COUNT: usize = 2;

  /// The other player.
  pub fn next(self) -> Self {
    match self {
      PlayerId::Player1 => PlayerId::Player2,
      PlayerId::Player2 => PlayerId::Player1,
    }
  }

  #[inline]
  pub fn index(self) -> usize {
    self as usize
  }
}

impl fmt::Display for PlayerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Player {}", self.index() + 1)
  }
}

/// One value per player, indexed by [`PlayerId`].
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayerMap<T> {
  values: [T; PlayerId::COUNT],
}

impl<T> PlayerMap<T> {
  /// Builds a map with a value from `factory` for each player, in id order.
  pub fn new(mut factory: impl FnMut(PlayerId) -> T) -> Self {
    Self {
      values: [factory(PlayerId::Player1), factory(PlayerId::Player2)],
    }
  }

  /// Like [`PlayerMap::new`], stopping at the first error.
  pub fn try_new<E>(mut factory: impl FnMut(PlayerId) -> Result<T, E>) -> Result<Self, E> {
    let first = factory(PlayerId::Player1)?;
    let second = factory(PlayerId::Player2)?;

    Ok(Self {
      values: [first, second],
    })
  }

  /// Iterates over `(PlayerId, &T)` pairs, in id order.
  pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
    PlayerId::ALL.into_iter().zip(self.values.iter())
  }

  /// Iterates over `(PlayerId, &mut T)` pairs, in id order.
  pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
    PlayerId::ALL.into_iter().zip(self.values.iter_mut())
  }

  /// Applies `f` to every value.
  pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> PlayerMap<U> {
    PlayerMap::new(|id| f(&self[id]))
  }
}

impl<T: Clone> PlayerMap<T> {
  /// A copy of the map where `id` is bound to `value`.
  pub fn with(&self, id: PlayerId, value: T) -> Self {
    let mut values = self.values.clone();
    values[id.index()] = value;

    Self { values }
  }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
  type Output = T;

  fn index(&self, id: PlayerId) -> &T {
    &self.values[id.index()]
  }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
  fn index_mut(&mut self, id: PlayerId) -> &mut T {
    &mut self.values[id.index()]
  }
}

/// The part of the game state every player (and spectator) can see.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PublicGameState {
  ticket_count: usize,
  card_state: PublicCardState,
  current_player_id: PlayerId,
  player_states: PlayerMap<PublicPlayerState>,
  /// Unknown until the last round has been triggered.
  last_player: Option<PlayerId>,
}

impl PublicGameState {
  pub fn new(
    ticket_count: usize,
    card_state: PublicCardState,
    current_player_id: PlayerId,
    player_states: PlayerMap<PublicPlayerState>,
    last_player: Option<PlayerId>,
  ) -> Self {
    Self {
      ticket_count,
      card_state,
      current_player_id,
      player_states,
      last_player,
    }
  }

  #[inline]
  pub fn ticket_count(&self) -> usize {
    self.ticket_count
  }

  pub fn can_draw_tickets(&self) -> bool {
    self.ticket_count > 0
  }

  #[inline]
  pub fn card_state(&self) -> &PublicCardState {
    &self.card_state
  }

  /// Whether the deck and the discards together still hold enough cards
  /// for a card-drawing turn.
  pub fn can_draw_cards(&self) -> bool {
    self.card_state.deck_size() + self.card_state.discards_size() >= FACE_UP_CARDS_COUNT
  }

  #[inline]
  pub fn current_player_id(&self) -> PlayerId {
    self.current_player_id
  }

  pub fn player_state(&self, id: PlayerId) -> &PublicPlayerState {
    &self.player_states[id]
  }

  pub fn current_player_state(&self) -> &PublicPlayerState {
    &self.player_states[self.current_player_id]
  }

  /// Routes claimed by either player.
  pub fn claimed_routes(&self) -> impl Iterator<Item = &Route> {
    self
      .player_states
      .iter()
      .flat_map(|(_, state)| state.routes().iter())
  }

  /// Whether `route` is taken. Once either route of a double route is
  /// claimed, the other one is taken too.
  pub fn is_claimed(&self, route: &Route) -> bool {
    self.claimed_routes().any(|claimed| claimed.is_parallel_to(route))
  }

  #[inline]
  pub fn last_player(&self) -> Option<PlayerId> {
    self.last_player
  }
}

/// The complete state of a game.
///
/// Every transition returns a new state and leaves `self` untouched.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameState {
  tickets: Deck<Ticket>,
  card_state: CardState,
  player_states: PlayerMap<PlayerState>,
  current_player_id: PlayerId,
  last_player: Option<PlayerId>,
}

impl GameState {
  /// The state at the start of a game: cards shuffled, 4 cards dealt to each
  /// player, tickets shuffled and the first player picked at random.
  ///
  /// # Example
  /// ```
  /// use rand::SeedableRng;
  /// use rand_chacha::ChaCha8Rng;
  /// use tchu::bag::SortedBag;
  /// use tchu::game_state::{GameState, PlayerId};
  ///
  /// let state = GameState::initial(&SortedBag::new(), &mut ChaCha8Rng::seed_from_u64(3)).unwrap();
  ///
  /// assert_eq!(state.player_state(PlayerId::Player1).cards().len(), 4);
  /// assert_eq!(state.card_state().public().deck_size(), 110 - 2 * 4 - 5);
  /// assert_eq!(state.last_player(), None);
  /// ```
  pub fn initial<R: Rng + ?Sized>(tickets: &SortedBag<Ticket>, rng: &mut R) -> RulesResult<Self> {
    let mut deck = Deck::of(&*ALL_CARDS, rng);

    let player_states = PlayerMap::try_new(|_| {
      let hand = deck.top_cards(INITIAL_CARDS_COUNT)?;
      deck = deck.without_top_cards(INITIAL_CARDS_COUNT)?;
      PlayerState::initial(hand)
    })?;

    let current_player_id = PlayerId::ALL[rng.gen_range(0..PlayerId::COUNT)];

    Ok(Self {
      tickets: Deck::of(tickets, rng),
      card_state: CardState::of(deck)?,
      player_states,
      current_player_id,
      last_player: None,
    })
  }

  /// The view of this state handed to players and spectators.
  pub fn public_state(&self) -> PublicGameState {
    PublicGameState::new(
      self.tickets.len(),
      self.card_state.public().clone(),
      self.current_player_id,
      self.player_states.map(|state| state.public().clone()),
      self.last_player,
    )
  }

  #[inline]
  pub fn tickets_count(&self) -> usize {
    self.tickets.len()
  }

  #[inline]
  pub fn card_state(&self) -> &CardState {
    &self.card_state
  }

  #[inline]
  pub fn current_player_id(&self) -> PlayerId {
    self.current_player_id
  }

  #[inline]
  pub fn last_player(&self) -> Option<PlayerId> {
    self.last_player
  }

  pub fn player_state(&self, id: PlayerId) -> &PlayerState {
    &self.player_states[id]
  }

  pub fn current_player_state(&self) -> &PlayerState {
    &self.player_states[self.current_player_id]
  }

  /// The `count` tickets on top of the ticket deck.
  pub fn top_tickets(&self, count: usize) -> RulesResult<SortedBag<Ticket>> {
    self.tickets.top_cards(count)
  }

  pub fn without_top_tickets(&self, count: usize) -> RulesResult<Self> {
    Ok(Self {
      tickets: self.tickets.without_top_cards(count)?,
      ..self.clone()
    })
  }

  /// The top card of the card deck.
  pub fn top_card(&self) -> RulesResult<Card> {
    self.card_state.top_deck_card()
  }

  pub fn without_top_card(&self) -> RulesResult<Self> {
    Ok(self.with_card_state(self.card_state.without_top_deck_card()?))
  }

  pub fn with_more_discarded_cards(&self, cards: &SortedBag<Card>) -> Self {
    self.with_card_state(self.card_state.with_more_discarded_cards(cards))
  }

  /// Shuffles the discards into a new deck if the deck is empty. Must be
  /// called before drawing any card.
  pub fn with_cards_deck_recreated_if_needed<R: Rng + ?Sized>(&self, rng: &mut R) -> RulesResult<Self> {
    if !self.card_state.public().is_deck_empty() {
      return Ok(self.clone());
    }

    Ok(self.with_card_state(self.card_state.with_deck_recreated_from_discards(rng)?))
  }

  /// Gives the tickets a player chose at the start of the game.
  pub fn with_initially_chosen_tickets(&self, id: PlayerId, chosen: &SortedBag<Ticket>) -> RulesResult<Self> {
    let state = &self.player_states[id];
    if state.public().ticket_count() > 0 {
      return Err(RulesError::TicketsAlreadyChosen(id));
    }

    Ok(self.with_player_state(id, state.with_added_tickets(chosen)))
  }

  /// Gives the current player the tickets they kept out of `drawn`. All the
  /// drawn tickets leave the ticket deck, kept or not.
  pub fn with_chosen_additional_tickets(
    &self,
    drawn: &SortedBag<Ticket>,
    chosen: &SortedBag<Ticket>,
  ) -> RulesResult<Self> {
    if !drawn.contains_all(chosen) {
      return Err(RulesError::TicketsNotOffered);
    }

    let state = self.current_player_state().with_added_tickets(chosen);
    Ok(Self {
      tickets: self.tickets.without_top_cards(drawn.len())?,
      ..self.with_player_state(self.current_player_id, state)
    })
  }

  /// The current player takes the face-up card of `slot`, which is replaced
  /// by the top card of the deck.
  pub fn with_drawn_face_up_card(&self, slot: usize) -> RulesResult<Self> {
    let card = self.card_state.public().face_up_card(slot)?;
    let card_state = self.card_state.with_drawn_face_up_card(slot)?;
    let state = self.current_player_state().with_added_card(card);

    Ok(Self {
      card_state,
      ..self.with_player_state(self.current_player_id, state)
    })
  }

  /// The current player takes the top card of the deck.
  pub fn with_blindly_drawn_card(&self) -> RulesResult<Self> {
    let card = self.card_state.top_deck_card()?;
    let card_state = self.card_state.without_top_deck_card()?;
    let state = self.current_player_state().with_added_card(card);

    Ok(Self {
      card_state,
      ..self.with_player_state(self.current_player_id, state)
    })
  }

  /// The current player claims `route`, the cards spent go to the discards.
  pub fn with_claimed_route(&self, route: Route, cards: &SortedBag<Card>) -> RulesResult<Self> {
    let state = self.current_player_state().with_claimed_route(route, cards)?;

    Ok(Self {
      card_state: self.card_state.with_more_discarded_cards(cards),
      ..self.with_player_state(self.current_player_id, state)
    })
  }

  /// Whether the current player just triggered the last round: the last
  /// player is still unknown and they have 2 cars or fewer.
  pub fn last_turn_begins(&self) -> bool {
    self.last_player.is_none() && self.current_player_state().car_count() <= LAST_TURN_CAR_COUNT
  }

  /// Hands the turn to the other player. If the last round begins, the
  /// current player becomes the last player.
  pub fn for_next_turn(&self) -> Self {
    let last_player = if self.last_turn_begins() {
      Some(self.current_player_id)
    } else {
      self.last_player
    };

    Self {
      current_player_id: self.current_player_id.next(),
      last_player,
      ..self.clone()
    }
  }

  fn with_card_state(&self, card_state: CardState) -> Self {
    Self {
      card_state,
      ..self.clone()
    }
  }

  fn with_player_state(&self, id: PlayerId, state: PlayerState) -> Self {
    Self {
      player_states: self.player_states.with(id, state),
      ..self.clone()
    }
  }
}

#[cfg(test)]
impl GameState {
  /// A state in the middle of a game, before its last round.
  pub(crate) fn from_parts(
    tickets: Deck<Ticket>,
    card_state: CardState,
    player_states: PlayerMap<PlayerState>,
    current_player_id: PlayerId,
  ) -> Self {
    Self {
      tickets,
      card_state,
      player_states,
      current_player_id,
      last_player: None,
    }
  }
}
