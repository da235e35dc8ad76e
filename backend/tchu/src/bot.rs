use crate::bag::SortedBag;
use crate::card::Card;
use crate::constants::{DISCARDABLE_TICKETS_COUNT, FACE_UP_CARDS_COUNT, INITIAL_TICKETS_COUNT};
use crate::game_state::{PlayerId, PlayerMap, PublicGameState};
use crate::player::{DrawSlot, EndChoice, Player, TurnKind};
use crate::player_state::PlayerState;
use crate::route::Route;
use crate::ticket::Ticket;

use log::debug;
use rand::seq::{IteratorRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A [`Player`] playing greedily on the routes, and randomly otherwise.
///
/// On each turn, it claims the longest route it can afford, draws cards if it
/// can't, and draws tickets as a last resort. It never discards more tickets
/// than it must, and always pays the cheapest tunnel surcharge.
pub struct RandomPlayer {
    rng: ChaCha8Rng,
    /// Every route of the network, claimed or not.
    routes: Vec<Route>,
    /// Claimed to pass the turn when nothing can be drawn nor claimed.
    pass_route: Route,
    /// Number of games to play before quitting.
    games: usize,
    games_played: usize,

    state: Option<PublicGameState>,
    own_state: Option<PlayerState>,
    initial_tickets: SortedBag<Ticket>,
    /// The route picked by [`Player::next_turn`], `None` when passing.
    planned_route: Option<Route>,
}

impl RandomPlayer {
    /// A player for the network made of `routes`, quitting after a single game.
    ///
    /// Returns `None` if `routes` is empty.
    pub fn new(seed: u64, routes: &[Route]) -> Option<Self> {
        Some(Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            pass_route: routes.first()?.clone(),
            routes: routes.to_vec(),
            games: 1,
            games_played: 0,
            state: None,
            own_state: None,
            initial_tickets: SortedBag::new(),
            planned_route: None,
        })
    }

    /// Plays `games` games before quitting.
    pub fn with_games(mut self, games: usize) -> Self {
        self.games = games;
        self
    }

    /// The longest route nobody claimed yet, and that this player can afford.
    fn longest_claimable_route(&self) -> Option<Route> {
        let (state, own_state) = (self.state.as_ref()?, self.own_state.as_ref()?);

        self.routes
            .iter()
            .filter(|route| !state.is_claimed(route))
            .filter(|route| own_state.can_claim_route(route))
            .fold(None, |longest: Option<&Route>, route| match longest {
                Some(longest) if longest.length() >= route.length() => Some(longest),
                _ => Some(route),
            })
            .cloned()
    }
}

impl Player for RandomPlayer {
    fn init_players(&mut self, own_id: PlayerId, names: &PlayerMap<String>) {
        debug!("Bot playing as {} ({})", names[own_id], own_id);
    }

    fn receive_info(&mut self, _info: &str) {}

    fn update_state(&mut self, state: &PublicGameState, own_state: &PlayerState) {
        self.state = Some(state.clone());
        self.own_state = Some(own_state.clone());
    }

    fn set_initial_ticket_choice(&mut self, tickets: &SortedBag<Ticket>) {
        self.initial_tickets = tickets.clone();
    }

    fn choose_initial_tickets(&mut self) -> SortedBag<Ticket> {
        let count = INITIAL_TICKETS_COUNT - DISCARDABLE_TICKETS_COUNT;
        self.initial_tickets
            .iter()
            .cloned()
            .choose_multiple(&mut self.rng, count)
            .into_iter()
            .collect()
    }

    fn next_turn(&mut self) -> TurnKind {
        self.planned_route = self.longest_claimable_route();
        if self.planned_route.is_some() {
            return TurnKind::ClaimRoute;
        }

        let state = match &self.state {
            Some(state) => state,
            None => return TurnKind::DrawCards,
        };
        if state.can_draw_cards() {
            TurnKind::DrawCards
        } else if state.can_draw_tickets() {
            TurnKind::DrawTickets
        } else {
            debug!("Bot can neither draw nor claim, passing");
            TurnKind::ClaimRoute
        }
    }

    fn choose_tickets(&mut self, options: &SortedBag<Ticket>) -> SortedBag<Ticket> {
        options.iter().cloned().choose(&mut self.rng).into_iter().collect()
    }

    fn draw_slot(&mut self) -> DrawSlot {
        let slot = self.rng.gen_range(0..=FACE_UP_CARDS_COUNT);
        if slot == FACE_UP_CARDS_COUNT {
            DrawSlot::Deck
        } else {
            DrawSlot::FaceUp(slot)
        }
    }

    /// Nothing claimable means passing: the pass route is either taken or
    /// unaffordable, so claiming it fails.
    fn claimed_route(&mut self) -> Route {
        self.planned_route
            .clone()
            .unwrap_or_else(|| self.pass_route.clone())
    }

    fn initial_claim_cards(&mut self) -> SortedBag<Card> {
        let options = match (&self.own_state, &self.planned_route) {
            (Some(own_state), Some(route)) => own_state.possible_claim_cards(route).unwrap_or_default(),
            _ => Vec::new(),
        };

        options.choose(&mut self.rng).cloned().unwrap_or_default()
    }

    fn choose_additional_cards(&mut self, options: &[SortedBag<Card>]) -> SortedBag<Card> {
        options.first().cloned().unwrap_or_default()
    }

    fn display_end_screen(&mut self, _text: &str) -> EndChoice {
        self.games_played += 1;
        if self.games_played < self.games {
            EndChoice::PlayAgain
        } else {
            EndChoice::Quit
        }
    }

    fn end_game(&mut self) {
        self.state = None;
        self.own_state = None;
        self.initial_tickets = SortedBag::new();
        self.planned_route = None;
    }
}
