use crate::{
    bag::SortedBag,
    card::Card,
    constants::{
        ADDITIONAL_TUNNEL_CARDS, CARD_DRAWS_PER_TURN, DISCARDABLE_TICKETS_COUNT,
        INITIAL_TICKETS_COUNT, IN_GAME_TICKETS_COUNT, LONGEST_TRAIL_BONUS_POINTS,
    },
    error::RulesError,
    game_phase::GamePhase,
    game_state::{GameState, PlayerId, PlayerMap},
    info::Info,
    player::{DrawSlot, EndChoice, Player, Spectator, TurnKind},
    ticket::Ticket,
    trail::Trail,
};

use log::{debug, info, trace};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a game had to stop before its end.
///
/// Every variant means a [`Player`] (or the code driving the manager) broke
/// the protocol; the game can't go on from there.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error(transparent)]
    Rules(#[from] RulesError),

    #[error("{player} played cards that can't pay for route {route}.")]
    IllegalClaimCards { player: PlayerId, route: String },

    #[error("{player} chose additional cards that were not offered.")]
    IllegalAdditionalCards { player: PlayerId },

    #[error("{player} kept {kept} tickets, but at least {required} must be kept.")]
    TooFewTicketsKept {
        player: PlayerId,
        kept: usize,
        required: usize,
    },

    #[error("no game should last {0} turns, the players are stuck.")]
    TurnLimitReached(usize),
}

/// How a game ended.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameOutcome {
    /// Claim points, ticket points and longest-trail bonus of each player.
    pub final_points: PlayerMap<i32>,
    /// Length of each player's longest trail.
    pub longest_trails: PlayerMap<u32>,
    /// `None` when both players have the same number of points.
    pub winner: Option<PlayerId>,
    /// Number of turns played, all players included.
    pub turns: usize,
    /// The message announcing the result, also shown on the end screen.
    pub summary: String,
}

/// Drives two [`Player`]s through games, from the initial ticket choice to
/// the final scoring.
///
/// This overall acts as a finite-state machine, see [`GamePhase`]. The
/// authoritative [`GameState`] only lives for the duration of a game: each
/// player answer produces a new state, which is then pushed back to both
/// players and to every spectator.
pub struct Manager {
    /// The current phase, which marks nodes (states) in this finite-state machine.
    phase: GamePhase,
    players: PlayerMap<Box<dyn Player>>,
    names: PlayerMap<String>,
    infos: PlayerMap<Info>,
    spectators: Vec<Box<dyn Spectator>>,
    /// Every ticket of the network, shuffled at the start of each game.
    tickets: SortedBag<Ticket>,
    /// Seeded once, so that a whole session can be replayed.
    rng: ChaCha8Rng,
    games_played: usize,
    /// Turns after which a game is aborted, if any.
    turn_limit: Option<usize>,
}

impl Manager {
    /// Creates a new [`Manager`] in the [`GamePhase::Setup`].
    pub fn new(
        players: PlayerMap<Box<dyn Player>>,
        names: PlayerMap<String>,
        tickets: SortedBag<Ticket>,
        seed: u64,
    ) -> Self {
        Self {
            phase: GamePhase::Setup,
            players,
            infos: names.map(|name| Info::new(name.clone())),
            names,
            spectators: Vec::new(),
            tickets,
            rng: ChaCha8Rng::seed_from_u64(seed),
            games_played: 0,
            turn_limit: None,
        }
    }

    /// Aborts any game still in its regular rounds after `turns` turns.
    ///
    /// Players who can neither draw nor claim anything can only pass, so a
    /// game between them never ends on its own.
    pub fn with_turn_limit(mut self, turns: usize) -> Self {
        self.turn_limit = Some(turns);
        self
    }

    /// Registers someone who is told everything public about the games to come.
    pub fn add_spectator(&mut self, spectator: Box<dyn Spectator>) {
        self.spectators.push(spectator);
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Number of games played to their end so far.
    #[inline]
    pub fn games_played(&self) -> usize {
        self.games_played
    }

    /// Plays games until one of the players doesn't want to play again.
    ///
    /// Returns the outcome of every game played.
    pub fn run(&mut self) -> Result<Vec<GameOutcome>, GameError> {
        let mut outcomes = Vec::new();

        loop {
            let outcome = self.play_game()?;
            let play_again = self.end_screen(&outcome.summary);

            outcomes.push(outcome);
            if !play_again {
                self.set_phase(GamePhase::Ended);
                return Ok(outcomes);
            }
        }
    }

    /// Plays a single game, from the initial ticket choice up to the scoring.
    ///
    /// The end screen is left to [`Manager::run`].
    pub fn play_game(&mut self) -> Result<GameOutcome, GameError> {
        self.set_phase(GamePhase::Setup);
        info!("Starting game #{}", self.games_played + 1);

        let state = self.setup()?;
        let (state, turns) = self.play_rounds(state)?;

        self.set_phase(GamePhase::Scoring);
        let outcome = self.score(&state, turns);
        self.games_played += 1;

        Ok(outcome)
    }

    /// Introduces the players, and lets them choose their initial tickets.
    fn setup(&mut self) -> Result<GameState, GameError> {
        for (id, player) in self.players.iter_mut() {
            player.init_players(id, &self.names);
        }
        for spectator in self.spectators.iter_mut() {
            spectator.init_spectator(&self.names);
        }

        let mut state = GameState::initial(&self.tickets, &mut self.rng)?;
        let first = state.current_player_id();
        debug!("{} plays first", self.names[first]);
        self.broadcast_info(&self.infos[first].will_play_first());

        let mut offers = Vec::with_capacity(PlayerId::COUNT);
        for id in PlayerId::ALL {
            let offer = state.top_tickets(INITIAL_TICKETS_COUNT)?;
            state = state.without_top_tickets(INITIAL_TICKETS_COUNT)?;
            self.players[id].set_initial_ticket_choice(&offer);
            offers.push(offer);
        }
        self.update_all_states(&state);

        let required = INITIAL_TICKETS_COUNT - DISCARDABLE_TICKETS_COUNT;
        for (id, offer) in PlayerId::ALL.into_iter().zip(offers.iter()) {
            let kept = self.players[id].choose_initial_tickets();
            Self::check_kept_tickets(id, offer, &kept, required)?;
            state = state.with_initially_chosen_tickets(id, &kept)?;
        }

        for id in PlayerId::ALL {
            let count = state.player_state(id).tickets().len();
            self.broadcast_info(&self.infos[id].kept_tickets(count));
        }

        Ok(state)
    }

    /// Plays regular turns until a player runs low on cars, then one last turn
    /// for each player. Returns the final state and the number of turns played.
    fn play_rounds(&mut self, mut state: GameState) -> Result<(GameState, usize), GameError> {
        self.set_phase(GamePhase::Round);
        let mut turns = 0;
        while state.last_player().is_none() {
            if let Some(limit) = self.turn_limit.filter(|limit| turns >= *limit) {
                return Err(GameError::TurnLimitReached(limit));
            }

            state = self.play_turn(state)?;
            turns += 1;
        }

        self.set_phase(GamePhase::FinalRound);
        for _ in 0..PlayerId::COUNT {
            state = self.play_turn(state)?;
            turns += 1;
        }

        Ok((state, turns))
    }

    /// Plays the turn of the current player, and hands over to the next one.
    fn play_turn(&mut self, state: GameState) -> Result<GameState, GameError> {
        let id = state.current_player_id();
        self.broadcast_info(&self.infos[id].can_play());
        self.update_all_states(&state);

        let kind = self.players[id].next_turn();
        debug!("{} chose to {}", self.names[id], kind);

        let state = match kind {
            TurnKind::DrawTickets => self.draw_tickets(state, id)?,
            TurnKind::DrawCards => self.draw_cards(state, id)?,
            TurnKind::ClaimRoute => self.claim_route(state, id)?,
        };

        if state.last_turn_begins() {
            let cars = state.current_player_state().car_count();
            info!("{} triggered the last round with {} cars left", self.names[id], cars);
            self.broadcast_info(&self.infos[id].last_turn_begins(cars));
        }

        Ok(state.for_next_turn())
    }

    fn draw_tickets(&mut self, state: GameState, id: PlayerId) -> Result<GameState, GameError> {
        if state.tickets_count() == 0 {
            return Err(RulesError::EmptyDeck.into());
        }

        let count = IN_GAME_TICKETS_COUNT.min(state.tickets_count());
        self.broadcast_info(&self.infos[id].drew_tickets(count));

        let drawn = state.top_tickets(count)?;
        let kept = self.players[id].choose_tickets(&drawn);
        Self::check_kept_tickets(id, &drawn, &kept, 0)?;

        let state = state.with_chosen_additional_tickets(&drawn, &kept)?;
        self.broadcast_info(&self.infos[id].kept_tickets(kept.len()));

        Ok(state)
    }

    fn draw_cards(&mut self, mut state: GameState, id: PlayerId) -> Result<GameState, GameError> {
        for draw in 0..CARD_DRAWS_PER_TURN {
            state = state.with_cards_deck_recreated_if_needed(&mut self.rng)?;
            if draw > 0 {
                self.update_all_states(&state);
            }

            match self.players[id].draw_slot() {
                DrawSlot::Deck => {
                    state = state.with_blindly_drawn_card()?;
                    self.broadcast_info(&self.infos[id].drew_blind_card());
                }
                DrawSlot::FaceUp(slot) => {
                    let card = state.card_state().public().face_up_card(slot)?;
                    state = state.with_drawn_face_up_card(slot)?;
                    self.broadcast_info(&self.infos[id].drew_visible_card(card));
                }
            }
        }

        Ok(state)
    }

    fn claim_route(&mut self, state: GameState, id: PlayerId) -> Result<GameState, GameError> {
        let route = self.players[id].claimed_route();

        let taken = state.public_state().is_claimed(&route);
        if taken || !state.current_player_state().can_claim_route(&route) {
            debug!("{} can't claim {}", self.names[id], route.id());
            self.broadcast_info(&self.infos[id].did_not_claim_route(&route));
            return Ok(state);
        }

        let initial_cards = self.players[id].initial_claim_cards();
        if !state
            .current_player_state()
            .possible_claim_cards(&route)?
            .contains(&initial_cards)
        {
            return Err(GameError::IllegalClaimCards {
                player: id,
                route: route.id().to_owned(),
            });
        }

        if !route.is_tunnel() {
            let state = state.with_claimed_route(route.clone(), &initial_cards)?;
            self.broadcast_info(&self.infos[id].claimed_route(&route, &initial_cards));
            return Ok(state);
        }

        self.broadcast_info(&self.infos[id].attempts_tunnel_claim(&route, &initial_cards));

        let mut state = state;
        let mut drawn_cards = SortedBag::new();
        for _ in 0..ADDITIONAL_TUNNEL_CARDS {
            state = state.with_cards_deck_recreated_if_needed(&mut self.rng)?;
            drawn_cards = drawn_cards.with_added(1, state.top_card()?);
            state = state.without_top_card()?;
        }

        let additional_count = route.additional_claim_cards_count(&initial_cards, &drawn_cards)?;
        self.broadcast_info(&self.infos[id].drew_additional_cards(&drawn_cards, additional_count));
        let state = state.with_more_discarded_cards(&drawn_cards);

        let claim_cards = if additional_count == 0 {
            initial_cards
        } else {
            let options = state
                .current_player_state()
                .possible_additional_cards(additional_count, &initial_cards)?;
            let chosen = if options.is_empty() {
                SortedBag::<Card>::new()
            } else {
                self.players[id].choose_additional_cards(&options)
            };

            if chosen.is_empty() {
                debug!("{} gave up on tunnel {}", self.names[id], route.id());
                self.broadcast_info(&self.infos[id].did_not_claim_route(&route));
                return Ok(state);
            }

            if !options.contains(&chosen) {
                return Err(GameError::IllegalAdditionalCards { player: id });
            }

            initial_cards.union(&chosen)
        };

        let state = state.with_claimed_route(route.clone(), &claim_cards)?;
        self.broadcast_info(&self.infos[id].claimed_route(&route, &claim_cards));

        Ok(state)
    }

    /// Grants the longest-trail bonus, and announces the winner.
    fn score(&mut self, state: &GameState, turns: usize) -> GameOutcome {
        let trails = PlayerMap::new(|id| {
            let routes: Vec<_> = state.player_state(id).routes().iter().cloned().collect();
            Trail::longest(&routes)
        });
        let longest = trails
            .iter()
            .map(|(_, trail)| trail.length())
            .max()
            .unwrap_or(0);

        let mut final_points = PlayerMap::new(|id| state.player_state(id).final_points());
        for (id, trail) in trails.iter() {
            if trail.length() == longest {
                final_points[id] += LONGEST_TRAIL_BONUS_POINTS;
                self.broadcast_info(&self.infos[id].gets_longest_trail_bonus(trail));
            }
        }

        self.update_all_states(state);

        let (p1, p2) = (PlayerId::Player1, PlayerId::Player2);
        let winner = if final_points[p1] > final_points[p2] {
            Some(p1)
        } else if final_points[p2] > final_points[p1] {
            Some(p2)
        } else {
            None
        };

        let summary = match winner {
            Some(winner) => {
                let loser = winner.next();
                self.infos[winner].won(final_points[winner], final_points[loser])
            }
            None => {
                let names: Vec<String> = self.names.iter().map(|(_, name)| name.clone()).collect();
                Info::draw(&names, final_points[p1])
            }
        };
        self.broadcast_info(&summary);

        info!(
            "Game over after {} turns: {} {} - {} {}",
            turns, self.names[p1], final_points[p1], final_points[p2], self.names[p2]
        );

        GameOutcome {
            final_points,
            longest_trails: trails.map(Trail::length),
            winner,
            turns,
            summary,
        }
    }

    /// Shows the result to both players. Returns whether they both want to
    /// play again.
    fn end_screen(&mut self, summary: &str) -> bool {
        self.set_phase(GamePhase::EndScreen);

        let mut play_again = true;
        for (id, player) in self.players.iter_mut() {
            let choice = player.display_end_screen(summary);
            debug!("{} chose to {}", self.names[id], choice);
            play_again &= choice == EndChoice::PlayAgain;
        }

        for (_, player) in self.players.iter_mut() {
            player.end_game();
        }

        play_again
    }

    fn check_kept_tickets(
        id: PlayerId,
        offered: &SortedBag<Ticket>,
        kept: &SortedBag<Ticket>,
        required: usize,
    ) -> Result<(), GameError> {
        if !offered.contains_all(kept) {
            return Err(RulesError::TicketsNotOffered.into());
        }

        if kept.len() < required {
            return Err(GameError::TooFewTicketsKept {
                player: id,
                kept: kept.len(),
                required,
            });
        }

        Ok(())
    }

    fn set_phase(&mut self, phase: GamePhase) {
        debug!("Entering phase {}", phase);
        self.phase = phase;
    }

    /// Sends a message to both players and every spectator.
    fn broadcast_info(&mut self, info: &str) {
        trace!("{}", info.trim());

        for (_, player) in self.players.iter_mut() {
            player.receive_info(info);
        }
        for spectator in self.spectators.iter_mut() {
            spectator.receive_info(info);
        }
    }

    /// Sends the latest state to both players and every spectator.
    fn update_all_states(&mut self, state: &GameState) {
        let public_state = state.public_state();

        for (id, player) in self.players.iter_mut() {
            player.update_state(&public_state, state.player_state(id));
        }
        for spectator in self.spectators.iter_mut() {
            spectator.set_state(&public_state);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::card_state::CardState;
    use crate::constants::FACE_UP_CARDS_COUNT;
    use crate::game_state::PublicGameState;
    use crate::player_state::PlayerState;
    use crate::route::{Level, Route};
    use crate::station::Station;
    use im::Vector;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::iter;
    use std::rc::Rc;

    /// Everything a scripted player was told.
    #[derive(Default)]
    struct Log {
        infos: Vec<String>,
        updates: usize,
        additional_options: Vec<Vec<SortedBag<Card>>>,
        games_ended: usize,
    }

    impl Log {
        fn count(&self, pattern: &str) -> usize {
            self.infos.iter().filter(|info| info.contains(pattern)).count()
        }
    }

    /// A player answering from pre-recorded scripts.
    #[derive(Default)]
    struct Scripted {
        log: Rc<RefCell<Log>>,
        offer: SortedBag<Ticket>,
        keep_initial: usize,
        keep_drawn: usize,
        turns: VecDeque<TurnKind>,
        slots: VecDeque<DrawSlot>,
        /// Claimed one after the other, over and over.
        routes: VecDeque<Route>,
        claim_cards: SortedBag<Card>,
        /// Left empty to give up on tunnels.
        additional_cards: SortedBag<Card>,
        end_choice: Option<EndChoice>,
    }

    impl Player for Scripted {
        fn init_players(&mut self, _own_id: PlayerId, _names: &PlayerMap<String>) {}

        fn receive_info(&mut self, info: &str) {
            self.log.borrow_mut().infos.push(info.to_owned());
        }

        fn update_state(&mut self, _state: &PublicGameState, _own_state: &PlayerState) {
            self.log.borrow_mut().updates += 1;
        }

        fn set_initial_ticket_choice(&mut self, tickets: &SortedBag<Ticket>) {
            self.offer = tickets.clone();
        }

        fn choose_initial_tickets(&mut self) -> SortedBag<Ticket> {
            self.offer.iter().take(self.keep_initial).cloned().collect()
        }

        fn next_turn(&mut self) -> TurnKind {
            self.turns.pop_front().unwrap_or(TurnKind::DrawCards)
        }

        fn choose_tickets(&mut self, options: &SortedBag<Ticket>) -> SortedBag<Ticket> {
            options.iter().take(self.keep_drawn).cloned().collect()
        }

        fn draw_slot(&mut self) -> DrawSlot {
            self.slots.pop_front().unwrap_or(DrawSlot::Deck)
        }

        fn claimed_route(&mut self) -> Route {
            let route = self.routes.pop_front().unwrap();
            self.routes.push_back(route.clone());
            route
        }

        fn initial_claim_cards(&mut self) -> SortedBag<Card> {
            self.claim_cards.clone()
        }

        fn choose_additional_cards(&mut self, options: &[SortedBag<Card>]) -> SortedBag<Card> {
            self.log.borrow_mut().additional_options.push(options.to_vec());
            self.additional_cards.clone()
        }

        fn display_end_screen(&mut self, _text: &str) -> EndChoice {
            self.end_choice.unwrap_or(EndChoice::Quit)
        }

        fn end_game(&mut self) {
            self.log.borrow_mut().games_ended += 1;
        }
    }

    fn station(id: usize) -> Station {
        Station::new(id, format!("S{}", id))
    }

    fn tickets(count: usize) -> SortedBag<Ticket> {
        (0..count)
            .map(|i| Ticket::single(station(0), station(i + 1), i as u32 + 1).unwrap())
            .collect()
    }

    fn tunnel() -> Route {
        Route::new("S1_S2_T", station(1), station(2), 2, Level::Underground, None).unwrap()
    }

    fn manager(first: Scripted, second: Scripted, ticket_count: usize) -> Manager {
        let mut boxed = vec![Box::new(first) as Box<dyn Player>, Box::new(second)].into_iter();
        let players = PlayerMap::new(|_| boxed.next().unwrap());
        let names = PlayerMap::new(|id| format!("P{}", id.index() + 1));

        Manager::new(players, names, tickets(ticket_count), 1)
    }

    /// A game in its regular rounds, `Player1` to play. Both players hold
    /// `hand`, and `Player1` owns `routes`. Five black cards lie face up, and
    /// the deck holds `deck` from the top down. 5 tickets are left.
    fn game(hand: SortedBag<Card>, routes: Vector<Route>, deck: &[Card], discards: SortedBag<Card>) -> GameState {
        let deck = iter::repeat(Card::Black)
            .take(FACE_UP_CARDS_COUNT)
            .chain(deck.iter().copied())
            .collect();
        let card_state = CardState::of(deck).unwrap().with_more_discarded_cards(&discards);
        let player_states = PlayerMap::new(|id| match id {
            PlayerId::Player1 => PlayerState::new(SortedBag::new(), hand.clone(), routes.clone()),
            PlayerId::Player2 => PlayerState::new(SortedBag::new(), hand.clone(), Vector::new()),
        });

        GameState::from_parts(
            tickets(5).iter().cloned().collect(),
            card_state,
            player_states,
            PlayerId::Player1,
        )
    }

    // Tests for the setup.

    #[test]
    fn setup_rejects_too_few_initial_tickets() {
        let first = Scripted {
            keep_initial: 3,
            ..Default::default()
        };
        let second = Scripted {
            keep_initial: 2,
            ..Default::default()
        };
        let mut manager = manager(first, second, 10);

        assert_eq!(
            manager.play_game(),
            Err(GameError::TooFewTicketsKept {
                player: PlayerId::Player2,
                kept: 2,
                required: 3,
            })
        );
        assert_eq!(manager.phase(), GamePhase::Setup);
        assert_eq!(manager.games_played(), 0);
    }

    #[test]
    fn setup_announces_kept_tickets() {
        let log = Rc::new(RefCell::new(Log::default()));
        let first = Scripted {
            log: log.clone(),
            keep_initial: 5,
            turns: vec![TurnKind::DrawTickets].into(),
            ..Default::default()
        };
        let second = Scripted {
            keep_initial: 4,
            turns: vec![TurnKind::DrawTickets].into(),
            ..Default::default()
        };
        let mut manager = manager(first, second, 10);

        // No ticket is left after the setup.
        assert_eq!(manager.play_game(), Err(GameError::Rules(RulesError::EmptyDeck)));
        assert_eq!(manager.phase(), GamePhase::Round);

        let log = log.borrow();
        assert!(log.infos.iter().any(|info| info == "P1 kept 5 tickets.\n"));
        assert!(log.infos.iter().any(|info| info == "P2 kept 4 tickets.\n"));
        assert!(log.infos.iter().any(|info| info.ends_with("will play first.\n\n")));
    }

    // Tests for the turns.

    #[test]
    fn unaffordable_route_is_not_claimed() {
        let log = Rc::new(RefCell::new(Log::default()));
        let long = Route::new("LONG", station(1), station(2), 6, Level::Overground, None).unwrap();
        let first = Scripted {
            log: log.clone(),
            keep_initial: 4,
            keep_drawn: 1,
            turns: vec![TurnKind::ClaimRoute, TurnKind::DrawTickets].into(),
            routes: vec![long.clone()].into(),
            ..Default::default()
        };
        let second = Scripted {
            keep_initial: 4,
            keep_drawn: 1,
            turns: vec![TurnKind::ClaimRoute, TurnKind::DrawTickets].into(),
            routes: vec![long].into(),
            ..Default::default()
        };
        let mut manager = manager(first, second, 11);

        // Nobody can pay for a route of length 6 with 4 cards. The single ticket
        // left after the setup is then drawn, and the next draw fails.
        assert_eq!(manager.play_game(), Err(GameError::Rules(RulesError::EmptyDeck)));

        let log = log.borrow();
        assert_eq!(log.count("could not (or would not) claim the route S1 - S2"), 2);
        assert!(log.infos.iter().any(|info| info.ends_with("drew 1 ticket...\n")));
        assert!(log.infos.iter().any(|info| info.ends_with("kept 1 ticket.\n")));
    }

    #[test]
    fn drawn_tickets_can_all_be_discarded() {
        let log = Rc::new(RefCell::new(Log::default()));
        let first = Scripted {
            log: log.clone(),
            turns: vec![TurnKind::DrawTickets].into(),
            ..Default::default()
        };
        let mut manager = manager(first, Scripted::default(), 0);
        let state = game(SortedBag::new(), Vector::new(), &[], SortedBag::new());

        let state = manager.play_turn(state).unwrap();

        assert_eq!(state.tickets_count(), 2);
        assert_eq!(state.player_state(PlayerId::Player1).tickets().len(), 0);
        assert_eq!(state.current_player_id(), PlayerId::Player2);

        let log = log.borrow();
        assert_eq!(log.count("P1 drew 3 tickets...\n"), 1);
        assert_eq!(log.count("P1 kept 0 tickets.\n"), 1);
    }

    #[test]
    fn drawing_cards_updates_states_between_draws() {
        let log = Rc::new(RefCell::new(Log::default()));
        let first = Scripted {
            log: log.clone(),
            keep_initial: 3,
            slots: vec![DrawSlot::FaceUp(0), DrawSlot::FaceUp(9)].into(),
            ..Default::default()
        };
        let second = Scripted {
            keep_initial: 3,
            slots: vec![DrawSlot::FaceUp(0), DrawSlot::FaceUp(9)].into(),
            ..Default::default()
        };
        let mut manager = manager(first, second, 10);

        assert_eq!(
            manager.play_game(),
            Err(GameError::Rules(RulesError::SlotOutOfRange(9)))
        );

        let log = log.borrow();
        assert!(log.infos.iter().any(|info| info.contains("drew a face-up")));
        // After the setup, at the start of the turn and between both draws.
        assert_eq!(log.updates, 3);
    }

    #[test]
    fn double_route_is_claimed_once() {
        let log = Rc::new(RefCell::new(Log::default()));
        let first_route = Route::new("S1_S2_1", station(1), station(2), 1, Level::Overground, None).unwrap();
        let second_route = Route::new("S1_S2_2", station(2), station(1), 1, Level::Overground, None).unwrap();
        let first = Scripted {
            log: log.clone(),
            turns: vec![TurnKind::ClaimRoute].into(),
            routes: vec![first_route].into(),
            claim_cards: SortedBag::of(1, Card::Red),
            ..Default::default()
        };
        let second = Scripted {
            turns: vec![TurnKind::ClaimRoute].into(),
            routes: vec![second_route].into(),
            claim_cards: SortedBag::of(1, Card::Red),
            ..Default::default()
        };
        let mut manager = manager(first, second, 0);
        let state = game(SortedBag::of(1, Card::Red), Vector::new(), &[], SortedBag::new());

        let state = manager.play_turn(state).unwrap();
        let state = manager.play_turn(state).unwrap();

        assert_eq!(state.player_state(PlayerId::Player1).routes().len(), 1);
        assert_eq!(state.player_state(PlayerId::Player2).routes().len(), 0);
        assert_eq!(state.player_state(PlayerId::Player2).cards(), &SortedBag::of(1, Card::Red));

        let log = log.borrow();
        assert_eq!(log.count("P1 claimed the route S1 - S2 using 1 red.\n"), 1);
        assert_eq!(log.count("P2 could not (or would not) claim the route S2 - S1.\n"), 1);
    }

    // Tests for tunnels. The route costs 2 cards, paid with 2 red cards out of 3.

    fn tunnel_claimer(log: &Rc<RefCell<Log>>, additional_cards: SortedBag<Card>) -> Scripted {
        Scripted {
            log: log.clone(),
            turns: vec![TurnKind::ClaimRoute].into(),
            routes: vec![tunnel()].into(),
            claim_cards: SortedBag::of(2, Card::Red),
            additional_cards,
            ..Default::default()
        }
    }

    #[test]
    fn tunnel_surcharge_is_paid() {
        let log = Rc::new(RefCell::new(Log::default()));
        let first = tunnel_claimer(&log, SortedBag::of(1, Card::Red));
        let mut manager = manager(first, Scripted::default(), 0);
        let deck = [Card::Red, Card::Blue, Card::Green];
        let state = game(SortedBag::of(3, Card::Red), Vector::new(), &deck, SortedBag::new());

        let state = manager.play_turn(state).unwrap();

        let player = state.player_state(PlayerId::Player1);
        assert_eq!(player.routes().iter().collect::<Vec<_>>(), vec![&tunnel()]);
        assert!(player.cards().is_empty());
        // The 3 drawn cards, and the 3 cards paid.
        assert_eq!(state.card_state().public().discards_size(), 6);
        assert_eq!(state.card_state().public().deck_size(), 0);

        let log = log.borrow();
        assert_eq!(log.additional_options, vec![vec![SortedBag::of(1, Card::Red)]]);
        assert_eq!(log.count("They imply an additional cost of 1 card.\n"), 1);
        assert_eq!(log.count("P1 claimed the route S1 - S2 using 3 red.\n"), 1);
    }

    #[test]
    fn tunnel_can_be_given_up() {
        let log = Rc::new(RefCell::new(Log::default()));
        let first = tunnel_claimer(&log, SortedBag::new());
        let mut manager = manager(first, Scripted::default(), 0);
        let deck = [Card::Red, Card::Blue, Card::Green];
        let state = game(SortedBag::of(3, Card::Red), Vector::new(), &deck, SortedBag::new());

        let state = manager.play_turn(state).unwrap();

        let player = state.player_state(PlayerId::Player1);
        assert!(player.routes().is_empty());
        assert_eq!(player.cards(), &SortedBag::of(3, Card::Red));
        assert_eq!(state.card_state().public().discards_size(), 3);
        assert!(!state.public_state().is_claimed(&tunnel()));

        let log = log.borrow();
        assert_eq!(log.additional_options.len(), 1);
        assert_eq!(log.count("P1 could not (or would not) claim the route S1 - S2.\n"), 1);
    }

    #[test]
    fn tunnel_without_surcharge_is_claimed_at_once() {
        let log = Rc::new(RefCell::new(Log::default()));
        let first = tunnel_claimer(&log, SortedBag::new());
        let mut manager = manager(first, Scripted::default(), 0);
        let deck = [Card::Blue, Card::Green, Card::Violet];
        let state = game(SortedBag::of(3, Card::Red), Vector::new(), &deck, SortedBag::new());

        let state = manager.play_turn(state).unwrap();

        let player = state.player_state(PlayerId::Player1);
        assert_eq!(player.routes().len(), 1);
        assert_eq!(player.cards(), &SortedBag::of(1, Card::Red));
        assert_eq!(state.card_state().public().discards_size(), 5);

        let log = log.borrow();
        assert!(log.additional_options.is_empty());
        assert_eq!(log.count("They imply no additional cost.\n"), 1);
    }

    #[test]
    fn tunnel_rejects_cards_not_offered() {
        let log = Rc::new(RefCell::new(Log::default()));
        let first = tunnel_claimer(&log, SortedBag::of(1, Card::Locomotive));
        let mut manager = manager(first, Scripted::default(), 0);
        let deck = [Card::Red, Card::Blue, Card::Green];
        let state = game(SortedBag::of(3, Card::Red), Vector::new(), &deck, SortedBag::new());

        assert_eq!(
            manager.play_turn(state),
            Err(GameError::IllegalAdditionalCards {
                player: PlayerId::Player1
            })
        );
    }

    #[test]
    fn tunnel_draw_recycles_discards() {
        let log = Rc::new(RefCell::new(Log::default()));
        let first = tunnel_claimer(&log, SortedBag::new());
        let mut manager = manager(first, Scripted::default(), 0);
        // A single card is left in the deck, the 2 others come from the discards.
        let state = game(SortedBag::of(3, Card::Red), Vector::new(), &[Card::Red], SortedBag::of(2, Card::Blue));

        let state = manager.play_turn(state).unwrap();

        assert_eq!(state.card_state().public().deck_size(), 0);
        assert_eq!(state.card_state().public().discards_size(), 3);

        let log = log.borrow();
        assert_eq!(log.count("They imply an additional cost of 1 card.\n"), 1);
    }

    // Tests for the end of the game.

    #[test]
    fn final_round_gives_everyone_one_more_turn() {
        let log = Rc::new(RefCell::new(Log::default()));
        let first = Scripted {
            log: log.clone(),
            ..Default::default()
        };
        let mut manager = manager(first, Scripted::default(), 0);
        // 38 of the 40 cars are already used.
        let routes = (0..7)
            .map(|i| {
                let length = if i < 6 { 6 } else { 2 };
                let (from, to) = (station(2 * i), station(2 * i + 1));
                Route::new(format!("R{}", i), from, to, length, Level::Overground, None).unwrap()
            })
            .collect();
        let state = game(SortedBag::new(), routes, &[Card::Red; 6], SortedBag::new());

        let (state, turns) = manager.play_rounds(state).unwrap();

        assert_eq!(turns, 3);
        assert_eq!(manager.phase(), GamePhase::FinalRound);
        assert_eq!(state.last_player(), Some(PlayerId::Player1));
        assert_eq!(state.player_state(PlayerId::Player1).cards().len(), 4);
        assert_eq!(state.player_state(PlayerId::Player2).cards().len(), 2);

        let log = log.borrow();
        assert_eq!(log.count("'s turn to play."), 3);
        assert_eq!(log.count("P1 has only 2 cars left, the last turn begins!"), 1);
    }

    #[test]
    fn stuck_players_hit_the_turn_limit() {
        let log = Rc::new(RefCell::new(Log::default()));
        let long = Route::new("LONG", station(1), station(2), 6, Level::Overground, None).unwrap();
        let stuck = |log: Rc<RefCell<Log>>| Scripted {
            log,
            turns: iter::repeat(TurnKind::ClaimRoute).take(20).collect(),
            routes: vec![long.clone()].into(),
            ..Default::default()
        };
        let mut manager = manager(stuck(log.clone()), stuck(Rc::default()), 0).with_turn_limit(10);
        // Nothing left to draw, and no card to pay with.
        let state = game(SortedBag::new(), Vector::new(), &[], SortedBag::new());

        assert_eq!(manager.play_rounds(state).err(), Some(GameError::TurnLimitReached(10)));
        assert_eq!(log.borrow().count("could not (or would not) claim"), 10);
    }

    #[test]
    fn end_screen_needs_everyone_to_play_again() {
        let log = Rc::new(RefCell::new(Log::default()));
        let player = |choice| Scripted {
            log: log.clone(),
            end_choice: Some(choice),
            ..Default::default()
        };

        let mut mixed = manager(player(EndChoice::PlayAgain), player(EndChoice::Quit), 0);
        assert!(!mixed.end_screen("P1 wins!\n"));
        assert_eq!(mixed.phase(), GamePhase::EndScreen);
        assert_eq!(log.borrow().games_ended, 2);

        let mut again = manager(player(EndChoice::PlayAgain), player(EndChoice::PlayAgain), 0);
        assert!(again.end_screen("P2 wins!\n"));
        assert_eq!(log.borrow().games_ended, 4);
    }

    #[test]
    fn check_kept_tickets_errors() {
        let offered = tickets(3);
        let kept: SortedBag<Ticket> = offered.iter().take(1).cloned().collect();
        let foreign = SortedBag::of(1, Ticket::single(station(7), station(8), 1).unwrap());

        assert_eq!(Manager::check_kept_tickets(PlayerId::Player1, &offered, &kept, 1), Ok(()));
        assert_eq!(
            Manager::check_kept_tickets(PlayerId::Player1, &offered, &SortedBag::new(), 0),
            Ok(())
        );
        assert_eq!(
            Manager::check_kept_tickets(PlayerId::Player1, &offered, &foreign, 0),
            Err(GameError::Rules(RulesError::TicketsNotOffered))
        );
        assert_eq!(
            Manager::check_kept_tickets(PlayerId::Player2, &offered, &kept, 3),
            Err(GameError::TooFewTicketsKept {
                player: PlayerId::Player2,
                kept: 1,
                required: 3,
            })
        );
    }
}
