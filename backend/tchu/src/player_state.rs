use crate::bag::SortedBag;
use crate::card::Card;
use crate::constants::{INITIAL_CARDS_COUNT, INITIAL_CAR_COUNT};
use crate::error::{RulesError, RulesResult};
use crate::partition::StationPartition;
use crate::route::Route;
use crate::ticket::Ticket;

use im::Vector;
use serde::{Deserialize, Serialize};

/// Largest number of additional cards a tunnel can require.
const MAX_ADDITIONAL_CARDS: usize = 3;

/// Information about a player's state that is visible to all players.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PublicPlayerState {
    ticket_count: usize,
    card_count: usize,
    /// Routes claimed by the player, in the order they were claimed.
    routes: Vector<Route>,
    /// Cars left. Derived from the routes, and never negative under legal play.
    car_count: u8,
    /// Sum of the claim points of every route.
    claim_points: i32,
}

impl PublicPlayerState {
    pub fn new(ticket_count: usize, card_count: usize, routes: Vector<Route>) -> Self {
        let used_cars: u32 = routes.iter().map(|route| route.length() as u32).sum();
        let car_count = (INITIAL_CAR_COUNT as u32).saturating_sub(used_cars) as u8;
        let claim_points = routes.iter().map(Route::claim_points).sum();

        Self {
            ticket_count,
            card_count,
            routes,
            car_count,
            claim_points,
        }
    }

    #[inline]
    pub fn ticket_count(&self) -> usize {
        self.ticket_count
    }

    #[inline]
    pub fn card_count(&self) -> usize {
        self.card_count
    }

    #[inline]
    pub fn routes(&self) -> &Vector<Route> {
        &self.routes
    }

    #[inline]
    pub fn car_count(&self) -> u8 {
        self.car_count
    }

    #[inline]
    pub fn claim_points(&self) -> i32 {
        self.claim_points
    }
}

/// The complete state of a player, including the tickets and cards only
/// they can see.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayerState {
    public: PublicPlayerState,
    tickets: SortedBag<Ticket>,
    cards: SortedBag<Card>,
}

impl PlayerState {
    pub fn new(tickets: SortedBag<Ticket>, cards: SortedBag<Card>, routes: Vector<Route>) -> Self {
        Self {
            public: PublicPlayerState::new(tickets.len(), cards.len(), routes),
            tickets,
            cards,
        }
    }

    /// The state of a player before the first turn: no tickets, no routes,
    /// and exactly 4 cards.
    pub fn initial(cards: SortedBag<Card>) -> RulesResult<Self> {
        if cards.len() != INITIAL_CARDS_COUNT {
            return Err(RulesError::InvalidInitialCards(cards.len()));
        }

        Ok(Self::new(SortedBag::new(), cards, Vector::new()))
    }

    #[inline]
    pub fn public(&self) -> &PublicPlayerState {
        &self.public
    }

    #[inline]
    pub fn tickets(&self) -> &SortedBag<Ticket> {
        &self.tickets
    }

    #[inline]
    pub fn cards(&self) -> &SortedBag<Card> {
        &self.cards
    }

    #[inline]
    pub fn routes(&self) -> &Vector<Route> {
        self.public.routes()
    }

    #[inline]
    pub fn car_count(&self) -> u8 {
        self.public.car_count()
    }

    pub fn with_added_tickets(&self, tickets: &SortedBag<Ticket>) -> Self {
        Self::new(
            self.tickets.union(tickets),
            self.cards.clone(),
            self.routes().clone(),
        )
    }

    pub fn with_added_card(&self, card: Card) -> Self {
        Self::new(
            self.tickets.clone(),
            self.cards.with_added(1, card),
            self.routes().clone(),
        )
    }

    /// Whether the player has enough cars and cards to claim `route`.
    pub fn can_claim_route(&self, route: &Route) -> bool {
        self.car_count() >= route.length()
            && route
                .possible_claim_cards()
                .iter()
                .any(|option| self.cards.contains_all(option))
    }

    /// The sets of cards from the player's hand that could pay for `route`,
    /// in the route's order.
    pub fn possible_claim_cards(&self, route: &Route) -> RulesResult<Vec<SortedBag<Card>>> {
        self.check_cars(route)?;

        Ok(route
            .possible_claim_cards()
            .into_iter()
            .filter(|option| self.cards.contains_all(option))
            .collect())
    }

    /// The sets of `additional_count` cards the player could add to
    /// `initial_cards` to claim a tunnel, sorted by ascending number of
    /// locomotives. Empty if the player can't pay.
    ///
    /// # Example
    /// ```
    /// use tchu::bag::SortedBag;
    /// use tchu::card::Card;
    /// use tchu::player_state::PlayerState;
    ///
    /// let hand = SortedBag::of(3, Card::Green).with_added(1, Card::Locomotive);
    /// let player = PlayerState::initial(hand).unwrap();
    ///
    /// let options = player.possible_additional_cards(1, &SortedBag::of(2, Card::Green)).unwrap();
    /// assert_eq!(options, vec![SortedBag::of(1, Card::Green), SortedBag::of(1, Card::Locomotive)]);
    /// ```
    pub fn possible_additional_cards(
        &self,
        additional_count: usize,
        initial_cards: &SortedBag<Card>,
    ) -> RulesResult<Vec<SortedBag<Card>>> {
        if !(1..=MAX_ADDITIONAL_CARDS).contains(&additional_count) {
            return Err(RulesError::InvalidAdditionalCardsCount(additional_count));
        }

        if initial_cards.is_empty() || initial_cards.distinct_count() > 2 {
            return Err(RulesError::InvalidInitialClaimCards);
        }

        let usable: SortedBag<Card> = self
            .cards
            .difference(initial_cards)
            .iter()
            .filter(|card| card.is_locomotive() || initial_cards.contains(*card))
            .copied()
            .collect();

        let mut options = usable.subsets_of_size(additional_count);
        options.sort_by_key(|option| option.count_of(&Card::Locomotive));

        Ok(options)
    }

    /// The player after claiming `route` with `claim_cards`.
    pub fn with_claimed_route(&self, route: Route, claim_cards: &SortedBag<Card>) -> RulesResult<Self> {
        self.check_cars(&route)?;

        if !self.cards.contains_all(claim_cards) {
            return Err(RulesError::CardsNotInHand);
        }

        let mut routes = self.routes().clone();
        routes.push_back(route);

        Ok(Self::new(
            self.tickets.clone(),
            self.cards.difference(claim_cards),
            routes,
        ))
    }

    /// Points earned (or lost) through the player's tickets.
    pub fn ticket_points(&self) -> i32 {
        let partition = StationPartition::of_routes(self.routes());

        self.tickets
            .iter()
            .map(|ticket| ticket.points(&partition))
            .sum()
    }

    /// Claim points plus ticket points. The longest-trail bonus is not included.
    pub fn final_points(&self) -> i32 {
        self.public.claim_points() + self.ticket_points()
    }

    fn check_cars(&self, route: &Route) -> RulesResult<()> {
        if self.car_count() < route.length() {
            return Err(RulesError::NotEnoughCars {
                route: route.id().to_owned(),
                length: route.length(),
                cars: self.car_count(),
            });
        }

        Ok(())
    }
}
