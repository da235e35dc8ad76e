use crate::bag::SortedBag;
use crate::card::{Card, Color};
use crate::constants::{ADDITIONAL_TUNNEL_CARDS, MAX_ROUTE_LENGTH, MIN_ROUTE_LENGTH, ROUTE_CLAIM_POINTS};
use crate::error::{RulesError, RulesResult};
use crate::station::Station;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::once;

/// Whether a route runs on the surface or through a tunnel.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Overground,
    /// Claiming an underground route may cost additional cards.
    Underground,
}

/// A claimable connection between two stations.
///
/// Routes are built once with the network and never change afterwards;
/// who owns a route is tracked by the player states, not by the route.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "RouteData")]
pub struct Route {
    id: String,
    station1: Station,
    station2: Station,
    length: u8,
    level: Level,
    /// `None` for a gray route, which accepts cards of any single color.
    color: Option<Color>,
}

/// A route as read from JSON, checked by [`Route::new`] before use.
#[derive(Deserialize)]
struct RouteData {
    id: String,
    station1: Station,
    station2: Station,
    length: u8,
    level: Level,
    color: Option<Color>,
}

impl TryFrom<RouteData> for Route {
    type Error = RulesError;

    fn try_from(data: RouteData) -> RulesResult<Self> {
        Self::new(
            data.id,
            data.station1,
            data.station2,
            data.length,
            data.level,
            data.color,
        )
    }
}

impl Route {
    /// Creates a route, checking that its stations differ and its length is
    /// within the bounds of the rules.
    ///
    /// # Example
    /// ```
    /// use tchu::card::Color;
    /// use tchu::route::{Level, Route};
    /// use tchu::station::Station;
    ///
    /// let bern = Station::new(3, "Bern");
    /// let fribourg = Station::new(9, "Fribourg");
    ///
    /// let route = Route::new("BER_FRI_1", bern.clone(), fribourg.clone(), 1, Level::Overground, Some(Color::Orange));
    /// assert!(route.is_ok());
    ///
    /// let loop_route = Route::new("BER_BER_1", bern.clone(), bern, 1, Level::Overground, None);
    /// assert!(loop_route.is_err());
    /// ```
    pub fn new(
        id: impl Into<String>,
        station1: Station,
        station2: Station,
        length: u8,
        level: Level,
        color: Option<Color>,
    ) -> RulesResult<Self> {
        let id = id.into();

        if station1 == station2 {
            return Err(RulesError::InvalidRoute(format!(
                "{} links {} to itself",
                id, station1
            )));
        }

        if !(MIN_ROUTE_LENGTH..=MAX_ROUTE_LENGTH).contains(&length) {
            return Err(RulesError::InvalidRoute(format!(
                "{} has length {}, which is not within [{}, {}]",
                id, length, MIN_ROUTE_LENGTH, MAX_ROUTE_LENGTH
            )));
        }

        Ok(Self {
            id,
            station1,
            station2,
            length,
            level,
            color,
        })
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn station1(&self) -> &Station {
        &self.station1
    }

    #[inline]
    pub fn station2(&self) -> &Station {
        &self.station2
    }

    #[inline]
    pub fn length(&self) -> u8 {
        self.length
    }

    #[inline]
    pub fn level(&self) -> Level {
        self.level
    }

    #[inline]
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    #[inline]
    pub fn is_tunnel(&self) -> bool {
        self.level == Level::Underground
    }

    /// Both endpoints, in the route's own order.
    pub fn stations(&self) -> [&Station; 2] {
        [&self.station1, &self.station2]
    }

    /// Whether `other` links the same two stations, in either direction.
    /// A route is parallel to itself.
    pub fn is_parallel_to(&self, other: &Route) -> bool {
        (self.station1 == other.station1 && self.station2 == other.station2)
            || (self.station1 == other.station2 && self.station2 == other.station1)
    }

    /// The endpoint that is not `station`.
    pub fn station_opposite(&self, station: &Station) -> RulesResult<&Station> {
        if *station == self.station1 {
            Ok(&self.station2)
        } else if *station == self.station2 {
            Ok(&self.station1)
        } else {
            Err(RulesError::InvalidRoute(format!(
                "{} is not an endpoint of {}",
                station, self.id
            )))
        }
    }

    /// Points granted when claiming this route.
    pub fn claim_points(&self) -> i32 {
        ROUTE_CLAIM_POINTS[self.length as usize]
    }

    /// Every set of cards that could pay for this route, sorted by ascending
    /// number of locomotives, then by color.
    ///
    /// # Example
    /// ```
    /// use tchu::bag::SortedBag;
    /// use tchu::card::{Card, Color};
    /// use tchu::route::{Level, Route};
    /// use tchu::station::Station;
    ///
    /// let route = Route::new(
    ///     "AT1_STG_1",
    ///     Station::new(34, "Austria"),
    ///     Station::new(27, "St. Gallen"),
    ///     2,
    ///     Level::Underground,
    ///     Some(Color::Red),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(
    ///     route.possible_claim_cards(),
    ///     vec![
    ///         SortedBag::of(2, Card::Red),
    ///         SortedBag::of(1, Card::Red).with_added(1, Card::Locomotive),
    ///         SortedBag::of(2, Card::Locomotive),
    ///     ]
    /// );
    /// ```
    pub fn possible_claim_cards(&self) -> Vec<SortedBag<Card>> {
        let length = self.length as usize;
        let cars: Vec<Card> = match self.color {
            Some(color) => vec![Card::of(color)],
            None => Card::CARS.to_vec(),
        };

        match self.level {
            Level::Overground => cars
                .into_iter()
                .map(|card| SortedBag::of(length, card))
                .collect(),
            Level::Underground => (0..length)
                .flat_map(|locomotives| {
                    cars.iter().map(move |card| {
                        SortedBag::of(length - locomotives, *card)
                            .with_added(locomotives, Card::Locomotive)
                    })
                })
                .chain(once(SortedBag::of(length, Card::Locomotive)))
                .collect(),
        }
    }

    /// Number of additional cards needed to claim this tunnel, given the
    /// cards initially played and the 3 cards drawn from the deck.
    ///
    /// A drawn locomotive always counts. A drawn wagon counts only if it
    /// matches a wagon of the initial cards; when only locomotives were played,
    /// drawn wagons never count.
    pub fn additional_claim_cards_count(
        &self,
        claim_cards: &SortedBag<Card>,
        drawn_cards: &SortedBag<Card>,
    ) -> RulesResult<usize> {
        if !self.is_tunnel() {
            return Err(RulesError::NotATunnel(self.id.clone()));
        }

        if drawn_cards.len() != ADDITIONAL_TUNNEL_CARDS {
            return Err(RulesError::InvalidDrawnCardsCount(drawn_cards.len()));
        }

        let played_car = claim_cards.iter().find(|card| !card.is_locomotive());
        let count = drawn_cards
            .iter()
            .filter(|drawn| drawn.is_locomotive() || Some(*drawn) == played_car)
            .count();

        Ok(count)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.station1, self.station2)
    }
}
