use crate::error::{RulesError, RulesResult};
use crate::station::Station;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Answers whether two stations are linked by a player's network.
pub trait StationConnectivity {
    fn connected(&self, s1: &Station, s2: &Station) -> bool;
}

/// A journey between two stations, worth `points` when connected.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "TripData")]
pub struct Trip {
    from: Station,
    to: Station,
    points: u32,
}

#[derive(Deserialize)]
struct TripData {
    from: Station,
    to: Station,
    points: u32,
}

impl TryFrom<TripData> for Trip {
    type Error = RulesError;

    fn try_from(data: TripData) -> RulesResult<Self> {
        Self::new(data.from, data.to, data.points)
    }
}

impl Trip {
    pub fn new(from: Station, to: Station, points: u32) -> RulesResult<Self> {
        if points == 0 {
            return Err(RulesError::InvalidTrip(format!(
                "{} - {} must be worth at least one point",
                from, to
            )));
        }

        Ok(Self { from, to, points })
    }

    /// Every trip from a station of `from` to a station of `to`, all worth
    /// `points`. Pairs of identical stations are skipped.
    pub fn all(from: &[Station], to: &[Station], points: u32) -> RulesResult<Vec<Self>> {
        let mut trips = Vec::with_capacity(from.len() * to.len());

        for start in from {
            for end in to.iter().filter(|end| *end != start) {
                trips.push(Self::new(start.clone(), end.clone(), points)?);
            }
        }

        Ok(trips)
    }

    #[inline]
    pub fn from(&self) -> &Station {
        &self.from
    }

    #[inline]
    pub fn to(&self) -> &Station {
        &self.to
    }

    #[inline]
    pub fn points(&self) -> u32 {
        self.points
    }

    /// The trip's value if its stations are connected, its negated value otherwise.
    pub fn points_with(&self, connectivity: &impl StationConnectivity) -> i32 {
        let points = self.points as i32;
        if connectivity.connected(&self.from, &self.to) {
            points
        } else {
            -points
        }
    }
}

type Trips = SmallVec<[Trip; 1]>;

/// A destination ticket: one trip, or several trips sharing their origin
/// (a "to country" ticket where any of the destinations will do).
///
/// Tickets are ordered and compared by their text.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(try_from = "TicketData")]
pub struct Ticket {
    trips: Trips,
    text: String,
}

/// Only the trips are read back: the text is always recomputed from them.
#[derive(Deserialize)]
struct TicketData {
    trips: Trips,
}

impl TryFrom<TicketData> for Ticket {
    type Error = RulesError;

    fn try_from(data: TicketData) -> RulesResult<Self> {
        Self::new(data.trips)
    }
}

impl Ticket {
    /// Builds a ticket out of trips leaving from stations with the same name.
    ///
    /// # Example
    /// ```
    /// use tchu::station::Station;
    /// use tchu::ticket::{Ticket, Trip};
    ///
    /// let bern = Station::new(3, "Bern");
    /// let countries = [Station::new(34, "Germany"), Station::new(41, "Italy")];
    ///
    /// let ticket = Ticket::new(Trip::all(&[bern], &countries, 6).unwrap()).unwrap();
    /// assert_eq!(ticket.text(), "Bern - {Germany (6), Italy (6)}");
    /// ```
    pub fn new(trips: impl IntoIterator<Item = Trip>) -> RulesResult<Self> {
        let trips: Trips = trips.into_iter().collect();

        let origin = match trips.first() {
            Some(trip) => trip.from.name().to_owned(),
            None => {
                return Err(RulesError::InvalidTicket(
                    "a ticket needs at least one trip".to_owned(),
                ))
            }
        };

        if trips.iter().any(|trip| trip.from.name() != origin) {
            return Err(RulesError::InvalidTicket(format!(
                "all trips must leave from {}",
                origin
            )));
        }

        let text = Self::compute_text(&origin, &trips);
        Ok(Self { trips, text })
    }

    /// A single-trip ticket.
    pub fn single(from: Station, to: Station, points: u32) -> RulesResult<Self> {
        Self::new(Some(Trip::new(from, to, points)?))
    }

    fn compute_text(origin: &str, trips: &[Trip]) -> String {
        match trips {
            [trip] => format!("{} - {} ({})", origin, trip.to, trip.points),
            _ => {
                let destinations: BTreeSet<String> = trips
                    .iter()
                    .map(|trip| format!("{} ({})", trip.to, trip.points))
                    .collect();
                let destinations: Vec<String> = destinations.into_iter().collect();
                format!("{} - {{{}}}", origin, destinations.join(", "))
            }
        }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    /// Points this ticket is worth for a network with the given connectivity.
    ///
    /// A multi-trip ticket is worth its best connected trip. When none of its
    /// trips is connected, it costs the value of its cheapest trip.
    pub fn points(&self, connectivity: &impl StationConnectivity) -> i32 {
        let best_connected = self
            .trips
            .iter()
            .map(|trip| trip.points_with(connectivity))
            .filter(|points| *points > 0)
            .max();

        match best_connected {
            Some(points) => points,
            None => {
                let cheapest = self.trips.iter().map(Trip::points).min().unwrap_or(0);
                -(cheapest as i32)
            }
        }
    }
}

impl PartialEq for Ticket {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Ticket {}

impl Hash for Ticket {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl PartialOrd for Ticket {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ticket {
    fn cmp(&self, other: &Self) -> Ordering {
        self.text.cmp(&other.text)
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
