use crate::error::{RulesError, RulesResult};
use crate::route::Route;
use crate::station::Station;
use crate::ticket::StationConnectivity;

/// Connected components of a player's network, as a flattened union-find
/// over station ids.
///
/// Only ids below the partition's size are tracked; any other station is
/// connected to itself only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StationPartition {
    representatives: Vec<usize>,
}

/// Accumulates connections before freezing them into a [`StationPartition`].
#[derive(Clone, Debug)]
pub struct Builder {
    parents: Vec<usize>,
}

impl Builder {
    /// A builder where each of the `station_count` stations is alone.
    pub fn new(station_count: usize) -> Self {
        Self {
            parents: (0..station_count).collect(),
        }
    }

    /// Joins the components of both stations.
    pub fn connect(&mut self, s1: &Station, s2: &Station) -> RulesResult<&mut Self> {
        let root1 = self.representative(self.checked_id(s1)?);
        let root2 = self.representative(self.checked_id(s2)?);
        self.parents[root2] = root1;

        Ok(self)
    }

    /// Freezes the partition, pointing every station straight at its representative.
    pub fn build(mut self) -> StationPartition {
        let representatives = (0..self.parents.len())
            .map(|id| self.representative(id))
            .collect();

        StationPartition { representatives }
    }

    fn checked_id(&self, station: &Station) -> RulesResult<usize> {
        if station.id() < self.parents.len() {
            Ok(station.id())
        } else {
            Err(RulesError::StationOutOfRange {
                id: station.id(),
                size: self.parents.len(),
            })
        }
    }

    fn representative(&mut self, id: usize) -> usize {
        let mut root = id;
        while self.parents[root] != root {
            root = self.parents[root];
        }

        // Path compression.
        let mut current = id;
        while self.parents[current] != root {
            let next = self.parents[current];
            self.parents[current] = root;
            current = next;
        }

        root
    }
}

impl StationPartition {
    pub fn builder(station_count: usize) -> Builder {
        Builder::new(station_count)
    }

    /// The partition of the network formed by `routes`, sized to fit its
    /// largest station id.
    ///
    /// # Example
    /// ```
    /// use tchu::partition::StationPartition;
    /// use tchu::route::{Level, Route};
    /// use tchu::station::Station;
    /// use tchu::ticket::StationConnectivity;
    ///
    /// let (a, b, c) = (Station::new(0, "A"), Station::new(1, "B"), Station::new(2, "C"));
    /// let routes = vec![
    ///     Route::new("AB", a.clone(), b.clone(), 2, Level::Overground, None).unwrap(),
    ///     Route::new("BC", b, c.clone(), 3, Level::Overground, None).unwrap(),
    /// ];
    ///
    /// let partition = StationPartition::of_routes(&routes);
    /// assert!(partition.connected(&a, &c));
    /// assert!(!partition.connected(&a, &Station::new(7, "Z")));
    /// ```
    pub fn of_routes<'a>(routes: impl IntoIterator<Item = &'a Route> + Clone) -> Self {
        let size = routes
            .clone()
            .into_iter()
            .map(|route| route.station1().id().max(route.station2().id()) + 1)
            .max()
            .unwrap_or(0);

        let mut builder = Builder::new(size);
        for route in routes {
            let root1 = builder.representative(route.station1().id());
            let root2 = builder.representative(route.station2().id());
            builder.parents[root2] = root1;
        }

        builder.build()
    }

    /// Number of stations tracked by the partition.
    pub fn len(&self) -> usize {
        self.representatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.representatives.is_empty()
    }
}

impl StationConnectivity for StationPartition {
    fn connected(&self, s1: &Station, s2: &Station) -> bool {
        match (
            self.representatives.get(s1.id()),
            self.representatives.get(s2.id()),
        ) {
            (Some(r1), Some(r2)) => r1 == r2,
            _ => s1.id() == s2.id(),
        }
    }
}
