use crate::route::Route;
use crate::station::Station;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A walk through a network that never uses the same route twice.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct Trail {
    routes: Vec<Route>,
    /// Both endpoints are `None` for the empty trail.
    endpoints: Option<(Station, Station)>,
    length: u32,
}

/// A trail under construction: indices of the routes used, in walking order,
/// plus the station it starts from and the one it currently ends at.
struct PartialTrail<'a> {
    used: Vec<usize>,
    start: &'a Station,
    end: &'a Station,
    length: u32,
}

impl Trail {
    /// The longest trail that can be walked through `routes`.
    ///
    /// Candidates are grown breadth-first from every route taken in both
    /// directions, always extending at their end. When several trails share
    /// the maximal length, the first one to be completed wins, so the result
    /// only depends on the order of `routes`.
    ///
    /// # Example
    /// ```
    /// use tchu::route::{Level, Route};
    /// use tchu::station::Station;
    /// use tchu::trail::Trail;
    ///
    /// let (a, b, c) = (Station::new(0, "A"), Station::new(1, "B"), Station::new(2, "C"));
    /// let routes = vec![
    ///     Route::new("AB", a, b.clone(), 2, Level::Overground, None).unwrap(),
    ///     Route::new("BC", b, c, 3, Level::Overground, None).unwrap(),
    /// ];
    ///
    /// let trail = Trail::longest(&routes);
    /// assert_eq!(trail.length(), 5);
    /// assert_eq!(trail.to_string(), "A - C (5)");
    /// ```
    pub fn longest(routes: &[Route]) -> Trail {
        let mut active: Vec<PartialTrail> = routes
            .iter()
            .enumerate()
            .flat_map(|(index, route)| {
                let length = route.length() as u32;
                let forward = PartialTrail {
                    used: vec![index],
                    start: route.station1(),
                    end: route.station2(),
                    length,
                };
                let backward = PartialTrail {
                    used: vec![index],
                    start: route.station2(),
                    end: route.station1(),
                    length,
                };
                vec![forward, backward]
            })
            .collect();

        let mut longest: Option<PartialTrail> = None;
        while !active.is_empty() {
            let mut extended = Vec::new();

            for trail in active {
                let before = extended.len();
                Self::extend(&trail, routes, &mut extended);

                if extended.len() == before
                    && longest.as_ref().map_or(true, |best| trail.length > best.length)
                {
                    longest = Some(trail);
                }
            }

            active = extended;
        }

        match longest {
            Some(trail) => Trail {
                routes: trail.used.iter().map(|index| routes[*index].clone()).collect(),
                endpoints: Some((trail.start.clone(), trail.end.clone())),
                length: trail.length,
            },
            None => Trail::default(),
        }
    }

    /// Pushes every one-route extension of `trail` at its end.
    fn extend<'a>(trail: &PartialTrail<'a>, routes: &'a [Route], extended: &mut Vec<PartialTrail<'a>>) {
        for (index, route) in routes.iter().enumerate() {
            if trail.used.contains(&index) {
                continue;
            }

            let next = if route.station1() == trail.end {
                route.station2()
            } else if route.station2() == trail.end {
                route.station1()
            } else {
                continue;
            };

            let mut used = trail.used.clone();
            used.push(index);
            extended.push(PartialTrail {
                used,
                start: trail.start,
                end: next,
                length: trail.length + route.length() as u32,
            });
        }
    }

    /// Total length of the routes of the trail.
    #[inline]
    pub fn length(&self) -> u32 {
        self.length
    }

    /// The routes of the trail, in walking order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Where the trail starts, `None` for the empty trail.
    pub fn station1(&self) -> Option<&Station> {
        self.endpoints.as_ref().map(|(start, _)| start)
    }

    /// Where the trail ends, `None` for the empty trail.
    pub fn station2(&self) -> Option<&Station> {
        self.endpoints.as_ref().map(|(_, end)| end)
    }
}

impl fmt::Display for Trail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.endpoints {
            Some((start, end)) => write!(f, "{} - {} ({})", start, end, self.length),
            None => write!(f, "({})", self.length),
        }
    }
}
