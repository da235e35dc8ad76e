use crate::bag::SortedBag;
use crate::constants::{CAR_CARDS_COUNT, LOCOMOTIVE_CARDS_COUNT};

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumCount, EnumIter};

/// Colors of wagon cards and colored routes.
///
/// The declaration order is the canonical order used everywhere a list of
/// options is presented (claim cards, additional cards).
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    EnumCount,
    EnumIter,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Color {
    Black,
    Violet,
    Blue,
    Green,
    Yellow,
    Orange,
    Red,
    White,
}

/// Represents the different kinds of cards a player can hold.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    EnumCount,
    EnumIter,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Card {
    Black,
    Violet,
    Blue,
    Green,
    Yellow,
    Orange,
    Red,
    White,
    /// Matches any color, and is the only card accepted on top of
    /// colored cards when paying for a tunnel.
    Locomotive,
}

lazy_static! {
    /// Every card of the game: 12 wagons of each color and 14 locomotives.
    pub static ref ALL_CARDS: SortedBag<Card> = Card::iter().fold(SortedBag::new(), |bag, card| {
        let count = if card.is_locomotive() {
            LOCOMOTIVE_CARDS_COUNT
        } else {
            CAR_CARDS_COUNT
        };
        bag.with_added(count, card)
    });
}

impl Card {
    /// The eight colored wagon cards, in canonical order.
    pub const CARS: [Card; 8] = [
        Card::Black,
        Card::Violet,
        Card::Blue,
        Card::Green,
        Card::Yellow,
        Card::Orange,
        Card::Red,
        Card::White,
    ];

    /// The wagon card of the given color.
    ///
    /// # Example
    /// ```
    /// use tchu::card::{Card, Color};
    ///
    /// assert_eq!(Card::of(Color::Red), Card::Red);
    /// assert_eq!(Card::of(Color::Red).color(), Some(Color::Red));
    /// assert_eq!(Card::Locomotive.color(), None);
    /// ```
    pub fn of(color: Color) -> Self {
        match color {
            Color::Black => Card::Black,
            Color::Violet => Card::Violet,
            Color::Blue => Card::Blue,
            Color::Green => Card::Green,
            Color::Yellow => Card::Yellow,
            Color::Orange => Card::Orange,
            Color::Red => Card::Red,
            Color::White => Card::White,
        }
    }

    /// The color of a wagon card, `None` for the locomotive.
    pub fn color(&self) -> Option<Color> {
        match self {
            Card::Black => Some(Color::Black),
            Card::Violet => Some(Color::Violet),
            Card::Blue => Some(Color::Blue),
            Card::Green => Some(Color::Green),
            Card::Yellow => Some(Color::Yellow),
            Card::Orange => Some(Color::Orange),
            Card::Red => Some(Color::Red),
            Card::White => Some(Color::White),
            Card::Locomotive => None,
        }
    }

    #[inline]
    pub fn is_locomotive(&self) -> bool {
        *self == Card::Locomotive
    }
}
