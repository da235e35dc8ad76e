use crate::bag::SortedBag;
use crate::error::{RulesError, RulesResult};

use im::Vector;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::iter::FromIterator;

/// An immutable draw pile. The top of the deck is its first element.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Deck<T: Clone> {
    cards: Vector<T>,
}

impl<T: Clone> Deck<T> {
    /// Number of cards left in the deck.
    #[inline]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn top_card(&self) -> RulesResult<&T> {
        self.cards.front().ok_or(RulesError::EmptyDeck)
    }

    pub fn without_top_card(&self) -> RulesResult<Self> {
        if self.is_empty() {
            return Err(RulesError::EmptyDeck);
        }

        self.without_top_cards(1)
    }

    /// The deck without its `count` top cards.
    pub fn without_top_cards(&self, count: usize) -> RulesResult<Self> {
        self.check_count(count)?;

        Ok(Self {
            cards: self.cards.skip(count),
        })
    }

    /// All cards, from the top down.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.cards.iter()
    }

    fn check_count(&self, count: usize) -> RulesResult<()> {
        if count > self.len() {
            return Err(RulesError::CountOutOfRange {
                count,
                size: self.len(),
            });
        }

        Ok(())
    }
}

impl<T: Ord + Clone> Deck<T> {
    /// A deck holding the given cards in a uniformly random order.
    ///
    /// # Example
    /// ```
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    /// use tchu::bag::SortedBag;
    /// use tchu::card::Card;
    /// use tchu::deck::Deck;
    ///
    /// let cards = SortedBag::of(3, Card::Red).with_added(2, Card::Locomotive);
    /// let deck = Deck::of(&cards, &mut ChaCha8Rng::seed_from_u64(2021));
    ///
    /// assert_eq!(deck.len(), 5);
    /// assert_eq!(deck.top_cards(5).unwrap(), cards);
    /// ```
    pub fn of<R: Rng + ?Sized>(cards: &SortedBag<T>, rng: &mut R) -> Self {
        let mut cards = cards.to_vec();
        cards.shuffle(rng);

        cards.into_iter().collect()
    }

    /// The `count` top cards, as a bag.
    pub fn top_cards(&self, count: usize) -> RulesResult<SortedBag<T>> {
        self.check_count(count)?;

        Ok(self.cards.iter().take(count).cloned().collect())
    }
}

/// Builds a deck whose top card is the first item.
impl<T: Clone> FromIterator<T> for Deck<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            cards: iter.into_iter().collect(),
        }
    }
}
