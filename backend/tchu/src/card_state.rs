use crate::bag::SortedBag;
use crate::card::Card;
use crate::constants::FACE_UP_CARDS_COUNT;
use crate::deck::Deck;
use crate::error::{RulesError, RulesResult};

use array_init::array_init;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// What every player can see of the cards on the table.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PublicCardState {
    face_up_cards: [Card; FACE_UP_CARDS_COUNT],
    deck_size: usize,
    discards_size: usize,
}

impl PublicCardState {
    pub fn new(face_up_cards: [Card; FACE_UP_CARDS_COUNT], deck_size: usize, discards_size: usize) -> Self {
        Self {
            face_up_cards,
            deck_size,
            discards_size,
        }
    }

    #[inline]
    pub fn face_up_cards(&self) -> &[Card; FACE_UP_CARDS_COUNT] {
        &self.face_up_cards
    }

    pub fn face_up_card(&self, slot: usize) -> RulesResult<Card> {
        self.face_up_cards
            .get(slot)
            .copied()
            .ok_or(RulesError::SlotOutOfRange(slot))
    }

    #[inline]
    pub fn deck_size(&self) -> usize {
        self.deck_size
    }

    #[inline]
    pub fn is_deck_empty(&self) -> bool {
        self.deck_size == 0
    }

    #[inline]
    pub fn discards_size(&self) -> usize {
        self.discards_size
    }
}

/// The cards on the table: face-up slots, draw pile and discard pile.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CardState {
    public: PublicCardState,
    deck: Deck<Card>,
    discards: SortedBag<Card>,
}

impl CardState {
    fn new(face_up_cards: [Card; FACE_UP_CARDS_COUNT], deck: Deck<Card>, discards: SortedBag<Card>) -> Self {
        Self {
            public: PublicCardState::new(face_up_cards, deck.len(), discards.len()),
            deck,
            discards,
        }
    }

    /// Lays the first 5 cards of `deck` face up and keeps the rest as the draw pile.
    ///
    /// # Example
    /// ```
    /// use tchu::card::Card;
    /// use tchu::card_state::CardState;
    /// use tchu::deck::Deck;
    ///
    /// let deck: Deck<Card> = std::iter::repeat(Card::Green).take(7).collect();
    /// let state = CardState::of(deck).unwrap();
    ///
    /// assert_eq!(state.public().face_up_cards(), &[Card::Green; 5]);
    /// assert_eq!(state.public().deck_size(), 2);
    /// assert_eq!(state.public().discards_size(), 0);
    /// ```
    pub fn of(deck: Deck<Card>) -> RulesResult<Self> {
        if deck.len() < FACE_UP_CARDS_COUNT {
            return Err(RulesError::DeckTooSmall {
                size: deck.len(),
                required: FACE_UP_CARDS_COUNT,
            });
        }

        let mut top = deck.iter().copied();
        // The deck holds enough cards for every slot, checked above.
        let face_up_cards: [Card; FACE_UP_CARDS_COUNT] =
            array_init(|_| top.next().unwrap_or(Card::Locomotive));

        Ok(Self::new(
            face_up_cards,
            deck.without_top_cards(FACE_UP_CARDS_COUNT)?,
            SortedBag::new(),
        ))
    }

    #[inline]
    pub fn public(&self) -> &PublicCardState {
        &self.public
    }

    /// Replaces the card of `slot` with the top card of the deck.
    pub fn with_drawn_face_up_card(&self, slot: usize) -> RulesResult<Self> {
        if slot >= FACE_UP_CARDS_COUNT {
            return Err(RulesError::SlotOutOfRange(slot));
        }

        let mut face_up_cards = self.public.face_up_cards;
        face_up_cards[slot] = *self.deck.top_card()?;

        Ok(Self::new(face_up_cards, self.deck.without_top_card()?, self.discards.clone()))
    }

    pub fn top_deck_card(&self) -> RulesResult<Card> {
        self.deck.top_card().copied()
    }

    pub fn without_top_deck_card(&self) -> RulesResult<Self> {
        Ok(Self::new(
            self.public.face_up_cards,
            self.deck.without_top_card()?,
            self.discards.clone(),
        ))
    }

    /// Shuffles the discards into a new deck. Only legal once the deck is empty.
    pub fn with_deck_recreated_from_discards<R: Rng + ?Sized>(&self, rng: &mut R) -> RulesResult<Self> {
        if !self.deck.is_empty() {
            return Err(RulesError::DeckNotEmpty(self.deck.len()));
        }

        Ok(Self::new(
            self.public.face_up_cards,
            Deck::of(&self.discards, rng),
            SortedBag::new(),
        ))
    }

    pub fn with_more_discarded_cards(&self, cards: &SortedBag<Card>) -> Self {
        Self::new(
            self.public.face_up_cards,
            self.deck.clone(),
            self.discards.union(cards),
        )
    }
}
