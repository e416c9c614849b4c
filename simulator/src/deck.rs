use models::CardCategory;
use rand::{rngs::StdRng, seq::SliceRandom};

use crate::Card;

/// Draw pile, hand and discard pile of a hero. Every card lives in exactly one of them.
#[derive(Clone, Debug)]
pub struct Deck {
    draw_pile: Vec<Card>,
    hand: Vec<Card>,
    discard_pile: Vec<Card>,
    hand_capacity: usize,
}

impl Deck {
    /// The last card of `cards` is the top of the draw pile.
    pub fn new(cards: Vec<Card>, hand_capacity: usize) -> Self {
        Self {
            draw_pile: cards,
            hand: Vec::new(),
            discard_pile: Vec::new(),
            hand_capacity,
        }
    }

    pub fn shuffled(mut cards: Vec<Card>, hand_capacity: usize, rng: &mut StdRng) -> Self {
        cards.shuffle(rng);
        Self::new(cards, hand_capacity)
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn draw_pile(&self) -> &[Card] {
        &self.draw_pile
    }

    pub fn discard_pile(&self) -> &[Card] {
        &self.discard_pile
    }

    pub fn hand_capacity(&self) -> usize {
        self.hand_capacity
    }

    pub fn len(&self) -> usize {
        self.draw_pile.len() + self.hand.len() + self.discard_pile.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.draw_pile
            .iter()
            .chain(self.hand.iter())
            .chain(self.discard_pile.iter())
    }

    /// Moves up to `n` cards into the hand and returns how many were drawn.
    ///
    /// The discard pile is shuffled back at most once per call. Overflowing the hand
    /// capacity discards the least valuable cards afterwards.
    pub fn draw(&mut self, n: usize, rng: &mut StdRng) -> usize {
        let mut drawn = 0;
        let mut reshuffled = false;
        while drawn < n {
            if self.draw_pile.is_empty() {
                if reshuffled || self.discard_pile.is_empty() {
                    break;
                }
                self.reshuffle(rng);
                reshuffled = true;
            }
            let Some(card) = self.draw_pile.pop() else {
                break;
            };
            self.hand.push(card);
            drawn += 1;
        }
        while self.hand.len() > self.hand_capacity {
            if self.discard_weakest(1).is_empty() {
                break;
            }
        }
        drawn
    }

    fn reshuffle(&mut self, rng: &mut StdRng) {
        self.draw_pile.append(&mut self.discard_pile);
        self.draw_pile.shuffle(rng);
        #[cfg(feature = "trace")]
        tracing::trace!(cards = self.draw_pile.len(), "Reshuffle discard pile");
    }

    /// Plays the first hand card of `category`. The card moves to the discard pile and
    /// a copy is handed back for resolution.
    pub fn play_first(&mut self, category: CardCategory) -> Option<Card> {
        let position = self.hand.iter().position(|c| c.category() == category)?;
        let card = self.hand.remove(position);
        self.discard_pile.push(card.clone());
        Some(card)
    }

    /// Discards the `n` least valuable hand cards, earlier hand positions first on ties.
    pub fn discard_weakest(&mut self, n: usize) -> Vec<Card> {
        let mut discarded = Vec::with_capacity(n);
        for _ in 0..n {
            let Some((position, _)) = self
                .hand
                .iter()
                .enumerate()
                .min_by_key(|(_, card)| card.value())
            else {
                break;
            };
            let card = self.hand.remove(position);
            self.discard_pile.push(card.clone());
            discarded.push(card);
        }
        discarded
    }

    /// Places a card on top of the draw pile so that it is drawn next.
    pub fn put_on_top(&mut self, card: Card) {
        self.draw_pile.push(card);
    }

    pub fn has_in_hand(&self, category: CardCategory) -> bool {
        self.hand.iter().any(|c| c.category() == category)
    }
}
