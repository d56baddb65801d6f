//! Deck construction, shuffling and dealing.

use rand::Rng;
use tracing::debug;

use crate::board::{Board, ContainerId, CASCADES};
use crate::card::{Card, DECK_SIZE, RANKS, SUITS};

/// Undealt cards; the last card is the top of the deck.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Returns a full, face down deck ordered `ac ad ah as 2c ... ks`.
    pub fn new() -> Deck {
        let mut cards = Vec::with_capacity(DECK_SIZE);

        for &rank in &RANKS {
            for &suit in &SUITS {
                cards.push(Card::new(rank, suit));
            }
        }

        Deck{cards}
    }

    pub(crate) fn from_cards(cards: Vec<Card>) -> Deck {
        Deck{cards}
    }

    pub fn cards(&self) -> &[Card] { &self.cards }

    pub fn len(&self) -> usize { self.cards.len() }

    pub fn is_empty(&self) -> bool { self.cards.is_empty() }

    /// Fisher-Yates shuffle; every card is turned face down in the same pass.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let n = self.cards.len();

        for i in 0..n {
            let j = rng.gen_range(i..n);
            self.cards.swap(i, j);

            if self.cards[i].is_face_up() {
                self.cards[i].flip();
            }
        }
    }

    /// Removes the top card.
    pub fn deal_card(&mut self) -> Option<Card> {
        self.cards.pop()
    }
}

impl Default for Deck {
    fn default() -> Deck {
        Deck::new()
    }
}

/// Deals the board's draw pile round-robin onto the cascades, face up,
/// starting with the first cascade.
pub fn deal_draw_pile(board: &mut Board) {
    for i in (0..CASCADES).cycle() {
        if !board.deal_card(ContainerId::Cascade(i)) {
            break;
        }
    }
}

/// Shuffles a fresh deck and deals it onto an empty board.
pub fn deal<R: Rng + ?Sized>(rng: &mut R) -> Board {
    let mut deck = Deck::new();
    deck.shuffle(rng);

    let mut board = Board::new(deck);
    deal_draw_pile(&mut board);

    debug!(open_cascades = board.open_cascades(), "dealt new board");

    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_new_deck() {
        let deck = Deck::new();
        let distinct = deck.cards().iter().map(|c| (c.rank, c.suit))
            .collect::<HashSet<_>>();

        assert_eq!(deck.len(), DECK_SIZE);
        assert_eq!(distinct.len(), DECK_SIZE);
        assert!(deck.cards().iter().all(|c| !c.is_face_up()));
        assert_eq!(deck.cards()[0].to_string(), "ac");
        assert_eq!(deck.cards()[1].to_string(), "ad");
        assert_eq!(deck.cards()[51].to_string(), "ks");
    }

    #[test]
    fn test_shuffle_turns_cards_down() {
        let mut cards = Deck::new().cards().to_vec();
        for c in &mut cards {
            c.flip();
        }
        let mut deck = Deck::from_cards(cards);

        deck.shuffle(&mut StdRng::seed_from_u64(3));

        assert_eq!(deck.len(), DECK_SIZE);
        assert!(deck.cards().iter().all(|c| !c.is_face_up()));
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let mut a = Deck::new();
        let mut b = Deck::new();

        a.shuffle(&mut StdRng::seed_from_u64(42));
        b.shuffle(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
        assert_ne!(a, Deck::new());
    }

    #[test]
    fn test_deal() {
        let board = deal(&mut StdRng::seed_from_u64(11));
        let sizes = board.cascades().iter().map(|c| c.len()).collect::<Vec<_>>();

        assert_eq!(sizes, [7, 7, 7, 7, 6, 6, 6, 6]);
        assert!(board.draw_pile().is_empty());
        assert_eq!(board.open_cascades(), 0);
        assert_eq!(board.open_free_cells(), 4);
        assert!(board.all_cards().all(|c| c.is_face_up()));
    }

    #[test]
    fn test_deal_order() {
        let mut board = Board::new(Deck::new());
        deal_draw_pile(&mut board);

        // The deck is dealt from its top, the king of spades
        assert_eq!(board.cascades()[0].cards()[0].to_string(), "KS");
        assert_eq!(board.cascades()[1].cards()[0].to_string(), "KH");
        assert_eq!(board.cascades()[3].top().unwrap().to_string(), "AC");
    }
}
