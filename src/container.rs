//! Card containers and the placement predicates.

use crate::card::{Card, KING};

/// The kinds of container found on the board.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ContainerKind {
    /// Tableau column; unbounded.
    Cascade,
    /// Holds at most one card.
    FreeCell,
    /// One suit, ascending from ace to king.
    Foundation,
}

impl ContainerKind {
    /// Maximum number of cards a container of this kind may hold.
    pub fn capacity(&self) -> Option<usize> {
        match *self {
            ContainerKind::Cascade => None,
            ContainerKind::FreeCell => Some(1),
            ContainerKind::Foundation => Some(KING as usize),
        }
    }
}

/// Returns whether `moving` may be placed atop `target` on a cascade.
pub fn can_stack_on_cascade(moving: Card, target: Card) -> bool {
    moving.color() != target.color() && moving.rank.0 + 1 == target.rank.0
}

/// Returns whether `moving` may succeed `target` on a foundation.
pub fn can_stack_on_foundation(moving: Card, target: Card) -> bool {
    moving.suit == target.suit && moving.rank.0 == target.rank.0 + 1
}

/// An ordered pile of cards, bottom first.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Container {
    kind: ContainerKind,
    cards: Vec<Card>,
}

impl Container {
    pub fn new(kind: ContainerKind) -> Container {
        let cap = kind.capacity().unwrap_or(20);

        Container{
            kind,
            cards: Vec::with_capacity(cap),
        }
    }

    pub fn kind(&self) -> ContainerKind { self.kind }

    pub fn cards(&self) -> &[Card] { &self.cards }

    pub fn len(&self) -> usize { self.cards.len() }

    pub fn is_empty(&self) -> bool { self.cards.is_empty() }

    pub fn top(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    /// Returns whether this container would accept `card` as its new top card.
    ///
    /// This is the single-card placement rule for each kind.
    pub fn accepts(&self, card: Card) -> bool {
        match (self.kind, self.top()) {
            (ContainerKind::Cascade, None) => true,
            (ContainerKind::Cascade, Some(top)) => can_stack_on_cascade(card, top),
            (ContainerKind::FreeCell, top) => top.is_none(),
            (ContainerKind::Foundation, None) => card.is_ace(),
            (ContainerKind::Foundation, Some(top)) => can_stack_on_foundation(card, top),
        }
    }

    /// Returns the top `n` cards, bottom first.
    pub fn top_cards(&self, n: usize) -> &[Card] {
        assert!(n <= self.cards.len());
        &self.cards[self.cards.len() - n..]
    }

    pub(crate) fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub(crate) fn take_top(&mut self, n: usize) -> Vec<Card> {
        assert!(n <= self.cards.len(), "container holds fewer than {} cards", n);

        let start = self.cards.len() - n;
        self.cards.drain(start..).collect()
    }

    pub(crate) fn extend(&mut self, cards: Vec<Card>) {
        self.cards.extend(cards);
    }

    /// Checks the kind-specific invariants against the current contents.
    pub(crate) fn check_invariants(&self) -> Result<(), &'static str> {
        if let Some(cap) = self.kind.capacity() {
            if self.cards.len() > cap {
                return Err("too many cards");
            }
        }

        if self.kind == ContainerKind::Foundation {
            if let Some(first) = self.cards.first() {
                if !first.is_ace() {
                    return Err("foundation must start with an ace");
                }
            }

            let ordered = self.cards.iter().zip(self.cards.iter().skip(1))
                .all(|(&below, &above)| can_stack_on_foundation(above, below));

            if !ordered {
                return Err("foundation must ascend in a single suit");
            }
        }

        Ok(())
    }
}
