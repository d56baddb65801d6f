use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

pub const ACE: u8 = 1;
pub const TEN: u8 = 10;
pub const JACK: u8 = 11;
pub const QUEEN: u8 = 12;
pub const KING: u8 = 13;

pub const NUM_SUITS: usize = 4;
pub const NUM_RANKS: usize = 13;
pub const DECK_SIZE: usize = NUM_SUITS * NUM_RANKS;

pub const SUITS: [Suit; NUM_SUITS] = [Suit::Club, Suit::Diamond, Suit::Heart, Suit::Spade];
pub const RANKS: [u8; NUM_RANKS] = [ACE, 2, 3, 4, 5, 6, 7, 8, 9, TEN, JACK, QUEEN, KING];

const RANK_CHARS: &str = "A23456789TJQK";
const SUIT_CHARS: &str = "CDHS";

/// A playing card.
///
/// Rank and suit never change; only the face orientation may be flipped.
/// Equality includes orientation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
    face_up: bool,
}

impl Card {
    /// Creates a face down card.
    ///
    /// # Panics
    ///
    /// If `rank` is not within `ACE..=KING`.
    pub fn new(rank: u8, suit: Suit) -> Card {
        assert!((ACE..=KING).contains(&rank), "invalid rank {}", rank);

        Card{
            rank: Rank(rank),
            suit,
            face_up: false,
        }
    }

    /// Creates a face up card.
    pub fn face_up(rank: u8, suit: Suit) -> Card {
        let mut card = Card::new(rank, suit);
        card.face_up = true;
        card
    }

    pub fn flip(&mut self) {
        self.face_up = !self.face_up;
    }

    pub fn is_face_up(&self) -> bool {
        self.face_up
    }

    pub fn is_ace(&self) -> bool {
        self.rank.0 == ACE
    }

    pub fn color(&self) -> Color {
        self.suit.color()
    }

    /// Returns whether the two cards are the same physical card,
    /// regardless of orientation.
    pub fn same_card(&self, other: Card) -> bool {
        self.rank == other.rank && self.suit == other.suit
    }

    /// Orders by suit first, then rank.
    pub fn cmp_by_suit(&self, other: &Card) -> Ordering {
        self.suit.cmp(&other.suit)
            .then(self.rank.cmp(&other.rank))
            .then(self.face_up.cmp(&other.face_up))
    }
}

/// Orders by rank first, then suit.
impl Ord for Card {
    fn cmp(&self, other: &Card) -> Ordering {
        self.rank.cmp(&other.rank)
            .then(self.suit.cmp(&other.suit))
            .then(self.face_up.cmp(&other.face_up))
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Card) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Formats the card as a two character token, e.g. `TH`.
///
/// Face down cards are written in lower case, e.g. `th`.
impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (r, s) = (self.rank.char(), self.suit.char());

        if self.face_up {
            write!(f, "{}{}", r, s)
        } else {
            write!(f, "{}{}", r.to_ascii_lowercase(), s.to_ascii_lowercase())
        }
    }
}

impl FromStr for Card {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Card, ParseError> {
        let invalid = || ParseError::InvalidCard(s.to_owned());

        let mut chars = s.chars();
        let (r, su) = match (chars.next(), chars.next(), chars.next()) {
            (Some(r), Some(su), None) => (r, su),
            _ => return Err(invalid())
        };

        if !su.is_ascii_alphabetic() {
            return Err(invalid());
        }

        // The suit letter's case decides orientation; a face down token is
        // read upper-cased, a face up one as written
        let face_up = su.is_ascii_uppercase();
        let (r, su) = if face_up {
            (r, su)
        } else {
            (r.to_ascii_uppercase(), su.to_ascii_uppercase())
        };

        let rank = RANK_CHARS.find(r).ok_or_else(invalid)?;
        let suit = SUIT_CHARS.find(su).ok_or_else(invalid)?;

        let mut card = Card::new(rank as u8 + 1, SUITS[suit]);
        card.face_up = face_up;
        Ok(card)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub u8);

impl Rank {
    pub fn char(&self) -> char {
        RANK_CHARS.as_bytes()[(self.0 - 1) as usize] as char
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            ACE => f.pad("A"),
            JACK => f.pad("J"),
            QUEEN => f.pad("Q"),
            KING => f.pad("K"),
            n => f.pad(&n.to_string())
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Suit {
    Club,
    Diamond,
    Heart,
    Spade,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Color {
    Black,
    Red,
}

impl Suit {
    pub fn as_index(&self) -> usize {
        match *self {
            Suit::Club => 0,
            Suit::Diamond => 1,
            Suit::Heart => 2,
            Suit::Spade => 3,
        }
    }

    pub fn color(&self) -> Color {
        match *self {
            Suit::Club | Suit::Spade => Color::Black,
            Suit::Heart | Suit::Diamond => Color::Red,
        }
    }

    pub fn char(&self) -> char {
        SUIT_CHARS.as_bytes()[self.as_index()] as char
    }
}

/// Formats cards as space-separated tokens, bottom card first.
pub fn format_cards(cards: &[Card]) -> String {
    let mut s = String::with_capacity(cards.len() * 3);

    for (i, card) in cards.iter().enumerate() {
        if i != 0 {
            s.push(' ');
        }
        s.push_str(&card.to_string());
    }

    s
}

/// Parses whitespace-separated card tokens.
pub fn parse_cards(s: &str) -> Result<Vec<Card>, ParseError> {
    s.split_whitespace().map(str::parse).collect()
}

pub fn sort_by_rank(cards: &mut [Card]) {
    cards.sort();
}

pub fn sort_by_suit(cards: &mut [Card]) {
    cards.sort_by(Card::cmp_by_suit);
}
