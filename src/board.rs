use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::card::{format_cards, parse_cards, Card, DECK_SIZE, KING};
use crate::container::{Container, ContainerKind};
use crate::dealer::Deck;
use crate::error::ParseError;

pub const CASCADES: usize = 8;
pub const FREE_CELLS: usize = 4;
pub const FOUNDATIONS: usize = 4;

const CONTAINERS: usize = CASCADES + FREE_CELLS + FOUNDATIONS;
/// Lines in the textual form: every container, then the draw pile.
const BOARD_LINES: usize = CONTAINERS + 1;

/// Names one container on the board.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ContainerId {
    Cascade(usize),
    FreeCell(usize),
    Foundation(usize),
}

impl ContainerId {
    pub fn kind(&self) -> ContainerKind {
        match *self {
            ContainerId::Cascade(_) => ContainerKind::Cascade,
            ContainerId::FreeCell(_) => ContainerKind::FreeCell,
            ContainerId::Foundation(_) => ContainerKind::Foundation,
        }
    }

    /// Returns whether the index names a container on the board.
    pub fn is_valid(&self) -> bool {
        match *self {
            ContainerId::Cascade(n) => n < CASCADES,
            ContainerId::FreeCell(n) => n < FREE_CELLS,
            ContainerId::Foundation(n) => n < FOUNDATIONS,
        }
    }

    /// Returns every container, cascades first, then free cells, then foundations.
    pub fn all() -> impl Iterator<Item = ContainerId> {
        (0..CONTAINERS).map(ContainerId::from_slot)
    }

    fn slot(&self) -> usize {
        match *self {
            ContainerId::Cascade(n) => {
                assert!(n < CASCADES, "no cascade {}", n);
                n
            }
            ContainerId::FreeCell(n) => {
                assert!(n < FREE_CELLS, "no free cell {}", n);
                CASCADES + n
            }
            ContainerId::Foundation(n) => {
                assert!(n < FOUNDATIONS, "no foundation {}", n);
                CASCADES + FREE_CELLS + n
            }
        }
    }

    fn from_slot(slot: usize) -> ContainerId {
        if slot < CASCADES {
            ContainerId::Cascade(slot)
        } else if slot < CASCADES + FREE_CELLS {
            ContainerId::FreeCell(slot - CASCADES)
        } else {
            ContainerId::Foundation(slot - CASCADES - FREE_CELLS)
        }
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ContainerId::Cascade(n) => write!(f, "cascade {}", n),
            ContainerId::FreeCell(n) => write!(f, "free cell {}", n),
            ContainerId::Foundation(n) => write!(f, "foundation {}", n),
        }
    }
}

/// The playing field.
///
/// Every one of the 52 cards is held by exactly one container or by the
/// draw pile. Occupancy counters are adjusted as containers gain or lose
/// their last card and are never recomputed during play.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Board {
    containers: Vec<Container>,
    draw_pile: Deck,
    open_free_cells: usize,
    open_cascades: usize,
}

impl Board {
    /// Returns an empty board with all cards in the draw pile.
    pub fn new(draw_pile: Deck) -> Board {
        let containers = ContainerId::all()
            .map(|id| Container::new(id.kind()))
            .collect();

        Board{
            containers,
            draw_pile,
            open_free_cells: FREE_CELLS,
            open_cascades: CASCADES,
        }
    }

    /// Sets up a position from hand notation.
    ///
    /// Cards not named by any container are left face down in the draw pile.
    pub fn from_layout(cascades: &[&str], free_cells: &[&str], foundations: &[&str])
            -> Result<Board, ParseError> {
        let groups = [
            (cascades.len(), CASCADES),
            (free_cells.len(), FREE_CELLS),
            (foundations.len(), FOUNDATIONS),
        ];

        for &(found, expected) in &groups {
            if found > expected {
                return Err(ParseError::LineCount{expected, found});
            }
        }

        let mut hands = vec![Vec::new(); CONTAINERS];

        for (i, s) in cascades.iter().enumerate() {
            hands[ContainerId::Cascade(i).slot()] = parse_cards(s)?;
        }
        for (i, s) in free_cells.iter().enumerate() {
            hands[ContainerId::FreeCell(i).slot()] = parse_cards(s)?;
        }
        for (i, s) in foundations.iter().enumerate() {
            hands[ContainerId::Foundation(i).slot()] = parse_cards(s)?;
        }

        let placed = hands.iter().flatten().map(|c| (c.rank, c.suit))
            .collect::<HashSet<_>>();
        let rest = Deck::new().cards().iter()
            .filter(|c| !placed.contains(&(c.rank, c.suit)))
            .copied().collect();

        Board::from_parts(hands, rest)
    }

    fn from_parts(hands: Vec<Vec<Card>>, draw_pile: Vec<Card>) -> Result<Board, ParseError> {
        let mut board = Board::new(Deck::from_cards(draw_pile));

        for (slot, cards) in hands.into_iter().enumerate() {
            let id = ContainerId::from_slot(slot);
            let container = &mut board.containers[slot];

            container.extend(cards);
            container.check_invariants()
                .map_err(|reason| ParseError::InvalidContainer{container: id, reason})?;

            if !container.is_empty() {
                board.occupy(id);
            }
        }

        board.check_card_set()?;

        Ok(board)
    }

    fn check_card_set(&self) -> Result<(), ParseError> {
        let mut seen = HashSet::with_capacity(DECK_SIZE);
        let mut n = 0;

        for &card in self.all_cards() {
            if !seen.insert((card.rank, card.suit)) {
                return Err(ParseError::DuplicateCard(card));
            }
            n += 1;
        }

        if n != DECK_SIZE {
            return Err(ParseError::CardCount(n));
        }

        Ok(())
    }

    /// # Panics
    ///
    /// If `id` does not name a container on the board; see [`Board::get`].
    pub fn container(&self, id: ContainerId) -> &Container {
        &self.containers[id.slot()]
    }

    /// Returns the container named by `id`, or `None` if there is no such
    /// container.
    pub fn get(&self, id: ContainerId) -> Option<&Container> {
        if id.is_valid() {
            Some(&self.containers[id.slot()])
        } else {
            None
        }
    }

    pub fn cascades(&self) -> &[Container] {
        &self.containers[..CASCADES]
    }

    pub fn free_cells(&self) -> &[Container] {
        &self.containers[CASCADES..CASCADES + FREE_CELLS]
    }

    pub fn foundations(&self) -> &[Container] {
        &self.containers[CASCADES + FREE_CELLS..]
    }

    pub fn draw_pile(&self) -> &Deck {
        &self.draw_pile
    }

    /// Number of free cells holding no card.
    pub fn open_free_cells(&self) -> usize {
        self.open_free_cells
    }

    /// Number of cascades holding no card.
    pub fn open_cascades(&self) -> usize {
        self.open_cascades
    }

    /// Iterates over every card on the board, including the draw pile.
    pub fn all_cards(&self) -> impl Iterator<Item = &Card> {
        self.containers.iter()
            .flat_map(|c| c.cards().iter())
            .chain(self.draw_pile.cards().iter())
    }

    /// Returns whether every foundation is complete.
    pub fn is_won(&self) -> bool {
        self.foundations().iter().all(|f| f.len() == KING as usize)
    }

    /// Moves the top `n` cards of `from` onto `to`, preserving their order.
    ///
    /// Callers must have validated the move; this only asserts its
    /// structural preconditions.
    pub(crate) fn transfer(&mut self, n: usize, from: ContainerId, to: ContainerId) {
        assert!(n != 0);
        assert!(from != to);

        let cards = self.containers[from.slot()].take_top(n);

        if self.container(from).is_empty() {
            self.vacate(from);
        }
        if self.container(to).is_empty() {
            self.occupy(to);
        }

        self.containers[to.slot()].extend(cards);

        debug_assert!(self.container(to).check_invariants().is_ok());
    }

    /// Deals the top card of the draw pile face up onto `to`.
    ///
    /// Returns `false` when the draw pile is empty.
    pub(crate) fn deal_card(&mut self, to: ContainerId) -> bool {
        let mut card = match self.draw_pile.deal_card() {
            Some(c) => c,
            None => return false
        };

        if !card.is_face_up() {
            card.flip();
        }

        if self.container(to).is_empty() {
            self.occupy(to);
        }

        self.containers[to.slot()].push(card);
        true
    }

    fn occupy(&mut self, id: ContainerId) {
        match id.kind() {
            ContainerKind::Cascade => self.open_cascades -= 1,
            ContainerKind::FreeCell => self.open_free_cells -= 1,
            ContainerKind::Foundation => ()
        }
    }

    fn vacate(&mut self, id: ContainerId) {
        match id.kind() {
            ContainerKind::Cascade => self.open_cascades += 1,
            ContainerKind::FreeCell => self.open_free_cells += 1,
            ContainerKind::Foundation => ()
        }
    }
}

/// Writes one line of hand notation per container, cascades first, then
/// free cells and foundations, with the draw pile on the last line.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for c in &self.containers {
            writeln!(f, "{}", format_cards(c.cards()))?;
        }
        writeln!(f, "{}", format_cards(self.draw_pile.cards()))
    }
}

impl FromStr for Board {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Board, ParseError> {
        let lines = s.lines().collect::<Vec<_>>();

        if lines.len() != BOARD_LINES {
            return Err(ParseError::LineCount{
                expected: BOARD_LINES,
                found: lines.len(),
            });
        }

        let hands = lines[..CONTAINERS].iter()
            .map(|line| parse_cards(line))
            .collect::<Result<Vec<_>, _>>()?;
        let draw_pile = parse_cards(lines[CONTAINERS])?;

        Board::from_parts(hands, draw_pile)
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Board, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
