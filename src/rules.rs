//! Move legality.
//!
//! A unit is either the top card of a container or a run: a suffix of a
//! cascade in which each card stacks on the one beneath it. Moving a run of
//! `k` cards is a supermove and is limited by how many cards the open free
//! cells and open cascades could stage.

use std::fmt;

use crate::board::{Board, ContainerId};
use crate::card::{format_cards, Card};
use crate::container::{can_stack_on_cascade, can_stack_on_foundation, Container, ContainerKind};
use crate::error::{MoveError, Rejection};

/// A card or run of cards that moves as one, bottom card first.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Unit {
    cards: Vec<Card>,
}

impl Unit {
    /// # Panics
    ///
    /// If `cards` is empty.
    pub fn new(cards: Vec<Card>) -> Unit {
        assert!(!cards.is_empty(), "empty unit");
        Unit{cards}
    }

    pub fn single(card: Card) -> Unit {
        Unit{cards: vec![card]}
    }

    pub fn cards(&self) -> &[Card] { &self.cards }

    pub fn len(&self) -> usize { self.cards.len() }

    /// The card that lands on the destination.
    pub fn bottom(&self) -> Card {
        self.cards[0]
    }

    pub fn top(&self) -> Card {
        self.cards[self.cards.len() - 1]
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(&format_cards(&self.cards))
    }
}

/// A unit picked up from `origin` but not yet placed.
///
/// The board is untouched until the unit is placed; an invalid drop
/// simply leaves it at its origin.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PendingTransfer {
    unit: Unit,
    origin: ContainerId,
}

impl PendingTransfer {
    pub fn new(unit: Unit, origin: ContainerId) -> PendingTransfer {
        PendingTransfer{unit, origin}
    }

    pub fn unit(&self) -> &Unit { &self.unit }

    pub fn origin(&self) -> ContainerId { self.origin }
}

/// Result of a successful validation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Verdict {
    /// The unit is dropped back onto its origin; nothing moves.
    Return,
    /// The unit may be transferred.
    Transfer,
}

/// Returns the length of the deepest run at the top of `cards`.
pub fn run_length(cards: &[Card]) -> usize {
    if cards.is_empty() {
        return 0;
    }

    let pairs = cards.iter().zip(cards[1..].iter());
    let breaks = pairs.rev().take_while(|&(&below, &above)| can_stack_on_cascade(above, below));

    1 + breaks.count()
}

/// Returns every unit that may be picked up from `container`, smallest first.
pub fn legal_units(container: &Container) -> Vec<Unit> {
    let cards = container.cards();

    match container.kind() {
        ContainerKind::Foundation => Vec::new(),
        ContainerKind::FreeCell => cards.last().map(|&c| Unit::single(c)).into_iter().collect(),
        ContainerKind::Cascade => {
            (1..=run_length(cards))
                .map(|n| Unit::new(container.top_cards(n).to_vec()))
                .collect()
        }
    }
}

/// Returns the unit starting at card index `position` of `container`, if
/// that card and everything above it may be picked up.
pub fn unit_at(container: &Container, position: usize) -> Option<Unit> {
    let len = container.len();

    if position >= len {
        return None;
    }

    let n = len - position;

    if n <= legal_units(container).len() {
        Some(Unit::new(container.top_cards(n).to_vec()))
    } else {
        None
    }
}

/// Maximum number of cards that may move from `from` to `to` at once.
///
/// `(1 + open free cells) * 2 ^ open cascades`, where an empty source or
/// destination does not count as an open cascade for its own move.
pub fn max_movable(board: &Board, from: ContainerId, to: ContainerId) -> usize {
    let mut open_cascades = board.open_cascades();

    for &id in &[from, to] {
        if id.kind() == ContainerKind::Cascade && board.container(id).is_empty() {
            open_cascades -= 1;
        }
    }

    (1 + board.open_free_cells()) << open_cascades
}

/// Checks whether `unit` may move from `from` to `to`.
///
/// `unit` must be one of the units [`legal_units`] yields for `from`;
/// otherwise `EmptySelection` is returned.
pub fn check_move(board: &Board, unit: &Unit, from: ContainerId, to: ContainerId)
        -> Result<Verdict, MoveError> {
    for &id in &[from, to] {
        if !id.is_valid() {
            return Err(MoveError::IllegalAddress(id));
        }
    }

    let source = board.container(from);

    if from.kind() == ContainerKind::Foundation {
        return Err(Rejection::FoundationSource.into());
    }

    let k = unit.len();
    let on_top = k <= source.len() && source.top_cards(k) == unit.cards();

    if !on_top || k > run_length(source.cards()) ||
            (from.kind() == ContainerKind::FreeCell && k != 1) {
        return Err(MoveError::EmptySelection{
            container: from,
            position: source.len().saturating_sub(k),
        });
    }

    if from == to {
        return Ok(Verdict::Return);
    }

    let capacity = max_movable(board, from, to);

    if k > capacity {
        return Err(Rejection::ExceedsCapacity{len: k, capacity}.into());
    }

    check_placement(board.container(to), unit)?;

    Ok(Verdict::Transfer)
}

/// Checks the destination rules for `unit` against `dest`'s current top card.
fn check_placement(dest: &Container, unit: &Unit) -> Result<(), Rejection> {
    let moving = unit.bottom();

    match (dest.kind(), dest.top()) {
        (ContainerKind::Cascade, None) => Ok(()),
        (ContainerKind::Cascade, Some(target)) => {
            if can_stack_on_cascade(moving, target) {
                Ok(())
            } else {
                Err(Rejection::DoesNotStack{moving, target})
            }
        }
        (_, _) if unit.len() > 1 => Err(Rejection::RunNeedsCascade(unit.len())),
        (ContainerKind::FreeCell, None) => Ok(()),
        (ContainerKind::FreeCell, Some(_)) => Err(Rejection::FreeCellOccupied),
        (ContainerKind::Foundation, None) => {
            if moving.is_ace() {
                Ok(())
            } else {
                Err(Rejection::FoundationNeedsAce(moving))
            }
        }
        (ContainerKind::Foundation, Some(target)) => {
            if can_stack_on_foundation(moving, target) {
                Ok(())
            } else {
                Err(Rejection::FoundationOrder{moving, target})
            }
        }
    }
}

/// Returns whether `card` should be promoted to a foundation automatically.
///
/// Aces and twos always are. Higher cards are held back while any card in
/// a cascade or free cell could still be placed on them.
pub fn should_auto_complete(board: &Board, card: Card) -> bool {
    if card.rank.0 <= 2 {
        return true;
    }

    !board.cascades().iter().chain(board.free_cells())
        .flat_map(|c| c.cards().iter())
        .any(|&other| can_stack_on_cascade(other, card))
}

/// Finds the next card auto-complete would promote, scanning cascades then
/// free cells against each foundation in order.
pub fn next_auto_move(board: &Board) -> Option<(ContainerId, ContainerId)> {
    let sources = ContainerId::all()
        .filter(|id| id.kind() != ContainerKind::Foundation);

    for from in sources {
        let card = match board.container(from).top() {
            Some(c) => c,
            None => continue
        };

        let dest = board.foundations().iter().position(|f| f.accepts(card));

        if let Some(n) = dest {
            if should_auto_complete(board, card) {
                return Some((from, ContainerId::Foundation(n)));
            }
        }
    }

    None
}

/// Lists every legal move of a unit from one cascade onto another.
pub fn candidate_moves(board: &Board) -> Vec<(Unit, ContainerId, ContainerId)> {
    let cascades = ContainerId::all()
        .filter(|id| id.kind() == ContainerKind::Cascade)
        .collect::<Vec<_>>();
    let mut moves = Vec::new();

    for &from in &cascades {
        for unit in legal_units(board.container(from)) {
            for &to in &cascades {
                if to != from && check_move(board, &unit, from, to).is_ok() {
                    moves.push((unit.clone(), from, to));
                }
            }
        }
    }

    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::parse_cards;

    fn unit(s: &str) -> Unit {
        Unit::new(parse_cards(s).unwrap())
    }

    fn layout(cascades: &[&str], free_cells: &[&str], foundations: &[&str]) -> Board {
        Board::from_layout(cascades, free_cells, foundations).unwrap()
    }

    #[test]
    fn test_legal_units() {
        let board = layout(&["8D KS QH JC TD", "5H", ""], &["7C"], &["AS"]);

        let units = legal_units(board.container(ContainerId::Cascade(0)));
        assert_eq!(units, vec![unit("TD"), unit("JC TD"), unit("QH JC TD"),
            unit("KS QH JC TD")]);

        assert_eq!(legal_units(board.container(ContainerId::Cascade(1))), vec![unit("5H")]);
        assert!(legal_units(board.container(ContainerId::Cascade(2))).is_empty());
        assert_eq!(legal_units(board.container(ContainerId::FreeCell(0))), vec![unit("7C")]);
        assert!(legal_units(board.container(ContainerId::Foundation(0))).is_empty());
    }

    #[test]
    fn test_run_stops_at_first_break() {
        // QD does not stack on 9S; the run beneath it is not reachable
        let cards = parse_cards("QH JC TD 9S QD JS").unwrap();
        assert_eq!(run_length(&cards), 2);
        assert_eq!(run_length(&[]), 0);
    }

    #[test]
    fn test_unit_at() {
        let board = layout(&["8D KS QH JC"], &[], &[]);
        let cascade = board.container(ContainerId::Cascade(0));

        assert_eq!(unit_at(cascade, 3), Some(unit("JC")));
        assert_eq!(unit_at(cascade, 1), Some(unit("KS QH JC")));
        assert_eq!(unit_at(cascade, 0), None);
        assert_eq!(unit_at(cascade, 4), None);
    }

    #[test]
    fn test_max_movable() {
        // Two occupied free cells, one empty cascade besides the destination
        let board = layout(&["9S 8H 7C 6D 5S 4H 3C", "TH", "9C", "KD", "KC", "KH", "KS"],
            &["QS", "QC"], &[]);

        assert_eq!(board.open_free_cells(), 2);
        assert_eq!(board.open_cascades(), 1);
        assert_eq!(max_movable(&board, ContainerId::Cascade(0), ContainerId::Cascade(1)), 6);
        // An empty destination is not a staging cascade
        assert_eq!(max_movable(&board, ContainerId::Cascade(0), ContainerId::Cascade(7)), 3);
    }

    #[test]
    fn test_supermove_capacity() {
        let board = layout(&["9S 8H 7C 6D 5S 4H 3C", "TH", "9C", "KD", "KC", "KH", "KS"],
            &["QS", "QC"], &[]);
        let from = ContainerId::Cascade(0);

        assert_eq!(check_move(&board, &unit("9S 8H 7C 6D 5S 4H 3C"), from, ContainerId::Cascade(1)),
            Err(MoveError::IllegalMove(Rejection::ExceedsCapacity{len: 7, capacity: 6})));
        assert_eq!(check_move(&board, &unit("8H 7C 6D 5S 4H 3C"), from, ContainerId::Cascade(2)),
            Ok(Verdict::Transfer));
        assert_eq!(check_move(&board, &unit("4H 3C"), from, ContainerId::Cascade(7)),
            Ok(Verdict::Transfer));
        assert_eq!(check_move(&board, &unit("5S 4H 3C"), from, ContainerId::Cascade(7)),
            Ok(Verdict::Transfer));
        assert_eq!(check_move(&board, &unit("6D 5S 4H 3C"), from, ContainerId::Cascade(7)),
            Err(MoveError::IllegalMove(Rejection::ExceedsCapacity{len: 4, capacity: 3})));
    }

    #[test]
    fn test_destination_rules() {
        let board = layout(&["KS QH", "KD", "3C"], &["", "5D"], &["AH"]);
        let from = ContainerId::Cascade(0);

        assert_eq!(check_move(&board, &unit("KS QH"), from, ContainerId::FreeCell(0)),
            Err(MoveError::IllegalMove(Rejection::RunNeedsCascade(2))));
        assert_eq!(check_move(&board, &unit("QH"), from, ContainerId::FreeCell(0)),
            Ok(Verdict::Transfer));
        assert_eq!(check_move(&board, &unit("QH"), from, ContainerId::FreeCell(1)),
            Err(MoveError::IllegalMove(Rejection::FreeCellOccupied)));
        assert_eq!(check_move(&board, &unit("QH"), from, ContainerId::Cascade(1)),
            Err(MoveError::IllegalMove(Rejection::DoesNotStack{
                moving: "QH".parse().unwrap(),
                target: "KD".parse().unwrap(),
            })));
        assert_eq!(check_move(&board, &unit("QH"), from, ContainerId::Foundation(0)),
            Err(MoveError::IllegalMove(Rejection::FoundationOrder{
                moving: "QH".parse().unwrap(),
                target: "AH".parse().unwrap(),
            })));
        assert_eq!(check_move(&board, &unit("3C"), ContainerId::Cascade(2), ContainerId::Foundation(1)),
            Err(MoveError::IllegalMove(Rejection::FoundationNeedsAce("3C".parse().unwrap()))));
        assert_eq!(check_move(&board, &unit("5D"), ContainerId::FreeCell(1), ContainerId::Cascade(3)),
            Ok(Verdict::Transfer));
    }

    #[test]
    fn test_selection_must_be_on_top() {
        let board = layout(&["KS QH", "KD"], &[], &["AH"]);

        assert_eq!(check_move(&board, &unit("KS"), ContainerId::Cascade(0), ContainerId::Cascade(2)),
            Err(MoveError::EmptySelection{container: ContainerId::Cascade(0), position: 1}));
        assert_eq!(check_move(&board, &unit("KD"), ContainerId::Cascade(0), ContainerId::Cascade(2)),
            Err(MoveError::EmptySelection{container: ContainerId::Cascade(0), position: 1}));
        assert_eq!(check_move(&board, &unit("KD QS"), ContainerId::Cascade(1), ContainerId::Cascade(2)),
            Err(MoveError::EmptySelection{container: ContainerId::Cascade(1), position: 0}));
        assert_eq!(check_move(&board, &unit("AH"), ContainerId::Foundation(0), ContainerId::Cascade(2)),
            Err(MoveError::IllegalMove(Rejection::FoundationSource)));
    }

    #[test]
    fn test_return_to_origin() {
        let board = layout(&["KS QH"], &["5D"], &[]);

        assert_eq!(check_move(&board, &unit("KS QH"), ContainerId::Cascade(0), ContainerId::Cascade(0)),
            Ok(Verdict::Return));
        assert_eq!(check_move(&board, &unit("5D"), ContainerId::FreeCell(0), ContainerId::FreeCell(0)),
            Ok(Verdict::Return));
    }

    #[test]
    fn test_unknown_containers() {
        let board = layout(&["KS QH"], &["5D"], &[]);
        let from = ContainerId::Cascade(0);

        assert_eq!(check_move(&board, &unit("QH"), from, ContainerId::Cascade(8)),
            Err(MoveError::IllegalAddress(ContainerId::Cascade(8))));
        assert_eq!(check_move(&board, &unit("QH"), from, ContainerId::Foundation(4)),
            Err(MoveError::IllegalAddress(ContainerId::Foundation(4))));
        assert_eq!(check_move(&board, &unit("5D"), ContainerId::FreeCell(4), from),
            Err(MoveError::IllegalAddress(ContainerId::FreeCell(4))));
    }

    #[test]
    fn test_should_auto_complete() {
        let board = layout(&["KS 2H", "9C", "QD"], &["8D"], &["AH", "AS"]);

        assert!(should_auto_complete(&board, "2H".parse().unwrap()));
        // 8D could still land on 9C
        assert!(!should_auto_complete(&board, "9C".parse().unwrap()));
        assert!(should_auto_complete(&board, "QD".parse().unwrap()));
    }

    #[test]
    fn test_next_auto_move() {
        let board = layout(&["KS 3H", "2H"], &[], &["AH"]);

        assert_eq!(next_auto_move(&board),
            Some((ContainerId::Cascade(1), ContainerId::Foundation(0))));

        let board = layout(&["KS 3H", "AD"], &[], &["AH"]);
        assert_eq!(next_auto_move(&board),
            Some((ContainerId::Cascade(1), ContainerId::Foundation(1))));

        let board = layout(&["KS 3H"], &[], &["AH"]);
        assert_eq!(next_auto_move(&board), None);
    }

    #[test]
    fn test_candidate_moves() {
        let board = layout(&["KS QH", "KC", "8D"], &[], &[]);
        let moves = candidate_moves(&board);

        assert!(moves.contains(&(unit("QH"), ContainerId::Cascade(0), ContainerId::Cascade(1))));
        assert!(moves.contains(&(unit("KS QH"), ContainerId::Cascade(0), ContainerId::Cascade(3))));
        assert!(moves.iter().all(|&(_, from, to)| from != to));
    }
}
