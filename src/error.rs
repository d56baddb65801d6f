use std::io;

use thiserror::Error;

use crate::board::ContainerId;
use crate::card::Card;

/// Reasons a proposed move, pick-up or undo is refused.
///
/// The board is never modified when one of these is returned.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum MoveError {
    #[error("illegal move: {0}")]
    IllegalMove(#[from] Rejection),
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("no movable cards at position {position} of {container}")]
    EmptySelection {
        container: ContainerId,
        position: usize,
    },
    #[error("the game is already won")]
    GameOver,
    #[error("no such container: {0}")]
    IllegalAddress(ContainerId),
}

/// Why a move failed validation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum Rejection {
    #[error("cards cannot be taken from a foundation")]
    FoundationSource,
    #[error("a run of {0} cards may only be placed on a cascade")]
    RunNeedsCascade(usize),
    #[error("not enough free space to move {len} cards (at most {capacity})")]
    ExceedsCapacity {
        len: usize,
        capacity: usize,
    },
    #[error("{moving} cannot be placed on {target}")]
    DoesNotStack {
        moving: Card,
        target: Card,
    },
    #[error("free cell is occupied")]
    FreeCellOccupied,
    #[error("only an ace may start a foundation, not {0}")]
    FoundationNeedsAce(Card),
    #[error("{moving} does not follow {target} on a foundation")]
    FoundationOrder {
        moving: Card,
        target: Card,
    },
}

/// Errors from the textual card, hand and board forms.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ParseError {
    #[error("invalid card token {0:?}")]
    InvalidCard(String),
    #[error("expected {expected} lines, found {found}")]
    LineCount {
        expected: usize,
        found: usize,
    },
    #[error("card {0} appears more than once")]
    DuplicateCard(Card),
    #[error("expected 52 cards, found {0}")]
    CardCount(usize),
    #[error("invalid contents for {container}: {reason}")]
    InvalidContainer {
        container: ContainerId,
        reason: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot find config dir")]
    NoConfigDir,
    #[error("settings i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
}
