//! FreeCell rules engine
//!
//! Tracks the 52 cards across cascades, free cells and foundations,
//! validates single card moves and supermoves, records moves for undo and
//! promotes safe cards to the foundations automatically.
//! Rendering, input handling and statistics storage are left to the caller.

pub mod board;
pub mod card;
pub mod container;
pub mod dealer;
pub mod error;
pub mod freecell_game;
pub mod history;
pub mod rules;
pub mod settings;

pub use crate::board::{Board, ContainerId};
pub use crate::card::{Card, Color, Rank, Suit};
pub use crate::container::{Container, ContainerKind};
pub use crate::error::{MoveError, ParseError, Rejection, SettingsError};
pub use crate::freecell_game::{FreeCellGame, GameState, MoveOutcome, StatsRecorder};
pub use crate::history::{History, Move};
pub use crate::rules::{PendingTransfer, Unit};
pub use crate::settings::Settings;
