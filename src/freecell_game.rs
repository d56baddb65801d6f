use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument, trace};

use crate::board::{Board, ContainerId};
use crate::dealer::deal;
use crate::error::MoveError;
use crate::history::{History, Move};
use crate::rules::{self, check_move, next_auto_move, unit_at, PendingTransfer, Unit, Verdict};
use crate::settings::Settings;

/// Receives the results of finished games.
///
/// Keeping win/loss records is left to the implementor.
pub trait StatsRecorder {
    fn on_game_won(&mut self, elapsed_secs: u32);

    fn on_game_abandoned(&mut self);
}

impl StatsRecorder for () {
    fn on_game_won(&mut self, _elapsed_secs: u32) {}

    fn on_game_abandoned(&mut self) {}
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GameState {
    /// Dealt, but no card has moved yet.
    NotStarted,
    InProgress,
    Won,
}

/// Result of a successful move proposal.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MoveOutcome {
    /// The unit was dropped onto its own origin; nothing changed.
    Returned,
    Applied {
        /// Cards promoted by auto-complete after the move.
        auto_moves: usize,
        won: bool,
    },
}

/// Owns the board and runs the turn sequence: validate, transfer, record,
/// auto-complete and check for a win.
pub struct FreeCellGame {
    board: Board,
    history: History,
    state: GameState,
    settings: Settings,
    started: Option<Instant>,
    final_time: Option<u32>,
    recorder: Box<dyn StatsRecorder>,
}

impl FreeCellGame {
    /// Starts a game with a randomly shuffled deal.
    pub fn new(settings: Settings) -> FreeCellGame {
        FreeCellGame::with_rng(settings, &mut StdRng::from_entropy())
    }

    /// Starts a game whose deal is determined by `seed`.
    pub fn with_seed(settings: Settings, seed: u64) -> FreeCellGame {
        FreeCellGame::with_rng(settings, &mut StdRng::seed_from_u64(seed))
    }

    pub fn with_rng<R: Rng + ?Sized>(settings: Settings, rng: &mut R) -> FreeCellGame {
        FreeCellGame::from_board(settings, deal(rng))
    }

    /// Starts play from an arbitrary position.
    pub fn from_board(settings: Settings, board: Board) -> FreeCellGame {
        let state = if board.is_won() {
            GameState::Won
        } else {
            GameState::NotStarted
        };

        FreeCellGame{
            board,
            history: History::new(),
            state,
            settings,
            started: None,
            final_time: None,
            recorder: Box::new(()),
        }
    }

    pub fn set_recorder(&mut self, recorder: Box<dyn StatsRecorder>) {
        self.recorder = recorder;
    }

    pub fn board(&self) -> &Board { &self.board }

    pub fn history(&self) -> &History { &self.history }

    pub fn state(&self) -> GameState { self.state }

    pub fn settings(&self) -> Settings { self.settings }

    pub fn set_auto_complete(&mut self, on: bool) {
        self.settings.auto_complete = on;
    }

    pub fn is_won(&self) -> bool {
        self.state == GameState::Won
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty() && !self.is_won()
    }

    /// Seconds since the first move; frozen once the game is won.
    pub fn play_time(&self) -> u32 {
        match (self.final_time, self.started) {
            (Some(t), _) => t,
            (None, Some(start)) => start.elapsed().as_secs() as u32,
            (None, None) => 0
        }
    }

    /// Deals a fresh board; `None` draws a seed from the system.
    ///
    /// An unfinished game in progress is reported as abandoned.
    pub fn new_game(&mut self, seed: Option<u64>) {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy()
        };

        self.new_game_with_rng(&mut rng);
    }

    #[instrument(skip(self, rng))]
    pub fn new_game_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.game_end();

        self.board = deal(rng);
        self.history.clear();
        self.state = GameState::NotStarted;
        self.started = None;
        self.final_time = None;

        debug!("new game");
    }

    /// Ends the game, reporting it as abandoned if it was unfinished.
    pub fn abandon(mut self) {
        self.game_end();
    }

    fn game_end(&mut self) {
        if self.state == GameState::InProgress {
            debug!(moves = self.history.len(), "game abandoned");
            self.recorder.on_game_abandoned();
        }
    }

    /// Units that may be picked up from `id`, smallest first.
    ///
    /// Returns an empty list if `id` names no container.
    pub fn legal_units(&self, id: ContainerId) -> Vec<Unit> {
        self.board.get(id).map_or_else(Vec::new, rules::legal_units)
    }

    /// Every legal cascade to cascade move.
    pub fn candidate_moves(&self) -> Vec<(Unit, ContainerId, ContainerId)> {
        rules::candidate_moves(&self.board)
    }

    /// Picks up the card at index `position` of `id` together with all
    /// cards above it.
    pub fn pick_up(&self, id: ContainerId, position: usize) -> Result<PendingTransfer, MoveError> {
        let container = self.board.get(id)
            .ok_or(MoveError::IllegalAddress(id))?;

        match unit_at(container, position) {
            Some(unit) => Ok(PendingTransfer::new(unit, id)),
            None => Err(MoveError::EmptySelection{container: id, position})
        }
    }

    /// Drops a picked up unit onto `to`.
    ///
    /// On error the board is unchanged and the unit belongs at
    /// `pending.origin()`.
    pub fn place(&mut self, pending: &PendingTransfer, to: ContainerId)
            -> Result<MoveOutcome, MoveError> {
        self.propose_move(pending.unit(), pending.origin(), to)
    }

    /// Validates and applies a move, then runs auto-complete if enabled.
    #[instrument(skip(self))]
    pub fn propose_move(&mut self, unit: &Unit, from: ContainerId, to: ContainerId)
            -> Result<MoveOutcome, MoveError> {
        if self.is_won() {
            return Err(MoveError::GameOver);
        }

        match check_move(&self.board, unit, from, to)? {
            Verdict::Return => Ok(MoveOutcome::Returned),
            Verdict::Transfer => {
                self.apply(unit.clone(), from, to);
                debug!(%unit, %from, %to, "move applied");

                let auto_moves = if self.settings.auto_complete {
                    self.auto_complete()
                } else {
                    0
                };

                Ok(MoveOutcome::Applied{
                    auto_moves,
                    won: self.is_won(),
                })
            }
        }
    }

    /// Promotes cards to the foundations until no more qualify.
    ///
    /// Each promotion is recorded as its own move. Returns the number of
    /// cards promoted.
    #[instrument(skip(self))]
    pub fn auto_complete(&mut self) -> usize {
        let mut n = 0;

        while !self.is_won() {
            let (from, to) = match next_auto_move(&self.board) {
                Some(mv) => mv,
                None => break
            };

            let unit = Unit::new(self.board.container(from).top_cards(1).to_vec());

            trace!(%unit, %from, %to, "auto-complete");

            self.apply(unit, from, to);
            n += 1;
        }

        n
    }

    /// Reverses the most recent move, manual or automatic.
    #[instrument(skip(self))]
    pub fn undo(&mut self) -> Result<Move, MoveError> {
        if self.is_won() {
            return Err(MoveError::GameOver);
        }

        let mv = self.history.pop().ok_or(MoveError::NothingToUndo)?;

        self.board.transfer(mv.unit().len(), mv.to(), mv.from());
        debug!(unit = %mv.unit(), from = %mv.to(), to = %mv.from(), "undo");

        Ok(mv)
    }

    fn apply(&mut self, unit: Unit, from: ContainerId, to: ContainerId) {
        self.board.transfer(unit.len(), from, to);
        self.history.push(Move::new(from, to, unit));

        if self.state == GameState::NotStarted {
            self.state = GameState::InProgress;
            self.started = Some(Instant::now());
        }

        if self.board.is_won() {
            self.game_won();
        }
    }

    fn game_won(&mut self) {
        let t = self.play_time();

        self.state = GameState::Won;
        self.final_time = Some(t);

        debug!(secs = t, moves = self.history.len(), "game won");
        self.recorder.on_game_won(t);
    }
}
