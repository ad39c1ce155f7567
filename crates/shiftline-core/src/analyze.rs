//! The level-analysis facade: configuration in, validated level out.

use crate::board::Board;
use crate::level::{Level, LevelSetup};
use crate::solver::{analyze_moves, classify, Solver};
use std::fmt;

/// Engine-wide configuration, passed explicitly so every analysis call is
/// pure and independently testable. No process-wide mutable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub width: usize,
    pub height: usize,
    /// Visited-state cap for the solver; see [`Solver::DEFAULT_STATE_CAP`].
    pub state_cap: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 8,
            state_cap: Solver::DEFAULT_STATE_CAP,
        }
    }
}

impl EngineConfig {
    pub fn with_state_cap(state_cap: usize) -> Self {
        Self {
            state_cap,
            ..Self::default()
        }
    }
}

/// Why a candidate configuration was rejected.
///
/// Every variant is a normal "try another candidate" outcome except
/// [`Rejection::StatisticsInconsistent`], which signals an engine defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// A block already sits on the hole of its own color.
    PreSolved,
    /// The search space was exhausted without reaching the goal.
    Unsolvable,
    /// The visited-state cap was hit before the goal was found. Not a
    /// proof of unsolvability, just a bounded-latency abort.
    SearchBudgetExceeded { visited: usize },
    /// Replaying the found solution failed to lock every color: the solver
    /// and the replay disagree about the goal. A defect, never expected.
    StatisticsInconsistent,
    /// The derived statistics match no classification rule. Expected for a
    /// large share of random candidates.
    NoClassification,
}

impl Rejection {
    /// True for rejections that indicate a bug rather than a bad candidate.
    pub fn is_defect(self) -> bool {
        matches!(self, Rejection::StatisticsInconsistent)
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::PreSolved => write!(f, "a block starts on its matching hole"),
            Rejection::Unsolvable => write!(f, "no move sequence reaches the goal"),
            Rejection::SearchBudgetExceeded { visited } => {
                write!(f, "search budget exceeded after {} states", visited)
            }
            Rejection::StatisticsInconsistent => {
                write!(f, "solution replay failed to lock every color")
            }
            Rejection::NoClassification => write!(f, "statistics match no difficulty rule"),
        }
    }
}

/// Facade over the solver, replay, and classifier.
///
/// `analyze` collapses every rejection into `None`, which is all that
/// generation loops care about; `try_analyze` keeps the reason for
/// diagnostics.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: EngineConfig,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze a candidate configuration into a validated [`Level`].
    pub fn analyze(&self, setup: &LevelSetup) -> Option<Level> {
        self.try_analyze(setup).ok()
    }

    /// Like [`Analyzer::analyze`], but reports why a candidate failed.
    pub fn try_analyze(&self, setup: &LevelSetup) -> Result<Level, Rejection> {
        if setup.has_presolved_block() {
            return Err(Rejection::PreSolved);
        }

        let board = Board::new(
            self.config.width,
            self.config.height,
            setup.walls.clone(),
            setup.holes.clone(),
        );
        let solution = Solver::with_state_cap(self.config.state_cap).solve(&board, &setup.blocks)?;
        if solution.moves.is_empty() {
            return Err(Rejection::PreSolved);
        }

        let stats = analyze_moves(&board, &setup.blocks, &solution.moves)?;

        let par_moves = solution.par_moves();
        let block_count = setup.block_count();
        let par_per_block = par_moves as f64 / block_count as f64;
        let ordering = stats.ordering();
        let multi_swipe = stats.multi_swipe();
        let label = classify(block_count, par_per_block, ordering, multi_swipe)
            .ok_or(Rejection::NoClassification)?;

        Ok(Level::new(
            self.config.width,
            self.config.height,
            setup.clone(),
            par_moves,
            par_per_block,
            label,
            ordering,
            multi_swipe,
        ))
    }
}
