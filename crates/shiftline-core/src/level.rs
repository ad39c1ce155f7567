//! Level configurations and the validated `Level` record.

use crate::board::{Color, Position};
use crate::solver::{Difficulty, LockOrdering};
use std::collections::{BTreeMap, BTreeSet};

/// A candidate configuration: walls, holes, and the initial block layout.
///
/// Pure data, ordered containers throughout so iteration, signatures, and
/// serialization stay deterministic. Wall, hole, and block position sets are
/// pairwise disjoint, except that a hole and a block of different colors may
/// share a cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LevelSetup {
    pub walls: BTreeSet<Position>,
    pub holes: BTreeMap<Position, Color>,
    pub blocks: BTreeMap<Position, Color>,
}

impl LevelSetup {
    pub fn new(
        walls: BTreeSet<Position>,
        holes: BTreeMap<Position, Color>,
        blocks: BTreeMap<Position, Color>,
    ) -> Self {
        Self {
            walls,
            holes,
            blocks,
        }
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// True if any block already sits on the hole of its own color. Such a
    /// configuration is pre-solved and rejected by the analyzer.
    pub fn has_presolved_block(&self) -> bool {
        self.blocks
            .iter()
            .any(|(pos, color)| self.holes.get(pos) == Some(color))
    }
}

/// A validated, classified level.
///
/// Constructed only by [`crate::Analyzer`] (or derived from an existing
/// `Level` via [`Level::transformed`]); immutable once analyzed.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    width: usize,
    height: usize,
    setup: LevelSetup,
    par_moves: usize,
    par_per_block: f64,
    label: Difficulty,
    ordering: LockOrdering,
    multi_swipe: bool,
}

impl Level {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        width: usize,
        height: usize,
        setup: LevelSetup,
        par_moves: usize,
        par_per_block: f64,
        label: Difficulty,
        ordering: LockOrdering,
        multi_swipe: bool,
    ) -> Self {
        Self {
            width,
            height,
            setup,
            par_moves,
            par_per_block,
            label,
            ordering,
            multi_swipe,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn setup(&self) -> &LevelSetup {
        &self.setup
    }

    pub fn walls(&self) -> &BTreeSet<Position> {
        &self.setup.walls
    }

    pub fn holes(&self) -> &BTreeMap<Position, Color> {
        &self.setup.holes
    }

    pub fn blocks(&self) -> &BTreeMap<Position, Color> {
        &self.setup.blocks
    }

    /// Minimal number of swipes to solve the level.
    pub fn par_moves(&self) -> usize {
        self.par_moves
    }

    pub fn par_per_block(&self) -> f64 {
        self.par_per_block
    }

    pub fn label(&self) -> Difficulty {
        self.label
    }

    pub fn ordering(&self) -> LockOrdering {
        self.ordering
    }

    pub fn multi_swipe(&self) -> bool {
        self.multi_swipe
    }

    /// Orientation-sensitive identity key for this exact layout.
    pub fn signature(&self) -> String {
        crate::symmetry::signature(&self.setup)
    }

    /// Identity key shared by all 8 symmetric images of this layout.
    pub fn canonical_signature(&self) -> String {
        crate::symmetry::canonical_signature(&self.setup, self.width, self.height)
    }
}
