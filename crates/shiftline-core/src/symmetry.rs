//! The 8 symmetries of the square board: canonical signatures and
//! level transforms.
//!
//! Two configurations that are rotations or reflections of one another play
//! identically, so dedup keys a configuration by the lexicographically
//! smallest signature over all 8 images. The same transforms multiply one
//! validated level into fresh non-duplicate variants, with every derived
//! statistic carried over unchanged (symmetry preserves solvability and
//! solution length exactly).

use crate::board::Position;
use crate::level::{Level, LevelSetup};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// One element of the dihedral group D4.
///
/// Rotations and diagonal reflections require a square board; the flips and
/// the identity work for any dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symmetry {
    Identity,
    Rotate90,
    Rotate180,
    Rotate270,
    FlipHorizontal,
    FlipVertical,
    MainDiagonal,
    AntiDiagonal,
}

impl Symmetry {
    /// All 8 symmetries, identity first.
    pub const ALL: [Symmetry; 8] = [
        Symmetry::Identity,
        Symmetry::Rotate90,
        Symmetry::Rotate180,
        Symmetry::Rotate270,
        Symmetry::FlipHorizontal,
        Symmetry::FlipVertical,
        Symmetry::MainDiagonal,
        Symmetry::AntiDiagonal,
    ];

    /// The 7 non-identity variants, for producing distinct images.
    pub const VARIANTS: [Symmetry; 7] = [
        Symmetry::Rotate90,
        Symmetry::Rotate180,
        Symmetry::Rotate270,
        Symmetry::FlipHorizontal,
        Symmetry::FlipVertical,
        Symmetry::MainDiagonal,
        Symmetry::AntiDiagonal,
    ];

    /// Apply the transform to a coordinate on a `width` x `height` board.
    pub fn apply(self, pos: Position, width: usize, height: usize) -> Position {
        let Position { x, y } = pos;
        match self {
            Symmetry::Identity => Position::new(x, y),
            Symmetry::Rotate90 => {
                debug_assert_eq!(width, height, "rotation requires a square board");
                Position::new(y, width - 1 - x)
            }
            Symmetry::Rotate180 => Position::new(width - 1 - x, height - 1 - y),
            Symmetry::Rotate270 => {
                debug_assert_eq!(width, height, "rotation requires a square board");
                Position::new(height - 1 - y, x)
            }
            Symmetry::FlipHorizontal => Position::new(width - 1 - x, y),
            Symmetry::FlipVertical => Position::new(x, height - 1 - y),
            Symmetry::MainDiagonal => {
                debug_assert_eq!(width, height, "diagonal reflection requires a square board");
                Position::new(y, x)
            }
            Symmetry::AntiDiagonal => {
                debug_assert_eq!(width, height, "diagonal reflection requires a square board");
                Position::new(width - 1 - y, height - 1 - x)
            }
        }
    }
}

/// Orientation-sensitive identity key for a configuration.
///
/// Deterministic and order-independent: walls, holes, and blocks are listed
/// in sorted position order with their colors.
pub fn signature(setup: &LevelSetup) -> String {
    let mut out = String::from("W");
    for pos in &setup.walls {
        let _ = write!(out, "{}", pos);
    }
    out.push_str("|H");
    for (pos, color) in &setup.holes {
        let _ = write!(out, "{}:{}", pos, color);
    }
    out.push_str("|B");
    for (pos, color) in &setup.blocks {
        let _ = write!(out, "{}:{}", pos, color);
    }
    out
}

/// Identity key of the configuration's equivalence class under the 8 board
/// symmetries: the lexicographically smallest signature over all images.
pub fn canonical_signature(setup: &LevelSetup, width: usize, height: usize) -> String {
    Symmetry::ALL
        .iter()
        .map(|&sym| signature(&setup.transformed(sym, width, height)))
        .min()
        .unwrap_or_default()
}

impl LevelSetup {
    /// The configuration's image under one board symmetry.
    pub fn transformed(&self, sym: Symmetry, width: usize, height: usize) -> LevelSetup {
        LevelSetup {
            walls: self
                .walls
                .iter()
                .map(|&pos| sym.apply(pos, width, height))
                .collect(),
            holes: self
                .holes
                .iter()
                .map(|(&pos, &color)| (sym.apply(pos, width, height), color))
                .collect(),
            blocks: self
                .blocks
                .iter()
                .map(|(&pos, &color)| (sym.apply(pos, width, height), color))
                .collect(),
        }
    }
}

impl Level {
    /// A new level that is this level's image under one board symmetry.
    ///
    /// All derived statistics (par, label, ordering, multi-swipe) carry over
    /// unchanged. Returns `None` if the transformed layout would start with
    /// a block on its matching hole; for the 8 exact transforms of a valid
    /// level that cannot happen, so a `None` here signals a defect.
    pub fn transformed(&self, sym: Symmetry) -> Option<Level> {
        let setup = self.setup().transformed(sym, self.width(), self.height());
        if setup.has_presolved_block() {
            log::warn!("symmetry transform produced a pre-solved block layout");
            return None;
        }
        Some(Level::new(
            self.width(),
            self.height(),
            setup,
            self.par_moves(),
            self.par_per_block(),
            self.label(),
            self.ordering(),
            self.multi_swipe(),
        ))
    }
}
