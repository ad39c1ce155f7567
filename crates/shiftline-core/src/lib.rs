//! Shiftline level engine.
//!
//! Shiftline is a grid-based sliding-block puzzle: every swipe shifts all
//! movable blocks on one row or column until each hits an obstacle, and a
//! level is solved once every colored block rests on the hole of its color.
//!
//! This crate is the analysis core behind level production:
//!
//! - [`Board`] models the fixed-size grid and the single state-mutating
//!   primitive, the line slide.
//! - [`Solver`] runs a breadth-first search over reachable grid states and
//!   reports the minimal solution (the level's par).
//! - [`MoveStats`] replays the optimal path into per-color move counts and
//!   lock steps, which feed the [`classify`] rubric.
//! - [`Symmetry`] and [`canonical_signature`] identify levels up to the
//!   8 symmetries of the square board, for dedup and variant expansion.
//! - [`Analyzer`] is the facade: candidate configuration in, validated
//!   [`Level`] (or a [`Rejection`]) out.
//! - [`Generator`] produces seeded candidate configurations for the
//!   rejection-sampling loops that callers drive.
//!
//! Every entry point is pure and deterministic for a given input and
//! [`EngineConfig`]; the solver's state cap is the only resource knob.

mod analyze;
mod board;
mod generator;
mod level;
mod solver;
mod symmetry;

pub use analyze::{Analyzer, EngineConfig, Rejection};
pub use board::{Board, Color, Direction, GridState, Line, Move, Position, EMPTY};
pub use generator::{Generator, GeneratorConfig};
pub use level::{Level, LevelSetup};
pub use solver::{analyze_moves, classify, Difficulty, LockOrdering, MoveStats, Solution, Solver};
pub use symmetry::{canonical_signature, signature, Symmetry};
