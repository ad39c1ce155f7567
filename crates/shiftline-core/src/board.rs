//! Board topology and the line-slide primitive.
//!
//! The grid is a flat array indexed by `y * width + x` with a `-1` sentinel
//! for empty cells, so state equality and hashing reduce to a single slice
//! comparison during search.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Block/hole color. Colors are small palette indices, not RGB values.
pub type Color = u8;

/// Sentinel for an unoccupied cell in [`GridState`].
pub const EMPTY: i16 = -1;

/// A cell coordinate. `x` grows rightward, `y` grows downward.
///
/// Serializes as a `[x, y]` pair, matching the level-file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl From<(usize, usize)> for Position {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

impl From<Position> for (usize, usize) {
    fn from(pos: Position) -> Self {
        (pos.x, pos.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// One row or column of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Line {
    Row(usize),
    Column(usize),
}

/// Travel direction along a line: toward index 0 or away from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Negative,
    Positive,
}

impl Direction {
    pub const BOTH: [Direction; 2] = [Direction::Negative, Direction::Positive];

    #[inline]
    pub fn delta(self) -> isize {
        match self {
            Direction::Negative => -1,
            Direction::Positive => 1,
        }
    }
}

/// A single swipe: shift every movable block on `line` in `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub line: Line,
    pub direction: Direction,
}

impl Move {
    pub fn new(line: Line, direction: Direction) -> Self {
        Self { line, direction }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = match (self.line, self.direction) {
            (Line::Row(_), Direction::Negative) => "left",
            (Line::Row(_), Direction::Positive) => "right",
            (Line::Column(_), Direction::Negative) => "up",
            (Line::Column(_), Direction::Positive) => "down",
        };
        match self.line {
            Line::Row(y) => write!(f, "row {} {}", y, arrow),
            Line::Column(x) => write!(f, "col {} {}", x, arrow),
        }
    }
}

/// Complete occupancy assignment for the board: one color (or [`EMPTY`])
/// per cell. This is the unit of search; two states are equal iff every
/// cell matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GridState {
    cells: Vec<i16>,
}

impl GridState {
    /// An all-empty state for a board with `cell_count` cells.
    pub fn empty(cell_count: usize) -> Self {
        Self {
            cells: vec![EMPTY; cell_count],
        }
    }

    #[inline]
    pub fn color_at(&self, idx: usize) -> Option<Color> {
        let v = self.cells[idx];
        if v == EMPTY {
            None
        } else {
            Some(v as Color)
        }
    }

    #[inline]
    fn raw(&self, idx: usize) -> i16 {
        self.cells[idx]
    }

    #[inline]
    fn set_raw(&mut self, idx: usize, value: i16) {
        self.cells[idx] = value;
    }
}

/// The static part of a configuration: dimensions, walls, and holes.
///
/// Blocks live in a [`GridState`]; a `Board` plus a state is a full
/// configuration. Holes are keyed by position with their required color.
#[derive(Debug, Clone)]
pub struct Board {
    width: usize,
    height: usize,
    walls: BTreeSet<Position>,
    holes: BTreeMap<Position, Color>,
}

impl Board {
    pub fn new(
        width: usize,
        height: usize,
        walls: BTreeSet<Position>,
        holes: BTreeMap<Position, Color>,
    ) -> Self {
        Self {
            width,
            height,
            walls,
            holes,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn walls(&self) -> &BTreeSet<Position> {
        &self.walls
    }

    pub fn holes(&self) -> &BTreeMap<Position, Color> {
        &self.holes
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Linear cell index for a position.
    #[inline]
    pub fn index(&self, pos: Position) -> usize {
        pos.y * self.width + pos.x
    }

    /// Build the occupancy state for an initial block layout.
    pub fn state_from_blocks(&self, blocks: &BTreeMap<Position, Color>) -> GridState {
        let mut state = GridState::empty(self.cell_count());
        for (&pos, &color) in blocks {
            state.set_raw(self.index(pos), color as i16);
        }
        state
    }

    /// Recover the block layout from an occupancy state.
    pub fn blocks_from_state(&self, state: &GridState) -> BTreeMap<Position, Color> {
        let mut blocks = BTreeMap::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Position::new(x, y);
                if let Some(color) = state.color_at(self.index(pos)) {
                    blocks.insert(pos, color);
                }
            }
        }
        blocks
    }

    /// Position of each color's block. Assumes one block per color, which
    /// is what the generators emit.
    pub fn positions_by_color(&self, state: &GridState) -> BTreeMap<Color, Position> {
        let mut out = BTreeMap::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Position::new(x, y);
                if let Some(color) = state.color_at(self.index(pos)) {
                    out.insert(color, pos);
                }
            }
        }
        out
    }

    /// Holes currently occupied by a block of their required color.
    pub fn locked_holes(&self, state: &GridState) -> BTreeSet<Position> {
        self.holes
            .iter()
            .filter(|(&pos, &color)| state.raw(self.index(pos)) == color as i16)
            .map(|(&pos, _)| pos)
            .collect()
    }

    /// Terminal-success test: every hole holds a block of its color.
    pub fn is_solved(&self, state: &GridState) -> bool {
        self.holes
            .iter()
            .all(|(&pos, &color)| state.raw(self.index(pos)) == color as i16)
    }

    /// All candidate moves, in the canonical enumeration order the solver
    /// uses: rows then columns, index ascending, negative before positive.
    pub fn candidate_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(2 * (self.width + self.height));
        for y in 0..self.height {
            for direction in Direction::BOTH {
                moves.push(Move::new(Line::Row(y), direction));
            }
        }
        for x in 0..self.width {
            for direction in Direction::BOTH {
                moves.push(Move::new(Line::Column(x), direction));
            }
        }
        moves
    }

    /// Apply one swipe and report whether anything changed.
    ///
    /// Every movable block on the line shifts as far as it can in the
    /// direction of travel, stopping at the board edge, a wall, a locked
    /// hole, or another block's resting cell. Cells are processed from the
    /// direction-facing end of the line backward, so a leading block's
    /// resting position is fixed before a trailing block's slide is
    /// computed. A block resting on its matching unlocked hole locks there;
    /// locking counts as a change even without displacement, and a locked
    /// block never moves again.
    ///
    /// Returns the unchanged state with `false` for an out-of-range line
    /// index; a `false` result must not enter a search frontier.
    pub fn slide(&self, state: &GridState, mv: Move) -> (GridState, bool) {
        let (cells, positions) = match mv.line {
            Line::Row(y) => {
                if y >= self.height {
                    return (state.clone(), false);
                }
                let positions: Vec<Position> = (0..self.width).map(|x| Position::new(x, y)).collect();
                let cells: Vec<usize> = positions.iter().map(|&p| self.index(p)).collect();
                (cells, positions)
            }
            Line::Column(x) => {
                if x >= self.width {
                    return (state.clone(), false);
                }
                let positions: Vec<Position> =
                    (0..self.height).map(|y| Position::new(x, y)).collect();
                let cells: Vec<usize> = positions.iter().map(|&p| self.index(p)).collect();
                (cells, positions)
            }
        };

        let mut next = state.clone();
        let mut moved = false;
        let delta = mv.direction.delta();
        let len = cells.len();

        // Locked flags per grid cell, seeded from holes already satisfied.
        let mut locked = vec![false; self.cell_count()];
        for (&pos, &color) in &self.holes {
            let idx = self.index(pos);
            if state.raw(idx) == color as i16 {
                locked[idx] = true;
            }
        }

        // Line occupancy: walls, locked holes, and every occupied cell.
        let mut occupied = vec![false; len];
        for (i, (&idx, &pos)) in cells.iter().zip(positions.iter()).enumerate() {
            occupied[i] = self.walls.contains(&pos) || locked[idx] || next.raw(idx) != EMPTY;
        }

        let order: Vec<usize> = if delta > 0 {
            (0..len).rev().collect()
        } else {
            (0..len).collect()
        };

        for i in order {
            let idx = cells[i];
            let color = next.raw(idx);
            if color == EMPTY || locked[idx] {
                continue;
            }
            occupied[i] = false;
            let mut j = i;
            loop {
                let t = j as isize + delta;
                if t < 0 || t >= len as isize || occupied[t as usize] {
                    break;
                }
                j = t as usize;
            }
            if j != i {
                next.set_raw(idx, EMPTY);
                next.set_raw(cells[j], color);
                moved = true;
            }
            occupied[j] = true;
            let rest_idx = cells[j];
            if self.holes.get(&positions[j]) == Some(&(color as Color)) && !locked[rest_idx] {
                locked[rest_idx] = true;
                moved = true;
            }
        }

        (next, moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(walls: &[(usize, usize)], holes: &[((usize, usize), Color)]) -> Board {
        Board::new(
            8,
            8,
            walls.iter().map(|&(x, y)| Position::new(x, y)).collect(),
            holes
                .iter()
                .map(|&((x, y), c)| (Position::new(x, y), c))
                .collect(),
        )
    }

    fn blocks(entries: &[((usize, usize), Color)]) -> BTreeMap<Position, Color> {
        entries
            .iter()
            .map(|&((x, y), c)| (Position::new(x, y), c))
            .collect()
    }

    #[test]
    fn test_slide_to_edge() {
        let b = board(&[], &[]);
        let state = b.state_from_blocks(&blocks(&[((3, 2), 0)]));
        let (next, moved) = b.slide(
            &state,
            Move::new(Line::Row(2), Direction::Positive),
        );
        assert!(moved);
        assert_eq!(b.blocks_from_state(&next), blocks(&[((7, 2), 0)]));
    }

    #[test]
    fn test_slide_stops_at_wall() {
        let b = board(&[(5, 2)], &[]);
        let state = b.state_from_blocks(&blocks(&[((1, 2), 0)]));
        let (next, moved) = b.slide(
            &state,
            Move::new(Line::Row(2), Direction::Positive),
        );
        assert!(moved);
        assert_eq!(b.blocks_from_state(&next), blocks(&[((4, 2), 0)]));
    }

    #[test]
    fn test_slide_blocks_stack_in_travel_order() {
        // Leading block rests first; trailing block stops behind it.
        let b = board(&[], &[]);
        let state = b.state_from_blocks(&blocks(&[((1, 0), 0), ((4, 0), 1)]));
        let (next, moved) = b.slide(
            &state,
            Move::new(Line::Row(0), Direction::Positive),
        );
        assert!(moved);
        assert_eq!(
            b.blocks_from_state(&next),
            blocks(&[((6, 0), 0), ((7, 0), 1)])
        );
    }

    #[test]
    fn test_slide_no_op_reports_unmoved() {
        let b = board(&[], &[]);
        let state = b.state_from_blocks(&blocks(&[((7, 3), 0)]));
        let (next, moved) = b.slide(
            &state,
            Move::new(Line::Row(3), Direction::Positive),
        );
        assert!(!moved);
        assert_eq!(next, state);
        // Empty lines never move anything either.
        let (_, moved) = b.slide(&state, Move::new(Line::Column(0), Direction::Negative));
        assert!(!moved);
    }

    #[test]
    fn test_out_of_range_line_is_unmoved() {
        let b = board(&[], &[]);
        let state = b.state_from_blocks(&blocks(&[((0, 0), 0)]));
        let (next, moved) = b.slide(&state, Move::new(Line::Row(8), Direction::Positive));
        assert!(!moved);
        assert_eq!(next, state);
    }

    #[test]
    fn test_block_locks_on_matching_hole() {
        let b = board(&[], &[((7, 1), 0)]);
        let state = b.state_from_blocks(&blocks(&[((2, 1), 0)]));
        let (next, moved) = b.slide(
            &state,
            Move::new(Line::Row(1), Direction::Positive),
        );
        assert!(moved);
        assert!(b.is_solved(&next));
        assert_eq!(b.locked_holes(&next).len(), 1);
    }

    #[test]
    fn test_block_passes_over_foreign_hole() {
        // A hole of a different color is not an obstacle.
        let b = board(&[], &[((4, 0), 5)]);
        let state = b.state_from_blocks(&blocks(&[((0, 0), 0)]));
        let (next, _) = b.slide(&state, Move::new(Line::Row(0), Direction::Positive));
        assert_eq!(b.blocks_from_state(&next), blocks(&[((7, 0), 0)]));
        assert!(b.locked_holes(&next).is_empty());
    }

    #[test]
    fn test_block_slides_past_own_hole_without_resting() {
        // Locking happens at the resting cell only; a block shooting past
        // its hole does not snap onto it.
        let b = board(&[], &[((4, 0), 0)]);
        let state = b.state_from_blocks(&blocks(&[((0, 0), 0)]));
        let (next, _) = b.slide(&state, Move::new(Line::Row(0), Direction::Positive));
        assert_eq!(b.blocks_from_state(&next), blocks(&[((7, 0), 0)]));
        assert!(!b.is_solved(&next));
    }

    #[test]
    fn test_locked_hole_is_immovable_and_obstructs() {
        let b = board(&[], &[((7, 0), 0)]);
        // Lock color 0 at (7,0), then slide another block into the line.
        let state = b.state_from_blocks(&blocks(&[((3, 0), 0), ((0, 0), 1)]));
        let (state, _) = b.slide(&state, Move::new(Line::Row(0), Direction::Positive));
        // Color 1 was processed after color 0 and stacked behind it; now
        // verify the locked block never moves again in any direction.
        assert_eq!(
            b.blocks_from_state(&state),
            blocks(&[((6, 0), 1), ((7, 0), 0)])
        );
        let (after, _) = b.slide(&state, Move::new(Line::Row(0), Direction::Negative));
        assert_eq!(after.color_at(b.index(Position::new(7, 0))), Some(0));
        let (after, _) = b.slide(&state, Move::new(Line::Column(7), Direction::Positive));
        assert_eq!(after.color_at(b.index(Position::new(7, 0))), Some(0));
    }

    #[test]
    fn test_move_display() {
        let mv = Move::new(Line::Row(3), Direction::Positive);
        assert_eq!(mv.to_string(), "row 3 right");
        let mv = Move::new(Line::Column(0), Direction::Negative);
        assert_eq!(mv.to_string(), "col 0 up");
    }

    #[test]
    fn test_position_serializes_as_pair() {
        let json = serde_json::to_string(&Position::new(3, 5)).unwrap();
        assert_eq!(json, "[3,5]");
        let pos: Position = serde_json::from_str("[3,5]").unwrap();
        assert_eq!(pos, Position::new(3, 5));
    }
}
