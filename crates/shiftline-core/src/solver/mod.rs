//! Breadth-first shortest-solution search.
//!
//! All swipes have unit cost, so plain BFS over grid states yields the
//! minimal move count the first time the goal state is dequeued. Visited
//! states are deduplicated by exact grid equality; symmetry is deliberately
//! not exploited here (the canonicalizer handles identity across levels,
//! not within a single search).

mod classify;
mod replay;

pub use classify::{classify, Difficulty, LockOrdering};
pub use replay::{analyze_moves, MoveStats};

use crate::analyze::Rejection;
use crate::board::{Board, Color, GridState, Move, Position};
use std::collections::{BTreeMap, HashMap, VecDeque};

/// A minimal solution found by the solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// The optimal move sequence, in play order.
    pub moves: Vec<Move>,
}

impl Solution {
    /// Minimal move count (the level's par).
    pub fn par_moves(&self) -> usize {
        self.moves.len()
    }
}

/// One expanded search node: the state plus the edge that produced it.
struct Node {
    state: GridState,
    parent: Option<(usize, Move)>,
}

/// Exhaustive breadth-first solver, bounded by a visited-state cap.
///
/// Stateless across calls; the cap is the sole resource-control knob and is
/// enforced mid-search, immediately after every visited-set insertion.
pub struct Solver {
    state_cap: usize,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    /// Default visited-state cap. An empirical latency/completeness
    /// trade-off, not a semantic constant; tune via [`Solver::with_state_cap`].
    pub const DEFAULT_STATE_CAP: usize = 15_000;

    pub fn new() -> Self {
        Self {
            state_cap: Self::DEFAULT_STATE_CAP,
        }
    }

    pub fn with_state_cap(state_cap: usize) -> Self {
        Self { state_cap }
    }

    /// Find a minimal solution for `blocks` on `board`.
    ///
    /// Returns [`Rejection::Unsolvable`] when the queue empties without
    /// reaching the goal (a genuine impossibility proof) and
    /// [`Rejection::SearchBudgetExceeded`] when the visited-state count
    /// reaches the cap first (a bounded-latency abort, not a proof).
    pub fn solve(
        &self,
        board: &Board,
        blocks: &BTreeMap<Position, Color>,
    ) -> Result<Solution, Rejection> {
        let start = board.state_from_blocks(blocks);
        let all_moves = board.candidate_moves();

        let mut nodes = vec![Node {
            state: start.clone(),
            parent: None,
        }];
        let mut visited: HashMap<GridState, usize> = HashMap::new();
        visited.insert(start, 0);
        let mut queue: VecDeque<usize> = VecDeque::new();
        queue.push_back(0);

        let mut goal: Option<usize> = None;
        while let Some(current) = queue.pop_front() {
            if board.is_solved(&nodes[current].state) {
                goal = Some(current);
                break;
            }
            let state = nodes[current].state.clone();
            for &mv in &all_moves {
                let (next, moved) = board.slide(&state, mv);
                if !moved || visited.contains_key(&next) {
                    continue;
                }
                let id = nodes.len();
                visited.insert(next.clone(), id);
                if visited.len() >= self.state_cap {
                    log::debug!(
                        "search aborted: visited {} states without reaching the goal",
                        visited.len()
                    );
                    return Err(Rejection::SearchBudgetExceeded {
                        visited: visited.len(),
                    });
                }
                nodes.push(Node {
                    state: next,
                    parent: Some((current, mv)),
                });
                queue.push_back(id);
            }
        }

        let Some(mut current) = goal else {
            return Err(Rejection::Unsolvable);
        };

        let mut moves = Vec::new();
        while let Some((parent, mv)) = nodes[current].parent {
            moves.push(mv);
            current = parent;
        }
        moves.reverse();
        Ok(Solution { moves })
    }
}
