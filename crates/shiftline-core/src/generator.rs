//! Seeded candidate generation.
//!
//! Each strategy builds one random candidate configuration and runs it
//! through the [`Analyzer`]; callers drive rejection-sampling loops on top
//! (most candidates fail the solver or match no difficulty rule, which is
//! expected). The generator owns no retry policy beyond the bounded
//! `generate` convenience wrapper and embeds no global randomness: seed it
//! for reproducibility or let it seed itself.

use crate::analyze::{Analyzer, EngineConfig};
use crate::board::{Board, Color, Direction, Line, Move, Position};
use crate::level::{Level, LevelSetup};
use crate::solver::Difficulty;
use std::collections::{BTreeMap, BTreeSet};

/// Configuration for one generation run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Difficulty the produced level must classify as.
    pub target: Difficulty,
    /// Candidate attempts before giving up.
    pub max_attempts: usize,
}

impl GeneratorConfig {
    pub fn easy() -> Self {
        Self {
            target: Difficulty::Easy,
            max_attempts: 300,
        }
    }

    pub fn fun() -> Self {
        Self {
            target: Difficulty::Fun,
            max_attempts: 300,
        }
    }

    pub fn challenging() -> Self {
        Self {
            target: Difficulty::Challenging,
            max_attempts: 600,
        }
    }

    pub fn hard() -> Self {
        Self {
            target: Difficulty::Hard,
            max_attempts: 600,
        }
    }

    pub fn for_target(target: Difficulty) -> Self {
        match target {
            Difficulty::Easy => Self::easy(),
            Difficulty::Fun => Self::fun(),
            Difficulty::Challenging => Self::challenging(),
            Difficulty::Hard => Self::hard(),
        }
    }
}

/// Candidate level generator.
pub struct Generator {
    engine: EngineConfig,
    analyzer: Analyzer,
    rng: SimpleRng,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Generator {
    /// Create a generator seeded from the OS entropy source.
    pub fn new(engine: EngineConfig) -> Self {
        Self {
            engine,
            analyzer: Analyzer::with_config(engine),
            rng: SimpleRng::new(),
        }
    }

    /// Create a generator with a specific seed for reproducibility.
    pub fn with_seed(engine: EngineConfig, seed: u64) -> Self {
        Self {
            engine,
            analyzer: Analyzer::with_config(engine),
            rng: SimpleRng::with_seed(seed),
        }
    }

    pub fn engine_config(&self) -> &EngineConfig {
        &self.engine
    }

    /// Generate a level of the target difficulty, bounded by the default
    /// attempt budget for that target.
    pub fn generate(&mut self, target: Difficulty) -> Option<Level> {
        self.generate_with_config(&GeneratorConfig::for_target(target))
    }

    /// Rejection-sampling loop: draw candidates until one validates and
    /// classifies as the target, or the attempt budget runs out.
    pub fn generate_with_config(&mut self, config: &GeneratorConfig) -> Option<Level> {
        for _ in 0..config.max_attempts {
            if let Some(level) = self.candidate(config.target) {
                if level.label() == config.target {
                    return Some(level);
                }
            }
        }
        None
    }

    /// One candidate draw using the default strategy for the target:
    /// aligned single block for easy, off-axis single block for fun,
    /// scatter-and-scramble for challenging/hard.
    pub fn candidate(&mut self, target: Difficulty) -> Option<Level> {
        let (blocks_count, walls_count) = match target {
            Difficulty::Easy | Difficulty::Fun => (1, 0),
            Difficulty::Challenging => (self.rng.range(2, 3), self.rng.range(1, 3)),
            Difficulty::Hard => (self.rng.range(2, 4), self.rng.range(2, 5)),
        };

        let walls: BTreeSet<Position> = self
            .random_positions(walls_count, &BTreeSet::new())
            .into_iter()
            .collect();
        let holes = self.build_holes(blocks_count, &walls, target)?;

        match target {
            Difficulty::Easy => {
                // Block on the hole's row or column; the hole sits on an
                // edge, so one swipe toward it usually solves the level.
                let (&hole, _) = holes.iter().next()?;
                let mut blocks = BTreeMap::new();
                if self.rng.next_bool() {
                    let choices: Vec<usize> =
                        (0..self.engine.width).filter(|&x| x != hole.x).collect();
                    let x = *self.rng.choice(&choices)?;
                    blocks.insert(Position::new(x, hole.y), 0);
                } else {
                    let choices: Vec<usize> =
                        (0..self.engine.height).filter(|&y| y != hole.y).collect();
                    let y = *self.rng.choice(&choices)?;
                    blocks.insert(Position::new(hole.x, y), 0);
                }
                self.analyzer
                    .analyze(&LevelSetup::new(walls, holes, blocks))
            }
            Difficulty::Fun => {
                // Block off both of the hole's axes, forcing a multi-leg path.
                let (&hole, _) = holes.iter().next()?;
                let candidates: Vec<Position> = self
                    .all_positions()
                    .into_iter()
                    .filter(|&p| {
                        !walls.contains(&p) && p != hole && p.x != hole.x && p.y != hole.y
                    })
                    .collect();
                let pos = *self.rng.choice(&candidates)?;
                let mut blocks = BTreeMap::new();
                blocks.insert(pos, 0);
                self.analyzer
                    .analyze(&LevelSetup::new(walls, holes, blocks))
            }
            Difficulty::Challenging | Difficulty::Hard => {
                let scramble_len = match target {
                    Difficulty::Challenging => 3,
                    _ => 6,
                };
                self.scrambled_candidate(walls, holes, scramble_len, 6)
            }
        }
    }

    /// Corridor layout: a single open row or column, holes at random cells
    /// on it, blocks elsewhere on it, everything else walled off.
    pub fn corridor_candidate(
        &mut self,
        target: Difficulty,
        blocks_count: usize,
    ) -> Option<Level> {
        let (w, h) = (self.engine.width, self.engine.height);
        let orient_row = self.rng.next_bool();
        let (walls, mut line_positions): (BTreeSet<Position>, Vec<Position>) = if orient_row {
            let line = self.rng.range(1, h - 2);
            let walls = self
                .all_positions()
                .into_iter()
                .filter(|p| p.y != line)
                .collect();
            (walls, (0..w).map(|x| Position::new(x, line)).collect())
        } else {
            let line = self.rng.range(1, w - 2);
            let walls = self
                .all_positions()
                .into_iter()
                .filter(|p| p.x != line)
                .collect();
            (walls, (0..h).map(|y| Position::new(line, y)).collect())
        };

        self.rng.shuffle(&mut line_positions);
        if line_positions.len() < blocks_count * 2 {
            return None;
        }
        let hole_positions: Vec<Position> = line_positions[..blocks_count].to_vec();
        let block_positions: Vec<Position> =
            line_positions[blocks_count..blocks_count * 2].to_vec();

        let mut colors: Vec<Color> = (0..blocks_count as Color).collect();
        self.rng.shuffle(&mut colors);
        let holes: BTreeMap<Position, Color> = hole_positions
            .iter()
            .zip(&colors)
            .map(|(&p, &c)| (p, c))
            .collect();
        let blocks: BTreeMap<Position, Color> = block_positions
            .iter()
            .zip(&colors)
            .map(|(&p, &c)| (p, c))
            .collect();

        let setup = LevelSetup::new(walls, holes, blocks);
        if setup.has_presolved_block() {
            return None;
        }
        let level = self.analyzer.analyze(&setup)?;
        if level.label() != target {
            return None;
        }
        Some(level)
    }

    /// Straight-line multi-block easy layout: holes packed at one end of a
    /// row or column, blocks further along it, colors paired so a single
    /// swipe stacks every block onto its hole.
    pub fn line_pair_candidate(&mut self, blocks_count: usize) -> Option<Level> {
        if blocks_count < 2 {
            return None;
        }
        let (w, h) = (self.engine.width, self.engine.height);
        for _ in 0..60 {
            let orient_row = self.rng.next_bool();
            let positive = self.rng.next_bool();
            let axis_len = if orient_row { w } else { h };
            if axis_len < blocks_count * 2 {
                continue;
            }

            let (hole_coords, mut candidates): (Vec<usize>, Vec<usize>) = if positive {
                (
                    (0..blocks_count).map(|i| axis_len - 1 - i).collect(),
                    (0..axis_len - blocks_count).collect(),
                )
            } else {
                (
                    (0..blocks_count).collect(),
                    (blocks_count..axis_len).collect(),
                )
            };
            if candidates.len() < blocks_count {
                continue;
            }
            self.rng.shuffle(&mut candidates);
            let block_coords: Vec<usize> = candidates[..blocks_count].to_vec();
            let mut colors: Vec<Color> = (0..blocks_count as Color).collect();
            self.rng.shuffle(&mut colors);

            let (block_pairs, hole_pairs) =
                assign_line_pairs(&block_coords, &hole_coords, &colors, positive);

            let fixed = if orient_row {
                self.rng.range(0, h - 1)
            } else {
                self.rng.range(0, w - 1)
            };
            let place = |coord: usize| {
                if orient_row {
                    Position::new(coord, fixed)
                } else {
                    Position::new(fixed, coord)
                }
            };
            let blocks: BTreeMap<Position, Color> =
                block_pairs.iter().map(|&(c, col)| (place(c), col)).collect();
            let holes: BTreeMap<Position, Color> =
                hole_pairs.iter().map(|&(c, col)| (place(c), col)).collect();

            let setup = LevelSetup::new(BTreeSet::new(), holes, blocks);
            match self.analyzer.analyze(&setup) {
                Some(level) if level.label() == Difficulty::Easy => return Some(level),
                _ => continue,
            }
        }
        None
    }

    /// Deeper-scrambled variant of the scatter strategy, with more walls
    /// and longer scrambles. Only meaningful for challenging/hard targets.
    pub fn spicy_candidate(&mut self, target: Difficulty) -> Option<Level> {
        let (walls_count, scramble_len) = match target {
            Difficulty::Challenging => (self.rng.range(2, 6), self.rng.range(3, 6)),
            Difficulty::Hard => (self.rng.range(3, 8), self.rng.range(5, 9)),
            _ => return None,
        };
        let blocks_count = self.rng.range(2, 4);

        let walls: BTreeSet<Position> = self
            .random_positions(walls_count, &BTreeSet::new())
            .into_iter()
            .collect();
        let holes = self.build_holes(blocks_count, &walls, target)?;
        self.scrambled_candidate(walls, holes, scramble_len, 8)
    }

    /// Mutate an existing layout by adding walls on empty cells, keeping
    /// the label. Used to replace symmetry duplicates with near-misses.
    pub fn wall_mutation(
        &mut self,
        base: &LevelSetup,
        label: Difficulty,
        extra_walls: usize,
    ) -> Option<Level> {
        if extra_walls == 0 {
            return None;
        }
        for _ in 0..80 {
            let mut forbidden = base.walls.clone();
            forbidden.extend(base.blocks.keys().copied());
            forbidden.extend(base.holes.keys().copied());
            let extra = self.random_positions(extra_walls, &forbidden);
            if extra.len() < extra_walls {
                return None;
            }
            let mut walls = base.walls.clone();
            walls.extend(extra);
            let setup = LevelSetup::new(walls, base.holes.clone(), base.blocks.clone());
            match self.analyzer.analyze(&setup) {
                Some(level) if level.label() == label => return Some(level),
                _ => continue,
            }
        }
        None
    }

    // ==================== Internals ====================

    /// Start blocks on their holes and reverse-scramble them away with
    /// random slides on a hole-less board, then analyze the result.
    fn scrambled_candidate(
        &mut self,
        walls: BTreeSet<Position>,
        holes: BTreeMap<Position, Color>,
        scramble_len: usize,
        tries_per_step: usize,
    ) -> Option<Level> {
        let blocks = holes.clone();
        let scramble_board = Board::new(
            self.engine.width,
            self.engine.height,
            walls.clone(),
            BTreeMap::new(),
        );
        let mut state = scramble_board.state_from_blocks(&blocks);
        'steps: for _ in 0..scramble_len {
            for _ in 0..tries_per_step {
                let mv = self.random_move();
                let (next, moved) = scramble_board.slide(&state, mv);
                if moved {
                    state = next;
                    continue 'steps;
                }
            }
            break;
        }

        let blocks = scramble_board.blocks_from_state(&state);
        let setup = LevelSetup::new(walls, holes, blocks);
        if setup.has_presolved_block() {
            return None;
        }
        self.analyzer.analyze(&setup)
    }

    fn random_move(&mut self) -> Move {
        let is_row = self.rng.next_bool();
        let line = if is_row {
            Line::Row(self.rng.range(0, self.engine.height - 1))
        } else {
            Line::Column(self.rng.range(0, self.engine.width - 1))
        };
        let direction = if self.rng.next_bool() {
            Direction::Positive
        } else {
            Direction::Negative
        };
        Move::new(line, direction)
    }

    fn all_positions(&self) -> Vec<Position> {
        let (w, h) = (self.engine.width, self.engine.height);
        (0..h)
            .flat_map(|y| (0..w).map(move |x| Position::new(x, y)))
            .collect()
    }

    fn random_positions(&mut self, count: usize, forbidden: &BTreeSet<Position>) -> Vec<Position> {
        let mut positions: Vec<Position> = self
            .all_positions()
            .into_iter()
            .filter(|p| !forbidden.contains(p))
            .collect();
        self.rng.shuffle(&mut positions);
        positions.truncate(count);
        positions
    }

    /// Pick hole positions and shuffled colors. Easy targets get a single
    /// hole on a board edge so an aligned block can reach it in one swipe.
    fn build_holes(
        &mut self,
        blocks_count: usize,
        walls: &BTreeSet<Position>,
        target: Difficulty,
    ) -> Option<BTreeMap<Position, Color>> {
        let (w, h) = (self.engine.width, self.engine.height);
        let hole_positions: Vec<Position> = if target == Difficulty::Easy {
            let edges: Vec<Position> = self
                .all_positions()
                .into_iter()
                .filter(|p| {
                    (p.x == 0 || p.x == w - 1 || p.y == 0 || p.y == h - 1) && !walls.contains(p)
                })
                .collect();
            vec![*self.rng.choice(&edges)?]
        } else {
            let positions = self.random_positions(blocks_count, walls);
            if positions.len() < blocks_count {
                return None;
            }
            positions
        };

        let mut colors: Vec<Color> = (0..blocks_count as Color).collect();
        self.rng.shuffle(&mut colors);
        Some(
            hole_positions
                .iter()
                .zip(&colors)
                .map(|(&p, &c)| (p, c))
                .collect(),
        )
    }
}

/// Pair sorted block and hole coordinates along a line so that a single
/// swipe in the chosen direction sends every block onto its own hole.
fn assign_line_pairs(
    block_coords: &[usize],
    hole_coords: &[usize],
    colors: &[Color],
    positive: bool,
) -> (Vec<(usize, Color)>, Vec<(usize, Color)>) {
    let mut blocks_sorted: Vec<usize> = block_coords.to_vec();
    blocks_sorted.sort_unstable();
    let mut holes_sorted: Vec<usize> = hole_coords.to_vec();
    if positive {
        blocks_sorted.reverse();
        holes_sorted.sort_unstable_by(|a, b| b.cmp(a));
    } else {
        holes_sorted.sort_unstable();
    }
    let blocks = blocks_sorted
        .iter()
        .zip(colors)
        .map(|(&p, &c)| (p, c))
        .collect();
    let holes = holes_sorted
        .iter()
        .zip(colors)
        .map(|(&p, &c)| (p, c))
        .collect();
    (blocks, holes)
}

/// Small PCG-style PRNG, seeded via `getrandom` so the generator works in
/// WASM builds too; falls back to a process-local counter.
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new() -> Self {
        let mut seed_bytes = [0u8; 8];
        getrandom::getrandom(&mut seed_bytes).unwrap_or_else(|_| {
            static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
            let counter = COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            seed_bytes = counter.to_le_bytes();
        });
        Self::with_seed(u64::from_le_bytes(seed_bytes))
    }

    fn with_seed(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let xorshifted = (((self.state >> 18) ^ self.state) >> 27) as u32;
        let rot = (self.state >> 59) as u32;
        (xorshifted.rotate_right(rot)) as u64
    }

    fn next_usize(&mut self, bound: usize) -> usize {
        (self.next_u64() as usize) % bound
    }

    /// Uniform value in `lo..=hi`.
    fn range(&mut self, lo: usize, hi: usize) -> usize {
        lo + self.next_usize(hi - lo + 1)
    }

    fn next_bool(&mut self) -> bool {
        self.next_u64() & 1 == 1
    }

    fn choice<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            None
        } else {
            Some(&slice[self.next_usize(slice.len())])
        }
    }

    /// Fisher-Yates shuffle.
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_usize(i + 1);
            slice.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_easy_is_reproducible() {
        let mut a = Generator::with_seed(EngineConfig::default(), 42);
        let mut b = Generator::with_seed(EngineConfig::default(), 42);
        let la = a.generate(Difficulty::Easy).expect("easy level");
        let lb = b.generate(Difficulty::Easy).expect("easy level");
        assert_eq!(la, lb);
        assert_eq!(la.label(), Difficulty::Easy);
        assert!(la.par_moves() >= 1);
        assert_eq!(la.blocks().len(), 1);
    }

    #[test]
    fn test_line_pair_candidate_is_easy() {
        let mut gen = Generator::with_seed(EngineConfig::default(), 7);
        let level = gen.line_pair_candidate(2).expect("line-pair level");
        assert_eq!(level.label(), Difficulty::Easy);
        assert_eq!(level.blocks().len(), 2);
        assert!(level.walls().is_empty());
        // One swipe stacks both blocks onto their holes.
        assert_eq!(level.par_moves(), 1);
    }

    #[test]
    fn test_wall_mutation_preserves_label() {
        let mut gen = Generator::with_seed(EngineConfig::default(), 11);
        let base = gen.generate(Difficulty::Easy).expect("easy level");
        if let Some(mutated) = gen.wall_mutation(base.setup(), Difficulty::Easy, 1) {
            assert_eq!(mutated.label(), Difficulty::Easy);
            assert_eq!(mutated.walls().len(), base.walls().len() + 1);
        }
    }

    #[test]
    fn test_candidate_colors_are_distinct() {
        let mut gen = Generator::with_seed(EngineConfig::default(), 3);
        for _ in 0..50 {
            if let Some(level) = gen.candidate(Difficulty::Hard) {
                let colors: std::collections::BTreeSet<Color> =
                    level.blocks().values().copied().collect();
                assert_eq!(colors.len(), level.blocks().len());
            }
        }
    }
}
