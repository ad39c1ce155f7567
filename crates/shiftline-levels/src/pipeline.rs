//! Full level-set rebuild: generate bases, multiply with symmetry
//! transforms, order by a simplicity score, and assign stages.

use crate::store;
use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use shiftline_core::{Difficulty, EngineConfig, Generator, Level, Symmetry};
use std::collections::BTreeSet;
use std::path::Path;

pub const STAGE_COUNT: usize = 10;
pub const LEVELS_PER_STAGE: usize = 20;

/// Level counts per difficulty across the whole set.
pub const EASY_TARGET: usize = 8;
pub const FUN_TARGET: usize = 8;
pub const CHALLENGING_TARGET: usize = 94;
pub const HARD_TARGET: usize = 90;

/// Base levels generated per difficulty before symmetry expansion fills
/// the rest; generating 50 hard bases is already minutes of search.
const EXPANSION_BASE: usize = 50;

/// Collect `count` distinct levels of one difficulty by rejection sampling,
/// deduplicating against `seen` by exact (orientation-sensitive) signature.
pub fn collect(
    generator: &mut Generator,
    target: Difficulty,
    count: usize,
    seen: &mut BTreeSet<String>,
    attempts_multiplier: usize,
) -> Result<Vec<Level>> {
    let mut levels = Vec::with_capacity(count);
    let mut attempts = 0;
    while levels.len() < count && attempts < count * attempts_multiplier {
        attempts += 1;
        let Some(level) = generator.candidate(target) else {
            continue;
        };
        if level.label() != target {
            continue;
        }
        if !seen.insert(level.signature()) {
            continue;
        }
        levels.push(level);
    }
    if levels.len() < count {
        bail!(
            "generated only {} of {} {} levels after {} attempts",
            levels.len(),
            count,
            target,
            attempts
        );
    }
    log::debug!("collected {} {} levels in {} attempts", count, target, attempts);
    Ok(levels)
}

/// Grow `levels` toward `target_count` by appending symmetry images of the
/// levels already present, skipping images whose exact signature is taken.
/// Statistics carry over, so no re-analysis happens here.
pub fn expand_with_transforms(
    levels: &mut Vec<Level>,
    target_count: usize,
    seen: &mut BTreeSet<String>,
    rng: &mut StdRng,
) {
    if levels.len() >= target_count {
        return;
    }
    let mut variants = Symmetry::VARIANTS.to_vec();
    variants.shuffle(rng);
    let mut idx = 0;
    while levels.len() < target_count && idx < levels.len() {
        for &variant in &variants {
            let Some(image) = levels[idx].transformed(variant) else {
                continue;
            };
            if !seen.insert(image.signature()) {
                continue;
            }
            levels.push(image);
            if levels.len() >= target_count {
                break;
            }
        }
        idx += 1;
    }
}

/// Visual-complexity proxy used to order levels within a difficulty:
/// fewer pieces first.
pub fn score(level: &Level) -> usize {
    level.walls().len() * 2 + level.blocks().len() + level.holes().len()
}

/// Distribute levels into stages.
///
/// Stage 1 ramps up: 8 easy, 8 fun, 4 challenging. Stages 2..=10 each get
/// 10 challenging, 8 hard, and 2 "hard plus" levels drawn from the 18
/// highest-scoring hard levels, hardest pair first.
pub fn assign_stages(
    mut easy: Vec<Level>,
    mut fun: Vec<Level>,
    mut challenging: Vec<Level>,
    mut hard: Vec<Level>,
) -> Result<Vec<Vec<Level>>> {
    if easy.len() < EASY_TARGET {
        bail!("only {} easy levels available", easy.len());
    }
    if fun.len() < FUN_TARGET {
        bail!("only {} fun levels available", fun.len());
    }
    if challenging.len() < CHALLENGING_TARGET {
        bail!("only {} challenging levels available", challenging.len());
    }
    if hard.len() < HARD_TARGET {
        bail!("only {} hard levels available", hard.len());
    }

    easy.sort_by_key(score);
    fun.sort_by_key(score);
    challenging.sort_by_key(score);
    hard.sort_by_key(score);

    let mut stage1: Vec<Level> = easy.into_iter().take(EASY_TARGET).collect();
    stage1.extend(fun.into_iter().take(FUN_TARGET));
    let mut challenging = challenging.into_iter();
    stage1.extend(challenging.by_ref().take(4));

    // The 18 highest-scoring hard levels become the "hard plus" pool,
    // handed out hardest first.
    let mut hard_plus = hard.split_off(hard.len() - 18);
    hard_plus.reverse();

    let mut stages = vec![stage1];
    let mut hard = hard.into_iter();
    let mut hard_plus = hard_plus.into_iter();
    for stage_idx in 2..=STAGE_COUNT {
        let mut stage: Vec<Level> = challenging.by_ref().take(10).collect();
        stage.extend(hard.by_ref().take(8));
        stage.extend(hard_plus.by_ref().take(2));
        if stage.len() != LEVELS_PER_STAGE {
            bail!("stage {} has {} levels", stage_idx, stage.len());
        }
        stages.push(stage);
    }
    Ok(stages)
}

/// Rebuild the whole level set under `dir` from scratch.
pub fn run(dir: &Path, seed: u64) -> Result<()> {
    let mut generator = Generator::with_seed(EngineConfig::default(), seed);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut seen = BTreeSet::new();

    log::info!("generating base levels (seed {})", seed);
    let mut easy = collect(&mut generator, Difficulty::Easy, EASY_TARGET, &mut seen, 300)?;
    let mut fun = collect(&mut generator, Difficulty::Fun, FUN_TARGET, &mut seen, 300)?;
    let mut challenging = collect(
        &mut generator,
        Difficulty::Challenging,
        CHALLENGING_TARGET.min(EXPANSION_BASE),
        &mut seen,
        600,
    )?;
    let mut hard = collect(
        &mut generator,
        Difficulty::Hard,
        HARD_TARGET.min(EXPANSION_BASE),
        &mut seen,
        600,
    )?;

    expand_with_transforms(&mut easy, EASY_TARGET, &mut seen, &mut rng);
    expand_with_transforms(&mut fun, FUN_TARGET, &mut seen, &mut rng);
    expand_with_transforms(&mut challenging, CHALLENGING_TARGET, &mut seen, &mut rng);
    expand_with_transforms(&mut hard, HARD_TARGET, &mut seen, &mut rng);

    let stages = assign_stages(easy, fun, challenging, hard)?;
    let levels: Vec<Level> = stages.into_iter().flatten().collect();
    store::write_set(dir, &levels)?;
    log::info!("wrote {} levels to {}", levels.len(), dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shiftline_core::{Analyzer, Color, LevelSetup, Position};
    use std::collections::BTreeSet as Set;

    fn analyzed(
        walls: &[(usize, usize)],
        holes: &[((usize, usize), Color)],
        blocks: &[((usize, usize), Color)],
    ) -> Level {
        let setup = LevelSetup::new(
            walls.iter().map(|&(x, y)| Position::new(x, y)).collect(),
            holes
                .iter()
                .map(|&((x, y), c)| (Position::new(x, y), c))
                .collect(),
            blocks
                .iter()
                .map(|&((x, y), c)| (Position::new(x, y), c))
                .collect(),
        );
        Analyzer::new().analyze(&setup).unwrap()
    }

    #[test]
    fn test_score_counts_walls_double() {
        let level = analyzed(&[(3, 3), (4, 4)], &[((7, 0), 0)], &[((0, 0), 0)]);
        assert_eq!(score(&level), 2 * 2 + 1 + 1);
    }

    #[test]
    fn test_expand_adds_distinct_images() {
        let base = analyzed(&[(1, 0)], &[((7, 3), 0)], &[((0, 3), 0)]);
        let mut seen: Set<String> = Set::new();
        seen.insert(base.signature());
        let mut levels = vec![base];
        let mut rng = StdRng::seed_from_u64(1);
        expand_with_transforms(&mut levels, 4, &mut seen, &mut rng);

        assert_eq!(levels.len(), 4);
        let signatures: Set<String> = levels.iter().map(|l| l.signature()).collect();
        assert_eq!(signatures.len(), 4);
        for level in &levels[1..] {
            assert_eq!(level.par_moves(), levels[0].par_moves());
            assert_eq!(level.label(), levels[0].label());
        }
    }

    #[test]
    fn test_expand_is_a_no_op_when_target_met() {
        let base = analyzed(&[], &[((7, 0), 0)], &[((0, 0), 0)]);
        let mut seen = Set::new();
        let mut levels = vec![base];
        let mut rng = StdRng::seed_from_u64(2);
        expand_with_transforms(&mut levels, 1, &mut seen, &mut rng);
        assert_eq!(levels.len(), 1);
        assert!(seen.is_empty());
    }

    #[test]
    fn test_assign_stages_rejects_short_pools() {
        let level = analyzed(&[], &[((7, 0), 0)], &[((0, 0), 0)]);
        let err = assign_stages(vec![level], Vec::new(), Vec::new(), Vec::new()).unwrap_err();
        assert!(err.to_string().contains("easy"), "{}", err);
    }

    #[test]
    fn test_collect_respects_attempt_budget() {
        let mut generator = Generator::with_seed(EngineConfig::default(), 5);
        let mut seen = BTreeSet::new();
        // A multiplier of 1 gives one attempt per requested level, which
        // cannot yield 100 distinct hard levels.
        let err = collect(&mut generator, Difficulty::Hard, 100, &mut seen, 1).unwrap_err();
        assert!(err.to_string().contains("hard"), "{}", err);
    }
}
