//! Symmetry dedupe: find level files whose layouts are rotations or
//! reflections of an earlier file, and regenerate them in place.

use crate::store;
use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shiftline_core::{canonical_signature, Difficulty, EngineConfig, Generator, Level, LevelSetup};
use std::collections::BTreeSet;
use std::path::Path;

/// Attempts per replacement before giving up; replacements must dodge every
/// canonical signature already in the set, so this is much higher than the
/// per-candidate budgets used during bulk generation.
pub const MAX_ATTEMPTS: usize = 1500;

/// Scan `dir` for symmetry duplicates and replace each with a freshly
/// generated level of the same difficulty, written over the same file.
pub fn run(dir: &Path, seed: u64) -> Result<()> {
    let entries = store::load_dir(dir)?;
    if entries.is_empty() {
        bail!("no level files found in {}", dir.display());
    }

    let mut seen = BTreeSet::new();
    let mut duplicates = Vec::new();
    for (path, file) in entries {
        let setup = file.setup();
        let signature = canonical_signature(&setup, file.width, file.height);
        if !seen.insert(signature) {
            duplicates.push((path, setup, file.label()));
        }
    }
    if duplicates.is_empty() {
        log::info!("no symmetry duplicates found");
        return Ok(());
    }

    let mut generator = Generator::with_seed(EngineConfig::default(), seed);
    let mut rng = StdRng::seed_from_u64(seed);
    for (path, setup, label) in &duplicates {
        let replacement =
            generate_unique(&mut generator, &mut rng, *label, &mut seen, Some(setup))?;
        store::save(path, &store::LevelFile::from_level(&replacement))?;
        log::info!("replaced duplicate {} ({})", path.display(), label);
    }
    log::info!("replaced {} duplicate levels", duplicates.len());
    Ok(())
}

/// Generate a level of `target` difficulty whose canonical signature is not
/// in `seen`, mixing generation strategies so replacements do not all look
/// alike. `base` biases challenging/hard replacements toward wall-mutated
/// variants of the duplicate being replaced.
pub fn generate_unique(
    generator: &mut Generator,
    rng: &mut StdRng,
    target: Difficulty,
    seen: &mut BTreeSet<String>,
    base: Option<&LevelSetup>,
) -> Result<Level> {
    for _ in 0..MAX_ATTEMPTS {
        let mut level = None;
        if let Some(base) = base {
            if matches!(target, Difficulty::Challenging | Difficulty::Hard) {
                let extra_walls = if target == Difficulty::Challenging { 1 } else { 2 };
                level = generator.wall_mutation(base, target, extra_walls);
            }
        }
        match target {
            Difficulty::Easy => {
                if rng.gen::<f64>() < 0.65 {
                    level = generator.line_pair_candidate(2);
                }
                if level.is_none() {
                    level = generator.candidate(target);
                }
            }
            Difficulty::Challenging | Difficulty::Hard => {
                let roll: f64 = rng.gen();
                if roll < 0.3 {
                    let max_blocks = if target == Difficulty::Challenging { 3 } else { 4 };
                    level = generator.corridor_candidate(target, rng.gen_range(2..=max_blocks));
                } else if roll < 0.8 {
                    level = generator.spicy_candidate(target);
                }
                if level.is_none() {
                    level = generator.candidate(target);
                }
            }
            Difficulty::Fun => {
                level = generator.candidate(target);
            }
        }

        let Some(level) = level else {
            continue;
        };
        if level.label() != target {
            continue;
        }
        if !seen.insert(level.canonical_signature()) {
            continue;
        }
        return Ok(level);
    }
    bail!(
        "failed to generate a unique {} level after {} attempts",
        target,
        MAX_ATTEMPTS
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_unique_avoids_seen_signatures() {
        let mut generator = Generator::with_seed(EngineConfig::default(), 17);
        let mut rng = StdRng::seed_from_u64(17);
        let mut seen = BTreeSet::new();

        let first =
            generate_unique(&mut generator, &mut rng, Difficulty::Easy, &mut seen, None).unwrap();
        assert_eq!(first.label(), Difficulty::Easy);
        assert!(seen.contains(&first.canonical_signature()));

        let second =
            generate_unique(&mut generator, &mut rng, Difficulty::Easy, &mut seen, None).unwrap();
        assert_ne!(first.canonical_signature(), second.canonical_signature());
    }

    #[test]
    fn test_generate_unique_is_seed_deterministic() {
        let make = || {
            let mut generator = Generator::with_seed(EngineConfig::default(), 99);
            let mut rng = StdRng::seed_from_u64(99);
            let mut seen = BTreeSet::new();
            generate_unique(&mut generator, &mut rng, Difficulty::Easy, &mut seen, None).unwrap()
        };
        assert_eq!(make(), make());
    }
}
