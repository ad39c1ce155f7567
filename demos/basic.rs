//! Basic example of using the Shiftline engine

use shiftline_core::{Analyzer, Difficulty, EngineConfig, Generator, LevelSetup, Position, Symmetry};
use std::collections::{BTreeMap, BTreeSet};

fn main() {
    // Analyze a hand-built configuration
    println!("Analyzing a hand-built level...\n");
    let mut holes = BTreeMap::new();
    holes.insert(Position::new(7, 0), 0);
    holes.insert(Position::new(7, 1), 1);
    let mut blocks = BTreeMap::new();
    blocks.insert(Position::new(0, 0), 0);
    blocks.insert(Position::new(1, 2), 1);
    let setup = LevelSetup::new(BTreeSet::new(), holes, blocks);

    let analyzer = Analyzer::new();
    match analyzer.try_analyze(&setup) {
        Ok(level) => {
            println!("Difficulty: {}", level.label());
            println!("Par moves: {}", level.par_moves());
            println!("Par per block: {:.2}", level.par_per_block());
            println!("Lock ordering: {}", level.ordering());
            println!("Multi-swipe: {}", level.multi_swipe());
        }
        Err(rejection) => println!("Rejected: {}", rejection),
    }

    // Generate a level of a requested difficulty
    println!("\nGenerating a challenging level...\n");
    let mut generator = Generator::new(EngineConfig::default());
    if let Some(level) = generator.generate(Difficulty::Challenging) {
        println!("Walls: {}", level.walls().len());
        println!("Blocks: {}", level.blocks().len());
        println!("Par moves: {}", level.par_moves());

        // Every level identifies its whole symmetry class
        println!("Canonical signature: {}", level.canonical_signature());

        // Symmetry images keep the statistics without re-solving
        if let Some(image) = level.transformed(Symmetry::Rotate90) {
            println!(
                "Rotated variant has the same par: {} == {}",
                image.par_moves(),
                level.par_moves()
            );
        }
    } else {
        println!("No challenging level found within the attempt budget.");
    }
}
