//! On-disk level files: `level_NNN.json`, one level per file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shiftline_core::{Color, Difficulty, Level, LevelSetup, Position};
use std::fs;
use std::path::{Path, PathBuf};

/// Render colors for palette indices 0..=3, in index order.
pub const PALETTE: [&str; 4] = ["#3C78DC", "#E65050", "#50BE78", "#E6C846"];

/// One block or hole in the file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceEntry {
    pub pos: Position,
    pub color: Color,
}

/// The JSON schema of a level file.
///
/// `bouncers` is always written empty but kept in the schema so older files
/// that carry the field still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelFile {
    pub width: usize,
    pub height: usize,
    pub palette: Vec<String>,
    pub walls: Vec<Position>,
    pub blocks: Vec<PieceEntry>,
    pub holes: Vec<PieceEntry>,
    #[serde(default)]
    pub bouncers: Vec<serde_json::Value>,
    pub difficulty: u8,
    pub difficulty_label: String,
}

impl LevelFile {
    pub fn from_level(level: &Level) -> Self {
        Self {
            width: level.width(),
            height: level.height(),
            palette: PALETTE.iter().map(|&c| c.to_string()).collect(),
            walls: level.walls().iter().copied().collect(),
            blocks: level
                .blocks()
                .iter()
                .map(|(&pos, &color)| PieceEntry { pos, color })
                .collect(),
            holes: level
                .holes()
                .iter()
                .map(|(&pos, &color)| PieceEntry { pos, color })
                .collect(),
            bouncers: Vec::new(),
            difficulty: level.label().value(),
            difficulty_label: level.label().label().to_string(),
        }
    }

    /// The configuration this file describes.
    pub fn setup(&self) -> LevelSetup {
        LevelSetup::new(
            self.walls.iter().copied().collect(),
            self.holes.iter().map(|e| (e.pos, e.color)).collect(),
            self.blocks.iter().map(|e| (e.pos, e.color)).collect(),
        )
    }

    /// Parsed difficulty label; unrecognized labels fall back to hard, the
    /// safest bucket for a level of unknown provenance.
    pub fn label(&self) -> Difficulty {
        Difficulty::from_label(&self.difficulty_label).unwrap_or(Difficulty::Hard)
    }
}

/// Path of the 1-based level file `level_NNN.json` under `dir`.
pub fn level_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("level_{:03}.json", index))
}

pub fn save(path: &Path, file: &LevelFile) -> Result<()> {
    let json = serde_json::to_string_pretty(file)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

pub fn load(path: &Path) -> Result<LevelFile> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let file: LevelFile =
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(file)
}

/// Load every `level_*.json` under `dir`, sorted by file name.
pub fn load_dir(dir: &Path) -> Result<Vec<(PathBuf, LevelFile)>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("listing {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with("level_") && n.ends_with(".json"))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();

    let mut entries = Vec::with_capacity(paths.len());
    for path in paths {
        let file = load(&path)?;
        entries.push((path, file));
    }
    Ok(entries)
}

/// Write a complete level set to `dir`, replacing any existing set.
pub fn write_set(dir: &Path, levels: &[Level]) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    for (path, _) in load_dir(dir)? {
        fs::remove_file(&path).with_context(|| format!("removing {}", path.display()))?;
    }
    for (i, level) in levels.iter().enumerate() {
        save(&level_path(dir, i + 1), &LevelFile::from_level(level))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shiftline_core::Analyzer;
    use std::collections::{BTreeMap, BTreeSet};

    fn sample_level() -> Level {
        let mut holes = BTreeMap::new();
        holes.insert(Position::new(7, 0), 0);
        let mut blocks = BTreeMap::new();
        blocks.insert(Position::new(0, 0), 0);
        Analyzer::new()
            .analyze(&LevelSetup::new(BTreeSet::new(), holes, blocks))
            .unwrap()
    }

    #[test]
    fn test_level_file_round_trip() {
        let level = sample_level();
        let file = LevelFile::from_level(&level);
        let json = serde_json::to_string_pretty(&file).unwrap();
        let parsed: LevelFile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, file);
        assert_eq!(parsed.setup(), *level.setup());
        assert_eq!(parsed.label(), level.label());
        assert_eq!(parsed.difficulty, 1);
        assert_eq!(parsed.difficulty_label, "easy");
    }

    #[test]
    fn test_positions_serialize_as_pairs() {
        let level = sample_level();
        let file = LevelFile::from_level(&level);
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["holes"][0]["pos"], serde_json::json!([7, 0]));
        assert_eq!(json["bouncers"], serde_json::json!([]));
        assert_eq!(json["palette"][0], "#3C78DC");
    }

    #[test]
    fn test_missing_bouncers_field_defaults_empty() {
        let json = serde_json::json!({
            "width": 8,
            "height": 8,
            "palette": PALETTE,
            "walls": [[1, 1]],
            "blocks": [{"pos": [0, 0], "color": 0}],
            "holes": [{"pos": [7, 0], "color": 0}],
            "difficulty": 4,
            "difficulty_label": "very hard"
        });
        let file: LevelFile = serde_json::from_value(json).unwrap();
        assert!(file.bouncers.is_empty());
        assert_eq!(file.label(), Difficulty::Hard);
    }

    #[test]
    fn test_unknown_label_falls_back_to_hard() {
        let level = sample_level();
        let mut file = LevelFile::from_level(&level);
        file.difficulty_label = "bogus".to_string();
        assert_eq!(file.label(), Difficulty::Hard);
    }

    #[test]
    fn test_level_path_is_zero_padded() {
        let path = level_path(Path::new("levels"), 7);
        assert_eq!(path, Path::new("levels").join("level_007.json"));
        let path = level_path(Path::new("levels"), 123);
        assert_eq!(path, Path::new("levels").join("level_123.json"));
    }
}
