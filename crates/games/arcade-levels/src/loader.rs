use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use arcade_core::frame::{Grid, normalize_grid};

/// Errors raised while reading a level pack from disk.
#[derive(Debug, Error)]
pub enum LevelLoadError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid json in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} has no grid")]
    EmptyGrid(PathBuf),

    #[error("game directory {0} has no playable levels")]
    NoLevels(PathBuf),
}

/// One level: starting grid and optional target grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub name: String,
    pub initial: Grid,
    pub target: Option<Grid>,
}

/// A game defined by a directory of levels.
#[derive(Debug, Clone)]
pub struct LevelPack {
    pub game_id: String,
    pub title: String,
    pub max_actions: Option<u32>,
    pub levels: Vec<Level>,
}

#[derive(Debug, Default, Deserialize)]
struct MetadataFile {
    title: Option<String>,
    name: Option<String>,
    max_actions: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GridFile {
    #[serde(default)]
    grid: Vec<Vec<u8>>,
    #[serde(default)]
    title: Option<String>,
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, LevelLoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LevelLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| LevelLoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn read_grid(path: &Path) -> Result<(Grid, Option<String>), LevelLoadError> {
    let file: GridFile = read_json(path)?;
    if file.grid.is_empty() {
        return Err(LevelLoadError::EmptyGrid(path.to_path_buf()));
    }
    Ok((normalize_grid(&file.grid), file.title))
}

/// Sort key for `level_N` directory names: numeric suffix first, then name.
fn level_order(name: &str) -> (u32, String) {
    let n = name
        .strip_prefix("level_")
        .and_then(|s| s.parse().ok())
        .unwrap_or(u32::MAX);
    (n, name.to_string())
}

/// Load one game directory (`<data_dir>/<game_id>/`).
pub fn load_pack(dir: &Path) -> Result<LevelPack, LevelLoadError> {
    let game_id = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let metadata_path = dir.join("metadata.json");
    let metadata: MetadataFile = if metadata_path.exists() {
        read_json(&metadata_path)?
    } else {
        MetadataFile::default()
    };

    let entries = std::fs::read_dir(dir).map_err(|source| LevelLoadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut level_names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with("level_"))
        .collect();
    level_names.sort_by_key(|n| level_order(n));

    let mut levels = Vec::new();
    let mut first_title = None;
    for name in level_names {
        let level_dir = dir.join(&name);
        let initial_path = level_dir.join("initial.json");
        if !initial_path.exists() {
            tracing::debug!(game_id = %game_id, level = %name, "Level has no initial.json, skipping");
            continue;
        }
        let loaded = read_grid(&initial_path).and_then(|(initial, title)| {
            let final_path = level_dir.join("final.json");
            let target = if final_path.exists() {
                Some(read_grid(&final_path)?.0)
            } else {
                None
            };
            Ok((initial, title, target))
        });
        match loaded {
            Ok((initial, title, target)) => {
                if first_title.is_none() {
                    first_title = Some(title.unwrap_or_else(|| format!("{game_id} - {name}")));
                }
                levels.push(Level {
                    name,
                    initial,
                    target,
                });
            },
            Err(e) => tracing::warn!(game_id = %game_id, level = %name, error = %e, "Skipping unreadable level"),
        }
    }

    if levels.is_empty() {
        return Err(LevelLoadError::NoLevels(dir.to_path_buf()));
    }

    let title = metadata
        .title
        .or(metadata.name)
        .or(first_title)
        .unwrap_or_else(|| game_id.clone());

    Ok(LevelPack {
        game_id,
        title,
        max_actions: metadata.max_actions,
        levels,
    })
}

/// Load every game directory under `data_dir`. A missing directory yields no
/// packs; broken packs are skipped with a warning.
pub fn discover(data_dir: &Path) -> Vec<LevelPack> {
    let Ok(entries) = std::fs::read_dir(data_dir) else {
        tracing::info!(dir = %data_dir.display(), "No game data directory, skipping level packs");
        return Vec::new();
    };

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();

    dirs.iter()
        .filter_map(|dir| match load_pack(dir) {
            Ok(pack) => {
                tracing::info!(
                    game_id = %pack.game_id,
                    levels = pack.levels.len(),
                    "Loaded level pack"
                );
                Some(pack)
            },
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "Skipping level pack");
                None
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(path: &Path, body: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    #[test]
    fn levels_sort_numerically() {
        let mut names = vec!["level_10", "level_2", "level_1"];
        names.sort_by_key(|n| level_order(n));
        assert_eq!(names, vec!["level_1", "level_2", "level_10"]);
    }

    #[test]
    fn loads_pack_with_metadata_title() {
        let tmp = tempfile::tempdir().unwrap();
        let game = tmp.path().join("ls20-abc");
        write(&game.join("metadata.json"), r#"{"title":"LS20","max_actions":5}"#);
        write(&game.join("level_1/initial.json"), r#"{"grid":[[1,2],[3,4]]}"#);
        write(&game.join("level_1/final.json"), r#"{"grid":[[4,3],[2,1]]}"#);

        let pack = load_pack(&game).unwrap();
        assert_eq!(pack.game_id, "ls20-abc");
        assert_eq!(pack.title, "LS20");
        assert_eq!(pack.max_actions, Some(5));
        assert_eq!(pack.levels.len(), 1);
        assert_eq!(pack.levels[0].initial[0][1], 2);
        assert_eq!(pack.levels[0].initial.len(), 64);
        assert_eq!(pack.levels[0].target.as_ref().unwrap()[1][1], 1);
    }

    #[test]
    fn title_falls_back_to_first_level() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("alpha");
        write(&a.join("level_1/initial.json"), r#"{"grid":[[1]],"title":"Alpha One"}"#);
        assert_eq!(load_pack(&a).unwrap().title, "Alpha One");

        let b = tmp.path().join("beta-two");
        write(&b.join("level_1/initial.json"), r#"{"grid":[[1]]}"#);
        write(&b.join("level_2/initial.json"), r#"{"grid":[[2]],"title":"Later"}"#);
        assert_eq!(load_pack(&b).unwrap().title, "beta-two - level_1");
    }

    #[test]
    fn broken_level_is_skipped_and_empty_pack_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let game = tmp.path().join("broken");
        write(&game.join("level_1/initial.json"), "not json");
        assert!(matches!(
            load_pack(&game),
            Err(LevelLoadError::NoLevels(_))
        ));
    }

    #[test]
    fn discover_skips_bad_packs_and_missing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            &tmp.path().join("good/level_1/initial.json"),
            r#"{"grid":[[0]]}"#,
        );
        fs::create_dir_all(tmp.path().join("empty")).unwrap();
        let packs = discover(tmp.path());
        assert_eq!(packs.len(), 1);
        assert_eq!(packs[0].game_id, "good");

        assert!(discover(&tmp.path().join("missing")).is_empty());
    }
}
