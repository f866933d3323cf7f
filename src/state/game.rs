//! Derives the game title from the host executable path.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// A title recognised by a substring of the executable's file name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KnownTitle {
    /// Case-insensitive substring searched for in the file name.
    pub pattern: String,
    /// Title reported in snapshots.
    pub name: String,
}

impl KnownTitle {
    pub fn new(pattern: &str, name: &str) -> KnownTitle {
        KnownTitle {
            pattern: pattern.to_owned(),
            name: name.to_owned(),
        }
    }

    pub fn defaults() -> Vec<KnownTitle> {
        vec![
            KnownTitle::new("overwatch", "Overwatch"),
            KnownTitle::new("thedivision", "TheDivision"),
            KnownTitle::new("unrealtournament", "UnrealTournament"),
        ]
    }
}

/// First title whose pattern occurs in the file name wins; otherwise the raw path.
pub fn derive_game(module_path: &str, titles: &[KnownTitle]) -> String {
    // Windows paths are split by hand so this also works off-platform.
    let file_name = module_path
        .rsplit(|c: char| c == '\\' || c == '/')
        .next()
        .filter(|name| !name.is_empty())
        .or_else(|| Path::new(module_path).file_name().and_then(|name| name.to_str()))
        .unwrap_or(module_path)
        .to_lowercase();

    titles
        .iter()
        .find(|title| !title.pattern.is_empty() && file_name.contains(&title.pattern.to_lowercase()))
        .map(|title| title.name.clone())
        .unwrap_or_else(|| module_path.to_owned())
}
