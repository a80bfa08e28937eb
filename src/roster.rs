//! JSON roster loading
//!
//! A roster file is a JSON array of entries:
//!
//! ```json
//! [
//!   { "name": "Bulbasaur", "type": "grass/poison",
//!     "stats": { "HP": 45, "ATK": 49, "DEF": 49, "SPATK": 65, "SPDEF": 65, "SPD": 45 } }
//! ]
//! ```
//!
//! `id` is optional; entries without one are numbered by position (1-based).
//! Entries with a blank name are skipped.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::contestant::{Contestant, RawStats};

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to read roster {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed roster: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct RosterEntry {
    #[serde(default)]
    id: Option<u32>,
    #[serde(default)]
    name: String,
    #[serde(default, rename = "type")]
    type_tag: String,
    #[serde(default)]
    stats: RawStats,
}

/// Parse a roster from JSON text
pub fn parse_roster(json: &str) -> Result<Vec<Contestant>, RosterError> {
    let entries: Vec<RosterEntry> = serde_json::from_str(json)?;
    let mut roster = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        let name = entry.name.trim();
        if name.is_empty() {
            log::warn!("Skipping roster entry {} with no name", index + 1);
            continue;
        }
        roster.push(Contestant {
            id: entry.id.unwrap_or(index as u32 + 1),
            name: name.to_string(),
            type_tag: entry.type_tag,
            stats: entry.stats,
        });
    }

    Ok(roster)
}

/// Load a roster from a JSON file
pub fn load_roster(path: impl AsRef<Path>) -> Result<Vec<Contestant>, RosterError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| RosterError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let roster = parse_roster(&json)?;
    log::info!("Loaded {} contestants from {}", roster.len(), path.display());
    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::derive_battle_stats;

    #[test]
    fn test_parse_roster_assigns_ids_and_skips_blank() {
        let json = r#"[
            { "name": "Bulbasaur", "type": "grass/poison", "stats": { "HP": 45, "ATK": 49 } },
            { "name": "   " },
            { "id": 25, "name": " Pikachu ", "type": "electric" }
        ]"#;
        let roster = parse_roster(json).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].id, 1);
        assert_eq!(roster[0].type_tag, "grass/poison");
        assert_eq!(roster[1].id, 25);
        assert_eq!(roster[1].name, "Pikachu");
        // Missing stats fall through to the stat model defaults
        assert_eq!(derive_battle_stats(&roster[1].stats).atk, 60);
    }

    #[test]
    fn test_parse_roster_rejects_non_array() {
        assert!(matches!(parse_roster(r#"{ "name": "x" }"#), Err(RosterError::Parse(_))));
    }
}
