//! Which library playlists to export

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::library::PlaylistInfo;

/// A persisted inclusion decision for one playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSelection {
    pub name: String,
    #[serde(default)]
    pub persistent_id: Option<String>,
    pub included: bool,
}

impl PlaylistSelection {
    /// Same playlist by persistent id, or by name when no id was stored
    fn matches(&self, info: &PlaylistInfo) -> bool {
        match (&self.persistent_id, &info.persistent_id) {
            (Some(stored), Some(current)) => stored == current,
            (None, _) => self.name == info.name,
            (Some(_), None) => false,
        }
    }
}

/// Bring stored selections in line with the playlists currently available
///
/// Selections for playlists that no longer exist are dropped. Playlists seen
/// for the first time are passed to `decide`. The result follows the order of
/// `available`.
pub fn reconcile<F>(
    stored: &[PlaylistSelection],
    available: &[PlaylistInfo],
    mut decide: F,
) -> Result<Vec<PlaylistSelection>>
where
    F: FnMut(&PlaylistInfo) -> Result<bool>,
{
    let mut used = vec![false; stored.len()];
    let mut reconciled = Vec::with_capacity(available.len());

    for info in available {
        let existing = stored
            .iter()
            .enumerate()
            .find(|(idx, sel)| !used[*idx] && sel.matches(info));

        let included = match existing {
            Some((idx, sel)) => {
                used[idx] = true;
                sel.included
            }
            None => {
                let included = decide(info)?;
                debug!("New playlist {} included: {}", info.name, included);
                included
            }
        };

        reconciled.push(PlaylistSelection {
            name: info.name.clone(),
            persistent_id: info.persistent_id.clone(),
            included,
        });
    }

    for (sel, _) in stored.iter().zip(&used).filter(|(_, seen)| !**seen) {
        info!("Playlist {} no longer exists, removing from selection", sel.name);
    }

    Ok(reconciled)
}

/// Available playlists marked as included
pub fn included(selections: &[PlaylistSelection], available: &[PlaylistInfo]) -> Vec<PlaylistInfo> {
    available
        .iter()
        .filter(|info| selections.iter().any(|sel| sel.included && sel.matches(info)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(name: &str, id: Option<&str>) -> PlaylistInfo {
        PlaylistInfo {
            name: name.to_string(),
            persistent_id: id.map(str::to_string),
            track_count: None,
        }
    }

    fn selection(name: &str, id: Option<&str>, included: bool) -> PlaylistSelection {
        PlaylistSelection {
            name: name.to_string(),
            persistent_id: id.map(str::to_string),
            included,
        }
    }

    #[test]
    fn test_reconcile_keeps_decisions_and_asks_for_new() {
        let stored = vec![selection("Road Trip", Some("A1"), true), selection("Chill", Some("B1"), false)];
        let available = vec![info("Road Trip", Some("A1")), info("Chill", Some("B1")), info("Party", Some("C1"))];

        let mut asked = Vec::new();
        let reconciled = reconcile(&stored, &available, |info| {
            asked.push(info.name.clone());
            Ok(true)
        })
        .unwrap();

        assert_eq!(asked, vec!["Party"]);
        let flags: Vec<_> = reconciled.iter().map(|s| s.included).collect();
        assert_eq!(flags, vec![true, false, true]);
    }

    #[test]
    fn test_reconcile_drops_deleted_playlists() {
        let stored = vec![selection("Deleted", Some("X1"), true), selection("Kept", Some("K1"), true)];
        let available = vec![info("Kept", Some("K1"))];

        let reconciled = reconcile(&stored, &available, |_| panic!("nothing new")).unwrap();
        assert_eq!(reconciled, vec![selection("Kept", Some("K1"), true)]);
    }

    #[test]
    fn test_reconcile_follows_renames_by_id() {
        let stored = vec![selection("Old Name", Some("A1"), true)];
        let available = vec![info("New Name", Some("A1"))];

        let reconciled = reconcile(&stored, &available, |_| Ok(false)).unwrap();
        assert_eq!(reconciled, vec![selection("New Name", Some("A1"), true)]);
    }

    #[test]
    fn test_reconcile_duplicate_names_distinct_ids() {
        let stored = vec![selection("Mix", Some("A1"), false), selection("Mix", Some("A2"), true)];
        let available = vec![info("Mix", Some("A1")), info("Mix", Some("A2"))];

        let reconciled = reconcile(&stored, &available, |_| Ok(false)).unwrap();
        let flags: Vec<_> = reconciled.iter().map(|s| s.included).collect();
        assert_eq!(flags, vec![false, true]);

        let chosen = included(&reconciled, &available);
        assert_eq!(chosen, vec![info("Mix", Some("A2"))]);
    }

    #[test]
    fn test_reconcile_legacy_entries_match_by_name() {
        let stored = vec![selection("Road Trip", None, true)];
        let available = vec![info("Road Trip", Some("A1"))];

        let reconciled = reconcile(&stored, &available, |_| Ok(false)).unwrap();
        assert_eq!(reconciled, vec![selection("Road Trip", Some("A1"), true)]);
    }

    #[test]
    fn test_reconcile_propagates_prompt_error() {
        let available = vec![info("Party", Some("C1"))];
        let result = reconcile(&[], &available, |_| Err(anyhow::anyhow!("cancelled")));
        assert!(result.is_err());
    }
}
