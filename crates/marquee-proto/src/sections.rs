//! Recently-added episodes, one TV section at a time.
//!
//! The server's global recently-added feed does not reliably surface
//! episodes, so every `show` section is asked directly for its newest
//! episodes. Sections are visited in server order, one request at a time,
//! which keeps load on the server bounded and makes the fill order
//! reproducible.

use tracing::{debug, warn};

use crate::document::parse_container;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::normalize::partition_recent;
use crate::protocol::EpisodeRecord;

pub const SECTIONS_PATH: &str = "/library/sections";

/// Item type number the server uses for episodes.
const EPISODE_TYPE: u8 = 4;

/// Path listing a section's newest episodes, `limit` per page.
pub fn section_episodes_path(section_id: &str, limit: usize) -> String {
    format!(
        "{SECTIONS_PATH}/{section_id}/all?type={EPISODE_TYPE}&sort=addedAt:desc\
         &X-Plex-Container-Start=0&X-Plex-Container-Size={limit}"
    )
}

#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub episodes: Vec<EpisodeRecord>,
    /// Section ids in the order they were requested.
    pub visited: Vec<String>,
    /// Sections whose request or document failed, with the reason.
    pub failed: Vec<(String, String)>,
}

impl ScanOutcome {
    /// Every section that was tried failed.
    pub fn all_failed(&self) -> bool {
        !self.visited.is_empty() && self.failed.len() == self.visited.len()
    }
}

/// Ids of the `show` sections, in server order.
pub async fn show_section_ids<F: Fetcher>(fetcher: &F) -> Result<Vec<String>> {
    let body = fetcher.get(SECTIONS_PATH).await?;
    let container = parse_container(&body)?;
    Ok(container
        .directories
        .into_iter()
        .filter(|d| d.is_show_section())
        .filter_map(|d| d.key)
        .collect())
}

/// Collect up to `limit` recently-added episodes across all TV sections.
///
/// Only a failure to list the sections is returned as an error. A section
/// that fails is recorded in `failed` and contributes nothing.
pub async fn scan_episodes<F: Fetcher>(fetcher: &F, limit: usize) -> Result<ScanOutcome> {
    let section_ids = show_section_ids(fetcher).await?;
    if section_ids.is_empty() {
        debug!("no TV sections on server");
    }

    let mut outcome = ScanOutcome::default();
    for section_id in section_ids {
        if outcome.episodes.len() >= limit {
            break;
        }
        outcome.visited.push(section_id.clone());

        let path = section_episodes_path(&section_id, limit);
        let container = match fetcher.get(&path).await {
            Ok(body) => parse_container(&body),
            Err(e) => Err(e),
        };

        match container {
            Ok(container) => {
                let room = limit - outcome.episodes.len();
                let found = partition_recent(&container, 0, limit).episodes;
                debug!("section {}: {} episodes", section_id, found.len());
                outcome.episodes.extend(found.into_iter().take(room));
            }
            Err(e) => {
                warn!("section {}: {}", section_id, e);
                outcome.failed.push((section_id, e.to_string()));
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_path() {
        assert_eq!(
            section_episodes_path("7", 5),
            "/library/sections/7/all?type=4&sort=addedAt:desc&X-Plex-Container-Start=0&X-Plex-Container-Size=5"
        );
    }

    #[test]
    fn test_all_failed_needs_a_visit() {
        let mut outcome = ScanOutcome::default();
        assert!(!outcome.all_failed());
        outcome.visited.push("1".into());
        outcome.failed.push(("1".into(), "boom".into()));
        assert!(outcome.all_failed());
        outcome.visited.push("2".into());
        assert!(!outcome.all_failed());
    }
}
