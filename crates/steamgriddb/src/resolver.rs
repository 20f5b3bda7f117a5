//! Best-effort cover art resolution for one game.

use std::path::PathBuf;

use sunray_model::{GameRecord, normalized_name};
use tracing::{debug, warn};

use crate::cache::CoverCache;
use crate::client::Client;
use crate::types::SearchResult;

/// Resolves a cover for a game, cache first, API second.
///
/// Every failure path degrades to "no artwork"; the import itself never
/// depends on this succeeding.
pub struct ArtworkResolver {
    client: Client,
    cache: CoverCache,
}

impl ArtworkResolver {
    pub fn new(client: Client, cache: CoverCache) -> Self {
        Self { client, cache }
    }

    /// Returns a local cover path for the game, or `None`.
    ///
    /// A cached cover short-circuits without touching the network. Otherwise
    /// the display name is searched, the best grid of the matched game is
    /// downloaded, and the result is cached under the game's identity.
    pub async fn resolve(&self, record: &GameRecord) -> Option<PathBuf> {
        let identity = record.identity();

        if let Some(path) = self.cache.find(&identity) {
            debug!(game = %record.name, path = %path.display(), "cover already cached");
            return Some(path);
        }

        let results = match self.client.search(&record.name).await {
            Ok(results) => results,
            Err(e) => {
                warn!(game = %record.name, error = %e, "artwork search failed");
                return None;
            }
        };

        let Some(candidate) = pick_candidate(&record.name, &results) else {
            debug!(game = %record.name, "no artwork match");
            return None;
        };

        let grids = match self.client.grids(candidate.id).await {
            Ok(grids) => grids,
            Err(e) => {
                warn!(game = %record.name, error = %e, "grid lookup failed");
                return None;
            }
        };

        let Some(grid) = grids.iter().find(|g| !g.url.is_empty()) else {
            debug!(game = %record.name, "no grids available");
            return None;
        };

        let (data, content_type) = match self.client.download(&grid.url).await {
            Ok(downloaded) => downloaded,
            Err(e) => {
                warn!(game = %record.name, error = %e, "cover download failed");
                return None;
            }
        };

        match self.cache.store(&identity, &data, &content_type) {
            Ok(path) => {
                debug!(game = %record.name, path = %path.display(), "cover downloaded");
                Some(path)
            }
            Err(e) => {
                warn!(game = %record.name, error = %e, "cover write failed");
                None
            }
        }
    }
}

/// Picks the search result to take artwork from.
///
/// An exact match on the normalized display name wins; otherwise the API's
/// own relevance order stands and the first result is taken.
fn pick_candidate<'a>(name: &str, results: &'a [SearchResult]) -> Option<&'a SearchResult> {
    let wanted = normalized_name(name);
    results
        .iter()
        .find(|r| normalized_name(&r.name) == wanted)
        .or_else(|| results.first())
}
