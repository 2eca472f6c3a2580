//! Fighter roster lookup used as a selection aid

use tracing::debug;

use crate::client::PredictionService;
use crate::error::PredictionError;
use crate::models::FighterName;

/// Status the service returns when it does not know a fighter
const STATUS_NOT_FOUND: u16 = 404;

/// Roster matches for one name the service did not recognise
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub name: String,
    pub matches: Vec<FighterName>,
}

/// Sorted, de-duplicated roster with case-insensitive search
#[derive(Debug, Clone, Default)]
pub struct FighterIndex {
    // (lowercased, original)
    entries: Vec<(String, FighterName)>,
}

impl FighterIndex {
    pub fn new(fighters: impl IntoIterator<Item = FighterName>) -> Self {
        let mut entries: Vec<(String, FighterName)> = fighters
            .into_iter()
            .map(|name| (name.as_str().to_lowercase(), name))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.as_str().cmp(b.1.as_str())));
        entries.dedup_by(|a, b| a.0 == b.0);
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FighterName> {
        self.entries.iter().map(|(_, name)| name)
    }

    /// Exact, case-insensitive membership
    pub fn contains(&self, name: &str) -> bool {
        let key = name.trim().to_lowercase();
        self.entries
            .binary_search_by(|(lower, _)| lower.as_str().cmp(key.as_str()))
            .is_ok()
    }

    /// Names containing `query`, prefix matches first, at most `limit` results
    pub fn search(&self, query: &str, limit: usize) -> Vec<&FighterName> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.iter().take(limit).collect();
        }

        let (mut prefix, rest): (Vec<_>, Vec<_>) = self
            .entries
            .iter()
            .filter(|(lower, _)| lower.contains(&query))
            .partition(|(lower, _)| lower.starts_with(&query));

        prefix.extend(rest);
        prefix
            .into_iter()
            .take(limit)
            .map(|(_, name)| name)
            .collect()
    }

    /// Close matches for a name that is not on the roster, searched by its last word
    pub fn suggest(&self, name: &str, limit: usize) -> Vec<FighterName> {
        let name = name.trim();
        if name.is_empty() || self.contains(name) {
            return Vec::new();
        }
        let query = name.split_whitespace().last().unwrap_or(name);
        self.search(query, limit).into_iter().cloned().collect()
    }
}

/// Roster suggestions after a failed prediction
///
/// Only a 404 means a name was not recognised. Any other error returns
/// nothing without contacting the service.
pub async fn suggest_after_failure<S>(
    service: &S,
    error: &PredictionError,
    names: &[&str],
    limit: usize,
) -> Vec<Suggestion>
where
    S: PredictionService + ?Sized,
{
    if error.status() != Some(STATUS_NOT_FOUND) {
        return Vec::new();
    }

    let index = match service.list_fighters().await {
        Ok(fighters) => FighterIndex::new(fighters),
        Err(e) => {
            debug!("Skipping suggestions: {}", e);
            return Vec::new();
        }
    };

    names
        .iter()
        .filter_map(|name| {
            let matches = index.suggest(name, limit);
            (!matches.is_empty()).then(|| Suggestion {
                name: name.trim().to_string(),
                matches,
            })
        })
        .collect()
}
