//! Bulk quote collection for offline analysis.
//!
//! Queries are issued one after another through a single [`QuoteClient`], so
//! repeated targets are served from its cache. A failing query is recorded and
//! skipped; it never aborts the rest of the collection.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Quote, QuoteClient, QuoteError};

const BUNDLED_SAMPLE: &str = include_str!("../data/sample_quotes.json");

/// What a single bulk query asked for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    Character(String),
    Show(String),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Character(name) => write!(f, "character '{name}'"),
            Self::Show(title) => write!(f, "show '{title}'"),
        }
    }
}

/// A query that failed during [`bulk_fetch`].
#[derive(Debug)]
pub struct FetchFailure {
    pub target: Target,
    pub error: QuoteError,
}

/// Outcome of [`bulk_fetch`].
#[derive(Debug, Default)]
pub struct BulkFetch {
    /// Quotes from every successful query, in query order.
    pub quotes: Vec<Quote>,
    pub failures: Vec<FetchFailure>,
}

impl BulkFetch {
    /// True when queries were issued and none of them succeeded.
    pub fn all_failed(&self) -> bool {
        self.quotes.is_empty() && !self.failures.is_empty()
    }
}

/// Fetches quotes for each character, then for each show.
pub async fn bulk_fetch(
    client: &QuoteClient,
    characters: &[String],
    shows: &[String],
    limit: Option<u32>,
) -> BulkFetch {
    let targets = characters
        .iter()
        .cloned()
        .map(Target::Character)
        .chain(shows.iter().cloned().map(Target::Show));

    let mut outcome = BulkFetch::default();
    for target in targets {
        let result = match &target {
            Target::Character(name) => client.quotes_by_character(name, limit).await,
            Target::Show(title) => client.quotes_by_show(title, limit).await,
        };
        match result {
            Ok(quotes) => outcome.quotes.extend(quotes),
            Err(error) => {
                #[cfg(feature = "tracing")]
                log_failure(&target, &error);
                outcome.failures.push(FetchFailure { target, error });
            }
        }
    }
    outcome
}

#[cfg(feature = "tracing")]
fn log_failure(target: &Target, error: &QuoteError) {
    match error {
        QuoteError::RetryExhausted { attempts, last } => tracing::warn!(
            query = %target,
            kind = error.kind(),
            attempts = *attempts,
            last_kind = last.kind(),
            "failed to fetch quotes after {attempts} attempts: {last}"
        ),
        _ => tracing::warn!(
            query = %target,
            kind = error.kind(),
            "failed to fetch quotes: {error}"
        ),
    }
}

/// Removes repeated `(anime, character, quote)` triples, keeping the first.
pub fn dedupe(quotes: Vec<Quote>) -> Vec<Quote> {
    let mut seen = HashSet::new();
    quotes
        .into_iter()
        .filter(|quote| seen.insert(quote.clone()))
        .collect()
}

/// Quotes shipped with the crate for offline use.
pub fn bundled_sample() -> std::io::Result<Vec<Quote>> {
    serde_json::from_str(BUNDLED_SAMPLE)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

/// Reads a JSON array of quotes from `path`.
pub fn load_sample(path: &Path) -> std::io::Result<Vec<Quote>> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    pub characters: Option<Vec<String>>,
    pub shows: Option<Vec<String>>,
    pub record_count: usize,
}

/// File written by the `collect` command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollectionReport {
    pub meta: ReportMeta,
    pub data: Vec<Quote>,
}

impl CollectionReport {
    pub fn new(
        characters: Option<Vec<String>>,
        shows: Option<Vec<String>>,
        quotes: Vec<Quote>,
    ) -> Self {
        Self {
            meta: ReportMeta {
                characters,
                shows,
                record_count: quotes.len(),
            },
            data: quotes,
        }
    }
}

/// Writes `report` as pretty JSON, creating parent directories.
pub fn write_report(path: &Path, report: &CollectionReport) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    fs::write(path, json)
}
