//! Fuzzy search over the note collection
//!
//! [`SearchIndex`] is stateless with respect to notes: every query scores the
//! collection it is handed, so there is nothing to keep in sync with the
//! repository.

use crate::error::NoteKeeperError;
use crate::notes::Note;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod bitap;

pub use bitap::{BitapMatcher, MatchOutcome};

/// Default match threshold (0 = exact only, 1 = anything)
pub const DEFAULT_THRESHOLD: f64 = 0.1;
/// Default expected match position
pub const DEFAULT_LOCATION: usize = 0;
/// Default distance over which position costs a full point of score
pub const DEFAULT_DISTANCE: usize = 100;

/// Weight of each searched field; title and description count equally
const FIELD_WEIGHT: f64 = 0.5;

/// What a query returns when nothing matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoMatchBehavior {
    /// Fall back to the whole, unfiltered collection
    #[default]
    ShowAll,
    /// Return no notes
    ShowNone,
}

impl std::str::FromStr for NoMatchBehavior {
    type Err = NoteKeeperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "show_all" | "all" => Ok(Self::ShowAll),
            "show_none" | "none" => Ok(Self::ShowNone),
            other => Err(NoteKeeperError::Config(format!(
                "unknown no-match behavior '{other}'"
            ))),
        }
    }
}

/// Matching algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Typo-tolerant bitap matching governed by threshold/location/distance
    #[default]
    Bitap,
    /// Skim-style subsequence matching, broad recall
    Skim,
}

impl std::str::FromStr for MatchStrategy {
    type Err = NoteKeeperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bitap" => Ok(Self::Bitap),
            "skim" => Ok(Self::Skim),
            other => Err(NoteKeeperError::Config(format!(
                "unknown match strategy '{other}'"
            ))),
        }
    }
}

/// Tuning for [`SearchIndex`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Maximum accepted score, 0.0..=1.0
    pub threshold: f64,
    /// Char position where a match is expected to start
    pub location: usize,
    /// How far from `location` a match may drift; 0 pins it to `location`
    pub distance: usize,
    /// Match case exactly
    pub case_sensitive: bool,
    /// Matching algorithm
    pub strategy: MatchStrategy,
    /// Result when nothing matches
    pub no_match: NoMatchBehavior,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            location: DEFAULT_LOCATION,
            distance: DEFAULT_DISTANCE,
            case_sensitive: false,
            strategy: MatchStrategy::Bitap,
            no_match: NoMatchBehavior::ShowAll,
        }
    }
}

/// A matched note and its score
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// The matching note
    pub note: Note,
    /// 0.0 is a perfect match; larger is worse
    pub score: f64,
}

/// Query engine over a note collection
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    options: SearchOptions,
}

impl SearchIndex {
    /// Create an index with the given options
    pub fn new(options: SearchOptions) -> Self {
        Self { options }
    }

    /// Options in effect
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Filter `notes` by `text`
    ///
    /// An empty or absent query returns `notes` unchanged. Otherwise the
    /// matching notes are returned best first; when nothing matches the result
    /// depends on [`SearchOptions::no_match`].
    pub fn query<'a>(&self, text: impl Into<Option<&'a str>>, notes: &[Note]) -> Vec<Note> {
        let text = match text.into() {
            Some(text) if !text.trim().is_empty() => text,
            _ => return notes.to_vec(),
        };

        let results = self.search(text, notes);
        debug!(
            "Query matched {} of {} notes",
            results.len(),
            notes.len()
        );

        if results.is_empty() {
            return match self.options.no_match {
                NoMatchBehavior::ShowAll => notes.to_vec(),
                NoMatchBehavior::ShowNone => Vec::new(),
            };
        }

        results.into_iter().map(|result| result.note).collect()
    }

    /// Scored matches for `text`, best first, ties in collection order
    pub fn search(&self, text: &str, notes: &[Note]) -> Vec<SearchResult> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut results = match self.options.strategy {
            MatchStrategy::Bitap => self.bitap_search(text, notes),
            MatchStrategy::Skim => self.skim_search(text, notes),
        };

        results.sort_by(|a, b| a.score.total_cmp(&b.score));
        results
    }

    fn bitap_search(&self, text: &str, notes: &[Note]) -> Vec<SearchResult> {
        let matcher = BitapMatcher::new(&self.options);
        let pattern = matcher.compile(text);

        notes
            .iter()
            .filter_map(|note| {
                let mut matched = false;
                let mut total = 1.0;

                for field in [&note.title, &note.description] {
                    if field.trim().is_empty() {
                        continue;
                    }
                    let outcome = matcher.search_in(field, &pattern);
                    if outcome.is_match {
                        matched = true;
                        let score = if outcome.score == 0.0 {
                            f64::EPSILON
                        } else {
                            outcome.score
                        };
                        total *= score.powf(FIELD_WEIGHT * field_norm(field));
                    }
                }

                matched.then(|| SearchResult {
                    note: note.clone(),
                    score: total,
                })
            })
            .collect()
    }

    fn skim_search(&self, text: &str, notes: &[Note]) -> Vec<SearchResult> {
        let matcher = if self.options.case_sensitive {
            SkimMatcherV2::default().respect_case()
        } else {
            SkimMatcherV2::default().ignore_case()
        };

        notes
            .iter()
            .filter_map(|note| {
                let mut best_score = 0;

                if let Some(score) = matcher.fuzzy_match(&note.title, text) {
                    best_score = best_score.max(score);
                }
                if let Some(score) = matcher.fuzzy_match(&note.description, text) {
                    best_score = best_score.max(score / 2); // Weight description less
                }

                (best_score > 0).then(|| SearchResult {
                    note: note.clone(),
                    score: 1.0 / (1.0 + best_score as f64),
                })
            })
            .collect()
    }
}

/// Length normalisation: `1 / sqrt(tokens)` rounded to three decimals
fn field_norm(value: &str) -> f64 {
    let tokens = value.split(' ').filter(|t| !t.is_empty()).count().max(1);
    let norm = 1.0 / (tokens as f64).sqrt();
    (norm * 1000.0).round() / 1000.0
}
