//! Bitap approximate matcher
//!
//! Finds `pattern` in `text` allowing edits, scoring each candidate as
//! `errors / pattern_len + |location - position| / distance`. A candidate is
//! accepted when its score does not exceed the threshold, so with the default
//! settings (threshold 0.1, location 0, distance 100) a hit must start near the
//! beginning of the field and carry at most one error per ten pattern chars.

use crate::search::SearchOptions;
use fuzzy_matcher::FuzzyMatcher;
use std::collections::HashMap;

/// Pattern length handled in one bitap pass
pub const MAX_BITS: usize = 32;

/// Outcome of matching one pattern against one text
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    /// Whether any chunk of the pattern matched
    pub is_match: bool,
    /// 0.0 is exact, larger is worse; 1.0 when nothing matched
    pub score: f64,
    /// Char positions in the text that took part in the match
    pub indices: Vec<usize>,
}

#[derive(Debug, Clone)]
struct PatternChunk {
    chars: Vec<char>,
    alphabet: HashMap<char, u64>,
    start: usize,
}

impl PatternChunk {
    fn new(chars: Vec<char>, start: usize) -> Self {
        let len = chars.len();
        let mut alphabet = HashMap::new();
        for (i, c) in chars.iter().enumerate() {
            *alphabet.entry(*c).or_insert(0u64) |= 1u64 << (len - i - 1);
        }
        Self {
            chars,
            alphabet,
            start,
        }
    }
}

/// A pattern prepared for repeated matching
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    text: String,
    chunks: Vec<PatternChunk>,
}

impl CompiledPattern {
    /// The (case-folded, if applicable) pattern text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// True for an empty pattern, which never matches
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Approximate matcher configured from [`SearchOptions`]
#[derive(Debug, Clone)]
pub struct BitapMatcher {
    threshold: f64,
    location: usize,
    distance: usize,
    case_sensitive: bool,
}

impl Default for BitapMatcher {
    fn default() -> Self {
        Self::new(&SearchOptions::default())
    }
}

impl BitapMatcher {
    /// Create a matcher using the tolerance settings in `options`
    pub fn new(options: &SearchOptions) -> Self {
        Self {
            threshold: options.threshold,
            location: options.location,
            distance: options.distance,
            case_sensitive: options.case_sensitive,
        }
    }

    fn fold(&self, value: &str) -> String {
        if self.case_sensitive {
            value.to_string()
        } else {
            value.to_lowercase()
        }
    }

    /// Prepare `pattern`, splitting it into [`MAX_BITS`]-sized chunks
    pub fn compile(&self, pattern: &str) -> CompiledPattern {
        let text = self.fold(pattern);
        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();

        let mut chunks = Vec::new();
        if len > MAX_BITS {
            let remainder = len % MAX_BITS;
            let end = len - remainder;
            let mut i = 0;
            while i < end {
                chunks.push(PatternChunk::new(chars[i..i + MAX_BITS].to_vec(), i));
                i += MAX_BITS;
            }
            if remainder > 0 {
                let start = len - MAX_BITS;
                chunks.push(PatternChunk::new(chars[start..].to_vec(), start));
            }
        } else if len > 0 {
            chunks.push(PatternChunk::new(chars, 0));
        }

        CompiledPattern { text, chunks }
    }

    /// Match a compiled pattern against `text`
    pub fn search_in(&self, text: &str, pattern: &CompiledPattern) -> MatchOutcome {
        self.search_with(text, pattern, false)
    }

    fn search_with(&self, text: &str, pattern: &CompiledPattern, collect: bool) -> MatchOutcome {
        let text = self.fold(text);

        if pattern.is_empty() {
            return MatchOutcome {
                is_match: false,
                score: 1.0,
                indices: Vec::new(),
            };
        }

        let chars: Vec<char> = text.chars().collect();

        if text == pattern.text {
            return MatchOutcome {
                is_match: true,
                score: 0.0,
                indices: (0..chars.len()).collect(),
            };
        }

        let mut total_score = 0.0;
        let mut has_matches = false;
        let mut mask = vec![false; if collect { chars.len() } else { 0 }];

        for chunk in &pattern.chunks {
            let (is_match, score) =
                self.search_chunk(&chars, chunk, self.location + chunk.start, &mut mask);
            if is_match {
                has_matches = true;
            }
            total_score += score;
        }

        MatchOutcome {
            is_match: has_matches,
            score: if has_matches {
                total_score / pattern.chunks.len() as f64
            } else {
                1.0
            },
            indices: mask
                .iter()
                .enumerate()
                .filter_map(|(i, hit)| hit.then_some(i))
                .collect(),
        }
    }

    fn compute_score(&self, pattern_len: usize, errors: usize, current: usize, expected: usize) -> f64 {
        let accuracy = errors as f64 / pattern_len as f64;
        let proximity = expected.abs_diff(current);

        if self.distance == 0 {
            return if proximity > 0 { 1.0 } else { accuracy };
        }

        accuracy + proximity as f64 / self.distance as f64
    }

    /// One bitap pass; `mask` is filled when it is sized to the text
    fn search_chunk(
        &self,
        text: &[char],
        chunk: &PatternChunk,
        location: usize,
        mask: &mut [bool],
    ) -> (bool, f64) {
        let pattern = &chunk.chars;
        let pattern_len = pattern.len();
        let text_len = text.len();
        let collect = !mask.is_empty();

        let expected = location.min(text_len);
        let mut threshold = self.threshold;

        // Exact occurrences tighten the threshold before the fuzzy pass
        let mut from = expected;
        while let Some(index) = find_from(text, pattern, from) {
            let score = self.compute_score(pattern_len, 0, index, expected);
            threshold = threshold.min(score);
            from = index + pattern_len;
            if collect {
                mask[index..index + pattern_len].fill(true);
            }
        }

        let mut best_location: Option<usize> = None;
        let mut last_bits: Vec<u64> = Vec::new();
        let mut final_score = 1.0;
        let mut bin_max = pattern_len + text_len;
        let match_bit = 1u64 << (pattern_len - 1);

        for errors in 0..pattern_len {
            // Widest window that could still score within the threshold
            let mut bin_min = 0;
            let mut bin_mid = bin_max;
            while bin_min < bin_mid {
                let score = self.compute_score(pattern_len, errors, expected + bin_mid, expected);
                if score <= threshold {
                    bin_min = bin_mid;
                } else {
                    bin_max = bin_mid;
                }
                bin_mid = (bin_max - bin_min) / 2 + bin_min;
            }
            bin_max = bin_mid;

            let mut start = (expected + 1).saturating_sub(bin_mid).max(1);
            let finish = (expected + bin_mid).min(text_len) + pattern_len;

            let mut bits = vec![0u64; finish + 2];
            bits[finish + 1] = (1u64 << errors) - 1;

            let mut j = finish;
            while j >= start {
                let current = j - 1;
                let char_match = text
                    .get(current)
                    .and_then(|c| chunk.alphabet.get(c))
                    .copied()
                    .unwrap_or(0);

                if collect && current < text_len {
                    mask[current] = char_match != 0;
                }

                bits[j] = ((bits[j + 1] << 1) | 1) & char_match;
                if errors > 0 {
                    bits[j] |= ((last_bits[j + 1] | last_bits[j]) << 1) | 1 | last_bits[j + 1];
                }

                if bits[j] & match_bit != 0 {
                    final_score = self.compute_score(pattern_len, errors, current, expected);
                    if final_score <= threshold {
                        threshold = final_score;
                        best_location = Some(current);
                        if current <= expected {
                            break;
                        }
                        start = (2 * expected).saturating_sub(current).max(1);
                    }
                }

                j -= 1;
            }

            // No point allowing another error if it cannot beat the best so far
            let next = self.compute_score(pattern_len, errors + 1, expected, expected);
            if next > threshold {
                break;
            }
            last_bits = bits;
        }

        (best_location.is_some(), f64::max(0.001, final_score))
    }
}

fn find_from(text: &[char], pattern: &[char], from: usize) -> Option<usize> {
    if pattern.is_empty() || from > text.len() || pattern.len() > text.len() - from {
        return None;
    }
    text[from..]
        .windows(pattern.len())
        .position(|window| window == pattern)
        .map(|offset| from + offset)
}

fn to_score_type(score: f64) -> i64 {
    ((1.0 - score).max(0.0) * 1000.0).round() as i64
}

impl FuzzyMatcher for BitapMatcher {
    fn fuzzy_indices(&self, choice: &str, pattern: &str) -> Option<(i64, Vec<usize>)> {
        let compiled = self.compile(pattern);
        let outcome = self.search_with(choice, &compiled, true);
        outcome
            .is_match
            .then(|| (to_score_type(outcome.score), outcome.indices))
    }

    fn fuzzy_match(&self, choice: &str, pattern: &str) -> Option<i64> {
        let compiled = self.compile(pattern);
        let outcome = self.search_in(choice, &compiled);
        outcome.is_match.then(|| to_score_type(outcome.score))
    }
}
