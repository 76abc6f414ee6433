//! Fuzzy title scoring.
//!
//! `PartialRatio` compares the shorter string against every window of the
//! same length in the longer string and keeps the best score, so a search
//! term that appears inside a longer title (with a typo or two) still scores
//! high. Scores are case-sensitive.

use crate::traits::SimilarityScorer;

/// Best windowed similarity between two strings, 0 to 100
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialRatio;

impl SimilarityScorer for PartialRatio {
    fn name(&self) -> &str {
        "PartialRatio"
    }

    fn score(&self, query: &str, candidate: &str) -> u8 {
        partial_ratio(query, candidate)
    }
}

/// Windowed similarity score.
///
/// Example: `partial_ratio("Guardians", "Guardians of the Galaxy") == 100`
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let (shorter, longer) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };

    let mut best = 0.0_f64;
    for window in longer.windows(shorter.len()) {
        let score = ratio(shorter, window);
        if score > best {
            best = score;
            // Close enough to a full match, no window can do better
            if best > 0.995 {
                return 100;
            }
        }
    }
    to_percent(best)
}

/// `2 * LCS / (|a| + |b|)`: one minus the normalized insert/delete distance
fn ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }
    2.0 * longest_common_subsequence(a, b) as f64 / total as f64
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

fn to_percent(ratio: f64) -> u8 {
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_scores_full_marks() {
        assert_eq!(partial_ratio("Guardians", "Guardians of the Galaxy"), 100);
        assert_eq!(partial_ratio("Galaxy", "Guardians of the Galaxy"), 100);
        // Argument order doesn't matter
        assert_eq!(partial_ratio("Guardians of the Galaxy", "Galaxy"), 100);
    }

    #[test]
    fn test_typo_still_scores_above_threshold() {
        let score = partial_ratio("Guardains", "Guardians of the Galaxy");
        assert!(score > 70, "score was {score}");
        assert!(score < 100);
    }

    #[test]
    fn test_unrelated_text_scores_low() {
        let score = partial_ratio("xyz-nomatch", "Guardians of the Galaxy");
        assert!(score <= 70, "score was {score}");
    }

    #[test]
    fn test_case_sensitive() {
        assert!(partial_ratio("guardians", "Guardians of the Galaxy") < 100);
    }

    #[test]
    fn test_empty_input_scores_zero() {
        assert_eq!(partial_ratio("", "Guardians"), 0);
        assert_eq!(partial_ratio("Guardians", ""), 0);
        assert_eq!(partial_ratio("", ""), 0);
    }

    #[test]
    fn test_equal_length_strings_use_one_window() {
        assert_eq!(partial_ratio("Prometheus", "Prometheus"), 100);
        // "abcd" vs "abce": LCS 3 of 8 chars -> 75
        assert_eq!(partial_ratio("abcd", "abce"), 75);
    }

    #[test]
    fn test_scorer_trait_delegates() {
        let scorer = PartialRatio;
        assert_eq!(scorer.name(), "PartialRatio");
        assert_eq!(scorer.score("Split", "Split (2016)"), 100);
    }
}
