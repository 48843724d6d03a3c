//! Last-resort approximate search.
//!
//! Scores are `2 * LCS(a, b) / (|a| + |b|)` over case-folded chars, the same
//! shape as a matching-blocks ratio but computed from the longest common
//! subsequence.

use crate::text::{CharText, SearchWindow, fold, normalize_spaces, strip_edge_punct};

const MIN_LEN_FACTOR: f64 = 0.6;
const MAX_LEN_FACTOR: f64 = 1.4;

/// Length of the longest common subsequence.
pub fn lcs_len<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; a.len() + 1];
    let mut cur = vec![0usize; a.len() + 1];
    for y in b {
        for (i, x) in a.iter().enumerate() {
            cur[i + 1] = if x == y {
                prev[i] + 1
            } else {
                prev[i + 1].max(cur[i])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[a.len()]
}

/// Similarity in `[0, 1]`; two empty strings are identical.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().map(fold).collect();
    let b: Vec<char> = b.chars().map(fold).collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    2.0 * lcs_len(&a, &b) as f64 / (a.len() + b.len()) as f64
}

/// Best-scoring candidate found by [`best_match`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproxMatch {
    pub start: usize,
    pub end: usize,
    pub ratio: f64,
}

/// Slide candidates of every length in `[0.6n, 1.4n]` over the window and
/// return the highest scoring one, whatever its score.
///
/// Equal scores prefer the start nearest the anchor, then the earliest
/// start, then the shortest candidate.
pub fn best_match(
    text: &CharText,
    surface: &str,
    anchor: Option<usize>,
    half_width: usize,
) -> Option<ApproxMatch> {
    let target: Vec<char> = normalize_spaces(strip_edge_punct(surface))
        .chars()
        .map(fold)
        .collect();
    if target.is_empty() {
        return None;
    }

    let window = SearchWindow::around(anchor, half_width, text.len());
    let hay: Vec<char> = text.slice(window.range()).chars().map(fold).collect();

    let n = target.len();
    let min_len = ((n as f64 * MIN_LEN_FACTOR) as usize).max(1);
    let max_len = ((n as f64 * MAX_LEN_FACTOR) as usize).min(hay.len());
    if max_len < min_len {
        return None;
    }

    let distance = |start: usize| anchor.map_or(0, |a| start.abs_diff(a));

    let mut best: Option<ApproxMatch> = None;
    let mut prev = vec![0usize; n + 1];
    let mut cur = vec![0usize; n + 1];

    for offset in 0..=hay.len() - min_len {
        let limit = max_len.min(hay.len() - offset);
        prev.fill(0);

        // Row k holds LCS(target, hay[offset..offset + k]), so one pass
        // scores every candidate length that starts here.
        for k in 1..=limit {
            let c = hay[offset + k - 1];
            for i in 1..=n {
                cur[i] = if target[i - 1] == c {
                    prev[i - 1] + 1
                } else {
                    prev[i].max(cur[i - 1])
                };
            }
            std::mem::swap(&mut prev, &mut cur);

            if k < min_len {
                continue;
            }
            let ratio = 2.0 * prev[n] as f64 / (n + k) as f64;
            let start = window.lo + offset;
            let better = match best {
                None => true,
                Some(b) => ratio > b.ratio || (ratio == b.ratio && distance(start) < distance(b.start)),
            };
            if better {
                best = Some(ApproxMatch {
                    start,
                    end: start + k,
                    ratio,
                });
            }
        }
    }

    best
}
