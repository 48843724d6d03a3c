use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::collections::HashSet;

use crate::approx;
use crate::config::RepairConfig;
use crate::text::{CharText, SearchWindow, normalize_spaces, strip_edge_punct};

/// One way of finding a surface string in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// The raw surface text, ignoring case.
    Exact,
    /// The surface text without edge punctuation, ignoring case.
    EdgeStripped,
    /// Word by word, tolerating hyphens inside and between words.
    HyphenTolerant,
    /// Best LCS similarity above the configured threshold.
    Approximate,
}

/// Tiers are tried in order and the first tier that finds anything wins.
/// Inside a tier every strategy runs and the candidate nearest the anchor wins.
pub const LADDER: &[&[Strategy]] = &[
    &[Strategy::Exact, Strategy::EdgeStripped, Strategy::HyphenTolerant],
    &[Strategy::Approximate],
];

/// A char span found by a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located {
    pub start: usize,
    pub end: usize,
    pub strategy: Strategy,
}

impl Located {
    fn distance(&self, anchor: Option<usize>) -> usize {
        anchor.map_or(0, |a| self.start.abs_diff(a))
    }
}

impl Strategy {
    pub fn label(self) -> &'static str {
        match self {
            Strategy::Exact => "exact",
            Strategy::EdgeStripped => "edge-stripped",
            Strategy::HyphenTolerant => "hyphen-tolerant",
            Strategy::Approximate => "approx",
        }
    }

    /// Search `config.window` chars either side of `anchor` (the whole text
    /// without one) for `surface`.
    pub fn locate(
        self,
        text: &CharText,
        surface: &str,
        anchor: Option<usize>,
        config: &RepairConfig,
    ) -> Option<Located> {
        if surface.is_empty() {
            return None;
        }
        match self {
            Strategy::Exact => {
                let re = literal_regex(surface)?;
                self.nearest_match(&re, text, anchor, config.window)
            }
            Strategy::EdgeStripped => {
                let stripped = strip_edge_punct(surface);
                if stripped.is_empty() || stripped.to_lowercase() == surface.to_lowercase() {
                    return None;
                }
                let re = literal_regex(stripped)?;
                self.nearest_match(&re, text, anchor, config.window)
            }
            Strategy::HyphenTolerant => {
                let stripped = strip_edge_punct(surface);
                let phrase = if stripped.is_empty() { surface } else { stripped };
                let re = hyphen_tolerant_regex(phrase)?;
                self.nearest_match(&re, text, anchor, config.window)
            }
            Strategy::Approximate => {
                let m = approx::best_match(text, surface, anchor, config.window)?;
                (m.ratio >= config.min_similarity_ratio).then_some(Located {
                    start: m.start,
                    end: m.end,
                    strategy: self,
                })
            }
        }
    }

    fn nearest_match(
        self,
        re: &Regex,
        text: &CharText,
        anchor: Option<usize>,
        half_width: usize,
    ) -> Option<Located> {
        let window = SearchWindow::around(anchor, half_width, text.len());
        let (byte_lo, byte_hi) = (text.byte_of(window.lo), text.byte_of(window.hi));
        let haystack = text.as_str();

        // Searching the whole text keeps `\b` honest at the window edges.
        // Restarting one char past each match start finds every start
        // position, so the candidates do not depend on where the window begins.
        let mut candidates = Vec::new();
        let mut pos = byte_lo;
        while pos < byte_hi {
            let Some(m) = re.find_at(haystack, pos) else {
                break;
            };
            if m.start() >= byte_hi {
                break;
            }
            if !m.is_empty() && m.end() <= byte_hi {
                candidates.push(Located {
                    start: text.char_of(m.start()),
                    end: text.char_of(m.end()),
                    strategy: self,
                });
            }
            pos = m.start() + haystack[m.start()..].chars().next().map_or(1, char::len_utf8);
        }

        candidates
            .into_iter()
            .min_by_key(|c| (c.distance(anchor), c.start))
    }
}

/// Walk the ladder and return the first tier's best candidate.
pub fn relocate(
    text: &CharText,
    surface: &str,
    anchor: Option<usize>,
    config: &RepairConfig,
) -> Option<Located> {
    LADDER.iter().find_map(|tier| {
        tier.iter()
            .filter_map(|s| s.locate(text, surface, anchor, config))
            .min_by_key(|c| (c.distance(anchor), c.start))
    })
}

/// [`relocate`], then keep re-anchoring on the span just found until the
/// search returns that same span.
///
/// A later search anchored at the result's start finds the result again, so
/// repairing a repaired span leaves it in place. Revisiting a span stops the
/// loop.
pub fn settle(
    text: &CharText,
    surface: &str,
    anchor: Option<usize>,
    config: &RepairConfig,
) -> Option<Located> {
    let mut found = relocate(text, surface, anchor, config)?;
    let mut seen = HashSet::new();

    while seen.insert((found.start, found.end)) {
        match relocate(text, surface, Some(found.start), config) {
            Some(next) if (next.start, next.end) != (found.start, found.end) => {
                tracing::trace!(
                    from = ?(found.start, found.end),
                    to = ?(next.start, next.end),
                    strategy = next.strategy.label(),
                    "Re-anchored relocation"
                );
                found = next;
            }
            _ => break,
        }
    }

    Some(found)
}

fn literal_regex(needle: &str) -> Option<Regex> {
    RegexBuilder::new(&regex::escape(needle))
        .case_insensitive(true)
        .build()
        .ok()
}

/// `cancer causing` -> `\bc-?a-?n-?c-?e-?r-?(?:\s*-\s*|\s+)c-?a-?u-?s-?i-?n-?g-?\b`
pub(crate) fn hyphen_tolerant_pattern(phrase: &str) -> Option<String> {
    let words: Vec<String> = normalize_spaces(phrase)
        .split_whitespace()
        .map(|word| {
            word.chars()
                .map(|ch| {
                    let lit = regex::escape(ch.encode_utf8(&mut [0; 4]));
                    if ch.is_alphabetic() { format!("{}-?", lit) } else { lit }
                })
                .collect()
        })
        .collect();

    if words.is_empty() {
        return None;
    }
    Some(format!(r"\b{}\b", words.join(r"(?:\s*-\s*|\s+)")))
}

fn hyphen_tolerant_regex(phrase: &str) -> Option<Regex> {
    RegexBuilder::new(&hyphen_tolerant_pattern(phrase)?)
        .case_insensitive(true)
        .build()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locate(strategy: Strategy, text: &str, surface: &str, anchor: Option<usize>) -> Option<(usize, usize)> {
        let text = CharText::new(text);
        strategy
            .locate(&text, surface, anchor, &RepairConfig::default())
            .map(|l| (l.start, l.end))
    }

    #[test]
    fn test_exact_ignores_case() {
        assert_eq!(locate(Strategy::Exact, "Aspirin reduces pain.", "PAIN", None), Some((16, 20)));
        assert_eq!(locate(Strategy::Exact, "Aspirin reduces pain.", "fever", None), None);
    }

    #[test]
    fn test_exact_picks_occurrence_nearest_anchor() {
        let text = "pain ... pain ... pain";
        assert_eq!(locate(Strategy::Exact, text, "pain", Some(10)), Some((9, 13)));
        assert_eq!(locate(Strategy::Exact, text, "pain", Some(20)), Some((18, 22)));
        assert_eq!(locate(Strategy::Exact, text, "pain", None), Some((0, 4)));
    }

    #[test]
    fn test_exact_respects_window() {
        let text = format!("aspirin{}", " ".repeat(400));
        let config = RepairConfig::default();
        let text = CharText::new(&text);
        assert!(Strategy::Exact.locate(&text, "aspirin", Some(300), &config).is_none());
        assert!(Strategy::Exact.locate(&text, "aspirin", Some(100), &config).is_some());
    }

    #[test]
    fn test_edge_stripped_only_when_it_differs() {
        assert_eq!(locate(Strategy::EdgeStripped, "Take aspirin daily", "aspirin.", None), Some((5, 12)));
        assert_eq!(locate(Strategy::EdgeStripped, "Take aspirin daily", "aspirin", None), None);
    }

    #[test]
    fn test_hyphen_tolerant_pattern() {
        assert_eq!(
            hyphen_tolerant_pattern("cancer  causing").unwrap(),
            r"\bc-?a-?n-?c-?e-?r-?(?:\s*-\s*|\s+)c-?a-?u-?s-?i-?n-?g-?\b"
        );
        assert_eq!(hyphen_tolerant_pattern("IL6").unwrap(), r"\bI-?L-?6\b");
        assert_eq!(hyphen_tolerant_pattern("   "), None);
    }

    #[test]
    fn test_hyphen_tolerant_absorbs_line_break_hyphens() {
        let text = "the cancer-causing agent";
        assert_eq!(locate(Strategy::HyphenTolerant, text, "cancer causing", Some(30)), Some((4, 18)));
        assert_eq!(locate(Strategy::HyphenTolerant, "acetylsali-cylic acid", "acetylsalicylic acid", None), Some((0, 21)));
        assert_eq!(locate(Strategy::HyphenTolerant, "inflam-mation", "inflammation", None), Some((0, 13)));
    }

    #[test]
    fn test_hyphen_tolerant_enforces_word_boundaries() {
        assert_eq!(locate(Strategy::HyphenTolerant, "precancer cells", "cancer", None), None);
    }

    #[test]
    fn test_approximate_threshold() {
        let text = "Patients received acetyl-salicilic acid daily.";
        assert_eq!(locate(Strategy::Approximate, text, "acetylsalicylic acid", Some(0)), Some((18, 39)));

        let unrelated = "Patients were given a placebo tablet twice a day.";
        assert_eq!(locate(Strategy::Approximate, unrelated, "acetylsalicylic acid", Some(0)), None);
    }

    #[test]
    fn test_word_boundaries_see_past_the_window_edge() {
        // The window starts inside "precancer"; that is not a word start.
        let text = format!("precancer{}", " ".repeat(200));
        assert_eq!(locate(Strategy::HyphenTolerant, &text, "cancer", Some(123)), None);
        assert_eq!(locate(Strategy::HyphenTolerant, &text, "precancer", Some(120)), Some((0, 9)));
    }

    #[test]
    fn test_overlapping_occurrences_are_all_candidates() {
        let text = "aaaa";
        assert_eq!(locate(Strategy::Exact, text, "aa", Some(1)), Some((1, 3)));
        assert_eq!(locate(Strategy::Exact, text, "aa", Some(2)), Some((2, 4)));
    }

    #[test]
    fn test_settle_follows_better_matches_out_of_the_first_window() {
        let doc = format!(
            "{:<110}acetylsalicylic acis end",
            format!("{:<40}acetyl-salicilic acid", "qqq")
        );
        let text = CharText::new(&doc);
        let config = RepairConfig::default();

        let first = relocate(&text, "acetylsalicylic acid", Some(0), &config).unwrap();
        assert_eq!((first.start, first.end), (40, 61));

        let settled = settle(&text, "acetylsalicylic acid", Some(0), &config).unwrap();
        assert_eq!((settled.start, settled.end), (110, 129));
        assert_eq!(settled.strategy, Strategy::Approximate);
        let again = relocate(&text, "acetylsalicylic acid", Some(settled.start), &config).unwrap();
        assert_eq!((again.start, again.end), (110, 129));
    }

    #[test]
    fn test_settle_keeps_first_tier_hits() {
        let text = CharText::new("the cancer-causing agent");
        let found = settle(&text, "cancer causing", Some(24), &RepairConfig::default()).unwrap();
        assert_eq!((found.start, found.end, found.strategy), (4, 18, Strategy::HyphenTolerant));
        assert_eq!(settle(&text, "tumour", Some(0), &RepairConfig::default()), None);
    }

    #[test]
    fn test_relocate_prefers_nearest_within_first_tier() {
        // The exact hit is far away; the hyphenated one sits at the anchor.
        let text = format!("cancer causing{}the cancer-causing agent", " ".repeat(50));
        let text = CharText::new(&text);
        let found = relocate(&text, "cancer causing", Some(68), &RepairConfig::default()).unwrap();
        assert_eq!((found.start, found.end), (68, 82));
        assert_eq!(found.strategy, Strategy::HyphenTolerant);
    }

    #[test]
    fn test_relocate_ties_go_to_earlier_tier_member() {
        let text = CharText::new("He took aspirin.");
        let found = relocate(&text, "aspirin", Some(8), &RepairConfig::default()).unwrap();
        assert_eq!(found.strategy, Strategy::Exact);
        assert_eq!((found.start, found.end), (8, 15));
    }

    #[test]
    fn test_relocate_falls_back_to_approximate() {
        let text = CharText::new("Patients received acetyl-salicilic acid daily.");
        let found = relocate(&text, "acetylsalicylic acid", Some(0), &RepairConfig::default()).unwrap();
        assert_eq!(found.strategy, Strategy::Approximate);
    }

    #[test]
    fn test_unicode_matches_map_back_to_chars() {
        assert_eq!(locate(Strategy::Exact, "Le café coûte 5€ — café noir", "CAFÉ NOIR", None), Some((19, 28)));
    }
}
