use std::ops::Range;

/// Characters trimmed from both ends before punctuation-tolerant comparison.
pub const EDGE_PUNCT: &[char] = &[
    ' ', '\t', '\r', '\n', '.', ',', ';', ':', '!', '?', ')', ']', '}', '\'', '"', '“', '”', '’',
];

pub fn strip_edge_punct(s: &str) -> &str {
    s.trim_matches(|c| EDGE_PUNCT.contains(&c))
}

/// Collapse every whitespace run to a single space.
pub fn normalize_spaces(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_space = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Single-char case fold, so folded text keeps one char per input char.
pub fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Document text addressed by char offsets.
///
/// Regex matches come back as byte offsets; this converts between the two
/// without rescanning the text. ASCII text skips the table entirely.
#[derive(Debug, Clone)]
pub struct CharText<'a> {
    text: &'a str,
    /// `char_to_byte[i]` is the byte offset of char `i`; one extra entry for the end.
    char_to_byte: Option<Vec<usize>>,
}

impl<'a> CharText<'a> {
    pub fn new(text: &'a str) -> Self {
        let char_to_byte = if text.is_ascii() {
            None
        } else {
            let mut map: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
            map.push(text.len());
            Some(map)
        };
        Self { text, char_to_byte }
    }

    pub fn as_str(&self) -> &'a str {
        self.text
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        match &self.char_to_byte {
            None => self.text.len(),
            Some(map) => map.len() - 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Byte offset of a char offset. Offsets past the end clamp to the end.
    pub fn byte_of(&self, char_idx: usize) -> usize {
        match &self.char_to_byte {
            None => char_idx.min(self.text.len()),
            Some(map) => map[char_idx.min(map.len() - 1)],
        }
    }

    /// Char offset of a byte offset that lies on a char boundary.
    pub fn char_of(&self, byte_idx: usize) -> usize {
        match &self.char_to_byte {
            None => byte_idx,
            Some(map) => match map.binary_search(&byte_idx) {
                Ok(i) => i,
                Err(i) => i.saturating_sub(1),
            },
        }
    }

    /// Slice by char range, clamped to the text.
    pub fn slice(&self, range: Range<usize>) -> &'a str {
        let start = self.byte_of(range.start);
        let end = self.byte_of(range.end).max(start);
        &self.text[start..end]
    }
}

/// Char range searched around an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    pub lo: usize,
    pub hi: usize,
}

impl SearchWindow {
    /// `anchor ± half_width` clamped to the text, or the whole text without an anchor.
    pub fn around(anchor: Option<usize>, half_width: usize, len: usize) -> Self {
        match anchor {
            None => Self { lo: 0, hi: len },
            Some(a) => {
                let a = a.min(len);
                Self {
                    lo: a.saturating_sub(half_width),
                    hi: a.saturating_add(half_width).min(len),
                }
            }
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.lo..self.hi
    }

    pub fn len(&self) -> usize {
        self.hi - self.lo
    }

    pub fn is_empty(&self) -> bool {
        self.hi <= self.lo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_edge_punct() {
        assert_eq!(strip_edge_punct("  aspirin.)"), "aspirin");
        assert_eq!(strip_edge_punct("“IL-6”"), "IL-6");
        // Opening brackets are not edge punctuation.
        assert_eq!(strip_edge_punct("(IL-6)"), "(IL-6");
        assert_eq!(strip_edge_punct(".,;"), "");
    }

    #[test]
    fn test_normalize_spaces() {
        assert_eq!(normalize_spaces("acetylsalicylic \n\t acid"), "acetylsalicylic acid");
        assert_eq!(normalize_spaces("a"), "a");
    }

    #[test]
    fn test_ascii_offsets() {
        let text = CharText::new("the cancer-causing agent");
        assert_eq!(text.len(), 24);
        assert_eq!(text.slice(4..18), "cancer-causing");
        assert_eq!(text.char_of(4), 4);
        assert_eq!(text.slice(20..40), "gent");
    }

    #[test]
    fn test_unicode_offsets() {
        let text = CharText::new("The café costs €50");
        assert_eq!(text.len(), 18);
        assert_eq!(text.slice(4..8), "café");
        assert_eq!(text.slice(15..18), "€50");
        assert_eq!(text.byte_of(15), 16);
        assert_eq!(text.char_of(16), 15);
        assert_eq!(text.byte_of(99), "The café costs €50".len());
    }

    #[test]
    fn test_search_window() {
        assert_eq!(SearchWindow::around(Some(30), 120, 24), SearchWindow { lo: 0, hi: 24 });
        assert_eq!(SearchWindow::around(Some(500), 120, 1000), SearchWindow { lo: 380, hi: 620 });
        assert_eq!(SearchWindow::around(None, 120, 1000), SearchWindow { lo: 0, hi: 1000 });
        assert_eq!(SearchWindow::around(Some(990), 5, 1000).range(), 985..995);
    }
}
