/// Char offsets of every token in the flattened text, indexed by token.
///
/// Offsets count chars, not bytes. `end` is exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenOffsets {
    spans: Vec<(usize, usize)>,
}

impl TokenOffsets {
    pub fn get(&self, token_idx: usize) -> Option<(usize, usize)> {
        self.spans.get(token_idx).copied()
    }

    /// Inclusive token range -> exclusive char span.
    ///
    /// Returns `None` if either token index is outside the table.
    pub fn tokens_to_chars(&self, start_token: usize, end_token: usize) -> Option<(usize, usize)> {
        let (start, _) = self.get(start_token)?;
        let (_, end) = self.get(end_token)?;
        Some((start, end))
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.spans.iter().copied()
    }
}

/// Document text rebuilt from tokens, plus where each token landed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatText {
    pub text: String,
    pub offsets: TokenOffsets,
    /// Byte offset of every char, plus one entry for the end of the text.
    char_bytes: Vec<usize>,
}

impl FlatText {
    /// Char-offset slice of the text.
    pub fn slice(&self, start: usize, end: usize) -> Option<&str> {
        if start > end {
            return None;
        }
        let byte_start = self.byte_of(start)?;
        let byte_end = self.byte_of(end)?;
        self.text.get(byte_start..byte_end)
    }

    fn byte_of(&self, char_idx: usize) -> Option<usize> {
        match char_idx {
            0 => Some(0),
            _ => self.char_bytes.get(char_idx).copied(),
        }
    }

    pub fn token_count(&self) -> usize {
        self.offsets.len()
    }
}

/// Rebuild flat text from pre-tokenized sentences.
///
/// Every sentence is split on single spaces and the tokens of all sentences
/// are joined with one space. Sentence boundaries are not kept; an empty
/// sentence contributes no tokens.
pub fn reconstruct<S: AsRef<str>>(sentences: &[S]) -> FlatText {
    let tokens: Vec<&str> = sentences
        .iter()
        .map(AsRef::as_ref)
        .filter(|s| !s.is_empty())
        .flat_map(|s| s.split(' '))
        .collect();

    let mut text = String::new();
    let mut spans = Vec::with_capacity(tokens.len());
    let mut char_bytes = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            char_bytes.push(text.len());
            text.push(' ');
        }
        let (start, base) = (char_bytes.len(), text.len());
        char_bytes.extend(token.char_indices().map(|(b, _)| base + b));
        text.push_str(token);
        spans.push((start, char_bytes.len()));
    }
    char_bytes.push(text.len());

    FlatText {
        text,
        offsets: TokenOffsets { spans },
        char_bytes,
    }
}
