use thiserror::Error;

/// Upstream output that breaks the normalization contract.
///
/// Fatal for the document it occurs in, never for a batch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error(
        "mention {mention_index} spans tokens {start_token}..={end_token} but the document has {token_count} tokens"
    )]
    MentionSpanOutOfRange {
        mention_index: usize,
        start_token: usize,
        end_token: usize,
        token_count: usize,
    },
}
