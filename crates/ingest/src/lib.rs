pub mod document;
pub mod offsets;
pub mod reader;

pub use document::{CoreferenceGroup, Mention, PipelineDocument, PipelineInput, RawRelation, paragraph_key};
pub use offsets::{FlatText, TokenOffsets, reconstruct};
pub use reader::DocumentReader;

/// Split a raw submission into paragraphs on blank lines.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// One pipeline input per paragraph, keyed `P0`, `P1`, ...
pub fn paragraph_inputs(paragraphs: &[String]) -> Vec<PipelineInput> {
    paragraphs
        .iter()
        .enumerate()
        .map(|(i, p)| PipelineInput::for_paragraph(i, p))
        .collect()
}
