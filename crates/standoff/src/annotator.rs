use anyhow::{Context, Result};
use extract::TripleExtractor;
use ingest::{paragraph_inputs, split_paragraphs};

use crate::{Conversion, Converter};

/// Feeds raw text to an upstream extractor one paragraph at a time and
/// converts whatever comes back.
pub struct Annotator<E: TripleExtractor> {
    extractor: E,
    converter: Converter,
}

impl<E: TripleExtractor> Annotator<E> {
    pub fn new(extractor: E, converter: Converter) -> Self {
        Self {
            extractor,
            converter,
        }
    }

    /// Annotate every paragraph of `text`, in order.
    ///
    /// An extractor failure or a contract violation stops the run; the
    /// error names the paragraph it came from. A contract violation can be
    /// recovered with `downcast_ref::<ExtractError>()`.
    pub fn annotate(&self, text: &str) -> Result<Vec<Conversion>> {
        let paragraphs = split_paragraphs(text);
        let inputs = paragraph_inputs(&paragraphs);
        tracing::info!(paragraphs = inputs.len(), "Annotating text");

        let mut conversions = Vec::with_capacity(inputs.len());
        for input in &inputs {
            let mut raw = self
                .extractor
                .extract(input)
                .with_context(|| format!("Extraction failed for paragraph {}", input.doc_key))?;
            if raw.doc_key.is_empty() {
                raw.doc_key = input.doc_key.clone();
            }

            let conversion = self
                .converter
                .convert(&raw)
                .with_context(|| format!("Invalid extraction for paragraph {}", input.doc_key))?;
            conversions.push(conversion);
        }

        Ok(conversions)
    }

    pub fn converter(&self) -> &Converter {
        &self.converter
    }
}
