pub mod annotator;
pub mod brat;
pub mod config;
pub mod metrics;

pub use annotator::Annotator;
pub use brat::BratError;
pub use config::ConvertConfig;
pub use metrics::{Metrics, MetricsSnapshot, TimedOperation};

use extract::{
    DroppedRelation, EntityNormalizer, ExtractError, RelationNormalizer, UnresolvedGroup,
};
use ingest::{PipelineDocument, reconstruct};
use repair::{RepairConfig, RepairError, RepairRecord, SpanRepairEngine};
use serde::Serialize;

/// One upstream document turned into a repaired standoff document.
#[derive(Debug, Clone, Serialize)]
pub struct Conversion {
    pub doc_key: String,
    pub document: extract::Document,
    pub repairs: Vec<RepairRecord>,
    pub dropped_relations: Vec<DroppedRelation>,
    pub unresolved_groups: Vec<UnresolvedGroup>,
}

impl Conversion {
    pub fn has_unresolved_spans(&self) -> bool {
        self.repairs.iter().any(|r| r.unresolved)
    }
}

/// Runs the whole normalization chain for one document at a time.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    entities: EntityNormalizer,
    relations: RelationNormalizer,
    repair: SpanRepairEngine,
}

impl Converter {
    pub fn new(config: RepairConfig) -> Result<Self, RepairError> {
        Ok(Self {
            entities: EntityNormalizer::new(),
            relations: RelationNormalizer::new(),
            repair: SpanRepairEngine::new(config)?,
        })
    }

    pub fn convert(&self, input: &PipelineDocument) -> Result<Conversion, ExtractError> {
        let flat = reconstruct(&input.sentences);
        let entities = self
            .entities
            .normalize(&flat, &input.mentions, &input.groups)?;
        let relations = self.relations.normalize(&input.relations, &entities);

        let document = extract::Document {
            text: flat.text,
            entities: entities.entities,
            relations: relations.relations,
        };
        let repaired = self.repair.repair(document);

        tracing::debug!(
            doc_key = %input.doc_key,
            entities = repaired.document.entities.len(),
            relations = repaired.document.relations.len(),
            repairs = repaired.records.len(),
            "Converted document"
        );

        Ok(Conversion {
            doc_key: input.doc_key.clone(),
            document: repaired.document,
            repairs: repaired.records,
            dropped_relations: relations.dropped,
            unresolved_groups: entities.unresolved,
        })
    }

    /// Convert a batch. Each document stands alone, so one bad document
    /// leaves the rest untouched.
    pub fn convert_all(&self, inputs: &[PipelineDocument]) -> Vec<Result<Conversion, ExtractError>> {
        let results: Vec<_> = inputs.iter().map(|doc| self.convert(doc)).collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        tracing::info!(
            documents = results.len(),
            failed,
            "Converted batch"
        );
        results
    }
}
