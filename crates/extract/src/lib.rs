pub mod error;
pub mod normalizer;
pub mod relations;
pub mod schema;

pub use error::ExtractError;
pub use normalizer::{EntityNormalizer, NormalizedEntities, UnresolvedGroup};
pub use relations::{DroppedRelation, MissingEndpoint, NormalizedRelations, RelationNormalizer};
pub use schema::{CharSpan, Document, Entity, Relation, entity_id, relation_id};

use anyhow::Result;
use ingest::{PipelineDocument, PipelineInput};

/// An upstream NER + coreference + relation pipeline.
///
/// Treated as opaque: model loading and device placement are the
/// implementor's business.
pub trait TripleExtractor {
    fn extract(&self, input: &PipelineInput) -> Result<PipelineDocument>;
}

impl<T: TripleExtractor + ?Sized> TripleExtractor for &T {
    fn extract(&self, input: &PipelineInput) -> Result<PipelineDocument> {
        (**self).extract(input)
    }
}
