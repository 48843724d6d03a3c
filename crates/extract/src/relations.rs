use ingest::RawRelation;
use serde::Serialize;

use crate::normalizer::NormalizedEntities;
use crate::schema::{Relation, relation_id};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingEndpoint {
    Arg1,
    Arg2,
    Both,
}

/// A relation left out because a group had no representative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedRelation {
    pub input_index: usize,
    pub relation_type: String,
    pub missing: MissingEndpoint,
}

#[derive(Debug, Clone, Default)]
pub struct NormalizedRelations {
    pub relations: Vec<Relation>,
    pub dropped: Vec<DroppedRelation>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RelationNormalizer;

impl RelationNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Link group-level relations to representative entities.
    ///
    /// Output keeps input order. Ids are given in emission order, so a
    /// dropped relation does not use up an `R<n>`.
    pub fn normalize(
        &self,
        relations: &[RawRelation],
        entities: &NormalizedEntities,
    ) -> NormalizedRelations {
        let mut out = NormalizedRelations::default();

        for (input_index, r) in relations.iter().enumerate() {
            let arg1 = entities.representative(r.arg1_group);
            let arg2 = entities.representative(r.arg2_group);

            let (arg1, arg2) = match (arg1, arg2) {
                (Some(a1), Some(a2)) => (a1, a2),
                (a1, a2) => {
                    let missing = match (a1, a2) {
                        (None, None) => MissingEndpoint::Both,
                        (None, _) => MissingEndpoint::Arg1,
                        _ => MissingEndpoint::Arg2,
                    };
                    tracing::debug!(
                        relation = input_index,
                        arg1_group = r.arg1_group,
                        arg2_group = r.arg2_group,
                        ?missing,
                        "Dropping relation with unresolved endpoint"
                    );
                    out.dropped.push(DroppedRelation {
                        input_index,
                        relation_type: r.relation_type.clone(),
                        missing,
                    });
                    continue;
                }
            };

            out.relations.push(Relation {
                id: relation_id(out.relations.len() + 1),
                relation_type: r.relation_type.clone(),
                arg1: arg1.to_string(),
                arg2: arg2.to_string(),
            });
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntityNormalizer;
    use ingest::{CoreferenceGroup, Mention, reconstruct};

    fn raw(arg1: usize, arg2: usize, ty: &str) -> RawRelation {
        RawRelation {
            arg1_group: arg1,
            arg2_group: arg2,
            relation_type: ty.to_string(),
        }
    }

    fn normalized(groups: Vec<Vec<usize>>) -> NormalizedEntities {
        let flat = reconstruct(&["Aspirin relieves headache and fever ."]);
        let mentions: Vec<_> = [(0, "Chemical"), (2, "Disease"), (4, "Disease")]
            .iter()
            .map(|&(t, ty)| Mention {
                span: (t, t),
                entity_type: ty.to_string(),
                surface_text: None,
            })
            .collect();
        let groups: Vec<_> = groups
            .into_iter()
            .map(|mention_indices| CoreferenceGroup { mention_indices })
            .collect();
        EntityNormalizer::new().normalize(&flat, &mentions, &groups).unwrap()
    }

    #[test]
    fn test_relations_keep_input_order() {
        let entities = normalized(vec![vec![0], vec![1], vec![2]]);
        let out = RelationNormalizer::new().normalize(
            &[raw(0, 2, "treats"), raw(0, 1, "treats")],
            &entities,
        );

        assert_eq!(out.relations.len(), 2);
        assert_eq!(out.relations[0].id, "R1");
        assert_eq!(out.relations[0].arg2, "T3");
        assert_eq!(out.relations[1].id, "R2");
        assert_eq!(out.relations[1].arg2, "T2");
        assert_eq!(out.relations[1].relation_type, "treats");
    }

    #[test]
    fn test_dropped_relation_does_not_consume_an_id() {
        let entities = normalized(vec![vec![0], vec![], vec![2]]);
        let out = RelationNormalizer::new().normalize(
            &[raw(0, 1, "treats"), raw(0, 2, "treats"), raw(5, 1, "causes")],
            &entities,
        );

        assert_eq!(out.relations.len(), 1);
        assert_eq!(out.relations[0].id, "R1");
        assert_eq!(out.relations[0].arg1, "T1");
        assert_eq!(out.relations[0].arg2, "T3");

        assert_eq!(out.dropped.len(), 2);
        assert_eq!(out.dropped[0].input_index, 0);
        assert_eq!(out.dropped[0].missing, MissingEndpoint::Arg2);
        assert_eq!(out.dropped[1].missing, MissingEndpoint::Both);
    }

    #[test]
    fn test_relation_type_passes_through_verbatim() {
        let entities = normalized(vec![vec![0], vec![1]]);
        let out = RelationNormalizer::new().normalize(&[raw(1, 0, "Side_Effect-of")], &entities);
        assert_eq!(out.relations[0].relation_type, "Side_Effect-of");
        assert_eq!(out.relations[0].arg1, "T2");
    }
}
