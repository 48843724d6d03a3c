use ingest::{CoreferenceGroup, FlatText, Mention};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::error::ExtractError;
use crate::schema::{CharSpan, Entity, entity_id};

/// Why a coreference group ended up without a representative entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum UnresolvedGroup {
    Empty { group: usize },
    /// The group's earliest mention index has no entity (it points past the mention list).
    MissingMention { group: usize, mention: usize },
}

impl UnresolvedGroup {
    pub fn group(&self) -> usize {
        match *self {
            UnresolvedGroup::Empty { group } | UnresolvedGroup::MissingMention { group, .. } => group,
        }
    }
}

/// Entities in first-appearance order plus the lookup maps the relation
/// stage reads. Built once, never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct NormalizedEntities {
    pub entities: Vec<Entity>,
    /// Original mention index -> `T<n>`.
    pub mention_ids: HashMap<usize, String>,
    /// Coreference group index -> representative `T<n>`.
    pub representatives: BTreeMap<usize, String>,
    pub unresolved: Vec<UnresolvedGroup>,
}

impl NormalizedEntities {
    pub fn representative(&self, group: usize) -> Option<&str> {
        self.representatives.get(&group).map(String::as_str)
    }
}

struct PlacedMention<'a> {
    orig_index: usize,
    start: usize,
    end: usize,
    mention: &'a Mention,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EntityNormalizer;

impl EntityNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Convert token-span mentions into standoff entities and pick one
    /// representative entity per coreference group.
    pub fn normalize(
        &self,
        flat: &FlatText,
        mentions: &[Mention],
        groups: &[CoreferenceGroup],
    ) -> Result<NormalizedEntities, ExtractError> {
        let mut placed = Vec::with_capacity(mentions.len());

        for (orig_index, mention) in mentions.iter().enumerate() {
            let (start_token, end_token) = mention.span;
            let (start, end) = flat
                .offsets
                .tokens_to_chars(start_token, end_token)
                .ok_or(ExtractError::MentionSpanOutOfRange {
                    mention_index: orig_index,
                    start_token,
                    end_token,
                    token_count: flat.token_count(),
                })?;
            placed.push(PlacedMention {
                orig_index,
                start,
                end,
                mention,
            });
        }

        // Stable: identical spans keep their input order.
        placed.sort_by_key(|m| (m.start, m.end));

        let mut entities = Vec::with_capacity(placed.len());
        let mut mention_ids = HashMap::with_capacity(placed.len());

        for (i, m) in placed.iter().enumerate() {
            let id = entity_id(i + 1);
            mention_ids.insert(m.orig_index, id.clone());

            let surface_text = match &m.mention.surface_text {
                Some(name) => name.clone(),
                None => flat.slice(m.start, m.end).unwrap_or_default().to_string(),
            };

            entities.push(Entity {
                id,
                entity_type: m.mention.entity_type.to_uppercase(),
                spans: vec![CharSpan::new(m.start, m.end)],
                note: String::new(),
                surface_text,
            });
        }

        let (representatives, unresolved) = resolve_groups(groups, &mention_ids);

        Ok(NormalizedEntities {
            entities,
            mention_ids,
            representatives,
            unresolved,
        })
    }
}

/// The representative of a group is its smallest original mention index.
fn resolve_groups(
    groups: &[CoreferenceGroup],
    mention_ids: &HashMap<usize, String>,
) -> (BTreeMap<usize, String>, Vec<UnresolvedGroup>) {
    let mut representatives = BTreeMap::new();
    let mut unresolved = Vec::new();

    for (group, g) in groups.iter().enumerate() {
        let Some(&first) = g.mention_indices.iter().min() else {
            tracing::warn!(group, "Coreference group has no mentions");
            unresolved.push(UnresolvedGroup::Empty { group });
            continue;
        };

        match mention_ids.get(&first) {
            Some(id) => {
                representatives.insert(group, id.clone());
            }
            None => {
                tracing::warn!(group, mention = first, "Representative mention has no entity");
                unresolved.push(UnresolvedGroup::MissingMention {
                    group,
                    mention: first,
                });
            }
        }
    }

    (representatives, unresolved)
}
