use serde::{Deserialize, Serialize};
use std::ops::Range;

/// `[start, end]` char offsets, `end` exclusive.
///
/// Either side may be missing or negative in documents that come from
/// outside this crate, so both are kept signed and optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharSpan(pub Option<i64>, pub Option<i64>);

impl CharSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self(Some(start as i64), Some(end as i64))
    }

    pub fn start(&self) -> Option<i64> {
        self.0
    }

    pub fn end(&self) -> Option<i64> {
        self.1
    }

    /// The span as a range into a text of `len` chars, if it is a
    /// non-empty range that fits.
    pub fn valid_range(&self, len: usize) -> Option<Range<usize>> {
        let (start, end) = (self.0?, self.1?);
        if start < 0 || end <= start || end > len as i64 {
            return None;
        }
        Some(start as usize..end as usize)
    }
}

impl From<(usize, usize)> for CharSpan {
    fn from((start, end): (usize, usize)) -> Self {
        Self::new(start, end)
    }
}

/// A standoff entity: `["T1", "TYPE", [[s, e], ...], "", "surface"]` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EntityRow", into = "EntityRow")]
pub struct Entity {
    pub id: String,
    pub entity_type: String,
    pub spans: Vec<CharSpan>,
    pub note: String,
    pub surface_text: String,
}

#[derive(Serialize, Deserialize)]
struct EntityRow(String, String, Vec<CharSpan>, String, String);

impl From<EntityRow> for Entity {
    fn from(EntityRow(id, entity_type, spans, note, surface_text): EntityRow) -> Self {
        Self {
            id,
            entity_type,
            spans,
            note,
            surface_text,
        }
    }
}

impl From<Entity> for EntityRow {
    fn from(e: Entity) -> Self {
        EntityRow(e.id, e.entity_type, e.spans, e.note, e.surface_text)
    }
}

/// A standoff relation: `["R1", "type", [["Arg1", "T1"], ["Arg2", "T2"]]]` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RelationRow", into = "RelationRow")]
pub struct Relation {
    pub id: String,
    pub relation_type: String,
    pub arg1: String,
    pub arg2: String,
}

#[derive(Serialize, Deserialize)]
struct RelationRow(String, String, Vec<(String, String)>);

impl TryFrom<RelationRow> for Relation {
    type Error = String;

    fn try_from(RelationRow(id, relation_type, args): RelationRow) -> Result<Self, Self::Error> {
        match args.as_slice() {
            [(r1, a1), (r2, a2)] if r1 == "Arg1" && r2 == "Arg2" => Ok(Self {
                id,
                relation_type,
                arg1: a1.clone(),
                arg2: a2.clone(),
            }),
            _ => Err(format!("relation {} must have exactly Arg1 and Arg2", id)),
        }
    }
}

impl From<Relation> for RelationRow {
    fn from(r: Relation) -> Self {
        RelationRow(
            r.id,
            r.relation_type,
            vec![("Arg1".to_string(), r.arg1), ("Arg2".to_string(), r.arg2)],
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl Document {
    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }
}

pub fn entity_id(n: usize) -> String {
    format!("T{}", n)
}

pub fn relation_id(n: usize) -> String {
    format!("R{}", n)
}
