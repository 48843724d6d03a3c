//! brat `.ann` rendering and parsing.
//!
//! A standoff document maps onto a `.txt`/`.ann` pair: the `.txt` file is
//! `Document::text` verbatim and the `.ann` file carries one line per
//! entity (`T1\tTYPE 0 7;9 12\tcovered text`) and relation
//! (`R1\ttype Arg1:T1 Arg2:T2`). Offsets are char offsets.

use extract::{CharSpan, Document, Entity, Relation};
use repair::CharText;
use std::fmt::Write;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BratError {
    #[error("line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    #[error("entity {entity} has span {span:?} which does not fit the text")]
    UnrenderableSpan { entity: String, span: CharSpan },
}

fn malformed(line: usize, reason: impl Into<String>) -> BratError {
    BratError::MalformedLine {
        line,
        reason: reason.into(),
    }
}

/// Render the `.ann` content for `doc`.
pub fn render(doc: &Document) -> Result<String, BratError> {
    let text = CharText::new(&doc.text);
    let mut out = String::new();

    for entity in &doc.entities {
        let mut offsets = Vec::with_capacity(entity.spans.len());
        let mut covered = Vec::with_capacity(entity.spans.len());
        for span in &entity.spans {
            let range = span
                .valid_range(text.len())
                .ok_or_else(|| BratError::UnrenderableSpan {
                    entity: entity.id.clone(),
                    span: *span,
                })?;
            offsets.push(format!("{} {}", range.start, range.end));
            covered.push(text.slice(range).replace(['\t', '\n', '\r'], " "));
        }
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "{}\t{} {}\t{}",
            entity.id,
            entity.entity_type,
            offsets.join(";"),
            covered.join(" ")
        );
    }

    for relation in &doc.relations {
        let _ = writeln!(
            out,
            "{}\t{} Arg1:{} Arg2:{}",
            relation.id, relation.relation_type, relation.arg1, relation.arg2
        );
    }

    Ok(out)
}

/// Parse `.ann` content against its `.txt` text.
///
/// Entity surface text is taken from the `.ann` line as written. Note,
/// attribute, event and equivalence lines are skipped.
pub fn parse(text: &str, ann: &str) -> Result<Document, BratError> {
    let mut doc = Document {
        text: text.to_string(),
        ..Default::default()
    };

    for (idx, raw) in ann.lines().enumerate() {
        let line = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }
        match raw.chars().next() {
            Some('T') => doc.entities.push(parse_entity(line, raw)?),
            Some('R') => doc.relations.push(parse_relation(line, raw)?),
            Some('#' | 'A' | 'M' | 'E' | 'N' | '*') => {
                tracing::debug!(line, "Skipping unsupported brat annotation");
            }
            _ => return Err(malformed(line, format!("unknown annotation `{}`", raw))),
        }
    }

    Ok(doc)
}

fn parse_entity(line: usize, raw: &str) -> Result<Entity, BratError> {
    let mut fields = raw.splitn(3, '\t');
    let (Some(id), Some(body), Some(surface)) = (fields.next(), fields.next(), fields.next()) else {
        return Err(malformed(line, "entity needs id, type/offsets and text"));
    };

    let (entity_type, offsets) = body
        .split_once(' ')
        .ok_or_else(|| malformed(line, "entity has no offsets"))?;

    let spans = offsets
        .split(';')
        .map(|pair| {
            let mut parts = pair.split_whitespace().map(str::parse::<usize>);
            match (parts.next(), parts.next(), parts.next()) {
                (Some(Ok(start)), Some(Ok(end)), None) => Ok(CharSpan::new(start, end)),
                _ => Err(malformed(line, format!("bad offset pair `{}`", pair))),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Entity {
        id: id.to_string(),
        entity_type: entity_type.to_string(),
        spans,
        note: String::new(),
        surface_text: surface.to_string(),
    })
}

fn parse_relation(line: usize, raw: &str) -> Result<Relation, BratError> {
    let (id, body) = raw
        .split_once('\t')
        .ok_or_else(|| malformed(line, "relation needs id and body"))?;

    let mut parts = body.split_whitespace();
    let relation_type = parts
        .next()
        .ok_or_else(|| malformed(line, "relation has no type"))?;

    let mut arg1 = None;
    let mut arg2 = None;
    for part in parts {
        match part.split_once(':') {
            Some(("Arg1", target)) => arg1 = Some(target),
            Some(("Arg2", target)) => arg2 = Some(target),
            _ => return Err(malformed(line, format!("bad relation argument `{}`", part))),
        }
    }

    match (arg1, arg2) {
        (Some(arg1), Some(arg2)) => Ok(Relation {
            id: id.to_string(),
            relation_type: relation_type.to_string(),
            arg1: arg1.to_string(),
            arg2: arg2.to_string(),
        }),
        _ => Err(malformed(line, "relation needs Arg1 and Arg2")),
    }
}
