use extract::{CharSpan, Document, Entity};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::config::RepairConfig;
use crate::error::RepairError;
use crate::strategy::{self, Strategy};
use crate::text::{CharText, strip_edge_punct};

/// Why a span had to be relocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cause {
    /// Missing, negative, empty, inverted or past the end of the text.
    Invalid,
    /// Valid range whose text does not match the surface string.
    Mismatch,
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Invalid => write!(f, "invalid"),
            Cause::Mismatch => write!(f, "mismatch"),
        }
    }
}

/// What happened to a single span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanOutcome {
    Kept,
    Relocated {
        cause: Cause,
        strategy: Strategy,
        span: CharSpan,
    },
    /// Nothing matched; the original span is kept.
    Unfixed { cause: Cause },
}

impl SpanOutcome {
    fn reason(&self) -> Option<String> {
        match self {
            SpanOutcome::Kept => None,
            SpanOutcome::Relocated { cause, strategy, .. } => {
                Some(format!("{} -> {}", cause, strategy.label()))
            }
            SpanOutcome::Unfixed { cause } => Some(format!("{}-unfixed", cause)),
        }
    }
}

/// Audit entry for one entity whose spans moved or could not be fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepairRecord {
    pub entity_id: String,
    pub old_spans: Vec<CharSpan>,
    pub new_spans: Vec<CharSpan>,
    pub reason: String,
    pub unresolved: bool,
}

#[derive(Debug, Clone)]
pub struct Repaired {
    pub document: Document,
    pub records: Vec<RepairRecord>,
}

impl Repaired {
    pub fn unresolved(&self) -> impl Iterator<Item = &RepairRecord> {
        self.records.iter().filter(|r| r.unresolved)
    }
}

fn exact(slice: &str, surface: &str) -> bool {
    slice == surface
}

fn ignoring_case(slice: &str, surface: &str) -> bool {
    slice.to_lowercase() == surface.to_lowercase()
}

fn ignoring_edge_punct(slice: &str, surface: &str) -> bool {
    ignoring_case(strip_edge_punct(slice), strip_edge_punct(surface))
}

/// Slice/surface comparisons that accept a span as it is, in order.
const ACCEPTANCE: [fn(&str, &str) -> bool; 3] = [exact, ignoring_case, ignoring_edge_punct];

/// Validates entity spans against the document text and moves the ones
/// that do not select their surface string.
///
/// Only `Entity::spans` is ever rewritten; text and relations pass through.
#[derive(Debug, Clone, Default)]
pub struct SpanRepairEngine {
    config: RepairConfig,
}

impl SpanRepairEngine {
    pub fn new(config: RepairConfig) -> Result<Self, RepairError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RepairConfig {
        &self.config
    }

    pub fn repair(&self, mut document: Document) -> Repaired {
        let text = CharText::new(&document.text);
        let mut records = Vec::new();

        for entity in document.entities.iter_mut() {
            let (spans, record) = self.repair_entity(&text, entity);
            entity.spans = spans;
            records.extend(record);
        }

        Repaired { document, records }
    }

    pub fn repair_entity(
        &self,
        text: &CharText,
        entity: &Entity,
    ) -> (Vec<CharSpan>, Option<RepairRecord>) {
        let mut new_spans = Vec::with_capacity(entity.spans.len());
        let mut reasons = BTreeSet::new();
        let mut changed = false;
        let mut unresolved = false;

        for &span in &entity.spans {
            let outcome = self.check_span(text, span, &entity.surface_text);
            match outcome {
                SpanOutcome::Kept => new_spans.push(span),
                SpanOutcome::Relocated { span: moved, strategy, cause } => {
                    tracing::debug!(
                        entity = %entity.id,
                        %cause,
                        strategy = strategy.label(),
                        old = ?span,
                        new = ?moved,
                        "Relocated entity span"
                    );
                    new_spans.push(moved);
                    changed = true;
                }
                SpanOutcome::Unfixed { cause } => {
                    tracing::warn!(
                        entity = %entity.id,
                        %cause,
                        span = ?span,
                        surface = %entity.surface_text,
                        "Could not repair entity span"
                    );
                    new_spans.push(span);
                    unresolved = true;
                }
            }
            reasons.extend(outcome.reason());
        }

        let record = (changed || unresolved).then(|| RepairRecord {
            entity_id: entity.id.clone(),
            old_spans: entity.spans.clone(),
            new_spans: new_spans.clone(),
            reason: reasons.into_iter().collect::<Vec<_>>().join("; "),
            unresolved,
        });

        (new_spans, record)
    }

    /// Decide what to do with one span: keep it, move it, or give up.
    pub fn check_span(&self, text: &CharText, span: CharSpan, surface: &str) -> SpanOutcome {
        let Some(range) = span.valid_range(text.len()) else {
            let anchor = span.start().map(|s| s.clamp(0, text.len() as i64) as usize);
            return self.relocate(text, span, surface, anchor, Cause::Invalid);
        };

        let slice = text.slice(range.clone());
        if ACCEPTANCE.iter().any(|accepts| accepts(slice, surface)) {
            return SpanOutcome::Kept;
        }

        self.relocate(text, span, surface, Some(range.start), Cause::Mismatch)
    }

    fn relocate(
        &self,
        text: &CharText,
        span: CharSpan,
        surface: &str,
        anchor: Option<usize>,
        cause: Cause,
    ) -> SpanOutcome {
        match strategy::settle(text, surface, anchor, &self.config) {
            Some(found) => {
                let moved = CharSpan::new(found.start, found.end);
                if moved == span {
                    SpanOutcome::Kept
                } else {
                    SpanOutcome::Relocated {
                        cause,
                        strategy: found.strategy,
                        span: moved,
                    }
                }
            }
            None => SpanOutcome::Unfixed { cause },
        }
    }
}
