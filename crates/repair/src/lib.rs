pub mod approx;
pub mod config;
pub mod engine;
pub mod error;
pub mod strategy;
pub mod text;

pub use config::RepairConfig;
pub use engine::{Cause, RepairRecord, Repaired, SpanOutcome, SpanRepairEngine};
pub use error::RepairError;
pub use strategy::{LADDER, Located, Strategy, relocate, settle};
pub use text::CharText;
