use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RepairError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
