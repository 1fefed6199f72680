//! Error kinds surfaced by model construction, parsing and evaluation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed formula `{formula}`: {reason}")]
    MalformedFormula { formula: String, reason: &'static str },

    #[error("unknown operator `{0}`")]
    UnknownOperator(String),

    #[error("world not found: {0}")]
    WorldNotFound(String),

    #[error("agent index {index} out of range 1..={len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("cannot disambiguate world valuations: no fresh proposition left")]
    ValuationCollisionExhausted,

    #[error("proposition `{proposition}` of world `{world}` is not declared")]
    UnknownProposition { world: String, proposition: String },

    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error("no evaluation world given")]
    MissingWorlds,

    #[error("unsupported model file format: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn malformed(formula: &str, reason: &'static str) -> Self {
        Error::MalformedFormula {
            formula: formula.to_string(),
            reason,
        }
    }
}
