use thiserror::Error;

/// Errors produced by the assessment core.
///
/// Per-wall failures are isolated by the pipeline: a failing wall is reported
/// with its reason instead of aborting the building-level assessment.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssessError {
    #[error("wall '{name}' has {found} usable samples, at least {needed} required")]
    DegenerateWall {
        name: String,
        found: usize,
        needed: usize,
    },

    #[error("house must contain at least one wall")]
    EmptyHouse,

    #[error("interpolated slice for wall '{0}' is empty")]
    EmptySlice(String),

    #[error("greenfield fit failed: {0}")]
    FitFailed(String),

    #[error("malformed limit table '{table}': {reason}")]
    MalformedTable { table: String, reason: String },
}

pub type Result<T> = std::result::Result<T, AssessError>;
