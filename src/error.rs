use thiserror::Error;

use crate::models::VconField;

/// Errors raised by the vCon record model.
///
/// The model performs no schema validation of its own: shape problems surface
/// from serde as [`VconError::Json`], and accessors that need a value the
/// document does not carry fail with a dedicated variant.
#[derive(Debug, Error)]
pub enum VconError {
    #[error("invalid vCon document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dialog entry {index} has no duration")]
    MissingDuration { index: usize },

    #[error("dialog entry {index} has a duration that is not a number")]
    InvalidDuration { index: usize },

    #[error("unknown vCon field: {0}")]
    UnknownField(String),

    #[error("value for `{field}` has the wrong shape: {source}")]
    FieldShape {
        field: VconField,
        #[source]
        source: serde_json::Error,
    },
}
