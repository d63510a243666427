//! Error taxonomy. Construction and compile errors are fatal,
//! typed, and fail fast; execution errors from pass callbacks or the device
//! are propagated as `anyhow::Error` by the executor rather than wrapped
//! here, since the graph has no way to classify an arbitrary device failure.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderGraphError {
    #[error("resource name `{0}` is already declared in this frame")]
    DuplicateResourceName(String),

    #[error("resource name `{0}` is not declared/written in this frame")]
    UnknownResourceName(String),

    #[error("pass `{pass}` reads resource `{name}` that was never written")]
    ReadBeforeWrite { pass: String, name: String },

    #[error("pass `{pass}` both reads and writes resource `{name}` in one setup call")]
    ReadWriteConflict { pass: String, name: String },

    #[error("resource `{name}` declared with zero width/height or zero byte size")]
    ZeroExtent { name: String },

    #[error("access kind {access:?} is not compatible with the usage flags declared for `{name}`")]
    IllegalAccessCombination { name: String, access: crate::access::AccessKind },

    #[error("resource `{name}` is a {actual}, not a {expected}")]
    ResourceKindMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("pass `{0}` uses ActAsCreatorWhenWriting but was culled before execution")]
    CreatorDemoted(String),

    #[error("transient resource allocation failed: {0}")]
    TransientAllocation(#[source] anyhow::Error),
}
