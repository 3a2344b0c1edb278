//! Error taxonomy for container reading and texture extraction.
//!
//! Two tiers: [`ContainerError`] is fatal and aborts the run before any
//! output is produced, while [`ExtractFailure`] is recorded in the per-image
//! outcome and never propagates upward.

use serde::Serialize;

/// Fatal container-level errors. Nothing is written when one of these occurs.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("container truncated: need {needed} bytes at offset {offset}, only {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("not a GLB container (magic 0x{magic:08X}, version {version})")]
    MalformedContainer { magic: u32, version: u32 },

    #[error("header declares {declared} bytes but chunks span {actual}")]
    LengthMismatch { declared: u32, actual: u32 },

    #[error("first chunk is not a JSON chunk")]
    MissingJsonChunk,

    #[error("scene JSON is malformed: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Recoverable per-image failures. Each one lands in a single outcome;
/// extraction of the remaining images proceeds unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum ExtractFailure {
    #[error("bufferView {0} does not exist")]
    UnresolvedBufferView(u32),

    #[error("image references the binary chunk, but the container has none")]
    MissingBinaryChunk,

    #[error("bufferView range {offset}+{length} exceeds binary chunk of {available} bytes")]
    BufferOverrun {
        offset: usize,
        length: usize,
        available: usize,
    },

    #[error("data URI has no comma separator")]
    MalformedDataUri,

    #[error("data URI payload is not valid base64: {0}")]
    InvalidBase64(String),

    #[error("external file references are not supported: {0}")]
    UnsupportedExternalReference(String),

    #[error("image has neither a bufferView nor a uri")]
    MissingSource,

    #[error("extracted bytes do not decode as an image: {0}")]
    CorruptImageData(String),

    #[error("failed to write output file: {0}")]
    WriteFailed(String),
}
