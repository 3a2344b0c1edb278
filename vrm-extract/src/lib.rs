//! vrm-extract library
//!
//! Reads VRM/GLB containers and extracts the embedded texture images,
//! plus a cross-reference report of which material uses which texture.
//!
//! Pipeline: raw bytes -> [`Glb::parse`] -> [`Document::from_json`] ->
//! [`extract_textures`] -> [`build_report`].

pub mod document;
pub mod error;
pub mod extract;
pub mod glb;
pub mod report;

pub use document::{Document, Image, ImageSource};
pub use error::{ContainerError, ExtractFailure};
pub use extract::{extract_textures, ImageOutcome, OutcomeStatus, DEFAULT_OUTPUT_DIR};
pub use glb::{Chunk, ChunkKind, Glb, Header};
pub use report::{build_report, ExtractionReport, MaterialBinding, ResolvedTexture};
