//! Per-image texture extraction.
//!
//! Resolves each image descriptor to its bytes (bufferView slice or inline
//! base64 payload), writes one output file per image, and records exactly
//! one outcome per image index. Failures are data: a bad image never stops
//! the rest of the batch.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::GenericImageView;
use serde::Serialize;

use crate::document::{Document, Image, ImageSource};
use crate::error::ExtractFailure;

/// Default output directory when the caller does not supply one.
pub const DEFAULT_OUTPUT_DIR: &str = "vrm_textures";

/// Result of extracting a single image, keyed by image index.
///
/// The index is the stable identity: output names and outcome order derive
/// from it, so re-runs are idempotent regardless of scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageOutcome {
    /// Index into the document's image array.
    pub index: usize,
    pub status: OutcomeStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum OutcomeStatus {
    Extracted {
        file_name: String,
        byte_length: usize,
        mime_type: Option<String>,
        /// Set when the bytes were written but did not decode as an image.
        /// The file stays on disk; downstream consumers decide what to do.
        warning: Option<ExtractFailure>,
    },
    Failed(ExtractFailure),
}

impl ImageOutcome {
    /// Output file name, when extraction succeeded.
    pub fn file_name(&self) -> Option<&str> {
        match &self.status {
            OutcomeStatus::Extracted { file_name, .. } => Some(file_name),
            OutcomeStatus::Failed(_) => None,
        }
    }

    pub fn is_extracted(&self) -> bool {
        matches!(self.status, OutcomeStatus::Extracted { .. })
    }
}

/// Extract every image in the document into `out_dir`.
///
/// Produces exactly one outcome per image index, in index order. Per-image
/// failures never abort the run; only output directory creation can fail
/// here.
pub fn extract_textures(
    doc: &Document,
    binary: Option<&[u8]>,
    out_dir: &Path,
) -> Result<Vec<ImageOutcome>> {
    use rayon::prelude::*;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    // Each job only reads the document and the binary chunk; collecting by
    // index keeps the outcome order stable regardless of scheduling.
    let outcomes: Vec<ImageOutcome> = (0..doc.images.len())
        .into_par_iter()
        .map(|index| extract_one(doc, binary, index, out_dir))
        .collect();

    Ok(outcomes)
}

fn extract_one(
    doc: &Document,
    binary: Option<&[u8]>,
    index: usize,
    out_dir: &Path,
) -> ImageOutcome {
    let image = &doc.images[index];

    let (bytes, mime_type) = match resolve_image(doc, binary, image) {
        Ok(resolved) => resolved,
        Err(reason) => {
            tracing::warn!("texture {index}: {reason}");
            return ImageOutcome {
                index,
                status: OutcomeStatus::Failed(reason),
            };
        }
    };

    let file_name = format!(
        "texture_{index:02}{}",
        extension_for(mime_type.as_deref())
    );
    if let Err(err) = fs::write(out_dir.join(&file_name), &bytes) {
        let reason = ExtractFailure::WriteFailed(err.to_string());
        tracing::warn!("texture {index}: {reason}");
        return ImageOutcome {
            index,
            status: OutcomeStatus::Failed(reason),
        };
    }

    // Decode purely to check structural integrity; corrupt bytes stay on
    // disk and are flagged rather than discarded.
    let warning = match image::load_from_memory(&bytes) {
        Ok(decoded) => {
            let (width, height) = decoded.dimensions();
            tracing::info!(
                "texture {index}: {file_name} ({width}x{height}, {} bytes)",
                bytes.len(),
            );
            None
        }
        Err(err) => {
            let flag = ExtractFailure::CorruptImageData(err.to_string());
            tracing::warn!("texture {index}: {file_name} written, but {flag}");
            Some(flag)
        }
    };

    ImageOutcome {
        index,
        status: OutcomeStatus::Extracted {
            file_name,
            byte_length: bytes.len(),
            mime_type,
            warning,
        },
    }
}

/// Resolve an image descriptor to its raw bytes and mime type.
fn resolve_image(
    doc: &Document,
    binary: Option<&[u8]>,
    image: &Image,
) -> Result<(Vec<u8>, Option<String>), ExtractFailure> {
    match image.source() {
        Some(ImageSource::BufferView(view_index)) => {
            let view = doc
                .buffer_views
                .get(view_index as usize)
                .ok_or(ExtractFailure::UnresolvedBufferView(view_index))?;
            let binary = binary.ok_or(ExtractFailure::MissingBinaryChunk)?;

            let offset = view.byte_offset as usize;
            let length = view.byte_length as usize;
            let bytes = offset
                .checked_add(length)
                .filter(|&end| end <= binary.len())
                .map(|end| binary[offset..end].to_vec())
                .ok_or(ExtractFailure::BufferOverrun {
                    offset,
                    length,
                    available: binary.len(),
                })?;
            Ok((bytes, image.mime_type.clone()))
        }
        Some(ImageSource::DataUri(uri)) => {
            let (header, payload) = uri
                .split_once(',')
                .ok_or(ExtractFailure::MalformedDataUri)?;
            let bytes = STANDARD
                .decode(payload.trim())
                .map_err(|err| ExtractFailure::InvalidBase64(err.to_string()))?;
            Ok((bytes, data_uri_mime(header)))
        }
        Some(ImageSource::ExternalUri(uri)) => {
            Err(ExtractFailure::UnsupportedExternalReference(uri.to_string()))
        }
        None => Err(ExtractFailure::MissingSource),
    }
}

/// Pull the mime type out of a data URI header such as `data:image/png;base64`.
fn data_uri_mime(header: &str) -> Option<String> {
    let rest = header.strip_prefix("data:")?;
    match rest.split(';').next() {
        Some(mime) if !mime.is_empty() => Some(mime.to_string()),
        _ => None,
    }
}

/// Output extension for the closed set of recognized image types.
fn extension_for(mime: Option<&str>) -> &'static str {
    match mime {
        Some("image/png") => ".png",
        Some("image/jpeg") => ".jpg",
        _ => ".bin",
    }
}
