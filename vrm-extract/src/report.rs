//! Material cross-reference reporting.
//!
//! A read-only projection over the document and the extraction outcomes:
//! which material uses which texture file. Dangling indices never fail
//! here; they just leave a slot empty. This is a diagnostic view, not a
//! correctness gate.

use std::fmt;

use serde::Serialize;

use crate::document::Document;
use crate::extract::{ImageOutcome, OutcomeStatus};

/// One material's resolved texture slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterialBinding {
    pub material_index: usize,
    pub material_name: Option<String>,
    pub base_color: Option<ResolvedTexture>,
    pub normal: Option<ResolvedTexture>,
}

/// A texture slot traced down to the image outcome it lands on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTexture {
    pub texture_index: usize,
    pub image_index: usize,
    /// Output file name, when that image was extracted.
    pub file_name: Option<String>,
}

/// Full extraction report: per-image outcomes plus the material mapping.
#[derive(Debug, Serialize)]
pub struct ExtractionReport {
    pub outcomes: Vec<ImageOutcome>,
    pub materials: Vec<MaterialBinding>,
}

impl ExtractionReport {
    pub fn extracted_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_extracted()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.extracted_count()
    }
}

/// Project materials -> textures -> images -> outcomes.
///
/// Pure and infallible: any unresolved hop produces `None` for that slot.
pub fn build_report(doc: &Document, outcomes: Vec<ImageOutcome>) -> ExtractionReport {
    let materials = doc
        .materials
        .iter()
        .enumerate()
        .map(|(material_index, material)| MaterialBinding {
            material_index,
            material_name: material.name.clone(),
            base_color: material
                .pbr_metallic_roughness
                .base_color_texture
                .and_then(|slot| resolve_slot(doc, &outcomes, slot.index)),
            normal: material
                .normal_texture
                .and_then(|slot| resolve_slot(doc, &outcomes, slot.index)),
        })
        .collect();

    ExtractionReport {
        outcomes,
        materials,
    }
}

fn resolve_slot(
    doc: &Document,
    outcomes: &[ImageOutcome],
    texture_index: u32,
) -> Option<ResolvedTexture> {
    let texture = doc.textures.get(texture_index as usize)?;
    let image_index = texture.source? as usize;
    doc.images.get(image_index)?;

    let file_name = outcomes
        .get(image_index)
        .and_then(|outcome| outcome.file_name())
        .map(str::to_string);

    Some(ResolvedTexture {
        texture_index: texture_index as usize,
        image_index,
        file_name,
    })
}

impl fmt::Display for ExtractionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Extracted {} of {} images",
            self.extracted_count(),
            self.outcomes.len()
        )?;
        for outcome in &self.outcomes {
            match &outcome.status {
                OutcomeStatus::Extracted {
                    file_name,
                    byte_length,
                    mime_type,
                    warning,
                } => {
                    write!(
                        f,
                        "  texture {:2}: {} ({} bytes, {})",
                        outcome.index,
                        file_name,
                        byte_length,
                        mime_type.as_deref().unwrap_or("unknown mime"),
                    )?;
                    if let Some(warning) = warning {
                        write!(f, " [warning: {warning}]")?;
                    }
                    writeln!(f)?;
                }
                OutcomeStatus::Failed(reason) => {
                    writeln!(f, "  texture {:2}: failed: {reason}", outcome.index)?;
                }
            }
        }
        if !self.materials.is_empty() {
            writeln!(f, "Materials:")?;
            for binding in &self.materials {
                writeln!(
                    f,
                    "  {:2} {}: base color -> {}, normal -> {}",
                    binding.material_index,
                    binding.material_name.as_deref().unwrap_or("(unnamed)"),
                    slot_label(&binding.base_color),
                    slot_label(&binding.normal),
                )?;
            }
        }
        Ok(())
    }
}

fn slot_label(slot: &Option<ResolvedTexture>) -> String {
    match slot {
        Some(resolved) => match &resolved.file_name {
            Some(name) => format!("image {} ({name})", resolved.image_index),
            None => format!("image {}", resolved.image_index),
        },
        None => "(none)".to_string(),
    }
}
