//! Typed model of the JSON scene chunk.
//!
//! The schema is deliberately tolerant: every field is optional or
//! defaulted, and unknown fields are ignored, so documents produced by
//! evolving exporters and extensions still parse. Index references are
//! left unvalidated here; a dangling index surfaces during extraction so
//! a single bad reference never invalidates the whole document.

use serde::Deserialize;

use crate::error::ContainerError;

/// The parts of the scene description that texture extraction cares about.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub buffer_views: Vec<BufferView>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub textures: Vec<Texture>,
    #[serde(default)]
    pub materials: Vec<Material>,
}

impl Document {
    /// Parse the JSON chunk. Only syntactic JSON errors fail; missing or
    /// unknown fields never do.
    pub fn from_json(json: &[u8]) -> Result<Self, ContainerError> {
        Ok(serde_json::from_slice(json)?)
    }
}

/// A byte range into the binary chunk.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferView {
    #[serde(default)]
    pub buffer: u32,
    #[serde(default)]
    pub byte_offset: u32,
    #[serde(default)]
    pub byte_length: u32,
}

/// An embedded image descriptor: bytes live in a bufferView, an inline
/// data URI, or an external file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub name: Option<String>,
    pub buffer_view: Option<u32>,
    pub mime_type: Option<String>,
    pub uri: Option<String>,
}

/// Where an image's bytes live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource<'a> {
    BufferView(u32),
    DataUri(&'a str),
    ExternalUri(&'a str),
}

impl Image {
    /// Classify the image's payload location. `bufferView` wins when both
    /// it and `uri` are present; a `data:` URI is inline, anything else is
    /// an external file reference.
    pub fn source(&self) -> Option<ImageSource<'_>> {
        if let Some(view) = self.buffer_view {
            return Some(ImageSource::BufferView(view));
        }
        match self.uri.as_deref() {
            Some(uri) if uri.starts_with("data:") => Some(ImageSource::DataUri(uri)),
            Some(uri) => Some(ImageSource::ExternalUri(uri)),
            None => None,
        }
    }
}

/// A texture samples one image.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Texture {
    pub name: Option<String>,
    /// Index into `images`.
    pub source: Option<u32>,
}

/// The two texture slots the cross-reference report tracks.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub name: Option<String>,
    #[serde(default)]
    pub pbr_metallic_roughness: PbrMetallicRoughness,
    pub normal_texture: Option<TextureRef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbrMetallicRoughness {
    pub base_color_texture: Option<TextureRef>,
}

/// A reference to an entry in `textures`.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureRef {
    #[serde(default)]
    pub index: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_parses() {
        let doc = Document::from_json(b"{}").unwrap();
        assert!(doc.buffer_views.is_empty());
        assert!(doc.images.is_empty());
        assert!(doc.textures.is_empty());
        assert!(doc.materials.is_empty());
    }

    #[test]
    fn sparse_fields_default() {
        let doc = Document::from_json(
            br#"{
                "bufferViews": [{"byteLength": 64}],
                "images": [{"bufferView": 0}],
                "materials": [{"name": "Skin"}]
            }"#,
        )
        .unwrap();
        assert_eq!(doc.buffer_views[0].byte_offset, 0);
        assert_eq!(doc.buffer_views[0].byte_length, 64);
        assert!(doc.images[0].mime_type.is_none());
        assert!(doc.materials[0].pbr_metallic_roughness.base_color_texture.is_none());
        assert!(doc.materials[0].normal_texture.is_none());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let doc = Document::from_json(
            br#"{
                "asset": {"version": "2.0", "generator": "test"},
                "extensions": {"VRM": {"meta": {}}},
                "images": [{"bufferView": 0, "extras": {"note": "hi"}}]
            }"#,
        )
        .unwrap();
        assert_eq!(doc.images.len(), 1);
    }

    #[test]
    fn syntactic_error_is_invalid_json() {
        assert!(matches!(
            Document::from_json(b"{\"images\": ["),
            Err(ContainerError::InvalidJson(_))
        ));
    }

    #[test]
    fn image_source_classification() {
        let from_view = Image {
            buffer_view: Some(3),
            ..Default::default()
        };
        assert_eq!(from_view.source(), Some(ImageSource::BufferView(3)));

        let inline = Image {
            uri: Some("data:image/png;base64,AAAA".to_string()),
            ..Default::default()
        };
        assert!(matches!(inline.source(), Some(ImageSource::DataUri(_))));

        let external = Image {
            uri: Some("textures/body.png".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            external.source(),
            Some(ImageSource::ExternalUri("textures/body.png"))
        ));

        assert!(Image::default().source().is_none());
    }
}
