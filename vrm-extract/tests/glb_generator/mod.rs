//! Programmatic GLB generation for integration tests.
//!
//! Builds containers from a serde_json scene document and an optional raw
//! binary payload, laying out the header, chunk prefixes, and 4-byte
//! padding exactly as the format requires.

use serde_json::{json, Value};

/// Chunk type tag for the JSON chunk.
pub const CHUNK_JSON: u32 = 0x4E4F_534A;
/// Chunk type tag for the binary chunk.
pub const CHUNK_BIN: u32 = 0x004E_4942;

/// A known-valid 1x1 PNG, produced by the image crate.
pub fn tiny_png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(1, 1, image::Rgba([200, 40, 40, 255]));
    let mut cursor = std::io::Cursor::new(Vec::new());
    img.write_to(&mut cursor, image::ImageFormat::Png)
        .expect("PNG encoding failed");
    cursor.into_inner()
}

/// Assemble a GLB from a JSON document and an optional binary payload.
pub fn assemble_glb(root: &Value, binary: Option<&[u8]>) -> Vec<u8> {
    let json_bytes = serde_json::to_vec(root).expect("Failed to serialize JSON");

    // Pad JSON to 4-byte alignment
    let json_padding = (4 - (json_bytes.len() % 4)) % 4;
    let json_chunk_length = json_bytes.len() + json_padding;

    let mut total_length = 12 + 8 + json_chunk_length;
    let mut bin_padding = 0;
    let mut bin_chunk_length = 0;
    if let Some(bin) = binary {
        bin_padding = (4 - (bin.len() % 4)) % 4;
        bin_chunk_length = bin.len() + bin_padding;
        total_length += 8 + bin_chunk_length;
    }

    let mut glb = Vec::with_capacity(total_length);

    // Header
    glb.extend_from_slice(b"glTF");
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total_length as u32).to_le_bytes());

    // JSON chunk
    glb.extend_from_slice(&(json_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    glb.extend_from_slice(&json_bytes);
    glb.extend(std::iter::repeat_n(0x20u8, json_padding)); // pad with spaces

    // BIN chunk
    if let Some(bin) = binary {
        glb.extend_from_slice(&(bin_chunk_length as u32).to_le_bytes());
        glb.extend_from_slice(&CHUNK_BIN.to_le_bytes());
        glb.extend_from_slice(bin);
        glb.extend(std::iter::repeat_n(0u8, bin_padding)); // pad with zeros
    }

    glb
}

/// Scene document with one image backed by bufferView 0, one texture, and
/// one material using it as base color.
pub fn single_image_doc(byte_length: usize, mime: &str) -> Value {
    json!({
        "asset": { "version": "2.0" },
        "buffers": [{ "byteLength": byte_length }],
        "bufferViews": [{ "buffer": 0, "byteOffset": 0, "byteLength": byte_length }],
        "images": [{ "bufferView": 0, "mimeType": mime }],
        "textures": [{ "source": 0 }],
        "materials": [{
            "name": "Body",
            "pbrMetallicRoughness": { "baseColorTexture": { "index": 0 } }
        }]
    })
}
