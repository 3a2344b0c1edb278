//! GLB container reading.
//!
//! A GLB file (VRM files are GLB underneath) is a fixed 12-byte header
//! followed by length-prefixed, type-tagged chunks, each starting on a
//! 4-byte boundary. The first chunk must be the JSON scene description;
//! an optional second BIN chunk carries the raw bytes that bufferViews
//! index into.

use crate::error::ContainerError;

/// GLB magic number, `b"glTF"` read as a little-endian u32.
pub const GLB_MAGIC: u32 = 0x4654_6C67;
/// The only supported container version.
pub const GLB_VERSION: u32 = 2;

/// Chunk type tag for the JSON chunk (`b"JSON"`).
pub const CHUNK_JSON: u32 = 0x4E4F_534A;
/// Chunk type tag for the binary chunk (`b"BIN\0"`).
pub const CHUNK_BIN: u32 = 0x004E_4942;

const HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

/// Fixed 12-byte container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub magic: u32,
    pub version: u32,
    /// Total byte count of the container, header and padding included.
    pub total_length: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    Json,
    Binary,
    Unknown(u32),
}

impl ChunkKind {
    fn from_tag(tag: u32) -> Self {
        match tag {
            CHUNK_JSON => ChunkKind::Json,
            CHUNK_BIN => ChunkKind::Binary,
            other => ChunkKind::Unknown(other),
        }
    }
}

/// A single length-prefixed chunk. `data.len()` always equals the declared
/// chunk length; padding bytes are skipped, never stored or inspected.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub kind: ChunkKind,
    pub data: Vec<u8>,
}

/// A parsed container, split into its chunk roles.
#[derive(Debug)]
pub struct Glb {
    pub header: Header,
    /// The JSON scene chunk, always present.
    pub json: Vec<u8>,
    /// The raw binary payload, when the container carries one.
    pub binary: Option<Vec<u8>>,
}

impl Glb {
    /// Read and validate a whole container, enforcing the chunk-role rules:
    /// the first chunk must be JSON, a BIN chunk in second position becomes
    /// the binary payload, and any other chunk type is skipped (forward
    /// compatibility, non-fatal).
    pub fn parse(bytes: &[u8]) -> Result<Self, ContainerError> {
        let (header, chunks) = read_chunks(bytes)?;

        let mut iter = chunks.into_iter();
        let json = match iter.next() {
            Some(Chunk {
                kind: ChunkKind::Json,
                data,
            }) => data,
            _ => return Err(ContainerError::MissingJsonChunk),
        };
        let binary = iter.next().and_then(|chunk| match chunk.kind {
            ChunkKind::Binary => Some(chunk.data),
            _ => None,
        });

        tracing::debug!(
            "GLB: {} bytes declared, JSON chunk {} bytes, binary chunk {:?} bytes",
            header.total_length,
            json.len(),
            binary.as_ref().map(Vec::len),
        );

        Ok(Glb {
            header,
            json,
            binary,
        })
    }
}

/// Validate the header and walk every chunk in the container.
///
/// The declared total length is the arbiter of the container's extent: the
/// walk stops exactly there, and an end offset that disagrees with it is a
/// [`ContainerError::LengthMismatch`].
pub fn read_chunks(bytes: &[u8]) -> Result<(Header, Vec<Chunk>), ContainerError> {
    if bytes.len() < HEADER_LEN {
        return Err(ContainerError::Truncated {
            offset: 0,
            needed: HEADER_LEN,
            available: bytes.len(),
        });
    }

    let header = Header {
        magic: read_u32(bytes, 0)?,
        version: read_u32(bytes, 4)?,
        total_length: read_u32(bytes, 8)?,
    };
    if header.magic != GLB_MAGIC || header.version != GLB_VERSION {
        return Err(ContainerError::MalformedContainer {
            magic: header.magic,
            version: header.version,
        });
    }

    let total = header.total_length as usize;
    let mut chunks = Vec::new();
    let mut offset = HEADER_LEN;

    while offset < total {
        // A dangling tail too short for a chunk header means the declared
        // total cannot be reached by whole chunks.
        if total - offset < CHUNK_HEADER_LEN {
            return Err(ContainerError::LengthMismatch {
                declared: header.total_length,
                actual: offset as u32,
            });
        }

        let declared_len = read_u32(bytes, offset)? as usize;
        let tag = read_u32(bytes, offset + 4)?;

        let payload_start = offset + CHUNK_HEADER_LEN;
        if declared_len > total - payload_start {
            return Err(ContainerError::Truncated {
                offset: payload_start,
                needed: declared_len,
                available: total - payload_start,
            });
        }
        let payload_end = payload_start + declared_len;
        let data = bytes
            .get(payload_start..payload_end)
            .ok_or(ContainerError::Truncated {
                offset: payload_start,
                needed: declared_len,
                available: bytes.len().saturating_sub(payload_start),
            })?;

        chunks.push(Chunk {
            kind: ChunkKind::from_tag(tag),
            data: data.to_vec(),
        });

        // Next chunk starts on the next 4-byte boundary; padding content is
        // format-defined and deliberately not inspected.
        offset = align_to_4(payload_end);
    }

    if offset != total {
        return Err(ContainerError::LengthMismatch {
            declared: header.total_length,
            actual: offset as u32,
        });
    }

    Ok((header, chunks))
}

fn align_to_4(offset: usize) -> usize {
    (offset + 3) & !3
}

fn read_u32(bytes: &[u8], offset: usize) -> Result<u32, ContainerError> {
    let slice = bytes
        .get(offset..offset + 4)
        .ok_or(ContainerError::Truncated {
            offset,
            needed: 4,
            available: bytes.len().saturating_sub(offset),
        })?;
    let mut buf = [0u8; 4];
    buf.copy_from_slice(slice);
    Ok(u32::from_le_bytes(buf))
}
