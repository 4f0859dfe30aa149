//! Packed numeric arrays stored as plist data blobs.

/// Element type of a packed array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    /// Little-endian IEEE-754 binary32.
    Float32,
    /// Little-endian two's-complement 32-bit integer.
    Int32,
}

/// Decodes a blob of 4-byte little-endian elements.
///
/// Trailing bytes that do not form a whole element are ignored, and an empty
/// blob yields an empty vector.
pub fn decode_typed_array(blob: &[u8], kind: ElementKind) -> Vec<f64> {
    blob.chunks_exact(4)
        .map(|chunk| {
            let raw = [chunk[0], chunk[1], chunk[2], chunk[3]];
            match kind {
                ElementKind::Float32 => f64::from(f32::from_le_bytes(raw)),
                ElementKind::Int32 => f64::from(i32::from_le_bytes(raw)),
            }
        })
        .collect()
}
