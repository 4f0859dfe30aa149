//! Binary property list (`bplist00`) decoder.
//!
//! # Layout
//!
//! ```text
//! "bplist00" | objects ... | offset table | 32-byte trailer
//! ```
//!
//! The trailer gives the width of offset-table entries, the width of object
//! references, the object count, the root object index and the position of
//! the offset table. Every object starts with a marker byte: the high nibble
//! is the type, the low nibble a size hint (`0xF` = an integer object with
//! the real length follows).
//!
//! # Keyed archives
//!
//! Note sessions are `NSKeyedArchiver` output: the root dictionary holds a
//! `$objects` array and UIDs index into it. When that shape is detected UIDs
//! resolve to `$objects` elements; otherwise a UID is taken as an object
//! table index.

use tracing::debug;

use super::value::{Dict, NodeId, Plist, Value};
use crate::error::FormatError;

/// Magic header of binary property lists.
pub const MAGIC: &[u8; 8] = b"bplist00";

const TRAILER_LEN: usize = 32;

/// Maximum number of objects being decoded at once along one path.
pub const MAX_NESTING: usize = 512;

/// Decodes a binary property list into a [`Plist`] arena.
///
/// Objects referenced more than once are decoded once and shared. A
/// reference to an object that is still being decoded on the current path is
/// replaced by [`Value::Null`], so the result is always acyclic.
///
/// # Errors
/// Returns a [`FormatError`] for a missing header, an inconsistent trailer,
/// any read past the end of the buffer, an out-of-range object reference or
/// an unknown object marker.
pub fn decode(bytes: &[u8]) -> Result<Plist, FormatError> {
    let trailer = Trailer::read(bytes)?;
    debug!(
        objects = trailer.object_count,
        root = trailer.root_object,
        offset_size = trailer.offset_int_size,
        ref_size = trailer.object_ref_size,
        "decoding binary plist"
    );

    let reader = Reader { bytes };
    let offsets = read_offset_table(&reader, &trailer)?;

    let mut decoder = Decoder {
        reader,
        ref_size: trailer.object_ref_size,
        slots: vec![Slot::Unvisited; offsets.len()],
        offsets,
        uid_targets: None,
        nodes: Vec::new(),
        null_node: None,
        depth: 0,
    };
    decoder.uid_targets = decoder.keyed_archive_objects(trailer.root_object)?;
    if let Some(targets) = &decoder.uid_targets {
        debug!(archived_objects = targets.len(), "detected keyed archive");
    }

    let root = decoder.decode_object(trailer.root_object)?;
    debug!(nodes = decoder.nodes.len(), "decoded binary plist");

    Ok(Plist::from_parts(decoder.nodes, root))
}

#[derive(Clone, Copy, Debug)]
struct Trailer {
    offset_int_size: usize,
    object_ref_size: usize,
    object_count: usize,
    root_object: usize,
    offset_table_offset: usize,
}

impl Trailer {
    fn read(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.len() < MAGIC.len() || &bytes[..MAGIC.len()] != MAGIC {
            return Err(FormatError::BadMagic);
        }
        let min_len = MAGIC.len() + TRAILER_LEN;
        if bytes.len() < min_len {
            return Err(FormatError::Truncated {
                offset: bytes.len(),
                needed: min_len - bytes.len(),
            });
        }

        let trailer_start = bytes.len() - TRAILER_LEN;
        let raw = &bytes[trailer_start..];
        let offset_int_size = raw[6] as usize;
        let object_ref_size = raw[7] as usize;
        let object_count = trailer_field(raw, 8, "object count")?;
        let root_object = trailer_field(raw, 16, "root object")?;
        let offset_table_offset = trailer_field(raw, 24, "offset table offset")?;

        if !(1..=8).contains(&offset_int_size) {
            return Err(FormatError::InvalidTrailer(format!(
                "offset int size {offset_int_size} (expected 1..=8)"
            )));
        }
        if !(1..=8).contains(&object_ref_size) {
            return Err(FormatError::InvalidTrailer(format!(
                "object ref size {object_ref_size} (expected 1..=8)"
            )));
        }
        if object_count == 0 {
            return Err(FormatError::InvalidTrailer("object count is zero".into()));
        }
        if root_object >= object_count {
            return Err(FormatError::InvalidTrailer(format!(
                "root object {root_object} out of range for {object_count} object(s)"
            )));
        }

        let table_end = object_count
            .checked_mul(offset_int_size)
            .and_then(|len| len.checked_add(offset_table_offset));
        match table_end {
            Some(end) if offset_table_offset >= MAGIC.len() && end <= trailer_start => {}
            _ => {
                return Err(FormatError::InvalidTrailer(format!(
                    "offset table at {offset_table_offset} with {object_count} entries does not fit before the trailer"
                )))
            }
        }

        Ok(Self {
            offset_int_size,
            object_ref_size,
            object_count,
            root_object,
            offset_table_offset,
        })
    }
}

fn trailer_field(raw: &[u8], at: usize, name: &str) -> Result<usize, FormatError> {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&raw[at..at + 8]);
    usize::try_from(u64::from_be_bytes(buf))
        .map_err(|_| FormatError::InvalidTrailer(format!("{name} does not fit in memory")))
}

fn read_offset_table(reader: &Reader<'_>, trailer: &Trailer) -> Result<Vec<usize>, FormatError> {
    let mut offsets = Vec::with_capacity(trailer.object_count);
    for index in 0..trailer.object_count {
        let at = trailer.offset_table_offset + index * trailer.offset_int_size;
        let offset = reader.uint(at, trailer.offset_int_size)?;
        offsets.push(to_usize(offset, at)?);
    }
    Ok(offsets)
}

fn to_usize(value: u64, at: usize) -> Result<usize, FormatError> {
    usize::try_from(value).map_err(|_| FormatError::Truncated {
        offset: at,
        needed: usize::MAX,
    })
}

/// Bounds-checked big-endian reads over the plist buffer.
struct Reader<'a> {
    bytes: &'a [u8],
}

impl<'a> Reader<'a> {
    fn slice(&self, offset: usize, len: usize) -> Result<&'a [u8], FormatError> {
        offset
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .map(|end| &self.bytes[offset..end])
            .ok_or(FormatError::Truncated {
                offset,
                needed: len,
            })
    }

    fn byte(&self, offset: usize) -> Result<u8, FormatError> {
        self.slice(offset, 1).map(|b| b[0])
    }

    /// Reads an unsigned big-endian integer of 1..=8 bytes.
    fn uint(&self, offset: usize, width: usize) -> Result<u64, FormatError> {
        let raw = self.slice(offset, width)?;
        Ok(raw.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
    }

    fn array<const N: usize>(&self, offset: usize) -> Result<[u8; N], FormatError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.slice(offset, N)?);
        Ok(buf)
    }
}

#[derive(Clone, Copy, Debug)]
enum Slot {
    Unvisited,
    InProgress,
    Done(NodeId),
}

struct Decoder<'a> {
    reader: Reader<'a>,
    ref_size: usize,
    offsets: Vec<usize>,
    /// Object-table index for each `$objects` element of a keyed archive.
    uid_targets: Option<Vec<usize>>,
    slots: Vec<Slot>,
    nodes: Vec<Value>,
    null_node: Option<NodeId>,
    depth: usize,
}

impl<'a> Decoder<'a> {
    fn push(&mut self, value: Value) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(value);
        id
    }

    fn cycle_break(&mut self) -> NodeId {
        match self.null_node {
            Some(id) => id,
            None => {
                let id = self.push(Value::Null);
                self.null_node = Some(id);
                id
            }
        }
    }

    fn object_offset(&self, index: usize) -> Result<usize, FormatError> {
        self.offsets
            .get(index)
            .copied()
            .ok_or(FormatError::Truncated {
                offset: index,
                needed: 1,
            })
    }

    fn decode_object(&mut self, index: usize) -> Result<NodeId, FormatError> {
        match self.slots.get(index) {
            Some(Slot::Done(id)) => return Ok(*id),
            Some(Slot::InProgress) => {
                debug!(object = index, "breaking reference cycle");
                return Ok(self.cycle_break());
            }
            Some(Slot::Unvisited) => {}
            None => {
                return Err(FormatError::Truncated {
                    offset: index,
                    needed: 1,
                })
            }
        }
        if self.depth >= MAX_NESTING {
            return Err(FormatError::NestingTooDeep { limit: MAX_NESTING });
        }

        self.slots[index] = Slot::InProgress;
        self.depth += 1;
        let result = self.decode_at(index);
        self.depth -= 1;

        match result {
            Ok(id) => {
                self.slots[index] = Slot::Done(id);
                Ok(id)
            }
            Err(err) => {
                self.slots[index] = Slot::Unvisited;
                Err(err)
            }
        }
    }

    fn decode_at(&mut self, index: usize) -> Result<NodeId, FormatError> {
        let offset = self.object_offset(index)?;
        let marker = self.reader.byte(offset)?;
        let low = marker & 0x0F;

        let value = match marker >> 4 {
            0x0 => match marker {
                0x00 | 0x0F => Value::Null,
                0x08 => Value::Bool(false),
                0x09 => Value::Bool(true),
                _ => return Err(FormatError::UnsupportedTag { marker, offset }),
            },
            0x1 => Value::Int(self.read_int(offset, low)?),
            0x2 => match low {
                2 => Value::Real(f64::from(f32::from_be_bytes(
                    self.reader.array(offset + 1)?,
                ))),
                3 => Value::Real(f64::from_be_bytes(self.reader.array(offset + 1)?)),
                _ => return Err(FormatError::UnsupportedTag { marker, offset }),
            },
            0x3 if low == 3 => Value::Date(f64::from_be_bytes(self.reader.array(offset + 1)?)),
            0x4 => {
                let (len, start) = self.read_length(offset, low)?;
                Value::Bytes(self.reader.slice(start, len)?.to_vec())
            }
            0x5 => {
                let (len, start) = self.read_length(offset, low)?;
                Value::Text(ascii_string(self.reader.slice(start, len)?))
            }
            0x6 => {
                let (units, start) = self.read_length(offset, low)?;
                let len = units.checked_mul(2).ok_or(FormatError::Truncated {
                    offset: start,
                    needed: usize::MAX,
                })?;
                Value::Text(utf16_string(self.reader.slice(start, len)?))
            }
            0x8 => {
                let width = low as usize + 1;
                if width > 8 {
                    return Err(FormatError::UnsupportedTag { marker, offset });
                }
                let uid = self.reader.uint(offset + 1, width)?;
                return self.resolve_uid(uid, offset);
            }
            0xA | 0xC => {
                let (count, start) = self.read_length(offset, low)?;
                let refs = self.read_refs(start, count)?;
                let mut items = Vec::with_capacity(refs.len());
                for object in refs {
                    items.push(self.decode_object(object)?);
                }
                Value::Array(items)
            }
            0xD => Value::Dict(self.read_dict(offset, low)?),
            _ => return Err(FormatError::UnsupportedTag { marker, offset }),
        };

        Ok(self.push(value))
    }

    /// Integers are two's complement at every width. 16-byte integers keep
    /// their low 64 bits.
    fn read_int(&self, offset: usize, low: u8) -> Result<i64, FormatError> {
        let start = offset + 1;
        match low {
            0 => Ok(i8::from_be_bytes(self.reader.array(start)?).into()),
            1 => Ok(i16::from_be_bytes(self.reader.array(start)?).into()),
            2 => Ok(i32::from_be_bytes(self.reader.array(start)?).into()),
            3 => Ok(i64::from_be_bytes(self.reader.array(start)?)),
            4 => Ok(i64::from_be_bytes(self.reader.array(start + 8)?)),
            _ => Err(FormatError::UnsupportedTag {
                marker: 0x10 | low,
                offset,
            }),
        }
    }

    /// Returns `(length, payload_start)` for the object at `offset`.
    fn read_length(&self, offset: usize, low: u8) -> Result<(usize, usize), FormatError> {
        if low != 0x0F {
            return Ok((low as usize, offset + 1));
        }
        let int_offset = offset + 1;
        let int_marker = self.reader.byte(int_offset)?;
        let width_exp = int_marker & 0x0F;
        if int_marker >> 4 != 0x1 || width_exp > 3 {
            return Err(FormatError::UnsupportedTag {
                marker: int_marker,
                offset: int_offset,
            });
        }
        let width = 1usize << width_exp;
        let len = self.reader.uint(int_offset + 1, width)?;
        Ok((to_usize(len, int_offset)?, int_offset + 1 + width))
    }

    fn read_refs(&self, start: usize, count: usize) -> Result<Vec<usize>, FormatError> {
        let len = count
            .checked_mul(self.ref_size)
            .ok_or(FormatError::Truncated {
                offset: start,
                needed: usize::MAX,
            })?;
        let raw = self.reader.slice(start, len)?;
        raw.chunks_exact(self.ref_size)
            .enumerate()
            .map(|(i, chunk)| {
                let value = chunk.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
                to_usize(value, start + i * self.ref_size)
            })
            .collect()
    }

    fn read_dict(&mut self, offset: usize, low: u8) -> Result<Dict, FormatError> {
        let (count, start) = self.read_length(offset, low)?;
        let keys = self.read_refs(start, count)?;
        let values = self.read_refs(start + count * self.ref_size, count)?;

        let mut dict = Dict::with_capacity(keys.len());
        for (key_ref, value_ref) in keys.into_iter().zip(values) {
            let key_id = self.decode_object(key_ref)?;
            let Some(key) = self.nodes[key_id.index()].as_text().map(str::to_owned) else {
                debug!(
                    object = key_ref,
                    kind = self.nodes[key_id.index()].type_name(),
                    "skipping dictionary entry with non-text key"
                );
                continue;
            };
            let value_id = self.decode_object(value_ref)?;
            dict.insert(key, value_id);
        }
        Ok(dict)
    }

    fn resolve_uid(&mut self, uid: u64, offset: usize) -> Result<NodeId, FormatError> {
        let uid = to_usize(uid, offset)?;
        let target = match &self.uid_targets {
            Some(targets) => *targets.get(uid).ok_or(FormatError::Truncated {
                offset,
                needed: 1,
            })?,
            None => uid,
        };
        self.decode_object(target)
    }

    /// Object-table indices of `$objects` when the root is a keyed archive.
    ///
    /// Only reads markers and reference lists; nothing is materialized.
    fn keyed_archive_objects(&self, root: usize) -> Result<Option<Vec<usize>>, FormatError> {
        let offset = self.object_offset(root)?;
        let marker = self.reader.byte(offset)?;
        if marker >> 4 != 0xD {
            return Ok(None);
        }
        let (count, start) = self.read_length(offset, marker & 0x0F)?;
        let keys = self.read_refs(start, count)?;
        let values = self.read_refs(start + count * self.ref_size, count)?;

        for (key_ref, value_ref) in keys.into_iter().zip(values) {
            if self.peek_text(key_ref)?.as_deref() != Some("$objects") {
                continue;
            }
            let array_offset = self.object_offset(value_ref)?;
            let array_marker = self.reader.byte(array_offset)?;
            if array_marker >> 4 != 0xA {
                return Ok(None);
            }
            let (len, array_start) = self.read_length(array_offset, array_marker & 0x0F)?;
            return self.read_refs(array_start, len).map(Some);
        }
        Ok(None)
    }

    fn peek_text(&self, index: usize) -> Result<Option<String>, FormatError> {
        let offset = self.object_offset(index)?;
        let marker = self.reader.byte(offset)?;
        match marker >> 4 {
            0x5 => {
                let (len, start) = self.read_length(offset, marker & 0x0F)?;
                Ok(Some(ascii_string(self.reader.slice(start, len)?)))
            }
            0x6 => {
                let (units, start) = self.read_length(offset, marker & 0x0F)?;
                let raw = self.reader.slice(start, units.saturating_mul(2))?;
                Ok(Some(utf16_string(raw)))
            }
            _ => Ok(None),
        }
    }
}

fn ascii_string(raw: &[u8]) -> String {
    raw.iter().map(|&b| char::from(b)).collect()
}

fn utf16_string(raw: &[u8]) -> String {
    let units: Vec<u16> = raw
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}
