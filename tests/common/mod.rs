#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// A property list tree, encoded by [`encode_plist`].
#[derive(Clone, Debug, PartialEq)]
pub enum PNode {
    Null,
    Bool(bool),
    Int(i64),
    Real(f64),
    Date(f64),
    Text(String),
    Data(Vec<u8>),
    Array(Vec<PNode>),
    Set(Vec<PNode>),
    Dict(Vec<(String, PNode)>),
    Uid(u64),
}

pub fn text(s: &str) -> PNode {
    PNode::Text(s.to_string())
}

pub fn dict(entries: Vec<(&str, PNode)>) -> PNode {
    PNode::Dict(
        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect(),
    )
}

/// Encodes a tree as `bplist00` with 4-byte offsets and 2-byte references.
///
/// Every node becomes its own object, in pre-order; the root is object 0.
pub fn encode_plist(root: &PNode) -> Vec<u8> {
    const REF_SIZE: usize = 2;
    const OFFSET_SIZE: usize = 4;

    let mut objects: Vec<Vec<u8>> = Vec::new();
    flatten(root, &mut objects);

    let mut out = b"bplist00".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for object in &objects {
        offsets.push(out.len());
        out.extend_from_slice(object);
    }

    let table_offset = out.len();
    for offset in offsets {
        out.extend_from_slice(&(offset as u32).to_be_bytes());
    }

    out.extend_from_slice(&[0; 6]);
    out.push(OFFSET_SIZE as u8);
    out.push(REF_SIZE as u8);
    out.extend_from_slice(&(objects.len() as u64).to_be_bytes());
    out.extend_from_slice(&0u64.to_be_bytes());
    out.extend_from_slice(&(table_offset as u64).to_be_bytes());
    out
}

fn flatten(node: &PNode, objects: &mut Vec<Vec<u8>>) -> usize {
    let index = objects.len();
    objects.push(Vec::new());

    let encoded = match node {
        PNode::Null => vec![0x00],
        PNode::Bool(value) => vec![if *value { 0x09 } else { 0x08 }],
        PNode::Int(value) => encode_int(*value),
        PNode::Real(value) => {
            let mut out = vec![0x23];
            out.extend_from_slice(&value.to_be_bytes());
            out
        }
        PNode::Date(value) => {
            let mut out = vec![0x33];
            out.extend_from_slice(&value.to_be_bytes());
            out
        }
        PNode::Text(value) if value.is_ascii() => {
            let mut out = length_header(0x50, value.len());
            out.extend_from_slice(value.as_bytes());
            out
        }
        PNode::Text(value) => {
            let units: Vec<u16> = value.encode_utf16().collect();
            let mut out = length_header(0x60, units.len());
            for unit in units {
                out.extend_from_slice(&unit.to_be_bytes());
            }
            out
        }
        PNode::Data(bytes) => {
            let mut out = length_header(0x40, bytes.len());
            out.extend_from_slice(bytes);
            out
        }
        PNode::Uid(value) => {
            let mut out = vec![0x87];
            out.extend_from_slice(&value.to_be_bytes());
            out
        }
        PNode::Array(items) | PNode::Set(items) => {
            let marker = if matches!(node, PNode::Set(_)) { 0xC0 } else { 0xA0 };
            let refs: Vec<usize> = items.iter().map(|item| flatten(item, objects)).collect();
            let mut out = length_header(marker, refs.len());
            push_refs(&mut out, &refs);
            out
        }
        PNode::Dict(entries) => {
            let keys: Vec<usize> = entries
                .iter()
                .map(|(key, _)| flatten(&PNode::Text(key.clone()), objects))
                .collect();
            let values: Vec<usize> = entries
                .iter()
                .map(|(_, value)| flatten(value, objects))
                .collect();
            let mut out = length_header(0xD0, entries.len());
            push_refs(&mut out, &keys);
            push_refs(&mut out, &values);
            out
        }
    };

    objects[index] = encoded;
    index
}

/// Smallest two's-complement width that holds `value`.
fn encode_int(value: i64) -> Vec<u8> {
    let mut out = Vec::with_capacity(9);
    if let Ok(v) = i8::try_from(value) {
        out.push(0x10);
        out.extend_from_slice(&v.to_be_bytes());
    } else if let Ok(v) = i16::try_from(value) {
        out.push(0x11);
        out.extend_from_slice(&v.to_be_bytes());
    } else if let Ok(v) = i32::try_from(value) {
        out.push(0x12);
        out.extend_from_slice(&v.to_be_bytes());
    } else {
        out.push(0x13);
        out.extend_from_slice(&value.to_be_bytes());
    }
    out
}

/// Extended lengths are unsigned.
fn length_header(marker: u8, len: usize) -> Vec<u8> {
    if len < 0x0F {
        return vec![marker | len as u8];
    }
    let mut out = vec![marker | 0x0F];
    match len {
        0..=0xFF => out.extend_from_slice(&[0x10, len as u8]),
        0x100..=0xFFFF => {
            out.push(0x11);
            out.extend_from_slice(&(len as u16).to_be_bytes());
        }
        _ => {
            out.push(0x12);
            out.extend_from_slice(&(len as u32).to_be_bytes());
        }
    }
    out
}

fn push_refs(out: &mut Vec<u8>, refs: &[usize]) {
    for r in refs {
        out.extend_from_slice(&(*r as u16).to_be_bytes());
    }
}

/// Wraps `objects` in an `NSKeyedArchiver` root whose `$top` points at
/// `$objects[top]`.
pub fn keyed_archive(objects: Vec<PNode>, top: u64) -> PNode {
    dict(vec![
        ("$archiver", text("NSKeyedArchiver")),
        ("$version", PNode::Int(100000)),
        ("$top", dict(vec![("root", PNode::Uid(top))])),
        ("$objects", PNode::Array(objects)),
    ])
}

pub fn f32_blob(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn i32_blob(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// The four stroke fields under the given key spellings.
pub struct CurveFields<'a> {
    pub points: &'a [f32],
    pub counts: &'a [i32],
    pub widths: &'a [f32],
    pub colors: &'a [i32],
}

impl CurveFields<'_> {
    pub fn record(&self, keys: [&str; 4]) -> PNode {
        dict(vec![
            ("$class", PNode::Uid(3)),
            (keys[0], PNode::Data(f32_blob(self.points))),
            (keys[1], PNode::Data(i32_blob(self.counts))),
            (keys[2], PNode::Data(f32_blob(self.widths))),
            (keys[3], PNode::Data(i32_blob(self.colors))),
        ])
    }
}

pub const LOWER_KEYS: [&str; 4] = ["curvespoints", "curvesnumpoints", "curveswidth", "curvescolors"];
pub const CAMEL_KEYS: [&str; 4] = ["curvesPoints", "curvesNumPoints", "curvesWidth", "curvesColors"];
pub const PASCAL_KEYS: [&str; 4] = ["CurvesPoints", "CurvesNumPoints", "CurvesWidth", "CurvesColors"];

/// A session plist shaped like a real note: the record sits behind a UID
/// inside a wrapper object.
pub fn session_plist(record: PNode) -> Vec<u8> {
    let archive = keyed_archive(
        vec![
            text("$null"),
            dict(vec![
                ("$class", PNode::Uid(3)),
                ("NoteName", text("Lecture 4")),
                ("SessionData", PNode::Uid(2)),
            ]),
            record,
            dict(vec![("$classname", text("NoteSession"))]),
        ],
        1,
    );
    encode_plist(&archive)
}

/// Builds an in-memory zip with deflated entries.
pub fn zip_of(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, data) in entries {
        writer.start_file(*name, options).expect("start zip entry");
        writer.write_all(data).expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

/// One curve from (10,10) to (20,20), width 1, color word 0.
pub fn single_curve_note() -> Vec<u8> {
    let fields = CurveFields {
        points: &[10.0, 10.0, 20.0, 20.0],
        counts: &[2],
        widths: &[1.0],
        colors: &[0],
    };
    let plist = session_plist(fields.record(LOWER_KEYS));
    zip_of(&[
        ("Lecture 4/metadata.plist", b"meta"),
        ("Lecture 4/Session.plist", &plist),
    ])
}

pub fn write_note(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, bytes).expect("write note file");
}
