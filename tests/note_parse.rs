//! End-to-end parsing of in-memory `.note` archives.

mod common;

use common::*;
use notesketch::ir::{CurvePoint, Rgba};
use notesketch::note::{parse_note_bytes, parse_session_plist, read_note_file};
use notesketch::{ErrorKind, NoteError};

#[test]
fn single_curve_note_parses() {
    let document = parse_note_bytes(&single_curve_note()).expect("parse note");

    assert_eq!(document.curves.len(), 1);
    let curve = &document.curves[0];
    assert_eq!(
        curve.points,
        vec![CurvePoint::new(10.0, 10.0), CurvePoint::new(20.0, 20.0)]
    );
    assert_eq!(curve.width, 1.0);
    assert_eq!(curve.color, Rgba::BLACK);
    assert!(document.width >= 800.0);
    assert!(document.height >= 1000.0);
}

#[test]
fn multiple_curves_share_one_point_cursor() {
    let fields = CurveFields {
        points: &[0.0, 0.0, 5.0, 5.0, 10.0, 0.0, 1.0, 1.0, 2.0, 2.0],
        counts: &[3, 2],
        widths: &[2.5, 4.0],
        colors: &[0xFF00_00FFu32 as i32, 0x8000_FF00u32 as i32],
    };
    let plist = session_plist(fields.record(LOWER_KEYS));
    let document = parse_session_plist(&plist).expect("parse plist");

    assert_eq!(document.curves.len(), 2);
    assert_eq!(document.curves[0].points.len(), 3);
    assert_eq!(document.curves[1].points[0], CurvePoint::new(1.0, 1.0));
    assert_eq!(document.curves[0].width, 2.5);
    assert_eq!(document.curves[0].color, Rgba::new(255, 0, 0, 1.0));
    assert_eq!(document.curves[1].color.g, 255);
    assert!((document.curves[1].color.a - 128.0 / 255.0).abs() < 1e-12);
}

#[test]
fn key_casings_are_accepted() {
    let fields = CurveFields {
        points: &[1.0, 2.0, 3.0, 4.0],
        counts: &[2],
        widths: &[3.0],
        colors: &[0],
    };
    for keys in [LOWER_KEYS, CAMEL_KEYS, PASCAL_KEYS] {
        let plist = session_plist(fields.record(keys));
        let document = parse_session_plist(&plist)
            .unwrap_or_else(|err| panic!("{keys:?} failed: {err}"));
        assert_eq!(document.curves.len(), 1, "{keys:?}");
        assert_eq!(document.curves[0].width, 3.0, "{keys:?}");
    }
}

#[test]
fn missing_widths_and_colors_use_defaults() {
    let record = dict(vec![
        ("curvespoints", PNode::Data(f32_blob(&[0.0, 0.0, 8.0, 8.0]))),
        ("curvesnumpoints", PNode::Data(i32_blob(&[2]))),
    ]);
    let document = parse_session_plist(&session_plist(record)).expect("parse plist");

    assert_eq!(document.curves[0].width, notesketch::ir::DEFAULT_STROKE_WIDTH);
    assert_eq!(document.curves[0].color, Rgba::BLACK);
}

#[test]
fn record_with_thousands_of_extra_keys_parses() {
    let fields = CurveFields {
        points: &[0.0, 0.0, 4.0, 4.0],
        counts: &[2],
        widths: &[1.0],
        colors: &[0],
    };
    let PNode::Dict(fields) = fields.record(CAMEL_KEYS) else {
        unreachable!("record is a dictionary");
    };
    let mut entries: Vec<(String, PNode)> = (0..30_000)
        .map(|i| (format!("attr{i:05}"), PNode::Bool(i % 2 == 0)))
        .collect();
    entries.extend(fields);

    let document = parse_session_plist(&session_plist(PNode::Dict(entries))).expect("parse plist");

    assert_eq!(document.curves.len(), 1);
    assert_eq!(document.curves[0].points[1], CurvePoint::new(4.0, 4.0));
}

#[test]
fn large_coordinates_grow_the_canvas() {
    let fields = CurveFields {
        points: &[100.0, 100.0, 1200.0, 1500.0],
        counts: &[2],
        widths: &[1.0],
        colors: &[0],
    };
    let document = parse_session_plist(&session_plist(fields.record(LOWER_KEYS))).unwrap();

    assert_eq!(document.width, 1250.0);
    assert_eq!(document.height, 1550.0);
}

#[test]
fn archive_without_session_entry_lists_entries() {
    let bytes = zip_of(&[("thumb.png", b"png"), ("meta.json", b"{}")]);
    let err = parse_note_bytes(&bytes).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MissingEntry);
    let message = err.to_string();
    assert!(message.contains("thumb.png"), "{message}");
    assert!(message.contains("meta.json"), "{message}");
}

#[test]
fn plist_without_curve_record_is_no_curve_data() {
    let plist = encode_plist(&keyed_archive(
        vec![text("$null"), dict(vec![("NoteName", text("empty"))])],
        1,
    ));
    let bytes = zip_of(&[("Session.plist", &plist)]);

    let err = parse_note_bytes(&bytes).unwrap_err();
    assert!(matches!(err, NoteError::NoCurveData), "{err:?}");
}

#[test]
fn record_with_only_invalid_counts_is_no_curve_data() {
    let fields = CurveFields {
        points: &[1.0, 1.0, 2.0, 2.0],
        counts: &[0, -3],
        widths: &[],
        colors: &[],
    };
    let err = parse_session_plist(&session_plist(fields.record(LOWER_KEYS))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoCurveData);
}

#[test]
fn garbage_session_entry_is_bad_magic() {
    let bytes = zip_of(&[("session.plist", b"<?xml version=\"1.0\"?><plist/>")]);
    let err = parse_note_bytes(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadMagic);
}

#[test]
fn corrupt_trailer_is_reported() {
    let mut plist = session_plist(
        CurveFields {
            points: &[1.0, 1.0, 2.0, 2.0],
            counts: &[2],
            widths: &[1.0],
            colors: &[0],
        }
        .record(LOWER_KEYS),
    );
    let len = plist.len();
    plist[len - 8..].copy_from_slice(&u64::MAX.to_be_bytes());

    let err = parse_session_plist(&plist).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTrailer);
}

#[test]
fn object_data_cut_short_is_truncated() {
    // A blob claiming 100 bytes that holds 10, then a valid table.
    let mut blob = vec![0x4F, 0x10, 100];
    blob.extend_from_slice(&[0; 10]);
    let mut bytes = b"bplist00".to_vec();
    bytes.extend_from_slice(&blob);
    let table = bytes.len();
    bytes.push(8);
    bytes.extend_from_slice(&[0; 6]);
    bytes.extend_from_slice(&[1, 1]);
    bytes.extend_from_slice(&1u64.to_be_bytes());
    bytes.extend_from_slice(&0u64.to_be_bytes());
    bytes.extend_from_slice(&(table as u64).to_be_bytes());

    let err = parse_session_plist(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Truncated);
}

#[test]
fn not_a_zip_is_archive_error() {
    let err = parse_note_bytes(b"bplist00 but not zipped").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Archive);
}

#[test]
fn reads_note_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/Lecture.note");
    write_note(&path, &single_curve_note());

    let document = read_note_file(&path).expect("read note");
    assert_eq!(document.curves.len(), 1);

    let err = read_note_file(&dir.path().join("missing.note")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}
