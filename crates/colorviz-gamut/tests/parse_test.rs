//! Loading gamut files from disk.

use colorviz_color::lab_to_rgb;
use colorviz_gamut::{
    GamutMesh, IdGenerator, LoadOptions, ParseError, ParseMode, parse_gamut, save_gamut,
};
use colorviz_math::{Illuminant, Vec3};
use std::io::Write;
use tempfile::NamedTempFile;

fn gamut_file(text: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".gam")
        .tempfile()
        .unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const TRIANGLE: &str = "\
DESCRIPTOR \"Test gamut\"
ORIGINATOR \"colorviz\"
COLOR_REP LAB

GAMUT_WHITE 100 0 0
CUSP_RED 54.3 80.8 69.9
BEGIN_DATA
0 0 0 0

1 100 0 0
2 50 40 20
END_DATA
BEGIN_DATA
0 1 2
END_DATA
";

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_load_minimal_file() {
    let file = gamut_file(TRIANGLE);
    let mut ids = IdGenerator::new();
    let options = LoadOptions {
        illuminant: Illuminant::D50,
        ..Default::default()
    };
    let mesh = GamutMesh::load(file.path(), &options, &mut ids).unwrap();

    assert_eq!(mesh.vertices().len(), 3);
    assert_eq!(mesh.triangles(), &[[0, 1, 2]]);
    assert_eq!(mesh.colors().len(), mesh.vertices().len());
    for (lab, rgb) in mesh.vertices().iter().zip(mesh.colors()) {
        assert_eq!(*rgb, lab_to_rgb(*lab, Illuminant::D50));
    }

    let bounds = mesh.bounds();
    assert_eq!(bounds.min, Vec3::new(0.0, 0.0, 0.0));
    assert_eq!(bounds.max, Vec3::new(100.0, 40.0, 20.0));
    assert!(mesh.active);
    assert!(!mesh.wireframe);
}

#[test]
fn test_header_metadata() {
    let file = gamut_file(TRIANGLE);
    let data = parse_gamut(file.path(), ParseMode::Strict).unwrap();
    let header = &data.header;
    assert_eq!(header.descriptor.as_deref(), Some("Test gamut"));
    assert_eq!(header.originator.as_deref(), Some("colorviz"));
    assert_eq!(header.color_rep.as_deref(), Some("LAB"));
    assert_eq!(header.gamut_white, Some(Vec3::new(100.0, 0.0, 0.0)));
    assert_eq!(header.cusps.len(), 1);
    assert_eq!(header.cusps[0].0, "CUSP_RED");
}

#[test]
fn test_label_is_file_stem() {
    let file = gamut_file(TRIANGLE);
    let stem = file.path().file_stem().unwrap().to_string_lossy().into_owned();
    let mut ids = IdGenerator::new();
    let mesh = GamutMesh::load(file.path(), &LoadOptions::default(), &mut ids).unwrap();
    assert_eq!(mesh.label(), stem);
}

#[test]
fn test_missing_begin_data_is_empty() {
    let file = gamut_file("DESCRIPTOR \"nothing\"\n0 1 2 3\n");
    let mut ids = IdGenerator::new();
    let mesh = GamutMesh::load(file.path(), &LoadOptions::default(), &mut ids).unwrap();
    assert!(mesh.is_empty());
    assert!(mesh.vertices().is_empty());
    assert!(mesh.triangles().is_empty());
    assert!(mesh.bounds().is_empty());
}

#[test]
fn test_index_out_of_range() {
    let text = "BEGIN_DATA\n0 0 0 0\n1 1 0 0\nEND_DATA\nBEGIN_DATA\n0 1 5\nEND_DATA\n";
    let file = gamut_file(text);
    let err = parse_gamut(file.path(), ParseMode::Lenient).unwrap_err();
    match err {
        ParseError::IndexOutOfRange {
            line,
            index,
            vertex_count,
        } => {
            assert_eq!(line, 6);
            assert_eq!(index, 5);
            assert_eq!(vertex_count, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_lenient_nan_vertex() {
    let text = "BEGIN_DATA\n0 50 abc 0\nEND_DATA\n";
    let file = gamut_file(text);
    let data = parse_gamut(file.path(), ParseMode::Lenient).unwrap();
    assert_eq!(data.vertices.len(), 1);
    assert!(data.vertices[0].y.is_nan());

    let err = parse_gamut(file.path(), ParseMode::Strict).unwrap_err();
    assert!(matches!(err, ParseError::InvalidNumber { line: 2, .. }));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.gam");
    let err = parse_gamut(&path, ParseMode::Lenient).unwrap_err();
    assert!(matches!(err, ParseError::Io { .. }));
    assert!(err.to_string().contains("absent.gam"));
}

// ============================================================================
// Writing
// ============================================================================

#[test]
fn test_save_and_reload() {
    let file = gamut_file(TRIANGLE);
    let mut ids = IdGenerator::new();
    let mesh = GamutMesh::load(file.path(), &LoadOptions::default(), &mut ids).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("copy.gam");
    save_gamut(&out, &mesh.to_data()).unwrap();

    let copy = GamutMesh::load(&out, &LoadOptions::default(), &mut ids).unwrap();
    assert_ne!(copy.id(), mesh.id());
    assert_eq!(copy.label(), "copy");
    assert_eq!(copy.vertices(), mesh.vertices());
    assert_eq!(copy.triangles(), mesh.triangles());
    assert_eq!(copy.header(), mesh.header());
}
