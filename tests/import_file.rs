mod common;

use std::cell::Cell;
use std::io::{Read, Write};

use mdx_import::ir::Model;
use mdx_import::{
    import_file, FormatKind, ImportError, ImportSettings, ModelParser, ParseError,
};

/// Returns a canned model, or fails if the file doesn't start with "MDLX".
struct StubParser {
    calls: Cell<usize>,
    seen: Cell<Option<FormatKind>>,
}

impl StubParser {
    fn new() -> Self {
        Self {
            calls: Cell::new(0),
            seen: Cell::new(None),
        }
    }
}

impl ModelParser for StubParser {
    fn parse(&self, kind: FormatKind, reader: &mut dyn Read) -> Result<Model, ParseError> {
        self.calls.set(self.calls.get() + 1);
        self.seen.set(Some(kind));
        let mut magic = [0u8; 4];
        reader
            .read_exact(&mut magic)
            .map_err(|e| ParseError::new(format!("truncated header: {}", e)))?;
        if &magic != b"MDLX" {
            return Err(ParseError::new("bad magic"));
        }
        let mut model = common::model(vec![common::triangle(vec![0], 0)], &["a.blp"]);
        model.name.clear();
        Ok(model)
    }
}

fn write_file(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents).unwrap();
    path
}

#[test]
fn imports_a_parsed_file_named_after_its_stem() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "Grunt.MDX", b"MDLX....");
    let parser = StubParser::new();

    let output = import_file(&path, &parser, &ImportSettings::default()).unwrap();
    assert_eq!(output.name, "Grunt");
    assert_eq!(output.mesh.vertex_count(), 3);
    assert_eq!(parser.seen.get(), Some(FormatKind::Binary));
}

#[test]
fn unsupported_extension_never_reaches_the_parser() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "Grunt.fbx", b"MDLX");
    let parser = StubParser::new();

    let result = import_file(&path, &parser, &ImportSettings::default());
    assert!(matches!(result, Err(ImportError::UnsupportedFormat { .. })));
    assert_eq!(parser.calls.get(), 0);
}

#[test]
fn missing_file_is_a_file_access_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Missing.mdl");
    let parser = StubParser::new();

    match import_file(&path, &parser, &ImportSettings::default()) {
        Err(ImportError::FileAccess { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected file access error, got {:?}", other.map(|o| o.name)),
    }
    assert_eq!(parser.calls.get(), 0);
}

#[test]
fn parse_failure_produces_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "Broken.mdl", b"nope");
    let parser = StubParser::new();

    match import_file(&path, &parser, &ImportSettings::default()) {
        Err(ImportError::MalformedModel(message)) => {
            assert!(message.contains("bad magic"))
        }
        other => panic!("expected malformed model, got {:?}", other.map(|o| o.name)),
    }
    assert_eq!(parser.seen.get(), Some(FormatKind::Text));
}
