use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{ImportError, ParseError, Result};
use crate::ir::Model;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    /// `.mdx`
    Binary,
    /// `.mdl`
    Text,
}

impl FormatKind {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match extension.as_deref() {
            Some("mdx") => Ok(FormatKind::Binary),
            Some("mdl") => Ok(FormatKind::Text),
            _ => Err(ImportError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Reads a model file into the intermediate representation. Implemented by
/// the format library; the import core never looks at raw bytes.
pub trait ModelParser {
    fn parse(
        &self,
        kind: FormatKind,
        reader: &mut dyn Read,
    ) -> std::result::Result<Model, ParseError>;
}

/// Checks the extension, then parses the file. The file handle is closed
/// before this returns, and a parse failure is an error rather than an empty
/// model.
pub fn read_model(path: &Path, parser: &dyn ModelParser) -> Result<Model> {
    let kind = FormatKind::from_path(path)?;
    let file = File::open(path).map_err(|source| ImportError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    let mut model = parser.parse(kind, &mut reader)?;
    if model.name.is_empty() {
        model.name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    Ok(model)
}
