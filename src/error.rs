use std::path::PathBuf;

use thiserror::Error;

/// Fatal import failures. Any of these aborts the whole import; no partial
/// output is handed back.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("cannot read {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported model format: {path} (expected .mdx or .mdl)")]
    UnsupportedFormat { path: PathBuf },

    #[error("malformed model: {0}")]
    MalformedModel(String),

    #[error("model has no bones or helpers")]
    EmptyModel,

    #[error("vertex group {group} of geoset {geoset} references {count} matrices (at most 4 are supported)")]
    SkinningOverflow {
        geoset: usize,
        group: usize,
        count: usize,
    },

    #[error("geoset {geoset} is skinned to node {node}, which is not a bone or helper")]
    UnknownBone { geoset: usize, node: u32 },

    #[error("invalid import settings: {0}")]
    InvalidSettings(String),
}

impl From<ParseError> for ImportError {
    fn from(e: ParseError) -> Self {
        ImportError::MalformedModel(e.to_string())
    }
}

/// Error reported by an external model parser.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;

/// Non-fatal anomalies. They are logged as they happen and handed back with
/// the import output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportWarning {
    #[error("node {node} ({name}) has parent {parent}, which is not part of the skeleton; attached to root")]
    UnresolvedParent { node: u32, name: String, parent: u32 },
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<ImportWarning>,
}

impl Diagnostics {
    pub fn warn(&mut self, warning: ImportWarning) {
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[ImportWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<ImportWarning> {
        self.warnings
    }
}
