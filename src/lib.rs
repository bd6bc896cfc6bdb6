//! Imports legacy MDX/MDL models into a skinned mesh, skeleton, animation
//! clips, material descriptors and scene markers in a right-handed Y-up
//! frame.
//!
//! Parsing is delegated to a [`ModelParser`]; everything after the
//! intermediate representation ([`ir::Model`]) happens here.

pub mod animation;
pub mod coords;
pub mod error;
pub mod file_formats;
pub mod geometry;
pub mod import;
pub mod ir;
pub mod markers;
pub mod materials;
pub mod parser;
pub mod settings;
pub mod skeleton;
pub mod skinning;

#[cfg(test)]
mod testing;

pub use error::{ImportError, ImportWarning, ParseError};
pub use import::{import_file, import_model, ImportContext, ImportOutput};
pub use parser::{FormatKind, ModelParser};
pub use settings::ImportSettings;
