//! Error types for project decoding, encoding and editing.

use std::path::PathBuf;

use pbx_model::{Reference, SourceTree};
use pbx_plist::PlistError;
use thiserror::Error;

/// Errors that can occur when reading, writing or editing project files.
#[derive(Debug, Error)]
pub enum PbxError {
    /// The text parsed but does not have the shape of a project file.
    #[error("malformed project file: {message}")]
    MalformedFormat { message: String },

    /// The text does not parse as a property list.
    #[error("malformed project file: {0}")]
    Syntax(#[from] PlistError),

    /// A reference that an operation needed to follow is missing from the table.
    #[error("unresolvable reference: {reference}")]
    UnresolvableReference { reference: Reference },

    /// The path exists but is a directory.
    #[error("not a file: {path}")]
    NotAFile { path: PathBuf },

    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The target has no `PBXSourcesBuildPhase`.
    #[error("target {target} has no sources build phase")]
    NoSourcesPhase { target: Reference },

    #[error("{reference} is not a group")]
    NotAGroup { reference: Reference },

    #[error("{reference} is not a target")]
    NotATarget { reference: Reference },

    /// A group's full path could not be computed.
    #[error("cannot resolve the path of group {reference}")]
    UnresolvedGroupPath { reference: Reference },

    /// File paths can only be expressed relative to a group, the source root or as absolute paths.
    #[error("cannot express a file path relative to source tree {source_tree}")]
    UnsupportedSourceTree { source_tree: SourceTree },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PbxError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        PbxError::MalformedFormat {
            message: message.into(),
        }
    }

    /// Whether the input text was rejected, either by the syntax or by its shape.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            PbxError::MalformedFormat { .. } | PbxError::Syntax(_)
        )
    }
}

/// Result type for project operations.
pub type Result<T> = std::result::Result<T, PbxError>;
