//! Error types for HAIR file operations.

use std::path::PathBuf;

use strand_curves::CurveSetError;
use thiserror::Error;

/// Errors that can occur while reading or writing HAIR files.
#[derive(Error, Debug)]
pub enum HairError {
    /// The file could not be opened.
    #[error("unable to open curve file '{path}': {source}")]
    Open {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// I/O error while reading or writing, including truncated input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The data does not start with the `HAIR` identifier.
    #[error("missing 'HAIR' identifier at beginning of file")]
    BadMagic,

    /// The descriptor does not announce a point array.
    #[error("missing points array")]
    MissingPoints,

    /// Curve boundaries or colors do not fit the node data.
    #[error("invalid curve layout: {0}")]
    InvalidCurves(#[from] CurveSetError),

    /// A curve's node count cannot be stored in the 16-bit segment field.
    #[error("curve {curve} has {nodes} nodes, which the segment count field cannot represent")]
    UnrepresentableCurve {
        /// Index of the offending curve.
        curve: usize,
        /// Its node count.
        nodes: usize,
    },

    /// Per-node transparency does not match the node count.
    #[error("{values} transparency values given for {nodes} nodes")]
    TransparencyCountMismatch {
        /// Number of transparency values.
        values: usize,
        /// Number of nodes.
        nodes: usize,
    },

    /// Wraps any parse failure with the file it came from.
    #[error("error while loading curves from '{path}': {source}")]
    InFile {
        /// Offending file.
        path: PathBuf,
        /// What went wrong.
        source: Box<HairError>,
    },
}

impl HairError {
    /// Attach the path of the file being read.
    pub(crate) fn in_file(self, path: impl Into<PathBuf>) -> Self {
        HairError::InFile {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

/// Result type for HAIR operations.
pub type Result<T> = std::result::Result<T, HairError>;
