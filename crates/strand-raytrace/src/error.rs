//! Error types for the ray tracing layer.

use strand_hair::HairError;
use thiserror::Error;

/// Errors raised while managing traceable curve sets.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Loading or reloading curve data failed.
    #[error("failed to load curves: {0}")]
    Load(#[from] HairError),
}

/// Result type for ray tracing operations.
pub type Result<T> = std::result::Result<T, RenderError>;
