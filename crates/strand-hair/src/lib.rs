#![warn(missing_docs)]

//! Reader and writer for HAIR curve files.
//!
//! HAIR is a compact little-endian format: a 128-byte header followed by
//! per-curve segment counts and per-node positions, thickness,
//! transparency and colors. Loading produces a [`CurveSet`](strand_curves::CurveSet)
//! ready for placement and ray tracing. Transparency is read past and
//! discarded.

pub mod error;
pub mod format;
mod reader;
mod writer;

pub use error::{HairError, Result};
pub use format::{Descriptor, HairHeader};
pub use reader::{read_hair, read_hair_from, read_hair_from_buffer, HairFile};
pub use writer::{write_hair, write_hair_file, HairWriteOptions};
