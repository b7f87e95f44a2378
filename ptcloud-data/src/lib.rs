//! Ptcloud Data Crate
//!
//! Decoding of binary little-endian PLY point clouds into index-aligned
//! position, normal and color arrays, with stride decimation to keep large
//! files within a vertex budget. This crate is renderer-agnostic.

pub mod cursor;
pub mod error;
pub mod mesh;
pub mod ply;

pub use cursor::ByteCursor;
pub use error::{LoadError, PlyError};
pub use mesh::{MeshData, MeshVertex, PLACEHOLDER_NORMAL};
pub use ply::{DEFAULT_VERTEX_BUDGET, DecodeStats, Decoded, Decoder, HeaderLayout, load};
