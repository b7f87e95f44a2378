//! Binary PLY point-cloud decoding.
//!
//! Decoding runs in two phases over one in-memory source: the header
//! tokenizer discovers the vertex record layout, then the body decoder reads
//! one vertex per decimation stride until the output mesh is full.

mod body;
mod decoder;
mod header;
mod layout;

pub use decoder::{DEFAULT_VERTEX_BUDGET, DecodeStats, Decoded, Decoder, load};
pub use header::HeaderLine;
pub use layout::{HeaderLayout, NORMAL_AXES, RGB_CHANNELS, RGBA_CHANNELS};
