//! The compression module manages both directions of the BZZ codec.
//!
//! BZZ compression happens in the following steps:
//! - Burrows-Wheeler Transform: sort the block's rotations so that repeated
//!   contexts cluster, and emit the last matrix column plus a marker row.
//! - Move To Front transform: recode the column as ranks in a self-reordering
//!   alphabet, so local repetition becomes runs of small ranks.
//! - Arithmetic coding: code each rank with adaptive binary contexts.
//!
//! Decompression is the inverse, driven lazily by a pull-based reader: decode
//! the rank stream back into the column, then walk the column backward from
//! the marker to rebuild the block.
//!
//! Corrupt input never raises an error on the decode side. Damage is detected
//! per block (bad size header, bad marker, or a reconstruction walk that
//! misses the marker) and reported as a clean end of stream.

pub mod compress;
pub mod decompress;
pub mod mtf;
pub mod reader;
pub mod writer;

/// Smallest configurable block size in bytes.
pub const MIN_BLOCK: usize = 10;

/// Largest legal block size in bytes; headers above this are corrupt.
pub const MAX_BLOCK: usize = 4096 * 1024;
