//! The zcoder module is the entropy coding subsystem for the Rust version of BZZ.
//!
//! BZZ models every coded decision as a single binary choice. Most choices are
//! coded against an adaptive probability state (a context); a few header fields
//! are coded as raw "pass-through" bits with no model at all.
//!
//! The coder is a carry-less 32-bit binary range coder. The encoder and decoder
//! here are exact mirrors of each other: any sequence of (contexted, pass-through,
//! raw integer) operations performed on a `ZEncoder` decodes bit-for-bit with the
//! same sequence on a `ZDecoder`, provided the caller supplies the same context
//! slots in the same order.
//!
pub mod context;
pub mod decoder;
pub mod encoder;

pub use context::BitContext;
pub use decoder::ZDecoder;
pub use encoder::ZEncoder;
