//! The tools module provides helper functionality for the BZZ compressor.
//!
//! The tools are:
//! - cli: Command line interface for BZZ.
//!
pub mod cli;
