//! Rust version of the BZZ general purpose compressor.
//!
//! Version 0.1.0
//!
//! Provides fast, safe compression and decompression of files using the BZZ
//! block-sorting format: a Burrows-Wheeler transform followed by a
//! frequency-ranked Move-To-Front recoding, entropy coded with an adaptive
//! binary arithmetic coder.
//!
//! Basic usage to compress a file is as follows:
//!
//! `$> bzz -z test.txt`
//!
//! This will compress the file and create the file test.txt.bzz.
//! The original file will be deleted unless -k is given.
//!
pub mod bwt;
pub mod compression;
pub mod tools;
pub mod zcoder;
