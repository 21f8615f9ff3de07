//! File-level decompression: drain a `BzzReader` into the output file.

use std::fs::{self, File};
use std::io::{self, Error};
use std::path::Path;

use log::{info, warn};

use super::reader::BzzReader;
use crate::tools::cli::{BzOpts, Output};

/// Decompress every input file named in opts (BzOpts).
pub fn decompress(opts: &BzOpts) -> io::Result<()> {
    if opts.files.is_empty() {
        warn!("No input files given.");
        return Ok(());
    }
    for file in &opts.files {
        decompress_file(opts, file)?;
    }
    Ok(())
}

/// Decompress one `.bzz` file, restoring the original name (or stdout).
fn decompress_file(opts: &BzOpts, name: &str) -> io::Result<()> {
    let out_name = match name.strip_suffix(".bzz") {
        Some(stem) => stem.to_string(),
        None => {
            warn!("{} has no .bzz suffix; writing {}.out.", name, name);
            format!("{}.out", name)
        }
    };

    let mut reader = BzzReader::new(File::open(name)?)?;

    match opts.output {
        Output::Stdout => {
            io::copy(&mut reader, &mut io::stdout())?;
        }
        Output::File => {
            if Path::new(&out_name).exists() && !opts.force_overwrite {
                return Err(Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("{} exists; use --force to overwrite", out_name),
                ));
            }
            let mut f_out = File::create(&out_name)?;
            io::copy(&mut reader, &mut f_out)?;
            info!("Decompressed {} to {} bytes.", name, reader.tell());
            if !opts.keep_input_files {
                fs::remove_file(name)?;
            }
        }
    }
    Ok(())
}
