//! File-level compression: feed input files through a `BzzWriter`.

use std::fs::{self, File};
use std::io::{self, Error};
use std::path::Path;

use log::{info, warn};

use super::writer::BzzWriter;
use crate::tools::cli::{BzOpts, Output};

/// Compress every input file named in opts (BzOpts).
pub fn compress(opts: &BzOpts) -> io::Result<()> {
    if opts.files.is_empty() {
        warn!("No input files given.");
        return Ok(());
    }
    for file in &opts.files {
        compress_file(opts, file)?;
    }
    Ok(())
}

/// Compress one file, writing `<name>.bzz` (or stdout).
fn compress_file(opts: &BzOpts, name: &str) -> io::Result<()> {
    let mut fin = File::open(name)?;
    let in_size = fs::metadata(name)?.len();

    let out_name = format!("{}.bzz", name);
    let sink: Box<dyn io::Write> = match opts.output {
        Output::Stdout => Box::new(io::stdout()),
        Output::File => {
            if Path::new(&out_name).exists() && !opts.force_overwrite {
                return Err(Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("{} exists; use --force to overwrite", out_name),
                ));
            }
            Box::new(File::create(&out_name)?)
        }
    };

    let mut bzz = BzzWriter::new(sink, opts.block_size);
    io::copy(&mut fin, &mut bzz)?;
    bzz.finish()?;

    if let Output::File = opts.output {
        let out_size = fs::metadata(&out_name)?.len();
        info!(
            "Compressed {} from {} to {} bytes ({:.1}%).",
            name,
            in_size,
            out_size,
            out_size as f64 * 100.0 / in_size.max(1) as f64
        );
        if !opts.keep_input_files {
            fs::remove_file(name)?;
        }
    }
    Ok(())
}
