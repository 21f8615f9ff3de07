//! Command line interpretation - uses the external CLAP crate.

use std::fmt::{Display, Formatter};

use clap::Parser;
use log::LevelFilter;

/// Zip or Unzip
#[derive(Debug)]
pub enum Mode {
    Zip,
    Unzip,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Define the two output channels
#[derive(Debug)]
pub enum Output {
    File,
    Stdout,
}
impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Defines all user settable options to control program behavior
#[derive(Debug)]
pub struct BzOpts {
    /// Names of files to read for input
    pub files: Vec<String>,
    /// Maximum input block size in bytes to process during each loop
    pub block_size: usize,
    /// Compress/Decompress
    pub op_mode: Mode,
    /// Don't remove input files after processing
    pub keep_input_files: bool,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Location where output is sent
    pub output: Output,
    /// Verbosity of user information
    pub log_level: LevelFilter,
}

#[derive(Parser, Debug)]
#[clap(
    version,
    about = "bzz, a block-sorting file compressor.",
    long_about = None)]
struct Args {
    /// Filenames of files to process
    #[clap()]
    files: Vec<String>,

    /// Perform compression on the input files (the default)
    #[clap(short = 'z', long = "compress")]
    compress: bool,

    /// Perform decompression on the input files
    #[clap(short = 'd', long = "decompress")]
    decompress: bool,

    /// Force overwriting of output files
    #[clap(short = 'f', long = "force")]
    force: bool,

    /// Keep input files
    #[clap(short = 'k', long = "keep")]
    keep: bool,

    /// Send output to the terminal
    #[clap(short = 'c', long = "stdout")]
    stdout: bool,

    /// Block size in KiB, 1..=4096. Bigger blocks compress better but slower
    #[clap(short = 'b', long = "block-size", default_value_t = 1024)]
    block_size: usize,

    /// Sets verbosity. -v 1 shows very little, -v 5 is chatty
    #[clap(short = 'v', default_value_t = 3)]
    v: u8,
}

/// Parse the command line into our internal options structure.
pub fn bzopts_init() -> BzOpts {
    let args = Args::parse();

    // Compression wins if both flags are given.
    let op_mode = if args.decompress && !args.compress {
        Mode::Unzip
    } else {
        Mode::Zip
    };
    let output = if args.stdout {
        Output::Stdout
    } else {
        Output::File
    };
    let log_level = match args.v {
        0 => LevelFilter::Off,
        1 => LevelFilter::Error,
        2 => LevelFilter::Warn,
        3 => LevelFilter::Info,
        4 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    BzOpts {
        files: args.files,
        block_size: args.block_size.clamp(1, 4096) * 1024,
        op_mode,
        keep_input_files: args.keep,
        force_overwrite: args.force,
        output,
        log_level,
    }
}
