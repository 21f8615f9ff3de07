//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

use bzz::compression::compress::compress;
use bzz::compression::decompress::decompress;
use bzz::tools::cli::{bzopts_init, Mode};

use log::info;
use simplelog::{Config, TermLogger, TerminalMode};
use tikv_jemallocator::Jemalloc;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

fn main() -> Result<(), std::io::Error> {
    let options = bzopts_init();

    // Available log levels are Error, Warn, Info, Debug, Trace
    TermLogger::init(
        options.log_level,
        Config::default(),
        TerminalMode::Stdout,
        simplelog::ColorChoice::AlwaysAnsi,
    )
    .unwrap();

    //----- Figure out what we need to do and go do it
    let result = match options.op_mode {
        Mode::Zip => compress(&options),
        Mode::Unzip => decompress(&options),
    };

    info!("Done.\n");
    result
}
