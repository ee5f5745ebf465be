use clap::{Args, Subcommand};
use std::path::PathBuf;

use binstream_codec::DEFAULT_MAX_LENGTH;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod dump;
pub mod info;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a file against a field layout.
    Dump(DumpArgs),
    /// Show the size and open mode of a file.
    Info(InfoArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Dump(args) => dump::run(args, format),
        Command::Info(args) => info::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DumpArgs {
    /// File to decode.
    pub path: PathBuf,
    /// Comma-separated field types, e.g. `u32,text,seq<f64>`.
    #[arg(long, short = 'l')]
    pub layout: String,
    /// Byte offset to start decoding at.
    #[arg(long, default_value_t = 0)]
    pub offset: u64,
    /// Decode the layout repeatedly until the end of the file.
    #[arg(long)]
    pub repeat: bool,
    /// Largest accepted text or buffer length.
    #[arg(long, default_value_t = DEFAULT_MAX_LENGTH)]
    pub max_length: usize,
    /// Buffer size for `cstr` fields, terminator included.
    #[arg(long, default_value_t = 256)]
    pub cstr_capacity: usize,
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// File to inspect.
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
