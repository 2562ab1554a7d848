use chunksum_core::Algorithm;
use chunksum_core::error::Result;
use chunksum_core::size::{check_alignment, parse_size};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

fn parse_chunk_size(s: &str) -> Result<u64> {
    check_alignment(parse_size(s)?)
}

fn parse_buffer_size(s: &str) -> Result<usize> {
    let n = parse_size(s)?;
    usize::try_from(n).map_err(|_| {
        chunksum_core::ChunksumError::InvalidConfiguration(format!("buffer size too large: {s}"))
    })
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `<digest> <path>#<chunk> 0x<length>+<offset>`
    Line,
    /// One JSON object per chunk
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Hash files by chunks in parallel", long_about = None)]
pub struct Cli {
    /// Increase the verbose level (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Number of chunks hashed at the same time
    #[arg(long, default_value_t = 4)]
    pub threads: usize,

    /// Digest algorithm (see --list-algorithms)
    #[arg(long, default_value = "sha1", value_parser = parse_algorithm)]
    pub algorithm: Algorithm,

    /// Chunk size, e.g. 64k, 512M, 4G; a multiple of 64 KiB
    #[arg(long, default_value = "4G", value_parser = parse_chunk_size)]
    pub chunksize: u64,

    /// Read increment per worker
    #[arg(long = "buffer-size", default_value = "32M", value_parser = parse_buffer_size)]
    pub buffer_size: usize,

    #[arg(long, value_enum, default_value_t = OutputFormat::Line)]
    pub format: OutputFormat,

    /// Keep hashing the remaining chunks after a chunk fails
    #[arg(long)]
    pub keep_going: bool,

    /// Print a summary line to stderr at the end of the run
    #[arg(long)]
    pub stats: bool,

    /// Print supported algorithm names and exit
    #[arg(long)]
    pub list_algorithms: bool,

    #[arg(required_unless_present = "list_algorithms")]
    pub inputs: Vec<PathBuf>,
}

fn parse_algorithm(s: &str) -> Result<Algorithm> {
    s.parse()
}
