use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mkvdemux")]
#[command(author, version, about = "Matroska/WebM demuxer and track extractor")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Display the document header, segment information and tracks
    Info {
        /// File to read
        #[arg(required_unless_present = "stdin")]
        file: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Read a forward-only stream from standard input
        #[arg(long, conflicts_with = "file")]
        stdin: bool,
    },

    /// List packets, one line each
    Packets {
        /// File to read
        #[arg(required_unless_present = "stdin")]
        file: Option<PathBuf>,

        /// Stop after this many packets
        #[arg(short, long)]
        limit: Option<usize>,

        /// Read a forward-only stream from standard input
        #[arg(long, conflicts_with = "file")]
        stdin: bool,
    },

    /// Write each track to its own file
    Extract {
        /// File to read
        #[arg(required_unless_present = "stdin")]
        file: Option<PathBuf>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Track indices to extract, comma separated (default: all)
        #[arg(long, value_delimiter = ',')]
        tracks: Vec<usize>,

        /// Write packet data unchanged (no Annex-B or SRT conversion)
        #[arg(long)]
        raw: bool,

        /// Read a forward-only stream from standard input
        #[arg(long, conflicts_with = "file")]
        stdin: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
