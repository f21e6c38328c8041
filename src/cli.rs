//! Command-line interface for lzma2-tool

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lzma2-tool")]
#[command(about = "LZMA2 compression through the native lzma2 library", long_about = None)]
pub struct Cli {
    /// Directory holding the native library (default: bin, or LZMA2_RUNTIME_DIR)
    #[arg(long, global = true)]
    pub runtime_dir: Option<PathBuf>,

    /// Cargo project that builds the native library (default: workspace root, or LZMA2_PROJECT_ROOT)
    #[arg(long, global = true)]
    pub project_root: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build and install the native library if it is missing
    Bootstrap,

    /// Compress a file
    Compress {
        /// Input file
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Decompress a file
    Decompress {
        /// Input file
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}
