//! lzma2-tool - compress and decompress files through the native lzma2 library

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use lzma2_bridge::{ensure_library, BootstrapConfig, BootstrapOutcome, CargoToolchain};

mod cli;
use cli::{Cli, Commands};

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(if verbose { LevelFilter::Debug } else { LevelFilter::Info });
    // RUST_LOG still wins when set
    builder.parse_default_env();
    builder.format(|buf, record| {
        use std::io::Write;
        writeln!(buf, "[{}] {}", record.level(), record.args())
    });
    builder.init();
}

fn bootstrap_config(cli: &Cli) -> BootstrapConfig {
    let mut config = BootstrapConfig::from_env();
    if let Some(dir) = &cli.runtime_dir {
        config = config.with_runtime_dir(dir);
    }
    if let Some(root) = &cli.project_root {
        config = config.with_project_root(root);
    }
    config
}

fn print_stats(input: &Path, output: &Path, before: usize, after: usize) {
    let ratio = if before > 0 {
        (after as f64 / before as f64) * 100.0
    } else {
        0.0
    };
    println!("{} -> {}", input.display(), output.display());
    println!("  Input size: {} bytes", before);
    println!("  Output size: {} bytes", after);
    println!("  Ratio: {:.2}%", ratio);
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = bootstrap_config(&cli);

    match &cli.command {
        Commands::Bootstrap => {
            match ensure_library(&config, &CargoToolchain::default())? {
                BootstrapOutcome::AlreadyPresent(path) => {
                    println!("Native library already present: {}", path.display())
                }
                BootstrapOutcome::Built(path) => {
                    println!("Native library built and installed: {}", path.display())
                }
            }
            Ok(())
        }

        Commands::Compress { input, output } => {
            let codec = lzma2_bridge::init(&config).context("Failed to initialize native lzma2 library")?;
            let data = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
            let compressed = codec.compress(&data)?;
            fs::write(output, &compressed).with_context(|| format!("Failed to write {}", output.display()))?;
            print_stats(input, output, data.len(), compressed.len());
            Ok(())
        }

        Commands::Decompress { input, output } => {
            let codec = lzma2_bridge::init(&config).context("Failed to initialize native lzma2 library")?;
            let data = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
            let decompressed = codec.decompress(&data)?;
            fs::write(output, &decompressed).with_context(|| format!("Failed to write {}", output.display()))?;
            print_stats(input, output, data.len(), decompressed.len());
            Ok(())
        }
    }
}
