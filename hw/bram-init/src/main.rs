// Licensed under the Apache-2.0 license

//! BRAM initialization tool
//!
//! Writes an Intel HEX file with one 16-bit data record per BRAM address and
//! a trailing end-of-file record. With no arguments it produces
//! `bram_init.hex` holding 65536 records of the 9-bit address pattern.
//!
//! # Examples
//!
//! ```bash
//! bram-init --output build/bram.hex --depth 0x4000 --pattern address:12
//! bram-init --config bram.toml --verbose
//! ```

use anyhow::{Context, Result};
use bram_init::{BramInitConfig, BuiltinPattern, PartialConfig};
use clap::Parser;
use clap_num::maybe_hex;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about = "Generates an Intel HEX file to initialize FPGA block RAM", long_about = None)]
struct Cli {
    /// Output HEX file [default: bram_init.hex]
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Number of data records, one per address [default: 65536]
    #[arg(short, long, value_parser = maybe_hex::<u32>)]
    depth: Option<u32>,

    /// Data pattern: address9, address:<bits>, constant:<word> or zero [default: address9]
    #[arg(short, long)]
    pattern: Option<BuiltinPattern>,

    /// Wrap addresses past 0xFFFF instead of failing
    #[arg(long, default_value_t = false)]
    wrap: bool,

    /// TOML file with settings; command line flags take precedence
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> PartialConfig {
        PartialConfig {
            output: self.output.clone(),
            depth: self.depth,
            pattern: self.pattern,
            wrap: self.wrap.then_some(true),
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    SimpleLogger::new()
        .with_level(level)
        .init()
        .context("Failed to initialize logger")?;

    let mut config = BramInitConfig::default();
    if let Some(path) = &cli.config {
        config.apply(PartialConfig::load(path)?);
    }
    config.apply(cli.overrides());
    log::debug!("Resolved config: {:?}", config);

    bram_init::generate_from_config(&config)
        .with_context(|| format!("Failed to generate {}", config.output.display()))?;
    println!(
        "Intel HEX file '{}' generated successfully!",
        config.output.display()
    );
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    run(&cli).unwrap_or_else(|e| {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    });
}
