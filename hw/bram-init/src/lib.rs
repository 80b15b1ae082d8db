// Licensed under the Apache-2.0 license

//! Generates Intel HEX files used to initialize FPGA block RAM.
//!
//! One data record is emitted per BRAM address, followed by the end-of-file
//! record.

mod config;
mod pattern;

pub use config::{BramInitConfig, PartialConfig, DEFAULT_DEPTH, DEFAULT_OUTPUT};
pub use pattern::{BuiltinPattern, Pattern};

use intel_hex::{RecordType, END_OF_FILE_RECORD};
use log::{info, warn};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Number of addresses a record can reach without extended address records.
pub const ADDRESS_SPACE: u32 = 0x1_0000;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Depth {depth} exceeds the 16-bit address space of {} records", ADDRESS_SPACE)]
    AddressOverflow { depth: u32 },
    #[error(transparent)]
    Record(#[from] intel_hex::Error),
    #[error("Invalid pattern: {0}")]
    Pattern(String),
    #[error("Invalid config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// What to do with addresses past 0xFFFF.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AddressPolicy {
    #[default]
    Reject,
    /// Mask addresses to 16 bits, so later records reuse earlier addresses.
    Wrap,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GenerateReport {
    pub data_records: u32,
    pub bytes_written: u64,
}

fn check_depth(depth: u32, policy: AddressPolicy) -> Result<()> {
    if depth > ADDRESS_SPACE && policy == AddressPolicy::Reject {
        return Err(Error::AddressOverflow { depth });
    }
    Ok(())
}

/// Writes `depth` data records followed by the end-of-file record.
pub fn write_hex<W: Write, P: Pattern + ?Sized>(
    out: &mut W,
    depth: u32,
    pattern: &P,
    policy: AddressPolicy,
) -> Result<GenerateReport> {
    check_depth(depth, policy)?;
    if depth > ADDRESS_SPACE {
        warn!(
            "Depth {} exceeds 0x{:x}; addresses will wrap around",
            depth, ADDRESS_SPACE
        );
    }

    let mut report = GenerateReport::default();
    for addr in 0..depth {
        let data = pattern.data(addr);
        let byte_count = u8::try_from(data.len()).map_err(|_| {
            intel_hex::Error::InvalidRecord(format!(
                "pattern produced {} bytes at address 0x{addr:x}",
                data.len()
            ))
        })?;
        let line = intel_hex::encode(
            byte_count,
            (addr & 0xFFFF) as u16,
            RecordType::Data as u8,
            &data,
        )?;
        out.write_all(line.as_bytes())?;
        report.data_records += 1;
        report.bytes_written += line.len() as u64;
    }

    writeln!(out, "{END_OF_FILE_RECORD}")?;
    report.bytes_written += END_OF_FILE_RECORD.len() as u64 + 1;
    Ok(report)
}

/// Creates `path` and fills it with the records produced by [`write_hex`].
///
/// The depth is checked before the file is created.
pub fn generate<P: Pattern + ?Sized>(
    path: &Path,
    depth: u32,
    pattern: &P,
    policy: AddressPolicy,
) -> Result<GenerateReport> {
    check_depth(depth, policy)?;
    info!("Writing {} records to {}", depth, path.display());

    let mut out = BufWriter::new(File::create(path)?);
    let report = write_hex(&mut out, depth, pattern, policy)?;
    out.flush()?;

    info!(
        "Wrote {} data records ({} bytes) to {}",
        report.data_records,
        report.bytes_written,
        path.display()
    );
    Ok(report)
}

/// Runs [`generate`] with the settings in `config`.
pub fn generate_from_config(config: &BramInitConfig) -> Result<GenerateReport> {
    generate(
        &config.output,
        config.depth,
        &config.pattern,
        config.policy(),
    )
}
