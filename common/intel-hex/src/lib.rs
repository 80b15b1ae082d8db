// Licensed under the Apache-2.0 license

//! Encoder for Intel HEX records.
//!
//! A record is rendered as one line of uppercase hexadecimal:
//!
//! ```text
//! :BBAAAATTDD...DDCC
//! ```
//!
//! where `BB` is the byte count, `AAAA` the big-endian load address, `TT` the
//! record type, `DD` the data bytes and `CC` the two's-complement checksum of
//! every preceding byte.

use core::fmt;
use thiserror::Error;

/// The end-of-file record. Identical for every file.
pub const END_OF_FILE_RECORD: &str = ":00000001FF";

/// Largest payload a single record can carry.
pub const MAX_DATA_LEN: usize = 0xFF;

/// Largest address a record can carry.
pub const MAX_ADDRESS: usize = 0xFFFF;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    #[error("Address 0x{0:x} does not fit in 16 bits")]
    AddressOutOfRange(usize),
}

pub type Result<T> = core::result::Result<T, Error>;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    Data = 0x00,
    EndOfFile = 0x01,
    ExtendedSegmentAddress = 0x02,
    StartSegmentAddress = 0x03,
    ExtendedLinearAddress = 0x04,
    StartLinearAddress = 0x05,
}

impl TryFrom<u8> for RecordType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x00 => Ok(RecordType::Data),
            0x01 => Ok(RecordType::EndOfFile),
            0x02 => Ok(RecordType::ExtendedSegmentAddress),
            0x03 => Ok(RecordType::StartSegmentAddress),
            0x04 => Ok(RecordType::ExtendedLinearAddress),
            0x05 => Ok(RecordType::StartLinearAddress),
            _ => Err(Error::InvalidRecord(format!(
                "unknown record type 0x{value:02x}"
            ))),
        }
    }
}

/// Two's-complement of the low byte of the sum of `bytes`.
///
/// Adding the result to the sum of `bytes` always yields zero modulo 256.
pub fn checksum(bytes: &[u8]) -> u8 {
    0u8.wrapping_sub(bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b)))
}

/// A single validated record. The byte count is the length of the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    address: u16,
    record_type: RecordType,
    data: Vec<u8>,
}

impl Record {
    pub fn new(address: usize, record_type: RecordType, data: Vec<u8>) -> Result<Self> {
        let address =
            u16::try_from(address).map_err(|_| Error::AddressOutOfRange(address))?;
        if data.len() > MAX_DATA_LEN {
            return Err(Error::InvalidRecord(format!(
                "payload of {} bytes exceeds the {MAX_DATA_LEN} byte limit",
                data.len()
            )));
        }
        Ok(Self {
            address,
            record_type,
            data,
        })
    }

    /// A data record (type 0x00) at `address`.
    pub fn data(address: u16, bytes: &[u8]) -> Result<Self> {
        Self::new(address as usize, RecordType::Data, bytes.to_vec())
    }

    pub fn end_of_file() -> Self {
        Self {
            address: 0,
            record_type: RecordType::EndOfFile,
            data: Vec::new(),
        }
    }

    pub fn byte_count(&self) -> u8 {
        // bounded by MAX_DATA_LEN in the constructors
        self.data.len() as u8
    }

    pub fn address(&self) -> u16 {
        self.address
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn payload(&self) -> &[u8] {
        &self.data
    }

    /// Every byte covered by the checksum, in wire order.
    fn header_and_payload(&self) -> impl Iterator<Item = u8> + '_ {
        let [addr_hi, addr_lo] = self.address.to_be_bytes();
        [self.byte_count(), addr_hi, addr_lo, self.record_type as u8]
            .into_iter()
            .chain(self.data.iter().copied())
    }

    pub fn checksum(&self) -> u8 {
        let bytes: Vec<u8> = self.header_and_payload().collect();
        checksum(&bytes)
    }

    /// Length of the rendered line, without the terminator.
    pub fn line_len(&self) -> usize {
        1 + 2 + 4 + 2 + 2 * self.data.len() + 2
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            ":{:02X}{:04X}{:02X}",
            self.byte_count(),
            self.address,
            self.record_type as u8
        )?;
        for b in self.data.iter() {
            write!(f, "{b:02X}")?;
        }
        write!(f, "{:02X}", self.checksum())
    }
}

/// Renders one record as a newline-terminated line.
///
/// Fails if `data` does not hold exactly `byte_count` bytes or if
/// `record_type` is not a defined record type.
pub fn encode(byte_count: u8, address: u16, record_type: u8, data: &[u8]) -> Result<String> {
    if data.len() != byte_count as usize {
        return Err(Error::InvalidRecord(format!(
            "byte count {byte_count} does not match payload length {}",
            data.len()
        )));
    }
    let record_type = RecordType::try_from(record_type)?;
    let record = Record::new(address as usize, record_type, data.to_vec())?;
    Ok(format!("{record}\n"))
}
