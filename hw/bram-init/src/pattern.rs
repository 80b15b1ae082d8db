// Licensed under the Apache-2.0 license

use crate::Error;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Produces the data payload stored at a given BRAM address.
pub trait Pattern {
    fn data(&self, addr: u32) -> Vec<u8>;
}

impl<F: Fn(u32) -> Vec<u8>> Pattern for F {
    fn data(&self, addr: u32) -> Vec<u8> {
        self(addr)
    }
}

/// Patterns selectable from the command line or a config file. Every
/// variant produces one big-endian 16-bit word per address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum BuiltinPattern {
    /// The low `bits` of the address. Values above 16 are clamped.
    Address { bits: u8 },
    Constant(u16),
    Zero,
}

impl BuiltinPattern {
    pub const ADDRESS_9: BuiltinPattern = BuiltinPattern::Address { bits: 9 };

    fn word(&self, addr: u32) -> u16 {
        match *self {
            BuiltinPattern::Address { bits } => {
                let mask = (1u32 << bits.min(16)) - 1;
                (addr & mask) as u16
            }
            BuiltinPattern::Constant(word) => word,
            BuiltinPattern::Zero => 0,
        }
    }
}

impl Default for BuiltinPattern {
    fn default() -> Self {
        Self::ADDRESS_9
    }
}

impl Pattern for BuiltinPattern {
    fn data(&self, addr: u32) -> Vec<u8> {
        self.word(addr).to_be_bytes().to_vec()
    }
}

impl fmt::Display for BuiltinPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuiltinPattern::Address { bits: 9 } => write!(f, "address9"),
            BuiltinPattern::Address { bits } => write!(f, "address:{bits}"),
            BuiltinPattern::Constant(word) => write!(f, "constant:0x{word:04x}"),
            BuiltinPattern::Zero => write!(f, "zero"),
        }
    }
}

impl FromStr for BuiltinPattern {
    type Err = Error;

    /// Accepts `address9`, `address:<bits>`, `constant:<word>` and `zero`.
    /// The constant word may be written in hex with a `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "address9" => return Ok(Self::ADDRESS_9),
            "zero" => return Ok(BuiltinPattern::Zero),
            _ => {}
        }
        let (kind, arg) = s
            .split_once(':')
            .ok_or_else(|| Error::Pattern(format!("unknown pattern {s:?}")))?;
        match kind {
            "address" => {
                let bits: u8 = arg
                    .parse()
                    .map_err(|_| Error::Pattern(format!("invalid bit width {arg:?}")))?;
                if !(1..=16).contains(&bits) {
                    return Err(Error::Pattern(format!(
                        "bit width {bits} must be between 1 and 16"
                    )));
                }
                Ok(BuiltinPattern::Address { bits })
            }
            "constant" => {
                let word = match arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X")) {
                    Some(hex) => u16::from_str_radix(hex, 16),
                    None => arg.parse(),
                }
                .map_err(|_| Error::Pattern(format!("invalid 16-bit word {arg:?}")))?;
                Ok(BuiltinPattern::Constant(word))
            }
            _ => Err(Error::Pattern(format!("unknown pattern {s:?}"))),
        }
    }
}

impl TryFrom<String> for BuiltinPattern {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
