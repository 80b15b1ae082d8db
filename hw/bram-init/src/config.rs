// Licensed under the Apache-2.0 license

use crate::{AddressPolicy, BuiltinPattern, Error, Result, ADDRESS_SPACE};
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT: &str = "bram_init.hex";
pub const DEFAULT_DEPTH: u32 = ADDRESS_SPACE;

/// Fully resolved settings for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BramInitConfig {
    pub output: PathBuf,
    pub depth: u32,
    pub pattern: BuiltinPattern,
    pub wrap: bool,
}

impl Default for BramInitConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            depth: DEFAULT_DEPTH,
            pattern: BuiltinPattern::default(),
            wrap: false,
        }
    }
}

/// A set of overrides, as read from a TOML file or collected from the
/// command line. Unset fields leave the current value alone.
///
/// ```toml
/// output = "build/bram_init.hex"
/// depth = 0x4000
/// pattern = "address:12"
/// wrap = false
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    pub output: Option<PathBuf>,
    pub depth: Option<u32>,
    pub pattern: Option<BuiltinPattern>,
    pub wrap: Option<bool>,
}

impl PartialConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        debug!("Reading config from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }
}

impl BramInitConfig {
    pub fn apply(&mut self, overrides: PartialConfig) {
        if let Some(output) = overrides.output {
            self.output = output;
        }
        if let Some(depth) = overrides.depth {
            self.depth = depth;
        }
        if let Some(pattern) = overrides.pattern {
            self.pattern = pattern;
        }
        if let Some(wrap) = overrides.wrap {
            self.wrap = wrap;
        }
    }

    pub fn policy(&self) -> AddressPolicy {
        if self.wrap {
            AddressPolicy::Wrap
        } else {
            AddressPolicy::Reject
        }
    }
}
