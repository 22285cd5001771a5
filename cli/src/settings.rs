//! Codec parameters from a TOML file, overridden by command-line flags

use crate::error::{CliError, Result};
use kcsmodem_core::{CodecParams, ParityMode};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Codec section of a config file; every key is optional
///
/// ```toml
/// baud = 600
/// data_bits = 7
/// stop_bits = 1
/// parity = "even"
/// leader_seconds = 1.5
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecSettings {
    pub baud: Option<u32>,
    pub data_bits: Option<u8>,
    pub stop_bits: Option<u8>,
    pub start_bits: Option<u8>,
    pub parity: Option<String>,
    pub leader_seconds: Option<f64>,
}

impl CodecSettings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Overlay `other` on top of `self`; values set in `other` win
    pub fn merge(self, other: CodecSettings) -> CodecSettings {
        CodecSettings {
            baud: other.baud.or(self.baud),
            data_bits: other.data_bits.or(self.data_bits),
            stop_bits: other.stop_bits.or(self.stop_bits),
            start_bits: other.start_bits.or(self.start_bits),
            parity: other.parity.or(self.parity),
            leader_seconds: other.leader_seconds.or(self.leader_seconds),
        }
    }

    /// Resolve against the defaults and validate
    pub fn to_params(&self) -> Result<CodecParams> {
        let defaults = CodecParams::default();
        let parity = match &self.parity {
            Some(name) => name.parse::<ParityMode>().map_err(CliError::Config)?,
            None => defaults.parity,
        };

        let params = CodecParams {
            baud: self.baud.unwrap_or(defaults.baud),
            data_bits: self.data_bits.unwrap_or(defaults.data_bits),
            stop_bits: self.stop_bits.unwrap_or(defaults.stop_bits),
            start_bits: self.start_bits.unwrap_or(defaults.start_bits),
            parity,
            leader_seconds: self.leader_seconds.unwrap_or(defaults.leader_seconds),
        };
        params.validate()?;
        Ok(params)
    }
}
