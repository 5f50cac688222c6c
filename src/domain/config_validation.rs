//! Run configuration validation and assembly.
//!
//! Validates every config field before any table is read, then builds the
//! typed [`RunConfig`].

use crate::domain::align::FillPolicy;
use crate::domain::error::IndigridError;
use crate::domain::universe::parse_symbols;
use crate::ports::config_port::ConfigPort;
use std::path::PathBuf;

const REQUIRED_PATHS: [(&str, &str); 5] = [
    ("input", "close"),
    ("input", "high"),
    ("input", "low"),
    ("input", "definitions"),
    ("output", "directory"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub close_path: PathBuf,
    pub high_path: PathBuf,
    pub low_path: PathBuf,
    pub definitions_path: PathBuf,
    pub output_dir: PathBuf,
    pub symbols: Option<Vec<String>>,
    pub max_dates: Option<usize>,
    pub default_fill: FillPolicy,
}

pub fn validate_run_config(config: &dyn ConfigPort) -> Result<(), IndigridError> {
    for (section, key) in REQUIRED_PATHS {
        required(config, section, key)?;
    }
    parse_symbol_list(config)?;
    parse_max_dates(config)?;
    parse_fill(config)?;
    Ok(())
}

pub fn build_run_config(config: &dyn ConfigPort) -> Result<RunConfig, IndigridError> {
    validate_run_config(config)?;

    let path = |section: &str, key: &str| required(config, section, key).map(PathBuf::from);

    Ok(RunConfig {
        close_path: path("input", "close")?,
        high_path: path("input", "high")?,
        low_path: path("input", "low")?,
        definitions_path: path("input", "definitions")?,
        output_dir: path("output", "directory")?,
        symbols: parse_symbol_list(config)?,
        max_dates: parse_max_dates(config)?,
        default_fill: parse_fill(config)?,
    })
}

fn required(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, IndigridError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(IndigridError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn optional(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_symbol_list(config: &dyn ConfigPort) -> Result<Option<Vec<String>>, IndigridError> {
    optional(config, "run", "symbols")
        .map(|raw| {
            parse_symbols(&raw).map_err(|e| IndigridError::ConfigInvalid {
                section: "run".to_string(),
                key: "symbols".to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

fn parse_max_dates(config: &dyn ConfigPort) -> Result<Option<usize>, IndigridError> {
    let Some(raw) = optional(config, "run", "max_dates") else {
        return Ok(None);
    };
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(IndigridError::ConfigInvalid {
            section: "run".to_string(),
            key: "max_dates".to_string(),
            reason: "max_dates must be a positive integer".to_string(),
        }),
    }
}

fn parse_fill(config: &dyn ConfigPort) -> Result<FillPolicy, IndigridError> {
    match optional(config, "run", "fill") {
        None => Ok(FillPolicy::default()),
        Some(raw) => raw
            .parse::<FillPolicy>()
            .map_err(|reason| IndigridError::ConfigInvalid {
                section: "run".to_string(),
                key: "fill".to_string(),
                reason,
            }),
    }
}
