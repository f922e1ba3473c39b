use anyhow::{Context, Result};
use clap::ValueEnum;
use kibubu_core::{DEFAULT_OPENING_BALANCE, ReplayConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_kibubu_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ledger: LedgerSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSection {
    /// Main-account balance before the first statement record
    pub opening_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSection {
    pub format: OutputFormat,
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Table,
}

impl Default for LedgerSection {
    fn default() -> Self {
        Self {
            opening_balance: DEFAULT_OPENING_BALANCE,
        }
    }
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            pretty: false,
        }
    }
}

/// Command-line values that take precedence over the file
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub opening_balance: Option<f64>,
    pub format: Option<OutputFormat>,
    pub pretty: bool,
}

impl Config {
    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(balance) = overrides.opening_balance {
            self.ledger.opening_balance = balance;
        }
        if let Some(format) = overrides.format {
            self.output.format = format;
        }
        self.output.pretty |= overrides.pretty;
        self
    }

    pub fn replay(&self) -> ReplayConfig {
        ReplayConfig::with_opening_balance(self.ledger.opening_balance)
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_kibubu_home()?.join("config.toml"))
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
