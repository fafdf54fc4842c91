use crate::layout::{DayWindow, LayoutConfig, SnapConfig};
use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use serde::Deserialize;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Config file filename (with path)
    #[arg(short, long, default_value = "timetable.toml")]
    pub config: String,

    /// Class to show
    #[arg(long)]
    pub class: String,

    /// Only show this day (e.g. `Mon`, `friday`)
    #[arg(long)]
    pub day: Option<String>,

    /// Print positioned slots as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// Backend root, no trailing slash
    pub api_base_url: String,
    pub school_id: String,
    /// Session token, sent as-is
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_day_start")]
    pub day_start: String,
    #[serde(default = "default_day_end")]
    pub day_end: String,
    #[serde(default = "default_snap_minutes")]
    pub snap_minutes: u16,
    #[serde(default = "default_duration_minutes")]
    pub default_duration_minutes: u16,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_day_start() -> String {
    "07:00".to_string()
}

fn default_day_end() -> String {
    "19:00".to_string()
}

fn default_snap_minutes() -> u16 {
    15
}

fn default_duration_minutes() -> u16 {
    30
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

const DEFAULT_CONFIG: &str = r#"
# Root of the school ERP REST API
# No trailing slash
api_base_url="https://erp.example.com/api"

# School the classes belong to
school_id="my-school"

# Session token, if the API needs one
# token="..."

# Visible part of the day
day_start="07:00"
day_end="19:00"

# Click-to-create grid and slot length, in minutes
snap_minutes=15
default_duration_minutes=30

# Transport
request_timeout_secs=10
max_retries=3
"#;

impl Config {
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read the config file. A missing file is created with defaults, and the
    /// original error is still returned so the user can fill it in.
    pub fn from_file(path: &str) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(&text).with_context(|| format!("Invalid config file {path}")),
            Err(e) => {
                error!("Failed to read config file {}: {}", path, e);
                if e.kind() == std::io::ErrorKind::NotFound {
                    info!("Creating default config file {}", path);
                    if let Err(e) = std::fs::write(path, DEFAULT_CONFIG.trim()) {
                        error!("Failed to write default config file: {}", e);
                    }
                }
                Err(e.into())
            }
        }
    }

    pub fn layout(&self) -> Result<LayoutConfig> {
        Ok(LayoutConfig {
            window: DayWindow::from_hhmm(&self.day_start, &self.day_end)?,
            snap: SnapConfig::new(self.snap_minutes, self.default_duration_minutes)?,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
