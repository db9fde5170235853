// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use stride_app::{
    ChatConfig, DEFAULT_CAPTURE_URL, DEFAULT_REPLY_TEXT, ReplyTemplate, StateOptions,
};
use tracing_subscriber::EnvFilter;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_REPLY_DELAY: &str = "1s";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub coach: Coach,
    #[serde(default)]
    pub data: Data,
    #[serde(default)]
    pub capture: Capture,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            coach: Coach::default(),
            data: Data::default(),
            capture: Capture::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Coach {
    pub reply_delay: Option<String>,
    pub reply_text: Option<String>,
    pub max_pending_replies: Option<i64>,
}

impl Default for Coach {
    fn default() -> Self {
        Self {
            reply_delay: Some(DEFAULT_REPLY_DELAY.to_owned()),
            reply_text: Some(DEFAULT_REPLY_TEXT.to_owned()),
            max_pending_replies: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Data {
    pub dataset_path: Option<String>,
    pub trust_category_counts: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Capture {
    pub url: Option<String>,
}

impl Default for Capture {
    fn default() -> Self {
        Self {
            url: Some(DEFAULT_CAPTURE_URL.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("STRIDE_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set STRIDE_CONFIG_PATH to the config file")
        })?;

        Ok(config_root.join(stride_data::APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version; add `version = 1` at the top and put values under [coach], [data], [capture], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1. Regenerate it with --print-example-config",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(delay) = &self.coach.reply_delay {
            let parsed = parse_duration(delay)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "coach.reply_delay in {} must be positive, got {}",
                    path.display(),
                    delay
                );
            }
        }

        if let Some(limit) = self.coach.max_pending_replies
            && limit <= 0
        {
            bail!(
                "coach.max_pending_replies in {} must be positive, got {}; remove it for no limit",
                path.display(),
                limit
            );
        }

        if let Some(dataset) = &self.data.dataset_path {
            stride_data::validate_dataset_path(dataset)?;
        }

        if let Some(url) = &self.capture.url
            && !(url.starts_with("https://") || url.starts_with("http://"))
        {
            bail!(
                "capture.url in {} must be an http(s) URL, got {:?}",
                path.display(),
                url
            );
        }

        if let Some(level) = &self.log.level {
            EnvFilter::try_new(level).with_context(|| {
                format!("log.level {level:?} in {} is not a valid filter", path.display())
            })?;
        }

        Ok(())
    }

    /// Explicit config value first, then `STRIDE_DATA_PATH`. `None` means
    /// the built-in demo data.
    pub fn dataset_path(&self) -> Option<PathBuf> {
        match &self.data.dataset_path {
            Some(path) => Some(PathBuf::from(path)),
            None => env::var_os("STRIDE_DATA_PATH").map(PathBuf::from),
        }
    }

    pub fn trust_category_counts(&self) -> bool {
        self.data.trust_category_counts.unwrap_or(false)
    }

    pub fn reply_delay(&self) -> Result<Duration> {
        parse_duration(
            self.coach
                .reply_delay
                .as_deref()
                .unwrap_or(DEFAULT_REPLY_DELAY),
        )
    }

    pub fn reply_text(&self) -> &str {
        self.coach
            .reply_text
            .as_deref()
            .unwrap_or(DEFAULT_REPLY_TEXT)
    }

    pub fn max_pending_replies(&self) -> Option<usize> {
        self.coach
            .max_pending_replies
            .and_then(|limit| usize::try_from(limit).ok())
    }

    pub fn capture_url(&self) -> &str {
        self.capture.url.as_deref().unwrap_or(DEFAULT_CAPTURE_URL)
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn state_options(&self) -> Result<StateOptions> {
        Ok(StateOptions {
            chat: ChatConfig {
                reply_delay: self.reply_delay()?,
                reply: ReplyTemplate::new(self.reply_text()),
                max_pending: self.max_pending_replies(),
            },
            trust_category_counts: self.trust_category_counts(),
            capture_url: self.capture_url().to_owned(),
        })
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# stride config\n# Place this file at: {}\n\nversion = 1\n\n[coach]\n# How long the coach waits before answering (<N>ms, <N>s or <N>m)\nreply_delay = \"{}\"\n# {{question}} is replaced by what you asked\nreply_text = \"{}\"\n# Optional cap on replies in flight; omit for no limit\n# max_pending_replies = 3\n\n[data]\n# Optional. Default is the built-in demo data\n# dataset_path = \"/absolute/path/to/stride.json\"\ntrust_category_counts = false\n\n[capture]\nurl = \"{}\"\n\n[log]\n# Overridden by STRIDE_LOG\nlevel = \"{}\"\n",
            path.display(),
            DEFAULT_REPLY_DELAY,
            DEFAULT_REPLY_TEXT,
            DEFAULT_CAPTURE_URL,
            DEFAULT_LOG_LEVEL,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid reply delay {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid reply delay {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid reply delay {raw:?}"))?;
        let secs = mins
            .checked_mul(60)
            .ok_or_else(|| anyhow!("reply delay {raw:?} is too large"))?;
        return Ok(Duration::from_secs(secs));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 1s)")
}
