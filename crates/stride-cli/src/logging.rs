// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const LOG_ENV: &str = "STRIDE_LOG";

/// Installs the stderr subscriber. `STRIDE_LOG` wins over the configured
/// level so a single run can be made noisier without editing the config.
pub fn init(config_level: &str) -> Result<()> {
    let filter = resolve_filter(std::env::var(LOG_ENV).ok().as_deref(), config_level)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .without_time(),
        )
        .try_init()
        .context("install log subscriber")?;
    Ok(())
}

fn resolve_filter(from_env: Option<&str>, config_level: &str) -> Result<EnvFilter> {
    match from_env.map(str::trim).filter(|value| !value.is_empty()) {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid {LOG_ENV} filter {directive:?}")),
        None => EnvFilter::try_new(config_level)
            .with_context(|| format!("invalid [log].level filter {config_level:?}")),
    }
}
