use std::time::Duration;

use anyhow::Context;

use crate::gateway::{GatewaySettings, region::Region};

const DEFAULT_PORT: u16 = 3030;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Outbound request timeout
    pub timeout: Duration,
    pub gateway: GatewaySettings,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = match get("PORT") {
            Some(port) => port.parse().context("PORT must be a port number")?,
            None => DEFAULT_PORT,
        };
        let timeout = match get("SWIPE_TIMEOUT_SECS") {
            Some(secs) => secs
                .parse()
                .map(Duration::from_secs)
                .context("SWIPE_TIMEOUT_SECS must be a number of seconds")?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        let region = match get("SWIPE_REGION") {
            Some(region) => region.parse::<Region>()?,
            None => {
                tracing::warn!("SWIPE_REGION is not defined, using NZ");
                Region::default()
            }
        };
        let gateway = GatewaySettings {
            region,
            test: flag(&get, "SWIPE_TEST_MODE")?,
            verify_currency: flag(&get, "SWIPE_VERIFY_CURRENCY")?,
        };
        Ok(Self {
            port,
            timeout,
            gateway,
        })
    }
}

fn flag(get: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<bool> {
    let Some(value) = get(key) else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("{key} must be a boolean, got {other:?}"),
    }
}
