//! Server settings.
//!
//! Layered, later sources win: built-in defaults, then `hwr-calendar.toml`
//! (or the file named by `HWR_CALENDAR_CONFIG`), then `HWR_CALENDAR_*`
//! environment variables, then the Vercel-style `CRON_SECRET`,
//! `KV_REST_API_URL` and `KV_REST_API_TOKEN`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, Map, Source};
use serde::Deserialize;

static DEFAULT_CONFIG_FILE: &str = "hwr-calendar.toml";
static CONFIG_PATH_VAR: &str = "HWR_CALENDAR_CONFIG";
const DEFAULT_PORT: u16 = 3000;

/// Credentials for the hosted key-value store
#[derive(Debug, Clone, Deserialize)]
pub struct KvSettings {
    pub rest_api_url: String,
    pub rest_api_token: String,
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    host: String,
    port: u16,
    calendar_name: String,
    uid_prefix: String,
    fetch_timeout: String,
    sync_interval: Option<String>,
    cron_secret: Option<String>,
    kv: Option<KvSettings>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Name shown by calendar clients for the generated feeds
    pub calendar_name: String,
    pub uid_prefix: String,
    pub fetch_timeout: Duration,
    /// Run the sync in process on this interval; `None` leaves it to an external cron
    pub sync_interval: Option<Duration>,
    /// Bearer token required by `/api/sync`; the endpoint is closed without one
    pub cron_secret: Option<String>,
    /// Hosted KV store; an in-memory store is used without one
    pub kv: Option<KvSettings>,
}

impl Settings {
    /// Load settings from the config file and the process environment
    pub fn load() -> Result<Self> {
        let env: Map<String, String> = std::env::vars().collect();
        let path = env
            .get(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        Self::build(File::from(path).required(false), env)
    }

    /// Layer `file` and then `env` over the defaults
    fn build<S>(file: S, env: Map<String, String>) -> Result<Self>
    where
        S: Source + Send + Sync + 'static,
    {
        let cron_secret = env.get("CRON_SECRET").cloned();
        let kv_url = env.get("KV_REST_API_URL").cloned();
        let kv_token = env.get("KV_REST_API_TOKEN").cloned();

        let raw: RawSettings = defaults()?
            .add_source(file)
            .add_source(
                Environment::with_prefix("HWR_CALENDAR")
                    .prefix_separator("_")
                    .separator("__")
                    .source(Some(env)),
            )
            .set_override_option("cron_secret", cron_secret)?
            .set_override_option("kv.rest_api_url", kv_url)?
            .set_override_option("kv.rest_api_token", kv_token)?
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Invalid settings")?;

        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSettings) -> Result<Self> {
        let fetch_timeout = humantime::parse_duration(&raw.fetch_timeout)
            .with_context(|| format!("Invalid fetch_timeout '{}'", raw.fetch_timeout))?;

        let sync_interval = raw
            .sync_interval
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                humantime::parse_duration(&s)
                    .with_context(|| format!("Invalid sync_interval '{s}'"))
            })
            .transpose()?;

        Ok(Settings {
            host: raw.host,
            port: raw.port,
            calendar_name: raw.calendar_name,
            uid_prefix: raw.uid_prefix,
            fetch_timeout,
            sync_interval,
            cron_secret: raw.cron_secret.filter(|s| !s.is_empty()),
            kv: raw.kv,
        })
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>> {
    Ok(Config::builder()
        .set_default("host", "0.0.0.0")?
        .set_default("port", i64::from(DEFAULT_PORT))?
        .set_default("calendar_name", "HWR Calendar")?
        .set_default("uid_prefix", "hwr-calendar-")?
        .set_default("fetch_timeout", "30s")?)
}
