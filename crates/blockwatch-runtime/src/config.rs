//! Runtime configuration.
//!
//! A plain struct loaded from the environment once at startup; options flow
//! into subsystems via constructor parameters, never via implicit lookup.
//! The per-chain RPC endpoint variables (`RPC_ETH_MAINNET_URL`,
//! `RPC_CHAIN_<N>_URL`) are the gateway's own concern and are read there.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use blockwatch_ingest::IngestConfig;

/// Everything the runtime needs to wire the service.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// HTTP listen port.
    pub port: u16,
    /// Block store connection string.
    pub database_url: String,
    /// Connection pool size.
    pub db_max_connections: u32,
    /// Liveness memory ceiling; unset disables the check.
    pub max_rss_bytes: Option<u64>,
    /// Scheduler timing and bounds.
    pub ingest: IngestConfig,
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL is required")?;

        let mut ingest = IngestConfig::default();
        if let Some(secs) = parse_env::<u64>("HEAD_INTERVAL_SECS")? {
            ingest.head_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_env::<u64>("GAP_INTERVAL_SECS")? {
            ingest.gap_interval = Duration::from_secs(secs);
        }
        if let Some(limit) = parse_env::<usize>("GAP_SCAN_LIMIT")? {
            ingest.gap_limit = limit;
        }
        if let Some(secs) = parse_env::<u64>("RPC_DEADLINE_SECS")? {
            ingest.rpc_deadline = Some(Duration::from_secs(secs));
        }

        Ok(Self {
            port: parse_env("PORT")?.unwrap_or(3000),
            database_url,
            db_max_connections: parse_env("DB_MAX_CONNECTIONS")?.unwrap_or(10),
            max_rss_bytes: parse_env("MAX_RSS_BYTES")?,
            ingest,
        })
    }
}

/// Read and parse an optional environment variable; empty counts as unset,
/// unparseable is an error rather than a silent default.
fn parse_env<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) if raw.is_empty() => Ok(None),
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("invalid {key}={raw}: {e}")),
        Err(_) => Ok(None),
    }
}
