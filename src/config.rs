use std::env;
use std::fmt;
use std::time::Duration;
use std::num::NonZeroU32;
use governor::Quota;
use log::warn;

/// One ASE endpoint to poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub port: u16,
}

impl Target {
    /// Parses `host:port`, with IPv6 literals written as `[addr]:port`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (host, port) = raw.trim().rsplit_once(':')?;
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);

        if host.is_empty() || host.contains(|c: char| c.is_whitespace()) {
            return None;
        }

        Some(Self {
            host: host.to_string(),
            port: port.parse().ok()?,
        })
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

#[derive(Clone)]
pub struct Config {
    // Query targets
    pub targets: Vec<Target>,
    pub query_timeout_ms: u64,
    pub poll_interval_secs: u64,

    // Rate limiting for the status endpoints
    pub status_period_secs: u64,
    pub status_burst_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            targets: vec![Target { host: "127.0.0.1".to_string(), port: 22126 }],
            query_timeout_ms: 2000,
            poll_interval_secs: 60,
            status_period_secs: 5,
            status_burst_limit: 10,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            targets: env::var("QUERY_TARGETS")
                .ok()
                .map(|v| parse_targets(&v))
                .unwrap_or(defaults.targets),

            query_timeout_ms: env::var("QUERY_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|&ms| ms > 0)
                .unwrap_or(defaults.query_timeout_ms),

            poll_interval_secs: env::var("POLL_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|&secs| secs > 0)
                .unwrap_or(defaults.poll_interval_secs),

            status_period_secs: env::var("STATUS_PERIOD_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.status_period_secs),

            status_burst_limit: env::var("STATUS_BURST_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.status_burst_limit),
        }
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms.max(1))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn status_quota(&self) -> Quota {
        let burst = NonZeroU32::new(self.status_burst_limit).unwrap_or(NonZeroU32::MIN);
        Quota::with_period(Duration::from_secs(self.status_period_secs.max(1)))
            .map(|quota| quota.allow_burst(burst))
            .unwrap_or_else(|| Quota::per_second(burst))
    }
}

pub fn parse_targets(raw: &str) -> Vec<Target> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let target = Target::parse(entry);
            if target.is_none() {
                warn!("Skipping malformed query target: {:?}", entry);
            }
            target
        })
        .collect()
}
