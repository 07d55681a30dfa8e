#![forbid(unsafe_code)]

// Load test configuration: defaults, then POKER_* environment, then CLI flags

use crate::harness::Pacing;
use crate::session::TaskWeights;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;
use url::Url;

const REALTIME_PATH: &str = "/api/websocket";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid host '{host}': {reason}")]
    InvalidHost { host: String, reason: String },

    #[error("At least one user is required")]
    NoUsers,

    #[error("Minimum wait {min:?} exceeds maximum wait {max:?}")]
    InvertedPacing { min: Duration, max: Duration },

    #[error("Invalid task weights: {0}")]
    InvalidWeights(String),
}

#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Base URL of the game service, e.g. `http://localhost:3000`
    pub host: String,
    pub users: usize,
    pub duration: Duration,
    pub min_wait: Duration,
    pub max_wait: Duration,
    /// Bound on every HTTP request and realtime connect/send
    pub request_timeout: Duration,
    pub weights: TaskWeights,
    pub summary_path: PathBuf,
}

impl Default for LoadConfig {
    fn default() -> Self {
        let pacing = Pacing::default();
        Self {
            host: "http://localhost:3000".to_string(),
            users: 10,
            duration: Duration::from_secs(60),
            min_wait: pacing.min(),
            max_wait: pacing.max(),
            request_timeout: Duration::from_secs(10),
            weights: TaskWeights::default(),
            summary_path: PathBuf::from("load_test_summary.json"),
        }
    }
}

/// What the command line asked for.
#[derive(Debug)]
pub enum Command {
    Run(LoadConfig),
    Help,
}

impl LoadConfig {
    /// Defaults overlaid with `POKER_HOST`, `POKER_USERS`, `POKER_DURATION`
    /// and `POKER_TIMEOUT` (seconds). Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("POKER_HOST") {
            self.host = host;
        }
        if let Some(users) = lookup("POKER_USERS").and_then(|v| v.parse().ok()) {
            self.users = users;
        }
        if let Some(secs) = lookup("POKER_DURATION").and_then(|v| v.parse().ok()) {
            self.duration = Duration::from_secs(secs);
        }
        if let Some(secs) = lookup("POKER_TIMEOUT").and_then(|v| v.parse().ok()) {
            self.request_timeout = Duration::from_secs(secs);
        }
    }

    /// Applies command line flags (without the program name) on top of `self`.
    /// A flag with a bad value keeps the previous setting.
    pub fn parse_args(mut self, args: &[String]) -> Command {
        let mut i = 0;
        while i < args.len() {
            let value = args.get(i + 1);
            let consumed = match (args[i].as_str(), value) {
                ("--host" | "-H", Some(v)) => {
                    self.host = v.clone();
                    2
                }
                ("--users" | "-u", Some(v)) => {
                    self.users = v.parse().unwrap_or(self.users);
                    2
                }
                ("--duration" | "-d", Some(v)) => {
                    self.duration = parse_secs(v).unwrap_or(self.duration);
                    2
                }
                ("--min-wait", Some(v)) => {
                    self.min_wait = parse_secs(v).unwrap_or(self.min_wait);
                    2
                }
                ("--max-wait", Some(v)) => {
                    self.max_wait = parse_secs(v).unwrap_or(self.max_wait);
                    2
                }
                ("--timeout", Some(v)) => {
                    self.request_timeout = parse_secs(v).unwrap_or(self.request_timeout);
                    2
                }
                ("--weights", Some(v)) => {
                    match TaskWeights::parse(v) {
                        Some(weights) => self.weights = weights,
                        None => warn!("Invalid weights '{}', expected create,join,vote,state", v),
                    }
                    2
                }
                ("--summary", Some(v)) => {
                    self.summary_path = PathBuf::from(v);
                    2
                }
                ("--help" | "-h", _) => return Command::Help,
                (flag, _) => {
                    warn!("Ignoring unknown or incomplete argument '{}'", flag);
                    1
                }
            };
            i += consumed;
        }
        Command::Run(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base_url()?;
        if self.users == 0 {
            return Err(ConfigError::NoUsers);
        }
        self.pacing()?;
        if self.weights.total() == 0 {
            return Err(ConfigError::InvalidWeights("all weights are zero".to_string()));
        }
        Ok(())
    }

    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.host).map_err(|e| ConfigError::InvalidHost {
            host: self.host.clone(),
            reason: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::InvalidHost {
                host: self.host.clone(),
                reason: format!("unsupported scheme '{other}'"),
            }),
        }
    }

    /// Realtime endpoint on the same host: http → ws, https → wss.
    pub fn realtime_url(&self) -> Result<Url, ConfigError> {
        let mut url = self.base_url()?;
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        url.set_scheme(scheme).map_err(|_| ConfigError::InvalidHost {
            host: self.host.clone(),
            reason: format!("cannot switch to {scheme}"),
        })?;
        url.set_path(REALTIME_PATH);
        url.set_query(None);
        url.set_fragment(None);
        Ok(url)
    }

    pub fn pacing(&self) -> Result<Pacing, ConfigError> {
        Pacing::new(self.min_wait, self.max_wait)
    }
}

/// Whole or fractional seconds, e.g. `3` or `0.25`.
fn parse_secs(s: &str) -> Option<Duration> {
    let secs: f64 = s.parse().ok()?;
    Duration::try_from_secs_f64(secs).ok()
}

pub fn print_usage() {
    println!("Planning poker load test");
    println!("\nUsage:");
    println!("  cargo run --bin load_test -- [OPTIONS]");
    println!("\nOptions:");
    println!("  -H, --host <URL>           Game service base URL (default: http://localhost:3000)");
    println!("  -u, --users <N>            Concurrent simulated players (default: 10)");
    println!("  -d, --duration <SECS>      Test duration in seconds (default: 60)");
    println!("  --min-wait <SECS>          Minimum pause between actions (default: 1)");
    println!("  --max-wait <SECS>          Maximum pause between actions (default: 3)");
    println!("  --timeout <SECS>           Per-request timeout (default: 10)");
    println!("  --weights <C,J,V,S>        Weights for create,join,vote,state (default: 1,3,5,2)");
    println!("  --summary <PATH>           Summary JSON output (default: load_test_summary.json)");
    println!("  -h, --help                 Print this help message");
    println!("\nEnvironment Variables:");
    println!("  POKER_HOST, POKER_USERS, POKER_DURATION, POKER_TIMEOUT");
    println!("  RUST_LOG=debug             Log every action outcome");
    println!("  RUST_LOG=info              Session start/stop only (default)");
}
