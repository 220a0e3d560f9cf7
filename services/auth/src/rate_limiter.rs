//! Login throttling to slow down password guessing

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::info;

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Maximum number of failed attempts allowed within the window
    pub max_attempts: u32,
    /// Time window in seconds
    pub window_seconds: u64,
    /// Ban duration in seconds
    pub ban_duration_seconds: u64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_seconds: 300,        // 5 minutes
            ban_duration_seconds: 3600, // 1 hour
        }
    }
}

impl RateLimiterConfig {
    /// Read `LOGIN_MAX_ATTEMPTS`, `LOGIN_WINDOW_SECONDS` and `LOGIN_BAN_SECONDS`,
    /// keeping the default for anything absent or unparsable
    pub fn from_env() -> Self {
        fn read<T: std::str::FromStr>(name: &str, default: T) -> T {
            std::env::var(name)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        let defaults = Self::default();
        Self {
            max_attempts: read("LOGIN_MAX_ATTEMPTS", defaults.max_attempts),
            window_seconds: read("LOGIN_WINDOW_SECONDS", defaults.window_seconds),
            ban_duration_seconds: read("LOGIN_BAN_SECONDS", defaults.ban_duration_seconds),
        }
    }
}

#[derive(Debug)]
struct RateLimiterEntry {
    failures: u32,
    window_start: Instant,
    ban_expires: Option<Instant>,
}

/// Throttle key for a login attempt: the peer address together with the
/// lowercased identifier, so one client cannot lock an account for everyone
pub fn login_key(peer: Option<IpAddr>, identifier: &str) -> String {
    let peer = peer.map_or_else(|| "unknown".to_string(), |ip| ip.to_string());
    format!("{}|{}", peer, identifier.to_lowercase())
}

/// Tracks failed logins per key (see [`login_key`])
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    entries: Arc<Mutex<HashMap<String, RateLimiterEntry>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Whether another attempt for `key` may proceed
    pub async fn is_allowed(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        self.prune(&mut entries, now);

        match entries.get(key).and_then(|entry| entry.ban_expires) {
            Some(ban_expires) => now >= ban_expires,
            None => true,
        }
    }

    /// Drop entries that are neither banned nor inside their failure window
    fn prune(&self, entries: &mut HashMap<String, RateLimiterEntry>, now: Instant) {
        let window = Duration::from_secs(self.config.window_seconds);
        entries.retain(|_, entry| match entry.ban_expires {
            Some(ban_expires) => now < ban_expires,
            None => now.duration_since(entry.window_start) < window,
        });
    }

    /// Number of keys currently tracked
    pub async fn tracked_keys(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Count a failed attempt, banning the key once it exceeds the limit
    pub async fn record_failure(&self, key: &str) {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        self.prune(&mut entries, now);

        let entry = entries.entry(key.to_string()).or_insert(RateLimiterEntry {
            failures: 0,
            window_start: now,
            ban_expires: None,
        });

        entry.failures += 1;

        if entry.failures >= self.config.max_attempts {
            entry.ban_expires = Some(now + Duration::from_secs(self.config.ban_duration_seconds));
            info!(
                "Banned key {} for {} seconds",
                key, self.config.ban_duration_seconds
            );
        }
    }

    /// Forget the failures for `key` after a successful login
    pub async fn reset(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }
}
