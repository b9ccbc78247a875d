use serde::Deserialize;
use std::time::Duration;

use crate::checkin::LocalDay;
use crate::profile::Archetype;

pub const DEFAULT_API_URL: &str = "https://api.taruapp.com/v1";
pub const DEFAULT_LOG_CAPACITY: usize = 100;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckInConfig {
    /// Offset of the user's wall clock; decides where calendar days begin.
    pub utc_offset_minutes: i32,
    /// Oldest mood entries are evicted past this many.
    pub log_capacity: usize,
    pub default_archetype: Archetype,
    /// Remote mirror. `None` keeps everything local.
    pub sync: Option<SyncConfig>,
}

impl Default for CheckInConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            log_capacity: DEFAULT_LOG_CAPACITY,
            default_archetype: Archetype::default(),
            sync: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub queue_capacity: usize,
    pub user_id: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 8,
            queue_capacity: 64,
            user_id: "local".to_string(),
        }
    }
}

impl SyncConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl CheckInConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Defaults overridden by `TARU_*` environment variables. Setting
    /// `TARU_API_URL` turns remote sync on.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(offset) = env_parse::<i32>("TARU_UTC_OFFSET_MINUTES") {
            config.utc_offset_minutes = offset;
        }
        if let Ok(url) = std::env::var("TARU_API_URL") {
            let mut sync = SyncConfig {
                base_url: url,
                ..SyncConfig::default()
            };
            if let Some(secs) = env_parse::<u64>("TARU_SYNC_TIMEOUT_SECS") {
                sync.timeout_secs = secs;
            }
            if let Ok(user) = std::env::var("TARU_USER_ID") {
                sync.user_id = user;
            }
            config.sync = Some(sync);
        }

        config
    }

    pub fn local_day(&self) -> LocalDay {
        LocalDay::from_offset_minutes(self.utc_offset_minutes)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("Ignoring unparseable {}={}", key, raw);
            None
        }
    }
}
