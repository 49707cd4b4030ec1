use serde::{Deserialize, Serialize};
use std::{env, fmt, str::FromStr};
use tracing::warn;

use crate::error::SyncError;

pub const STORAGE_URL_VAR: &str = "SUPABASE_URL";
pub const STORAGE_KEY_VAR: &str = "SUPABASE_SERVICE_ROLE";
pub const API_KEY_VAR: &str = "FD_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    pub url: Option<String>,
    pub service_role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FootballDataConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Team whose match list FixtureSync pulls.
    pub team_id: i64,
    pub season: i32,
    /// Competition code for StandingsSync, also written as `competition_id`.
    pub competition: String,
}

impl Default for FootballDataConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.football-data.org/v4".to_string(),
            team_id: 57,
            season: 2025,
            competition: "PL".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpConfig {
    pub user_agent: String,
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "football-data-sync/0.1".to_string(),
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncConfig {
    pub storage: StorageConfig,
    pub football_data: FootballDataConfig,
    pub http: HttpConfig,
    pub server: ServerConfig,
}

impl SyncConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.storage.url = env::var(STORAGE_URL_VAR).ok();
        config.storage.service_role = env::var(STORAGE_KEY_VAR).ok();
        config.football_data.api_key = env::var(API_KEY_VAR).ok();

        if let Ok(base_url) = env::var("FD_API_BASE_URL") {
            config.football_data.base_url = base_url;
        }
        if let Some(team_id) = parse_var("FD_TEAM_ID") {
            config.football_data.team_id = team_id;
        }
        if let Some(season) = parse_var("FD_SEASON") {
            config.football_data.season = season;
        }
        if let Ok(competition) = env::var("FD_COMPETITION") {
            config.football_data.competition = competition;
        }
        if let Ok(user_agent) = env::var("SYNC_USER_AGENT") {
            config.http.user_agent = user_agent;
        }
        if let Some(timeout) = parse_var("SYNC_TIMEOUT_SECS") {
            config.http.request_timeout_secs = timeout;
        }
        if let Ok(bind_addr) = env::var("SYNC_BIND_ADDR") {
            config.server.bind_addr = bind_addr;
        }

        config
    }

    /// Resolves the three required secrets. Blank values count as missing and
    /// every missing variable is named in the error.
    pub fn credentials(&self) -> Result<Credentials, SyncError> {
        let storage_url = non_blank(&self.storage.url);
        let storage_key = non_blank(&self.storage.service_role);
        let api_key = non_blank(&self.football_data.api_key);

        match (storage_url, storage_key, api_key) {
            (Some(storage_url), Some(storage_key), Some(api_key)) => Ok(Credentials {
                storage_url: storage_url.trim_end_matches('/').to_string(),
                storage_key: storage_key.to_string(),
                api_key: api_key.to_string(),
            }),
            (storage_url, storage_key, api_key) => {
                let missing: Vec<&str> = [
                    (storage_url.is_none(), STORAGE_URL_VAR),
                    (storage_key.is_none(), STORAGE_KEY_VAR),
                    (api_key.is_none(), API_KEY_VAR),
                ]
                .into_iter()
                .filter_map(|(absent, name)| absent.then_some(name))
                .collect();
                Err(SyncError::Config(missing.join(", ")))
            }
        }
    }
}

/// Validated secrets for one job invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub storage_url: String,
    pub storage_key: String,
    pub api_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("storage_url", &self.storage_url)
            .field("storage_key", &"<redacted>")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring invalid value for {}: {:?}", name, raw);
            None
        }
    }
}
