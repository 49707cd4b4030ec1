use async_trait::async_trait;
use reqwest::Client;
use std::{sync::Arc, time::Duration};
use tracing::{debug, info};

use crate::{
    config::HttpConfig,
    error::SyncError,
    types::{MatchesResponse, StandingsResponse},
};

const AUTH_HEADER: &str = "X-Auth-Token";

/// Read side of the sports-data API.
#[async_trait]
pub trait FootballData: Send + Sync {
    async fn team_matches(&self, team_id: i64, season: i32) -> Result<MatchesResponse, SyncError>;
    async fn competition_standings(&self, competition: &str) -> Result<StandingsResponse, SyncError>;
}

#[async_trait]
impl<T: FootballData + ?Sized> FootballData for Arc<T> {
    async fn team_matches(&self, team_id: i64, season: i32) -> Result<MatchesResponse, SyncError> {
        (**self).team_matches(team_id, season).await
    }

    async fn competition_standings(&self, competition: &str) -> Result<StandingsResponse, SyncError> {
        (**self).competition_standings(competition).await
    }
}

pub struct FootballDataClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl FootballDataClient {
    pub fn new(base_url: &str, api_key: &str, http: &HttpConfig) -> Result<Self, SyncError> {
        let client = Client::builder()
            .user_agent(&http.user_agent)
            .timeout(Duration::from_secs(http.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, SyncError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(AUTH_HEADER, &self.api_key)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::UpstreamFetch {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        info!("Got response from {} ({} bytes)", path, body.len());
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl FootballData for FootballDataClient {
    async fn team_matches(&self, team_id: i64, season: i32) -> Result<MatchesResponse, SyncError> {
        self.get_json(
            &format!("/teams/{}/matches", team_id),
            &[("season", season.to_string())],
        )
        .await
    }

    async fn competition_standings(&self, competition: &str) -> Result<StandingsResponse, SyncError> {
        self.get_json(
            &format!("/competitions/{}/standings", urlencoding::encode(competition)),
            &[],
        )
        .await
    }
}
