use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::{
    config::SyncConfig,
    error::SyncError,
    mapping::{extract_teams, map_standing, standings_season, total_table},
    pipeline::{write_in_order, Batch, Job, Stage, SyncFailure, SyncReport, SyncRun},
    storage::{RestStorage, StorageWriter, TEAMS_CONFLICT, TEAMS_TABLE},
    types::StandingRow,
    upstream::{FootballData, FootballDataClient},
};

pub const STANDINGS_TABLE: &str = "standings";
pub const STANDINGS_CONFLICT: &str = "competition_id,season,snap_date,team_id";

pub type Clock = fn() -> NaiveDate;

pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Pulls a competition's TOTAL table and upserts teams, then a snapshot dated
/// with the run's own UTC date. Same-day re-runs land on the same keys.
pub struct StandingsSync<U, S> {
    upstream: U,
    storage: S,
    competition: String,
    clock: Clock,
}

impl StandingsSync<FootballDataClient, RestStorage> {
    pub fn from_config(config: &SyncConfig) -> Result<Self, SyncError> {
        let creds = config.credentials()?;
        let upstream =
            FootballDataClient::new(&config.football_data.base_url, &creds.api_key, &config.http)?;
        let storage = RestStorage::new(&creds.storage_url, &creds.storage_key, &config.http)?;

        Ok(Self::new(upstream, storage, &config.football_data.competition))
    }
}

impl<U: FootballData, S: StorageWriter> StandingsSync<U, S> {
    pub fn new(upstream: U, storage: S, competition: &str) -> Self {
        Self {
            upstream,
            storage,
            competition: competition.to_string(),
            clock: today_utc,
        }
    }

    /// Replaces the system clock used for the snapshot date and season fallback.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub async fn run(&self) -> Result<SyncReport, SyncFailure> {
        let mut run = SyncRun::start(Job::Standings);
        self.execute(&mut run).await
    }

    async fn execute(&self, run: &mut SyncRun) -> Result<SyncReport, SyncFailure> {
        run.advance(Stage::FetchUpstream);
        let response = self
            .upstream
            .competition_standings(&self.competition)
            .await
            .map_err(|e| run.fail(e))?;

        run.advance(Stage::Map);
        let snap_date = (self.clock)();
        let season = standings_season(&response, snap_date);
        let table = total_table(&response);
        info!(
            "Fetched {} table rows for {} season {} (snapshot {})",
            table.len(),
            self.competition,
            season,
            snap_date
        );

        let teams = extract_teams(table.iter().map(|row| &row.team));
        let standings: Vec<StandingRow> = table
            .iter()
            .map(|row| map_standing(row, &self.competition, season, snap_date))
            .collect();
        let team_batch = Batch::new(TEAMS_TABLE, TEAMS_CONFLICT, &teams).map_err(|e| run.fail(e))?;
        let standings_batch =
            Batch::new(STANDINGS_TABLE, STANDINGS_CONFLICT, &standings).map_err(|e| run.fail(e))?;

        let (teams, facts) = write_in_order(&self.storage, run, &team_batch, &standings_batch)
            .await
            .map_err(|e| run.fail(e))?;

        Ok(run.complete(teams, facts))
    }
}

/// Config check plus a full StandingsSync run, as triggered by the scheduler.
pub async fn pull_standings(config: &SyncConfig) -> Result<SyncReport, SyncFailure> {
    let mut run = SyncRun::start(Job::Standings);
    run.advance(Stage::ConfigCheck);
    let sync = StandingsSync::from_config(config).map_err(|e| run.fail(e))?;
    sync.execute(&mut run).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MatchesResponse, StandingsResponse};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    struct FixedTable(Value);

    #[async_trait]
    impl FootballData for FixedTable {
        async fn team_matches(&self, _team_id: i64, _season: i32) -> Result<MatchesResponse, SyncError> {
            unreachable!("standings sync never reads matches")
        }

        async fn competition_standings(&self, _competition: &str) -> Result<StandingsResponse, SyncError> {
            Ok(serde_json::from_value(self.0.clone())?)
        }
    }

    #[derive(Default)]
    struct CapturingStorage {
        writes: Mutex<Vec<(String, String, Value)>>,
    }

    #[async_trait]
    impl StorageWriter for CapturingStorage {
        async fn upsert(&self, table: &str, on_conflict: &str, rows: &Value) -> Result<(), SyncError> {
            self.writes
                .lock()
                .unwrap()
                .push((table.to_string(), on_conflict.to_string(), rows.clone()));
            Ok(())
        }
    }

    fn fixed_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 4).unwrap()
    }

    fn table_row(id: i64, name: &str, points: i32) -> Value {
        json!({
            "team": {"id": id, "name": name, "crest": format!("https://crests.example/{id}.png")},
            "playedGames": 20, "won": 0, "draw": points, "lost": 20 - points,
            "goalsFor": 10, "goalsAgainst": 10, "goalDifference": 0, "points": points
        })
    }

    #[tokio::test]
    async fn test_run_uses_total_table_and_clock() {
        let upstream = FixedTable(json!({
            "standings": [
                {"type": "HOME", "table": [table_row(99, "Home Only FC", 1)]},
                {"type": "TOTAL", "table": [table_row(57, "Arsenal FC", 10), table_row(65, "Manchester City FC", 9)]}
            ]
        }));
        let sync = StandingsSync::new(upstream, CapturingStorage::default(), "PL").with_clock(fixed_day);

        let report = sync.run().await.unwrap();
        assert_eq!(report.teams.rows(), 2);
        assert_eq!(report.facts.rows(), 2);

        let writes = sync.storage.writes.lock().unwrap();
        assert_eq!(writes[0].0, "teams");
        assert_eq!(writes[0].2[1]["short_name"], "Manchester C");
        assert_eq!(writes[0].2[0]["crest_url"], "https://crests.example/57.png");
        assert_eq!(writes[1].0, "standings");
        assert_eq!(writes[1].1, "competition_id,season,snap_date,team_id");
        // No season in the payload: falls back to the clock's year.
        assert_eq!(writes[1].2[0]["season"], 2026);
        assert_eq!(writes[1].2[0]["snap_date"], "2026-01-04");
        assert_eq!(writes[1].2[0]["competition_id"], "PL");
    }

    #[tokio::test]
    async fn test_missing_total_table_writes_nothing() {
        let upstream = FixedTable(json!({
            "season": {"startDate": "2025-08-15"},
            "standings": [{"type": "AWAY", "table": [table_row(57, "Arsenal FC", 10)]}]
        }));
        let sync = StandingsSync::new(upstream, CapturingStorage::default(), "PL").with_clock(fixed_day);

        let report = sync.run().await.unwrap();
        assert_eq!(report.facts.rows(), 0);
        assert!(sync.storage.writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pull_standings_fails_fast_without_config() {
        let failure = pull_standings(&SyncConfig::default()).await.unwrap_err();
        assert_eq!(failure.stage, Stage::ConfigCheck);
        assert!(matches!(failure.error, SyncError::Config(_)));
    }
}
