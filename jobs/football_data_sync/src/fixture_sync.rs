use tracing::info;

use crate::{
    config::SyncConfig,
    error::SyncError,
    mapping::{extract_match_teams, map_fixture},
    pipeline::{write_in_order, Batch, Job, Stage, SyncFailure, SyncReport, SyncRun},
    storage::{RestStorage, StorageWriter, TEAMS_CONFLICT, TEAMS_TABLE},
    types::FixtureRow,
    upstream::{FootballData, FootballDataClient},
};

pub const FIXTURES_TABLE: &str = "fixtures";
pub const FIXTURES_CONFLICT: &str = "id";

/// Pulls one team's matches for a season and upserts teams, then fixtures.
pub struct FixtureSync<U, S> {
    upstream: U,
    storage: S,
    team_id: i64,
    season: i32,
}

impl FixtureSync<FootballDataClient, RestStorage> {
    pub fn from_config(config: &SyncConfig) -> Result<Self, SyncError> {
        let creds = config.credentials()?;
        let upstream =
            FootballDataClient::new(&config.football_data.base_url, &creds.api_key, &config.http)?;
        let storage = RestStorage::new(&creds.storage_url, &creds.storage_key, &config.http)?;

        Ok(Self::new(
            upstream,
            storage,
            config.football_data.team_id,
            config.football_data.season,
        ))
    }
}

impl<U: FootballData, S: StorageWriter> FixtureSync<U, S> {
    pub fn new(upstream: U, storage: S, team_id: i64, season: i32) -> Self {
        Self {
            upstream,
            storage,
            team_id,
            season,
        }
    }

    pub async fn run(&self) -> Result<SyncReport, SyncFailure> {
        let mut run = SyncRun::start(Job::Fixtures);
        self.execute(&mut run).await
    }

    async fn execute(&self, run: &mut SyncRun) -> Result<SyncReport, SyncFailure> {
        run.advance(Stage::FetchUpstream);
        let response = self
            .upstream
            .team_matches(self.team_id, self.season)
            .await
            .map_err(|e| run.fail(e))?;
        info!(
            "Fetched {} matches for team {} season {}",
            response.matches.len(),
            self.team_id,
            self.season
        );

        run.advance(Stage::Map);
        let teams = extract_match_teams(&response.matches);
        let fixtures: Vec<FixtureRow> = response.matches.iter().map(map_fixture).collect();
        let team_batch = Batch::new(TEAMS_TABLE, TEAMS_CONFLICT, &teams).map_err(|e| run.fail(e))?;
        let fixture_batch =
            Batch::new(FIXTURES_TABLE, FIXTURES_CONFLICT, &fixtures).map_err(|e| run.fail(e))?;

        let (teams, facts) = write_in_order(&self.storage, run, &team_batch, &fixture_batch)
            .await
            .map_err(|e| run.fail(e))?;

        Ok(run.complete(teams, facts))
    }
}

/// Config check plus a full FixtureSync run, as triggered by the scheduler.
pub async fn pull_fixtures(config: &SyncConfig) -> Result<SyncReport, SyncFailure> {
    let mut run = SyncRun::start(Job::Fixtures);
    run.advance(Stage::ConfigCheck);
    let sync = FixtureSync::from_config(config).map_err(|e| run.fail(e))?;
    sync.execute(&mut run).await
}
