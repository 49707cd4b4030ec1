use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use tracing::{debug, error, info};

use crate::{error::SyncError, storage::StorageWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Job {
    #[serde(rename = "pull-fixtures")]
    Fixtures,
    #[serde(rename = "pull-standings")]
    Standings,
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Job::Fixtures => write!(f, "pull-fixtures"),
            Job::Standings => write!(f, "pull-standings"),
        }
    }
}

/// start → config-check → fetch-upstream → map → write-teams → write-facts → done.
/// Failure at any stage is terminal for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Start,
    ConfigCheck,
    FetchUpstream,
    Map,
    WriteTeams,
    WriteFacts,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::ConfigCheck => "config-check",
            Stage::FetchUpstream => "fetch-upstream",
            Stage::Map => "map",
            Stage::WriteTeams => "write-teams",
            Stage::WriteFacts => "write-facts",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(usize),
    /// Empty batch, no request sent.
    Skipped,
}

impl WriteOutcome {
    pub fn rows(&self) -> usize {
        match self {
            WriteOutcome::Written(n) => *n,
            WriteOutcome::Skipped => 0,
        }
    }
}

impl Serialize for WriteOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.rows() as u64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub job: Job,
    pub teams: WriteOutcome,
    pub facts: WriteOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
#[error("{job} failed at {stage}: {error}")]
pub struct SyncFailure {
    pub job: Job,
    pub stage: Stage,
    #[source]
    pub error: SyncError,
}

/// Tracks one invocation through its stages and logs every transition.
#[derive(Debug)]
pub struct SyncRun {
    job: Job,
    stage: Stage,
    started_at: DateTime<Utc>,
}

impl SyncRun {
    pub fn start(job: Job) -> Self {
        info!(job = %job, "Starting sync run");
        Self {
            job,
            stage: Stage::Start,
            started_at: Utc::now(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn advance(&mut self, stage: Stage) {
        debug!(job = %self.job, from = %self.stage, to = %stage, "Stage transition");
        self.stage = stage;
    }

    pub fn fail(&mut self, error: SyncError) -> SyncFailure {
        error!(job = %self.job, stage = %self.stage, "Sync run failed: {}", error);
        SyncFailure {
            job: self.job,
            stage: self.stage,
            error,
        }
    }

    pub fn complete(&mut self, teams: WriteOutcome, facts: WriteOutcome) -> SyncReport {
        self.advance(Stage::Done);
        let finished_at = Utc::now();
        info!(
            job = %self.job,
            teams = teams.rows(),
            facts = facts.rows(),
            elapsed_ms = (finished_at - self.started_at).num_milliseconds(),
            "Sync run complete"
        );
        SyncReport {
            job: self.job,
            teams,
            facts,
            started_at: self.started_at,
            finished_at,
        }
    }
}

/// One bulk upsert: a JSON array body plus its target table and conflict key.
#[derive(Debug, Clone)]
pub struct Batch {
    pub table: &'static str,
    pub on_conflict: &'static str,
    pub rows: Value,
    len: usize,
}

impl Batch {
    pub fn new<T: Serialize>(
        table: &'static str,
        on_conflict: &'static str,
        rows: &[T],
    ) -> Result<Self, SyncError> {
        let encoded = serde_json::to_value(rows).map_err(SyncError::Encode)?;
        Ok(Self {
            table,
            on_conflict,
            rows: encoded,
            len: rows.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

pub async fn write_batch<S>(storage: &S, batch: &Batch) -> Result<WriteOutcome, SyncError>
where
    S: StorageWriter + ?Sized,
{
    if batch.is_empty() {
        debug!("Skipping empty {} batch", batch.table);
        return Ok(WriteOutcome::Skipped);
    }
    storage
        .upsert(batch.table, batch.on_conflict, &batch.rows)
        .await?;
    info!("Upserted {} rows into {}", batch.len(), batch.table);
    Ok(WriteOutcome::Written(batch.len()))
}

/// Writes `teams` then `facts`. The facts stage only runs once the teams stage
/// has returned `Ok`, so fact rows never reference teams that failed to land.
pub async fn write_in_order<S>(
    storage: &S,
    run: &mut SyncRun,
    teams: &Batch,
    facts: &Batch,
) -> Result<(WriteOutcome, WriteOutcome), SyncError>
where
    S: StorageWriter + ?Sized,
{
    run.advance(Stage::WriteTeams);
    let teams = write_batch(storage, teams).await?;

    run.advance(Stage::WriteFacts);
    let facts = write_batch(storage, facts).await?;

    Ok((teams, facts))
}
