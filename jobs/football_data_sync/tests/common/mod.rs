#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use football_data_sync::{
    error::SyncError,
    storage::StorageWriter,
    types::{MatchesResponse, StandingsResponse},
    upstream::FootballData,
};
use serde_json::{Map, Value};
use std::{
    collections::BTreeMap,
    fs,
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

pub fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(name);
    path
}

pub fn read_fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name)).unwrap()
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Serves the recorded football-data payloads from `tests/fixtures`.
#[derive(Default)]
pub struct RecordedFeed {
    pub calls: AtomicUsize,
}

impl RecordedFeed {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FootballData for RecordedFeed {
    async fn team_matches(&self, _team_id: i64, _season: i32) -> Result<MatchesResponse, SyncError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(serde_json::from_str(&read_fixture("team_matches.json"))?)
    }

    async fn competition_standings(&self, _competition: &str) -> Result<StandingsResponse, SyncError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(serde_json::from_str(&read_fixture("standings.json"))?)
    }
}

/// Behaves like a PostgREST table under `resolution=merge-duplicates`: rows
/// with an existing conflict key are merged column by column, others inserted.
#[derive(Default)]
pub struct InMemoryStorage {
    tables: Mutex<BTreeMap<String, BTreeMap<String, Value>>>,
    calls: Mutex<Vec<String>>,
    fail_table: Option<String>,
}

impl InMemoryStorage {
    pub fn failing_on(table: &str) -> Self {
        Self {
            fail_table: Some(table.to_string()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn keys(&self, table: &str) -> Vec<String> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .map(|rows| rows.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl StorageWriter for InMemoryStorage {
    async fn upsert(&self, table: &str, on_conflict: &str, rows: &Value) -> Result<(), SyncError> {
        self.calls.lock().unwrap().push(table.to_string());
        if self.fail_table.as_deref() == Some(table) {
            return Err(SyncError::StorageWrite {
                table: table.to_string(),
                body: format!("{{\"message\":\"{} is read-only\"}}", table),
            });
        }

        let mut tables = self.tables.lock().unwrap();
        let stored = tables.entry(table.to_string()).or_default();
        for row in rows.as_array().into_iter().flatten() {
            let key = on_conflict
                .split(',')
                .map(|column| row[column].to_string())
                .collect::<Vec<_>>()
                .join("|");
            let existing = stored
                .entry(key)
                .or_insert_with(|| Value::Object(Map::new()));
            if let (Value::Object(existing), Value::Object(incoming)) = (existing, row) {
                for (column, value) in incoming {
                    existing.insert(column.clone(), value.clone());
                }
            }
        }
        Ok(())
    }
}
