use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// football-data.org v4 payloads

#[derive(Debug, Clone, Deserialize)]
pub struct MatchesResponse {
    #[serde(default)]
    pub matches: Vec<ApiMatch>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMatch {
    pub id: i64,
    pub competition: ApiCompetition,
    pub season: ApiSeason,
    pub utc_date: String,
    pub status: String,
    pub home_team: ApiTeam,
    pub away_team: ApiTeam,
    #[serde(default)]
    pub score: Option<ApiScore>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCompetition {
    pub code: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSeason {
    #[serde(default)]
    pub start_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTeam {
    /// Required: a team without an id cannot be keyed, so the payload is rejected.
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub crest: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiScore {
    #[serde(default)]
    pub full_time: Option<ApiScoreLine>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiScoreLine {
    #[serde(default)]
    pub home: Option<i32>,
    #[serde(default)]
    pub away: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StandingsResponse {
    #[serde(default)]
    pub season: Option<ApiSeason>,
    #[serde(default)]
    pub standings: Vec<ApiStanding>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiStanding {
    /// `TOTAL`, `HOME` or `AWAY`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub table: Vec<ApiTableRow>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTableRow {
    pub team: ApiTeam,
    pub played_games: i32,
    pub won: i32,
    pub draw: i32,
    pub lost: i32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub goal_difference: i32,
    pub points: i32,
}

// Storage rows

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TeamRow {
    pub id: i64,
    pub name: String,
    pub short_name: String,
    pub crest_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FixtureRow {
    pub id: i64,
    pub competition_id: String,
    pub season: Option<i32>,
    pub utc_date: String,
    pub status: String,
    pub venue: Option<String>,
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StandingRow {
    pub competition_id: String,
    pub season: i32,
    /// Serialized as `YYYY-MM-DD`.
    pub snap_date: NaiveDate,
    pub team_id: i64,
    pub p: i32,
    pub w: i32,
    pub d: i32,
    pub l: i32,
    pub gf: i32,
    pub ga: i32,
    pub gd: i32,
    pub pts: i32,
}
