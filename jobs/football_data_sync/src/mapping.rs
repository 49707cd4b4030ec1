use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;

use crate::types::{
    ApiMatch, ApiTableRow, ApiTeam, FixtureRow, StandingRow, StandingsResponse, TeamRow,
};

pub const SHORT_NAME_MAX_CHARS: usize = 12;
pub const TOTAL_TABLE: &str = "TOTAL";

/// Year component of an ISO date such as `2025-08-01`: the first four
/// characters parsed as an integer, nothing more.
pub fn season_year(start_date: &str) -> Option<i32> {
    start_date.get(..4)?.parse().ok()
}

pub fn map_team(team: &ApiTeam) -> TeamRow {
    let id = team.id.to_string();
    let name = team
        .name
        .clone()
        .or_else(|| team.short_name.clone())
        .unwrap_or_else(|| id.clone());
    let short_name = team
        .short_name
        .clone()
        .or_else(|| {
            team.name
                .as_ref()
                .map(|n| n.chars().take(SHORT_NAME_MAX_CHARS).collect())
        })
        .unwrap_or(id);

    TeamRow {
        id: team.id,
        name,
        short_name,
        crest_url: team.crest.clone(),
    }
}

/// Unique teams by id in first-seen order; the first occurrence's attributes win.
pub fn extract_teams<'a, I>(teams: I) -> Vec<TeamRow>
where
    I: IntoIterator<Item = &'a ApiTeam>,
{
    let mut seen = HashSet::new();
    teams
        .into_iter()
        .filter(|team| seen.insert(team.id))
        .map(map_team)
        .collect()
}

pub fn extract_match_teams(matches: &[ApiMatch]) -> Vec<TeamRow> {
    extract_teams(matches.iter().flat_map(|m| [&m.home_team, &m.away_team]))
}

pub fn map_fixture(m: &ApiMatch) -> FixtureRow {
    let full_time = m.score.as_ref().and_then(|s| s.full_time.as_ref());

    FixtureRow {
        id: m.id,
        competition_id: m.competition.code.clone(),
        season: m.season.start_date.as_deref().and_then(season_year),
        utc_date: m.utc_date.clone(),
        status: m.status.clone(),
        // Venue is not synced.
        venue: None,
        home_team_id: m.home_team.id,
        away_team_id: m.away_team.id,
        home_score: full_time.and_then(|s| s.home),
        away_score: full_time.and_then(|s| s.away),
    }
}

pub fn total_table(response: &StandingsResponse) -> &[ApiTableRow] {
    response
        .standings
        .iter()
        .find(|s| s.kind == TOTAL_TABLE)
        .map(|s| s.table.as_slice())
        .unwrap_or_default()
}

/// Season of a standings payload, or `today`'s calendar year when the payload
/// carries no usable start date.
pub fn standings_season(response: &StandingsResponse, today: NaiveDate) -> i32 {
    response
        .season
        .as_ref()
        .and_then(|s| s.start_date.as_deref())
        .and_then(season_year)
        .unwrap_or_else(|| today.year())
}

pub fn map_standing(
    row: &ApiTableRow,
    competition_id: &str,
    season: i32,
    snap_date: NaiveDate,
) -> StandingRow {
    StandingRow {
        competition_id: competition_id.to_string(),
        season,
        snap_date,
        team_id: row.team.id,
        p: row.played_games,
        w: row.won,
        d: row.draw,
        l: row.lost,
        gf: row.goals_for,
        ga: row.goals_against,
        gd: row.goal_difference,
        pts: row.points,
    }
}
