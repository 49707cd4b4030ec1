use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use football_data_sync::{
    config::SyncConfig,
    fixture_sync::pull_fixtures,
    pipeline::{SyncFailure, SyncReport},
    standings_sync::pull_standings,
    web::{self, AppState},
};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sync one team's fixtures for a season
    PullFixtures {
        /// football-data.org team id
        #[arg(short, long)]
        team: Option<i64>,
        /// Season start year
        #[arg(short, long)]
        season: Option<i32>,
    },
    /// Snapshot a competition's league table
    PullStandings {
        /// Competition code, e.g. PL
        #[arg(short, long)]
        competition: Option<String>,
    },
    /// Serve the HTTP sync triggers
    Serve {
        /// Listen address, e.g. 0.0.0.0:8080
        #[arg(short, long)]
        bind: Option<String>,
    },
}

fn finish(result: Result<SyncReport, SyncFailure>) -> Result<()> {
    match result {
        Ok(report) => {
            info!(
                "{}: {} teams, {} rows written",
                report.job,
                report.teams.rows(),
                report.facts.rows()
            );
            println!("ok");
            Ok(())
        }
        // Printed once, by the anyhow report returned from main.
        Err(failure) => Err(failure.into()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = SyncConfig::from_env();

    match cli.command {
        Commands::PullFixtures { team, season } => {
            if let Some(team) = team {
                config.football_data.team_id = team;
            }
            if let Some(season) = season {
                config.football_data.season = season;
            }
            finish(pull_fixtures(&config).await)
        }
        Commands::PullStandings { competition } => {
            if let Some(competition) = competition {
                config.football_data.competition = competition;
            }
            finish(pull_standings(&config).await)
        }
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind_addr = bind;
            }
            web::serve(AppState::new(config)).await
        }
    }
}
