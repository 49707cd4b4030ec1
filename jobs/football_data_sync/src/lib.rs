pub mod config;
pub mod error;
pub mod fixture_sync;
pub mod mapping;
pub mod pipeline;
pub mod standings_sync;
pub mod storage;
pub mod types;
pub mod upstream;
pub mod web;
