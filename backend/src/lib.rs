//! Places directory service: record store, spreadsheet import, duplicate
//! handling, statistics and the actix-web API on top of them.

pub mod config;
pub mod db;
pub mod duplicates;
pub mod error;
pub mod export;
pub mod import;
pub mod seed;
pub mod services;
pub mod state;
pub mod stats;
pub mod validation;
