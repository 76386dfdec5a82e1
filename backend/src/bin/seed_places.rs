use backend::config::AppConfig;
use backend::db::Database;
use backend::seed::{load_records, prepare_store, seed, SEED_BATCH_SIZE};
use env_logger::Env;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const USAGE: &str = "usage: seed_places <data.json> [--replace]";

fn main() -> ExitCode {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let mut data_path: Option<PathBuf> = None;
    let mut replace = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--replace" => replace = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                return ExitCode::SUCCESS;
            }
            _ if data_path.is_none() => data_path = Some(PathBuf::from(arg)),
            _ => {
                eprintln!("{USAGE}");
                return ExitCode::FAILURE;
            }
        }
    }
    let data_path = data_path.unwrap_or_else(|| PathBuf::from("data.json"));

    match run(&data_path, replace) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Seeding failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(data_path: &Path, replace: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let db = Database::new(&config.database.path);
    db.migrate()?;

    info!("Reading data from {}", data_path.display());
    let records = load_records(data_path)?;
    info!("Found {} records", records.len());

    let mut conn = db.connect()?;
    prepare_store(&conn, replace)?;
    let summary = seed(&mut conn, records, SEED_BATCH_SIZE);

    info!("Imported: {}", summary.imported);
    info!("Skipped: {}", summary.skipped);
    info!("Errors: {}", summary.errors.len());
    for failure in summary.errors.iter().take(10) {
        warn!("  record {}: {}", failure.index, failure.error);
    }
    if summary.errors.len() > 10 {
        warn!("  ... and {} more errors", summary.errors.len() - 10);
    }

    let total = backend::db::places::count(&conn)?;
    info!("Total places in database: {total}");
    Ok(())
}
