use actix_web::middleware::Logger;
use actix_web::{App, HttpServer};
use backend::config::AppConfig;
use backend::services;
use backend::state::AppState;
use env_logger::Env;
use log::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    let state = AppState::new(config);
    if let Err(e) = state.db.migrate() {
        error!("Could not prepare {}: {e}", state.db.path().display());
        return Err(std::io::Error::other(e.to_string()));
    }

    let (host, port) = state.config.bind_address();
    info!(
        "Server running at http://{host}:{port} (database {})",
        state.db.path().display()
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .configure(|cfg| services::configure(cfg, &state))
    })
    .bind((host, port))?
    .run()
    .await
}
