pub mod places;

use crate::error::{json_error_handler, query_error_handler};
use crate::state::AppState;
use actix_web::web;

/// Registers shared extractor settings, the application state and every
/// route. Used by the server binary and by the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(state.config.server.json_limit_bytes)
            .error_handler(json_error_handler),
    )
    .app_data(web::QueryConfig::default().error_handler(query_error_handler))
    .app_data(web::Data::new(state.clone()))
    .service(places::configure_routes());
}
