//! HTTP API for the places directory.
//!
//! The provided routes are:
//! - `GET /api/places`: paginated, filtered and sorted listing.
//! - `POST /api/places`: creates a place after validation (201).
//! - `GET|PATCH|DELETE /api/places/{id}`: single-record access by store id.
//! - `POST /api/places/import`: multipart spreadsheet upload (field `file`),
//!   answered with the import report.
//! - `GET /api/places/export`: CSV or JSON download of the filtered listing.
//! - `GET /api/places/duplicates`: duplicate groups by `cid`.
//! - `DELETE /api/places/duplicates`: removes a confirmed id set.
//! - `GET /api/places/stats`: directory-wide statistics.

use actix_web::web::{delete, get, patch, post, scope};
use actix_web::Scope;

mod create;
mod duplicates;
mod export;
mod get;
mod import;
mod list;
mod remove;
mod stats;
mod update;

const API_PATH: &str = "/api/places";

/// Configures and returns the Actix scope for the places routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(create::process))
        // Fixed paths before `/{id}` so they are not taken for ids.
        .route("/import", post().to(import::process))
        .route("/export", get().to(export::process))
        .route("/duplicates", get().to(duplicates::find))
        .route("/duplicates", delete().to(duplicates::remove))
        .route("/stats", get().to(stats::process))
        .route("/{id}", get().to(get::process))
        .route("/{id}", patch().to(update::process))
        .route("/{id}", delete().to(remove::process))
}
