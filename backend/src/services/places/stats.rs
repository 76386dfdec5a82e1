//! `GET /api/places/stats`: directory-wide statistics computed over every
//! stored place.

use crate::db::places;
use crate::error::ApiError;
use crate::state::AppState;
use crate::stats::compute;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::stats::Statistics;

/// Actix web handler for `GET /api/places/stats`.
///
/// # Returns
/// - `200 OK` with the `Statistics` payload; an empty store yields zeros.
/// - `500 Internal Server Error` if the store cannot be read.
pub async fn process(state: web::Data<AppState>) -> impl Responder {
    match statistics(&state).await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => e.error_response(),
    }
}

pub async fn statistics(state: &AppState) -> Result<Statistics, ApiError> {
    state
        .db
        .run(|conn| -> Result<Statistics, ApiError> { Ok(compute(&places::all(conn)?)) })
        .await
}
