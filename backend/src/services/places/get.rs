//! `GET /api/places/{id}`: a single place by its store id.

use crate::db::places;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::place::Place;

/// Actix web handler for `GET /api/places/{id}`.
///
/// # Returns
/// - `200 OK` with the `Place`.
/// - `404 Not Found` when no place has that id.
pub async fn process(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    match get_place(&state, path.into_inner()).await {
        Ok(place) => HttpResponse::Ok().json(place),
        Err(e) => e.error_response(),
    }
}

pub async fn get_place(state: &AppState, id: String) -> Result<Place, ApiError> {
    state
        .db
        .run(move |conn| -> Result<Place, ApiError> {
            places::get(conn, &id)?.ok_or_else(|| ApiError::NotFound("Place not found".to_string()))
        })
        .await
}
