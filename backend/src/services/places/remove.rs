//! `DELETE /api/places/{id}`: physical deletion by store id.

use crate::db::places;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::place::DeletedResponse;

/// Actix web handler for `DELETE /api/places/{id}`.
///
/// # Returns
/// - `200 OK` with `{"message": "Place deleted successfully"}`.
/// - `404 Not Found` when no place has that id.
pub async fn process(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    match delete_place(&state, path.into_inner()).await {
        Ok(()) => HttpResponse::Ok().json(DeletedResponse {
            message: "Place deleted successfully".to_string(),
        }),
        Err(e) => e.error_response(),
    }
}

pub async fn delete_place(state: &AppState, id: String) -> Result<(), ApiError> {
    state
        .db
        .run(move |conn| -> Result<(), ApiError> {
            if places::delete(conn, &id)? {
                Ok(())
            } else {
                Err(ApiError::NotFound("Place not found".to_string()))
            }
        })
        .await
}
