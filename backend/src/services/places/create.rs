//! # Place Creation Service
//!
//! Backs `POST /api/places`. The body is validated with the same rules as an
//! import row; every violation is reported at once, and nothing is stored unless
//! all of them pass.

use crate::db::places;
use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::PlaceFields;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use chrono::Utc;
use common::model::place::{Place, PlaceInput};
use log::info;

/// Actix web handler for `POST /api/places`.
///
/// # Arguments
/// * `state` - Shared application state holding the database handle.
/// * `body` - The place fields; required ones may be missing at the wire level.
///
/// # Returns
/// - `201 Created` with the stored `Place`, including its generated `id`.
/// - `400 Bad Request` with `details` listing every validation failure.
/// - `400 Bad Request` when `placeId` is already taken.
pub async fn process(state: web::Data<AppState>, body: web::Json<PlaceInput>) -> impl Responder {
    match create_place(&state, body.into_inner()).await {
        Ok(place) => HttpResponse::Created().json(place),
        Err(e) => e.error_response(),
    }
}

pub async fn create_place(state: &AppState, input: PlaceInput) -> Result<Place, ApiError> {
    let new_place = PlaceFields::from(input).into_new_place()?;
    let place = state
        .db
        .run(move |conn| -> Result<Place, ApiError> {
            Ok(places::insert(conn, &new_place, Utc::now())?)
        })
        .await?;
    info!("Created place {} ({})", place.id, place.title);
    Ok(place)
}
