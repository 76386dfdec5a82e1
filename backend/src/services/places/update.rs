//! # Place Update Service
//!
//! Backs `PATCH /api/places/{id}`.
//!
//! ## Workflow
//!
//! 1.  **HTTP Request**: `process` receives the store id from the path and a
//!     `PlacePatch` body in which only the present fields change.
//!
//! 2.  **Merge**: inside one transaction, `update_place` loads the stored place and
//!     merges the patch onto it. Absent fields keep their stored value.
//!
//! 3.  **Validation**: the merged record is validated. Category and governorate are
//!     only checked against their lists when the patch sets them, so records loaded
//!     with the "Non spécifié" placeholder can still be edited.
//!
//! 4.  **Write**: the record is rewritten with a fresh `updatedAt`, re-read and
//!     committed. `id` and `createdAt` never change.
//!
//! 5.  **HTTP Response**: the updated `Place` as JSON, `404 Not Found` for an unknown
//!     id, or `400 Bad Request` listing the validation failures.

use crate::db::places::{self, NewPlace};
use crate::db::StoreError;
use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::PlaceFields;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use chrono::{DateTime, Utc};
use common::model::place::{Place, PlacePatch};

/// Actix web handler for `PATCH /api/places/{id}`.
///
/// # Arguments
/// * `state` - Shared application state holding the database handle.
/// * `path` - The store id of the place to update.
/// * `body` - The fields to change.
///
/// # Returns
/// - `200 OK` with the updated `Place`.
/// - `400 Bad Request` if the merged record fails validation.
/// - `404 Not Found` when no place has that id.
pub async fn process(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<PlacePatch>,
) -> impl Responder {
    match update_place(&state, path.into_inner(), body.into_inner()).await {
        Ok(place) => HttpResponse::Ok().json(place),
        Err(e) => e.error_response(),
    }
}

/// The stored record keeps its identity and creation time; everything else
/// comes from the validated merge.
fn apply(existing: Place, merged: NewPlace, now: DateTime<Utc>) -> Place {
    Place {
        id: existing.id,
        place_id: merged.place_id,
        cid: merged.cid,
        title: merged.title,
        address: merged.address,
        category: merged.category,
        governorate: merged.governorate,
        latitude: merged.latitude,
        longitude: merged.longitude,
        rating: merged.rating,
        reviews: merged.reviews,
        position: merged.position,
        phone_number: merged.phone_number,
        website: merged.website,
        opening_hours: merged.opening_hours,
        price_range: merged.price_range,
        thumbnail_url: merged.thumbnail_url,
        place_type: merged.place_type,
        types: merged.types.unwrap_or_default(),
        rating_count: merged.rating_count,
        grid_lat: merged.grid_lat,
        grid_lng: merged.grid_lng,
        fid: merged.fid,
        created_at: existing.created_at,
        updated_at: now,
    }
}

pub async fn update_place(state: &AppState, id: String, patch: PlacePatch) -> Result<Place, ApiError> {
    state
        .db
        .run(move |conn| -> Result<Place, ApiError> {
            let tx = conn.transaction().map_err(StoreError::from)?;
            let existing = places::get(&tx, &id)?
                .ok_or_else(|| ApiError::NotFound("Place not found".to_string()))?;

            let merged = PlaceFields::patched(&existing, patch)?;
            places::replace(&tx, &apply(existing, merged, Utc::now()))?;

            let updated = places::get(&tx, &id)?
                .ok_or_else(|| ApiError::NotFound("Place not found".to_string()))?;
            tx.commit().map_err(StoreError::from)?;
            Ok(updated)
        })
        .await
}
