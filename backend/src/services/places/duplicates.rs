//! Duplicate review endpoints: `GET /api/places/duplicates` proposes a
//! keep/remove split per `cid` group, and `DELETE /api/places/duplicates`
//! removes the ids the operator confirmed.

use crate::duplicates::{find_duplicates, remove_duplicates, KeepPolicyKind};
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::duplicates::{DuplicateReport, RemoveDuplicatesResponse};
use common::requests::{DuplicatesQuery, RemoveDuplicatesRequest};
use log::info;

/// Actix web handler for `GET /api/places/duplicates`.
///
/// # Returns
/// - `200 OK` with the `DuplicateReport`; read-only, safe to call repeatedly.
/// - `400 Bad Request` for an unknown `keep` policy.
pub async fn find(state: web::Data<AppState>, query: web::Query<DuplicatesQuery>) -> impl Responder {
    match duplicate_groups(&state, query.into_inner()).await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => e.error_response(),
    }
}

/// Actix web handler for `DELETE /api/places/duplicates`.
///
/// The ids are trusted as sent; they are not re-checked against a fresh scan.
///
/// # Returns
/// - `200 OK` with `{"success": true, "deletedCount": n}`.
/// - `400 Bad Request` when `idsToDelete` is missing or empty.
pub async fn remove(
    state: web::Data<AppState>,
    body: web::Json<RemoveDuplicatesRequest>,
) -> impl Responder {
    match remove_confirmed(&state, body.into_inner()).await {
        Ok(deleted_count) => HttpResponse::Ok().json(RemoveDuplicatesResponse {
            success: true,
            deleted_count,
        }),
        Err(e) => e.error_response(),
    }
}

/// `?keep=` overrides the configured keep policy for this request.
pub async fn duplicate_groups(
    state: &AppState,
    query: DuplicatesQuery,
) -> Result<DuplicateReport, ApiError> {
    let kind = match query.keep.as_deref() {
        Some(raw) => KeepPolicyKind::parse(raw)?,
        None => state.config.duplicates.keep_policy,
    };

    state
        .db
        .run(move |conn| -> Result<DuplicateReport, ApiError> {
            Ok(find_duplicates(conn, kind.policy())?)
        })
        .await
}

pub async fn remove_confirmed(
    state: &AppState,
    request: RemoveDuplicatesRequest,
) -> Result<usize, ApiError> {
    let ids = request.ids_to_delete.unwrap_or_default();
    let requested = ids.len();

    let deleted = state
        .db
        .run(move |conn| -> Result<usize, ApiError> { Ok(remove_duplicates(conn, ids)?) })
        .await?;
    info!("Duplicate removal: {requested} ids requested, {deleted} places deleted");
    Ok(deleted)
}
