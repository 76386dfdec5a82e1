//! # Place Listing Service
//!
//! Backs `GET /api/places`: one page of places matching the query filters.
//!
//! ## Workflow
//!
//! 1.  **HTTP Request**: `process` receives the query string as a `ListPlacesQuery`.
//!
//! 2.  **Normalisation**: `list_places` clamps `page` (min 1) and `limit` (1..=1000,
//!     default 50) and turns the query into a `PlaceFilter`, a `PlaceSort` and an
//!     offset/limit `Window`.
//!
//! 3.  **Database Query**: on the blocking pool it counts the whole store, counts the
//!     matching places and loads the requested page, all on one connection.
//!
//! 4.  **HTTP Response**: the `PlacePage` (places, `total`, `totalAll`, pagination) is
//!     returned as JSON. A malformed query string is rejected with `400 Bad Request`
//!     before the handler runs.

use crate::db::places::{self, PlaceFilter, PlaceSort, Window};
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::listing::{Pagination, PlacePage};
use common::requests::ListPlacesQuery;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 1000;

/// Actix web handler for `GET /api/places`.
///
/// # Arguments
/// * `state` - Shared application state holding the database handle.
/// * `query` - Pagination, filter and sort parameters.
///
/// # Returns
/// - `200 OK` with a `PlacePage` JSON payload.
/// - `500 Internal Server Error` if the store cannot be read.
pub async fn process(
    state: web::Data<AppState>,
    query: web::Query<ListPlacesQuery>,
) -> impl Responder {
    match list_places(&state, query.into_inner()).await {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(e) => e.error_response(),
    }
}

pub async fn list_places(state: &AppState, query: ListPlacesQuery) -> Result<PlacePage, ApiError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let filter = PlaceFilter::from(&query);
    let sort = PlaceSort::from(&query);
    let window = Window {
        offset: (page - 1).saturating_mul(limit),
        limit,
    };

    state
        .db
        .run(move |conn| -> Result<PlacePage, ApiError> {
            let total_all = places::count(conn)?;
            let total = places::count_matching(conn, &filter)?;
            let places = places::search(conn, &filter, sort, Some(window))?;
            Ok(PlacePage {
                places,
                total,
                total_all,
                pagination: Pagination::new(page, limit, total),
            })
        })
        .await
}
