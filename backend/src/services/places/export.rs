//! `GET /api/places/export`: the filtered listing, unpaginated, as a CSV or
//! JSON attachment.

use crate::db::places::{self, PlaceFilter, PlaceSort};
use crate::error::ApiError;
use crate::export::ExportFormat;
use crate::state::AppState;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::requests::ListPlacesQuery;

/// Actix web handler for `GET /api/places/export`.
///
/// # Returns
/// - `200 OK` with the rendered file and an attachment `Content-Disposition`.
/// - `400 Bad Request` for an unknown `format`.
pub async fn process(
    state: web::Data<AppState>,
    query: web::Query<ListPlacesQuery>,
) -> impl Responder {
    match export_places(&state, query.into_inner()).await {
        Ok((format, body)) => HttpResponse::Ok()
            .content_type(format.content_type())
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(format.file_name().to_string())],
            })
            .body(body),
        Err(e) => e.error_response(),
    }
}

/// Every place matching the listing filters, in listing order, without
/// pagination.
pub async fn export_places(
    state: &AppState,
    query: ListPlacesQuery,
) -> Result<(ExportFormat, Vec<u8>), ApiError> {
    let format = ExportFormat::parse(query.format.as_deref())?;
    let filter = PlaceFilter::from(&query);
    let sort = PlaceSort::from(&query);

    state
        .db
        .run(move |conn| -> Result<(ExportFormat, Vec<u8>), ApiError> {
            let matching = places::search(conn, &filter, sort, None)?;
            Ok((format, format.render(&matching)?))
        })
        .await
}
