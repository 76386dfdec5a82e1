//! # Spreadsheet Import Service
//!
//! Backs `POST /api/places/import`, the bulk create/update/delete path.
//!
//! ## Workflow
//!
//! 1.  **Upload**: `process` receives a `multipart/form-data` payload. The `file`
//!     part is buffered in memory up to `import.max_upload_bytes`; its extension is
//!     checked before any byte is read. Other parts are drained and ignored.
//!
//! 2.  **Parsing**: on the blocking pool the bytes become a `Sheet` (CSV or workbook).
//!
//! 3.  **Import**: rows are checked in parallel, classified against the existing
//!     `placeId`s and applied in batches, one transaction per batch.
//!
//! 4.  **HTTP Response**: the `ImportReport` (counts plus per-row errors) with
//!     `200 OK`, even when some rows were skipped. Input errors give `400`, an
//!     exhausted time budget gives `504`, and an aborted batch gives `500`.

use crate::error::ApiError;
use crate::import::executor::ExecuteOptions;
use crate::import::{import_sheet, ImportError};
use crate::import::sheet::{read_sheet, SheetFormat};
use crate::state::AppState;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::import::ImportReport;
use futures_util::StreamExt;
use log::info;
use std::time::Instant;

/// Actix web handler for `POST /api/places/import`.
///
/// # Arguments
/// * `state` - Shared application state (database handle and import settings).
/// * `payload` - The multipart stream carrying the `file` part.
///
/// # Returns
/// - `200 OK` with the `ImportReport` JSON payload.
/// - `400 Bad Request` for a missing, oversized, unsupported or empty file.
/// - `504 Gateway Timeout` when the import ran out of time between batches.
pub async fn process(state: web::Data<AppState>, payload: Multipart) -> impl Responder {
    match import_places(&state, payload).await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => e.error_response(),
    }
}

/// Reads the `file` part of the upload and runs the import on the blocking
/// pool. Other parts are drained and ignored.
pub async fn import_places(state: &AppState, mut payload: Multipart) -> Result<ImportReport, ApiError> {
    let started = Instant::now();
    let settings = &state.config.import;
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| ApiError::BadRequest(format!("Invalid upload: {e}")))?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        if name.as_deref() != Some("file") {
            while let Some(chunk) = field.next().await {
                chunk.map_err(|e| ApiError::BadRequest(format!("Invalid upload: {e}")))?;
            }
            continue;
        }

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
            .unwrap_or_default();
        SheetFormat::from_file_name(&file_name)?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| ApiError::BadRequest(format!("Invalid upload: {e}")))?;
            if bytes.len() + chunk.len() > settings.max_upload_bytes {
                return Err(ApiError::BadRequest(format!(
                    "File exceeds the upload limit of {} bytes",
                    settings.max_upload_bytes
                )));
            }
            bytes.extend_from_slice(&chunk);
        }
        upload = Some((file_name, bytes));
    }

    let (file_name, bytes) = upload.ok_or_else(|| ApiError::BadRequest("No file provided".to_string()))?;
    info!("Importing {file_name} ({} bytes)", bytes.len());

    let options = ExecuteOptions {
        batch_size: settings.batch_size,
        deadline: Some(started + settings.timeout()),
    };
    let report = state
        .db
        .run(move |conn| -> Result<ImportReport, ImportError> {
            let sheet = read_sheet(&file_name, bytes)?;
            info!("{file_name}: {} data rows", sheet.rows.len());
            import_sheet(conn, &sheet, &options)
        })
        .await?;
    Ok(report)
}
