//! # Fill Service Module
//!
//! Stateless endpoints under `/api/fill` that take a document in the request
//! body and return either a filled PDF or information about it.
//!
//! ## Sub-modules:
//! - `coordinates`: stamps data values at mapped page positions.
//! - `form`: fills (and optionally flattens) AcroForm fields.
//! - `inspect`: lists form fields, reads their values and reports page sizes.
//!
//! The PDF work is CPU-bound and runs inside `web::block` so it never stalls
//! the async workers.

mod coordinates;
mod form;
mod inspect;

use crate::error::{AppError, Result};
use crate::pdf::PdfError;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::web::{post, scope};
use actix_web::{HttpResponse, Scope};
use common::model::source::DocumentSource;

const API_PATH: &str = "/api/fill";

/// Configures and returns the Actix `Scope` for the fill routes.
///
/// *   **`POST /coordinates`**: `FillCoordinatesRequest` to `application/pdf`.
/// *   **`POST /form`**: `FillFormRequest` to `application/pdf`; 422 when the form
///     cannot be flattened.
/// *   **`POST /fields`**: `DocumentRequest` to a list of `FormFieldDescriptor`.
/// *   **`POST /values`**: `DocumentRequest` to a map of field name to value.
/// *   **`POST /pages`**: `DocumentRequest` to a list of `PageSize`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/coordinates", post().to(coordinates::process))
        .route("/form", post().to(form::process))
        .route("/fields", post().to(inspect::fields))
        .route("/values", post().to(inspect::values))
        .route("/pages", post().to(inspect::pages))
}

/// Raw bytes of a request's document. URL sources are fetched by the browser,
/// so one arriving here is a client error.
pub(crate) fn document_bytes(source: &DocumentSource) -> Result<Vec<u8>> {
    source
        .to_bytes()
        .map_err(|e| AppError::from(PdfError::from(e)))
}

/// `200 OK` carrying a PDF shown inline under `file_name`.
pub(crate) fn pdf_response(bytes: Vec<u8>, file_name: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Inline,
            parameters: vec![DispositionParam::Filename(file_name.to_string())],
        })
        .body(bytes)
}
