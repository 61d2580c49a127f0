//! Read-only document endpoints used by the UI before filling.

use super::document_bytes;
use crate::error::Result;
use crate::pdf::acroform;
use crate::pdf::pages::page_sizes;
use actix_web::{web, HttpResponse};
use common::requests::DocumentRequest;

/// `POST /api/fill/fields`: the form fields of the document, empty when it
/// has no form.
pub async fn fields(payload: web::Json<DocumentRequest>) -> Result<HttpResponse> {
    let source = document_bytes(&payload.source)?;
    let fields = web::block(move || acroform::detect_fields(&source)).await??;
    Ok(HttpResponse::Ok().json(fields))
}

/// `POST /api/fill/values`: current value of every form field that has one.
pub async fn values(payload: web::Json<DocumentRequest>) -> Result<HttpResponse> {
    let source = document_bytes(&payload.source)?;
    let values = web::block(move || acroform::read_values(&source)).await??;
    Ok(HttpResponse::Ok().json(values))
}

/// `POST /api/fill/pages`: page sizes in points.
pub async fn pages(payload: web::Json<DocumentRequest>) -> Result<HttpResponse> {
    let source = document_bytes(&payload.source)?;
    let sizes = web::block(move || page_sizes(&source)).await??;
    Ok(HttpResponse::Ok().json(sizes))
}
