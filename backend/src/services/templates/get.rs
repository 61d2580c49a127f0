//! # Template Retrieval Service
//!
//! Backs `GET /api/templates` and `GET /api/templates/{template_id}`. The list
//! only carries summaries; fetching a single template returns its document
//! source and every mapping so the UI can resume editing.

use crate::error::Result;
use crate::store::Store;
use actix_web::{web, HttpResponse};

/// Handler for `GET /api/templates/{template_id}`.
///
/// # Returns
/// - `200 OK` with the `MappingTemplate` as JSON.
/// - `404 Not Found` when there is no template with that id.
pub async fn process(
    store: web::Data<Store>,
    template_id: web::Path<String>,
) -> Result<HttpResponse> {
    let template = store.get_template(&template_id)?;
    Ok(HttpResponse::Ok().json(template))
}

/// Handler for `GET /api/templates`.
pub async fn list(store: web::Data<Store>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(store.list_templates()?))
}
