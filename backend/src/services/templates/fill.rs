use crate::error::Result;
use crate::pdf::stamp;
use crate::services::fill::{document_bytes, pdf_response};
use crate::store::Store;
use actix_web::{web, HttpResponse};
use common::model::data::ModelData;
use log::info;

/// Handler for `POST /api/templates/{template_id}/fill`.
pub async fn process(
    store: web::Data<Store>,
    template_id: web::Path<String>,
    payload: web::Json<ModelData>,
) -> Result<HttpResponse> {
    let template = store.get_template(&template_id)?;
    let source = document_bytes(&template.source)?;
    let data = payload.into_inner();
    let (bytes, report) =
        web::block(move || stamp::fill_mappings(&source, &template.mappings, &data)).await??;
    info!(
        "filled template {}: {} drawn, {} skipped",
        template_id,
        report.drawn,
        report.skipped_no_data + report.skipped_page
    );
    Ok(pdf_response(bytes, &format!("{}.pdf", template_id)))
}
