use super::{document_bytes, pdf_response};
use crate::error::Result;
use crate::pdf::acroform;
use actix_web::{web, HttpResponse};
use common::requests::FillFormRequest;
use log::info;

/// Handler for `POST /api/fill/form`.
///
/// Responds `422 Unprocessable Entity` when flattening was requested and a
/// filled field has no appearance; the client may retry with `flatten: false`.
pub async fn process(payload: web::Json<FillFormRequest>) -> Result<HttpResponse> {
    let bytes = fill_form(payload.into_inner()).await?;
    Ok(pdf_response(bytes, "form.pdf"))
}

async fn fill_form(req: FillFormRequest) -> Result<Vec<u8>> {
    let source = document_bytes(&req.source)?;
    let entries = req.data.len();
    let flatten = req.flatten;
    let bytes = web::block(move || {
        acroform::fill_form(&source, &req.data, req.rename_map.as_ref(), req.flatten)
    })
    .await??;
    info!("form fill: {} values, flatten={}", entries, flatten);
    Ok(bytes)
}
