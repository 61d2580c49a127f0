use crate::error::{AppError, Result};
use crate::store::Store;
use actix_web::{web, HttpResponse};
use log::info;

pub async fn process(
    store: web::Data<Store>,
    template_id: web::Path<String>,
) -> Result<HttpResponse> {
    if !store.delete_template(&template_id)? {
        return Err(AppError::NotFound(format!("template {}", template_id)));
    }
    info!("deleted template {}", template_id);
    Ok(HttpResponse::NoContent().finish())
}
