use crate::error::Result;
use crate::store::Store;
use actix_web::{web, HttpResponse};
use common::model::template::MappingTemplate;
use log::info;

pub async fn process(
    store: web::Data<Store>,
    payload: web::Json<MappingTemplate>,
) -> Result<HttpResponse> {
    let id = save_template(&store, &payload)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "id": id })))
}

pub fn save_template(store: &Store, payload: &MappingTemplate) -> Result<String> {
    let id = store.save_template(payload)?;
    info!(
        "saved template '{}' ({}) with {} mappings",
        payload.name,
        id,
        payload.mappings.len()
    );
    Ok(id)
}
