use super::data_file;
use super::table::CsvTable;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::store::Store;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use common::model::csv::ColumnCheck;
use common::model::datasource::DataSource;
use futures_util::StreamExt;
use log::{debug, info};
use md5::Context;
use serde_json::from_slice;
use std::fs;

fn bad_request(e: impl std::fmt::Display) -> AppError {
    AppError::BadRequest(e.to_string())
}

/// HTTP handler for `POST /api/data_sources/csv/upload`.
///
/// - On success: returns `200 OK` with the columns of the file.
/// - On failure: `400 Bad Request` for malformed uploads, `404` for an unknown template.
pub async fn process(
    store: web::Data<Store>,
    config: web::Data<Config>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let columns = upload_data_source(&store, &config, payload).await?;
    Ok(HttpResponse::Ok().json(columns))
}

/// Reads a `DataSource` JSON part followed by a CSV file part, stores the file
/// and links it to the template through its MD5.
pub async fn upload_data_source(
    store: &Store,
    config: &Config,
    mut payload: Multipart,
) -> Result<Vec<ColumnCheck>> {
    let mut data_source: Option<DataSource> = None;
    let mut db_md5: Option<String> = None;
    let mut contents: Option<Vec<u8>> = None;
    let mut md5_hasher = Context::new();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(bad_request)?;
        let part_name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        match part_name.as_deref() {
            Some("json") => {
                let mut bytes = Vec::new();
                while let Some(chunk) = field.next().await {
                    bytes.extend_from_slice(&chunk.map_err(bad_request)?);
                }
                let ds: DataSource = from_slice(&bytes).map_err(bad_request)?;
                db_md5 = store.datasource_md5(&ds.template_id)?;
                data_source = Some(ds);
            }

            Some("file") => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
                    .unwrap_or_default();
                if !filename.to_ascii_lowercase().ends_with(".csv") {
                    return Err(bad_request("The file must end with .csv"));
                }
                if data_source.is_none() {
                    return Err(bad_request("DataSource JSON must be sent before the file"));
                }

                let mut bytes = Vec::new();
                while let Some(chunk) = field.next().await {
                    let chunk = chunk.map_err(bad_request)?;
                    md5_hasher.consume(&chunk);
                    bytes.extend_from_slice(&chunk);
                }
                contents = Some(bytes);
            }

            _ => {}
        }
    }

    let ds = data_source.ok_or_else(|| bad_request("Missing DataSource"))?;
    let bytes = contents.ok_or_else(|| bad_request("Missing file"))?;
    let table = CsvTable::parse(&bytes)?;
    let computed_md5 = format!("{:x}", md5_hasher.finalize());

    if db_md5.as_deref() == Some(computed_md5.as_str()) {
        debug!("data source for {} unchanged", ds.template_id);
    } else {
        fs::create_dir_all(&config.data_dir)?;
        fs::write(data_file(config, &ds.template_id, &computed_md5), &bytes)?;
        store.set_datasource_md5(&ds.template_id, &computed_md5)?;
        info!(
            "stored data source for {} ({} rows, md5 {})",
            ds.template_id,
            table.rows.len(),
            computed_md5
        );
    }

    Ok(table.column_checks())
}
