//! Client for the backend's `/api` endpoints.
//!
//! Every call returns `Result<_, String>`; the error is the backend's
//! `message` when it sent one, so callers can hand it straight to a toast.
//! `Url` document sources are fetched here before they are sent, the backend
//! only accepts bytes and data URIs.

use std::collections::{BTreeMap, HashMap};

use common::geometry::PageSize;
use common::jobs::JobStatus;
use common::model::csv::ColumnCheck;
use common::model::data::ModelData;
use common::model::datasource::{DataSource, DataSourceType};
use common::model::field_mapping::FieldMapping;
use common::model::form_field::FormFieldDescriptor;
use common::model::source::DocumentSource;
use common::model::template::{MappingTemplate, TemplateSummary};
use common::requests::{
    DocumentRequest, FillCoordinatesRequest, FillFormRequest, StartMergeRequest,
};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use web_sys::{File, FormData};

use crate::helpers::{filled_file_name, js_error, save_bytes, PDF_MIME};

#[derive(Deserialize)]
struct IdResponse {
    id: String,
}

#[derive(Deserialize)]
struct JobIdResponse {
    job_id: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Turns a non-2xx response into the message the backend put in its body.
async fn check(response: Response) -> Result<Response, String> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    match response.json::<ErrorBody>().await {
        Ok(body) => Err(body.message),
        Err(_) => Err(format!("request failed with status {}", status)),
    }
}

async fn post_json(url: &str, body: &impl Serialize) -> Result<Response, String> {
    let response = Request::post(url)
        .json(body)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    check(response).await
}

async fn get(url: &str) -> Result<Response, String> {
    let response = Request::get(url).send().await.map_err(|e| e.to_string())?;
    check(response).await
}

async fn json<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    response.json::<T>().await.map_err(|e| e.to_string())
}

async fn bytes(response: Response) -> Result<Vec<u8>, String> {
    response.binary().await.map_err(|e| e.to_string())
}

/// Fetches `Url` sources into `Bytes`. Other sources are returned as they are.
pub async fn resolve_source(source: DocumentSource) -> Result<DocumentSource, String> {
    match source {
        DocumentSource::Url(url) => {
            let response = Request::get(&url)
                .send()
                .await
                .map_err(|e| format!("could not fetch {}: {}", url, e))?;
            if !response.ok() {
                return Err(format!("could not fetch {}: status {}", url, response.status()));
            }
            Ok(DocumentSource::Bytes(bytes(response).await?))
        }
        other => Ok(other),
    }
}

/// Page sizes in points, used to size the click overlay.
pub async fn page_sizes(source: DocumentSource) -> Result<Vec<PageSize>, String> {
    let request = DocumentRequest {
        source: resolve_source(source).await?,
    };
    json(post_json("/api/fill/pages", &request).await?).await
}

/// Stamps `data` at the mapped positions and returns the new PDF.
pub async fn fill_pdf(
    source: DocumentSource,
    mappings: Vec<FieldMapping>,
    data: ModelData,
) -> Result<Vec<u8>, String> {
    let request = FillCoordinatesRequest {
        source: resolve_source(source).await?,
        mappings,
        data,
    };
    bytes(post_json("/api/fill/coordinates", &request).await?).await
}

/// Fills the document and saves the result as `file_name`.
pub async fn download_filled_pdf(
    file_name: &str,
    source: DocumentSource,
    mappings: Vec<FieldMapping>,
    data: ModelData,
) -> Result<(), String> {
    let pdf = fill_pdf(source, mappings, data).await?;
    save_bytes(&filled_file_name(file_name), &pdf, PDF_MIME)
}

pub async fn detect_form_fields(source: DocumentSource) -> Result<Vec<FormFieldDescriptor>, String> {
    let request = DocumentRequest {
        source: resolve_source(source).await?,
    };
    json(post_json("/api/fill/fields", &request).await?).await
}

/// Current values of the document's form fields, by field name.
pub async fn read_form_values(source: DocumentSource) -> Result<BTreeMap<String, String>, String> {
    let request = DocumentRequest {
        source: resolve_source(source).await?,
    };
    json(post_json("/api/fill/values", &request).await?).await
}

/// Fills the document's AcroForm. A form that cannot be flattened fails with
/// the backend's explanation; callers may retry with `flatten` off.
pub async fn fill_form(
    source: DocumentSource,
    data: ModelData,
    rename_map: Option<HashMap<String, String>>,
    flatten: bool,
) -> Result<Vec<u8>, String> {
    let request = FillFormRequest {
        source: resolve_source(source).await?,
        data,
        rename_map,
        flatten,
    };
    bytes(post_json("/api/fill/form", &request).await?).await
}

/// Saves the template and returns its id. `Url` sources are stored as bytes.
pub async fn save_template(mut template: MappingTemplate) -> Result<String, String> {
    template.source = resolve_source(template.source).await?;
    let saved: IdResponse = json(post_json("/api/templates/save", &template).await?).await?;
    Ok(saved.id)
}

pub async fn list_templates() -> Result<Vec<TemplateSummary>, String> {
    json(get("/api/templates").await?).await
}

pub async fn get_template(id: &str) -> Result<MappingTemplate, String> {
    json(get(&format!("/api/templates/{}", id)).await?).await
}

/// Uploads `file` as the CSV data source of a saved template and returns its
/// columns with the first row as sample values.
pub async fn upload_csv(template_id: &str, file: &File) -> Result<Vec<ColumnCheck>, String> {
    let meta = serde_json::to_string(&DataSource {
        template_id: template_id.to_string(),
        kind: DataSourceType::Csv,
    })
    .map_err(|e| e.to_string())?;

    // The backend reads the `json` part before the `file` part.
    let form = FormData::new().map_err(js_error)?;
    form.append_with_str("json", &meta).map_err(js_error)?;
    form.append_with_blob_and_filename("file", file, &file.name())
        .map_err(js_error)?;

    let response = Request::post("/api/data_sources/csv/upload")
        .body(form)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    json(check(response).await?).await
}

/// Starts a job that fills the template once per CSV row; returns the job id.
pub async fn start_merge(template_id: &str) -> Result<String, String> {
    let request = StartMergeRequest {
        template_id: template_id.to_string(),
    };
    let started: JobIdResponse = json(post_json("/api/merge/start", &request).await?).await?;
    Ok(started.job_id)
}

pub async fn merge_status(job_id: &str) -> Result<JobStatus, String> {
    json(get(&format!("/api/merge/status/{}", job_id)).await?).await
}

/// Link to the PDF generated for `row` (0-based) by a merge job.
pub fn merge_output_url(job_id: &str, row: usize) -> String {
    format!("/api/merge/output/{}/{}", job_id, row)
}
