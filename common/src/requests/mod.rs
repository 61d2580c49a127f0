//! JSON payloads accepted by the backend's `/api` endpoints.

use crate::model::data::ModelData;
use crate::model::field_mapping::FieldMapping;
use crate::model::source::DocumentSource;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Body of `POST /api/fill/coordinates`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillCoordinatesRequest {
    pub source: DocumentSource,
    pub mappings: Vec<FieldMapping>,
    #[serde(default)]
    pub data: ModelData,
}

/// Body of `POST /api/fill/form`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillFormRequest {
    pub source: DocumentSource,
    #[serde(default)]
    pub data: ModelData,
    /// Data key to form field name, for data whose keys differ from the form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rename_map: Option<HashMap<String, String>>,
    #[serde(default)]
    pub flatten: bool,
}

/// Body of the endpoints that only inspect a document
/// (`/api/fill/fields`, `/api/fill/values`, `/api/fill/pages`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRequest {
    pub source: DocumentSource,
}

/// Body of `POST /api/merge/start`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartMergeRequest {
    pub template_id: String,
}
