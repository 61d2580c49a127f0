use crate::model::field_mapping::FieldMapping;
use crate::model::source::DocumentSource;
use serde::{Deserialize, Serialize};

/// A named document plus the mappings placed on it.
///
/// `id` is assigned by whatever stores the template; a template that has never
/// been saved has no id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingTemplate {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub source: DocumentSource,
    #[serde(default)]
    pub mappings: Vec<FieldMapping>,
    /// MD5 of the CSV data source attached to this template, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource_md5: Option<String>,
}

/// Listing entry returned by `GET /api/templates`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    pub mapping_count: usize,
    pub has_datasource: bool,
}
