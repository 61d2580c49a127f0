//! State of the coordinate mapping example.

use std::collections::BTreeMap;

use common::jobs::JobStatus;
use common::model::data::{DataValue, ModelData};
use common::model::field_mapping::FieldMapping;
use common::model::source::DocumentSource;
use common::model::template::TemplateSummary;
use regex::Regex;
use yew::NodeRef;

use crate::helpers::compute_md5;

/// Same rule the backend applies to CSV headers.
const FIELD_NAME_PATTERN: &str = r"^[\p{L}\p{M}\p{N}\s\-_.]+$";

pub struct MergeJob {
    pub job_id: String,
    pub status: JobStatus,
}

pub struct MappingDemo {
    pub source: Option<DocumentSource>,
    pub file_name: String,
    pub url_input: String,

    /// Placeable names, in the order they were added.
    pub field_names: Vec<String>,
    pub new_field: String,
    /// Value used for each field when previewing or downloading.
    pub sample_values: BTreeMap<String, String>,

    /// Current list, as last reported by the mapper.
    pub mappings: Vec<FieldMapping>,
    /// List handed to the mapper when a document or template is loaded.
    pub loaded_mappings: Vec<FieldMapping>,

    pub template_name: String,
    pub template_id: Option<String>,
    pub templates: Vec<TemplateSummary>,
    /// MD5 of the name and mappings at the last save or load.
    pub saved_md5: Option<String>,

    pub preview_url: Option<String>,
    pub preview_loading: bool,
    pub preview_ref: NodeRef,

    pub merge: Option<MergeJob>,
}

impl MappingDemo {
    pub fn new() -> Self {
        Self {
            source: None,
            file_name: String::new(),
            url_input: String::new(),
            field_names: Vec::new(),
            new_field: String::new(),
            sample_values: BTreeMap::new(),
            mappings: Vec::new(),
            loaded_mappings: Vec::new(),
            template_name: String::new(),
            template_id: None,
            templates: Vec::new(),
            saved_md5: None,
            preview_url: None,
            preview_loading: false,
            preview_ref: NodeRef::default(),
            merge: None,
        }
    }

    /// Adds `name` to the palette unless it is already there.
    pub fn add_field(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.field_names.iter().any(|f| f == name) {
            return false;
        }
        self.field_names.push(name.to_string());
        true
    }

    /// Sample values as model data. Blank values are left out.
    pub fn model_data(&self) -> ModelData {
        self.sample_values
            .iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(key, value)| (key.clone(), DataValue::Text(value.clone())))
            .collect()
    }

    pub fn content_md5(&self) -> String {
        let content = serde_json::to_string(&(&self.template_name, &self.mappings)).unwrap_or_default();
        compute_md5(&content)
    }

    pub fn is_dirty(&self) -> bool {
        match &self.saved_md5 {
            Some(saved) => *saved != self.content_md5(),
            None => !self.mappings.is_empty(),
        }
    }

    /// Field names seen in `mappings` are added to the palette so a loaded
    /// template can be edited further.
    pub fn adopt_mapped_fields(&mut self, mappings: &[FieldMapping]) {
        for mapping in mappings {
            self.add_field(&mapping.field_name);
        }
    }
}

pub fn valid_field_name(name: &str) -> bool {
    Regex::new(FIELD_NAME_PATTERN)
        .map(|re| re.is_match(name.trim()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_are_unique_and_trimmed() {
        let mut demo = MappingDemo::new();
        assert!(demo.add_field(" name "));
        assert!(!demo.add_field("name"));
        assert!(!demo.add_field("   "));
        assert_eq!(demo.field_names, vec!["name"]);
    }

    #[test]
    fn blank_samples_are_not_data() {
        let mut demo = MappingDemo::new();
        demo.sample_values.insert("name".into(), "Jane".into());
        demo.sample_values.insert("city".into(), "  ".into());
        let data = demo.model_data();
        assert_eq!(data.len(), 1);
        assert_eq!(data["name"], DataValue::Text("Jane".into()));
    }

    #[test]
    fn dirty_tracks_saved_content() {
        let mut demo = MappingDemo::new();
        assert!(!demo.is_dirty());
        demo.mappings.push(FieldMapping::new("name", 1, 1.0, 2.0));
        assert!(demo.is_dirty());
        demo.saved_md5 = Some(demo.content_md5());
        assert!(!demo.is_dirty());
        demo.template_name = "Renamed".into();
        assert!(demo.is_dirty());
    }

    #[test]
    fn field_name_rule() {
        assert!(valid_field_name("address.city"));
        assert!(valid_field_name("Año_2"));
        assert!(!valid_field_name("a/b"));
        assert!(!valid_field_name(""));
    }
}
