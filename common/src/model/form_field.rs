use serde::{Deserialize, Serialize};

/// Closed set of AcroForm field categories the fill routine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormFieldType {
    Text,
    Checkbox,
    Dropdown,
    Radio,
    Other,
}

/// Read-only description of a form field found in a loaded document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormFieldDescriptor {
    /// Fully-qualified field name, parent segments joined with `.`.
    pub name: String,
    pub field_type: FormFieldType,
    /// Allowed values for dropdowns and radio groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}
