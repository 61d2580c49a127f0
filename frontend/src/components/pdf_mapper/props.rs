//! Properties of the [`PdfMapper`](super::PdfMapper) component.

use common::model::field_mapping::FieldMapping;
use common::model::source::DocumentSource;
use yew::prelude::*;

/// CSS pixels per document point when the caller does not choose a scale.
pub const DEFAULT_RENDER_SCALE: f64 = 1.5;

#[derive(Properties, PartialEq, Clone)]
pub struct PdfMapperProps {
    /// The document to place fields on. `Url` sources are fetched by the
    /// component. Changing the source resets the mappings to `initial_mappings`.
    pub source: DocumentSource,

    /// Names that can be placed. The same name may be placed any number of times.
    #[prop_or_default]
    pub field_names: Vec<String>,

    /// Mappings shown when the document is loaded, e.g. from a saved template.
    #[prop_or_default]
    pub initial_mappings: Vec<FieldMapping>,

    /// Receives the full list after every placement, removal or edit.
    #[prop_or_default]
    pub on_change: Callback<Vec<FieldMapping>>,

    /// Receives the full list when the user presses "Save mappings".
    #[prop_or_default]
    pub on_save: Callback<Vec<FieldMapping>>,

    #[prop_or(DEFAULT_RENDER_SCALE)]
    pub render_scale: f64,
}
