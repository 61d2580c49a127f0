use common::jobs::JobStatus;
use common::model::csv::ColumnCheck;
use common::model::field_mapping::FieldMapping;
use common::model::template::{MappingTemplate, TemplateSummary};

pub enum Msg {
    TemplatesLoaded(Vec<TemplateSummary>),
    PdfSelected(web_sys::File),
    PdfRead { name: String, bytes: Vec<u8> },
    SetUrlInput(String),
    LoadUrl,
    SetNewField(String),
    AddField,
    ColumnsLoaded(Vec<ColumnCheck>),
    SetSample(String, String),
    MappingsChanged(Vec<FieldMapping>),
    SetTemplateName(String),
    /// Saves the template with these mappings (the mapper's "Save mappings").
    SaveTemplate(Vec<FieldMapping>),
    Saved(String),
    LoadTemplate(String),
    TemplateLoaded(MappingTemplate),
    Preview,
    PreviewReady(Vec<u8>),
    ClosePreview,
    Download,
    StartMerge,
    MergeStarted(String),
    MergeProgress { job_id: String, status: JobStatus },
    Failed(String),
}
