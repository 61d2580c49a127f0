use serde::{Deserialize, Serialize};

/// Metadata part of a CSV upload: the template the file belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSource {
    pub template_id: String,
    #[serde(default = "DataSourceType::default_csv")]
    pub kind: DataSourceType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DataSourceType {
    Csv,
}

impl DataSourceType {
    fn default_csv() -> Self {
        DataSourceType::Csv
    }
}
