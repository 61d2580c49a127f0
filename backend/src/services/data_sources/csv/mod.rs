//! Manages CSV data sources attached to templates.
//!
//! A data source is a CSV file whose header titles name the fields of a
//! template and whose rows hold one set of values each. The batch fill job
//! (`services::merge`) stamps one PDF per row.
//!
//! The provided routes are:
//! - `POST /api/data_sources/csv/upload`: Handles multipart/form-data uploads. It expects a `json`
//!   field containing the `DataSource` (the template it belongs to) followed by a `file` field with
//!   the CSV data. The header is validated, the file is stored under the data directory with a name
//!   derived from the template id and the file's MD5, and the template is linked to it. The response
//!   lists the columns with their first-row values.

use crate::config::Config;
use actix_web::web::{post, scope};
use actix_web::Scope;
use std::path::PathBuf;

pub(crate) mod table;
mod upload;

const API_PATH: &str = "/api/data_sources/csv";

/// Configures and returns the Actix scope for CSV data source routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        // Route to upload a new CSV file.
        .route("/upload", post().to(upload::process))
}

/// Location of a stored data source.
pub(crate) fn data_file(config: &Config, template_id: &str, md5: &str) -> PathBuf {
    config.data_dir.join(format!("{}_{}.csv", template_id, md5))
}
