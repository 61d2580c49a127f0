//! # Merge Service Module
//!
//! Batch fill: one filled PDF per row of a template's CSV data source. Jobs run
//! in the background and are tracked through the shared `JobsState`.

mod output;
mod start;
mod status;

use crate::config::Config;
use actix_web::web;
use std::path::PathBuf;

const API_PATH: &str = "/api/merge";

/// Configures and returns the Actix `Scope` for all merge-related routes.
///
/// *   **`POST /start`**: `StartMergeRequest` to `{ "job_id": ... }`.
/// *   **`GET /status/{job_id}`**: the job's `JobStatus`.
/// *   **`GET /output/{job_id}/{row}`**: the PDF produced for a data row (0-based).
pub fn configure_routes() -> actix_web::Scope {
    web::scope(API_PATH)
        .route("/start", web::post().to(start::process))
        .route("/status/{job_id}", web::get().to(status::process))
        .route("/output/{job_id}/{row}", web::get().to(output::process))
}

/// Where a job writes the PDF for `row`.
pub(crate) fn output_path(config: &Config, job_id: &str, row: usize) -> PathBuf {
    config.output_dir.join(format!("{}_{}.pdf", job_id, row))
}
