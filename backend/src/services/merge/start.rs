//! # Merge Job Start Service
//!
//! This module provides the `POST /api/merge/start` endpoint, which initiates a
//! background job that fills a template once per row of its CSV data source.
//!
//! ## Workflow:
//!
//! 1.  **HTTP Request**: The `process` handler receives a `StartMergeRequest` containing
//!     a `template_id`.
//!
//! 2.  **Job Scheduling**: It calls `schedule_merge_job`, which:
//!     - Creates a unique `job_id` for the merge operation.
//!     - Sets the initial job status to `Pending` in the shared `JobsState`.
//!     - Spawns a new Tokio task to manage the job's lifecycle.
//!     - Returns the `job_id` to the client, which polls `/api/merge/status/{job_id}`.
//!
//! 3.  **Background Processing**: The spawned task uses `tokio::task::spawn_blocking` to
//!     run `merge_blocking` on a dedicated thread so PDF work never blocks the runtime.
//!
//! 4.  **Row Filling**: `merge_blocking` loads the template and its data source, then fills
//!     the rows in parallel with `rayon`. Each row's values are stamped at the template's
//!     mapped positions and written to `{output_dir}/{job_id}_{row}.pdf`.
//!
//! 5.  **Progress Reporting**: Every finished row sends a `MergeUpdate` back to the async
//!     context, where it is translated into a percentage and forwarded to the
//!     `job_controller`.

use crate::config::Config;
use crate::job_controller::state::{JobUpdate, JobsState};
use crate::pdf::stamp;
use crate::services::data_sources::csv::data_file;
use crate::services::data_sources::csv::table::CsvTable;
use crate::services::merge::output_path;
use crate::store::Store;
use actix_web::{web, HttpResponse};
use common::jobs::{merge_summary, JobStatus};
use common::requests::StartMergeRequest;
use log::{error, info};
use rayon::prelude::*;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Represents a status update for a merge job or one of its rows.
///
/// Sent from the synchronous worker (`merge_blocking`) to the async task that
/// manages the job, so the worker never needs to `await`.
#[derive(Debug)]
pub enum MergeUpdate {
    /// Updates the overall status of the entire merge job (e.g., to Failed).
    Job(JobStatus),
    /// `processed` of `total_rows` rows have been written.
    Task { processed: usize, total_rows: usize },
}

/// The Actix web handler for `POST /api/merge/start`.
///
/// Schedules the background merge job and immediately returns its `job_id`.
pub(crate) async fn process(
    state: web::Data<JobsState>,
    store: web::Data<Store>,
    config: web::Data<Config>,
    payload: web::Json<StartMergeRequest>,
) -> crate::error::Result<HttpResponse> {
    // Unknown templates are a 404 rather than a failed job.
    store.get_template(&payload.template_id)?;
    let job_id = schedule_merge_job(
        &state,
        store.get_ref().clone(),
        config.get_ref().clone(),
        payload.into_inner(),
    )
    .await;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "job_id": job_id })))
}

/// Registers the job as `Pending` and spawns the task that runs it.
async fn schedule_merge_job(
    state: &JobsState,
    store: Store,
    config: Config,
    req: StartMergeRequest,
) -> String {
    let job_id = Uuid::new_v4().to_string();
    state
        .jobs
        .write()
        .await
        .insert(job_id.clone(), JobStatus::Pending);

    let tx = state.tx.clone(); // Channel to the central job updater.
    let job_id_clone = job_id.clone();
    let template_id = req.template_id;

    tokio::spawn(async move {
        // Dedicated channel for this job's updates.
        let (merge_tx, mut merge_rx) = mpsc::channel::<MergeUpdate>(100);

        // Translates `MergeUpdate`s from the worker into `JobUpdate`s.
        let job_updater_tx = tx.clone();
        let job_id_for_updater = job_id_clone.clone();
        let updater = tokio::spawn(async move {
            while let Some(update) = merge_rx.recv().await {
                let status = match update {
                    MergeUpdate::Job(job_status) => job_status,
                    MergeUpdate::Task {
                        processed,
                        total_rows,
                    } => JobStatus::InProgress(progress(processed, total_rows)),
                };
                let _ = job_updater_tx
                    .send(JobUpdate {
                        job_id: job_id_for_updater.clone(),
                        status,
                    })
                    .await;
            }
        });

        let job_id_for_blocking = job_id_clone.clone();
        let handle = tokio::task::spawn_blocking(move || {
            merge_blocking(merge_tx, &job_id_for_blocking, &template_id, &store, &config)
        });

        let status = match handle.await {
            Ok(Ok(rows)) => {
                info!("merge job {} finished: {} documents", job_id_clone, rows);
                JobStatus::Completed(merge_summary(rows))
            }
            Ok(Err(e)) => {
                error!("merge job {} failed: {}", job_id_clone, e);
                JobStatus::Failed(e)
            }
            Err(e) => JobStatus::Failed(format!("Task join error: {}", e)),
        };
        // The worker's sender is gone by now; let pending progress drain so
        // it cannot overwrite the final status.
        let _ = updater.await;
        let _ = tx
            .send(JobUpdate {
                job_id: job_id_clone,
                status,
            })
            .await;
    });

    job_id
}

fn progress(processed: usize, total_rows: usize) -> u32 {
    if total_rows == 0 {
        return 0;
    }
    (processed as f32 / total_rows as f32 * 100.0) as u32
}

/// Fills the template once per data row and writes each result to disk.
///
/// Returns the number of documents written.
fn merge_blocking(
    tx: mpsc::Sender<MergeUpdate>,
    job_id: &str,
    template_id: &str,
    store: &Store,
    config: &Config,
) -> Result<usize, String> {
    let _ = tx.blocking_send(MergeUpdate::Job(JobStatus::InProgress(0)));

    let template = store.get_template(template_id).map_err(|e| e.to_string())?;
    let ds_md5 = template
        .datasource_md5
        .as_deref()
        .ok_or("Template has no data source")?;
    let source = template.source.to_bytes().map_err(|e| e.to_string())?;
    let table = CsvTable::load(&data_file(config, template_id, ds_md5)).map_err(|e| e.to_string())?;
    let total_rows = table.rows.len();

    fs::create_dir_all(&config.output_dir).map_err(|e| e.to_string())?;

    let processed = AtomicUsize::new(0);
    (0..total_rows).into_par_iter().try_for_each(|row| {
        let data = table.row_data(row);
        let (bytes, _) = stamp::fill_mappings(&source, &template.mappings, &data)
            .map_err(|e| format!("Failed to fill row {}: {}", row + 1, e))?;
        fs::write(output_path(config, job_id, row), bytes)
            .map_err(|e| format!("Failed to write row {}: {}", row + 1, e))?;

        let done = processed.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = tx.blocking_send(MergeUpdate::Task {
            processed: done,
            total_rows,
        });
        Ok::<(), String>(())
    })?;

    Ok(total_rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures;
    use crate::store::tests::temp_store;
    use common::model::field_mapping::FieldMapping;
    use common::model::source::DocumentSource;
    use common::model::template::MappingTemplate;

    #[test]
    fn progress_is_a_percentage() {
        assert_eq!(progress(0, 0), 0);
        assert_eq!(progress(1, 4), 25);
        assert_eq!(progress(4, 4), 100);
    }

    #[test]
    fn writes_one_pdf_per_row() {
        let (dir, store) = temp_store();
        let config = Config {
            data_dir: dir.path().join("data"),
            output_dir: dir.path().join("out"),
            ..Config::default()
        };
        let template_id = store
            .save_template(&MappingTemplate {
                id: None,
                name: "Letter".into(),
                source: DocumentSource::Bytes(fixtures::blank_pdf(&[(612.0, 792.0)])),
                mappings: vec![FieldMapping::new("name", 1, 72.0, 72.0)],
                datasource_md5: None,
            })
            .unwrap();
        fs::create_dir_all(&config.data_dir).unwrap();
        fs::write(data_file(&config, &template_id, "abc"), "name\nJane\nJohn\n").unwrap();
        store.set_datasource_md5(&template_id, "abc").unwrap();

        let (tx, mut rx) = mpsc::channel(16);
        let rows = merge_blocking(tx, "job", &template_id, &store, &config).unwrap();
        assert_eq!(rows, 2);
        for row in 0..2 {
            let bytes = fs::read(output_path(&config, "job", row)).unwrap();
            assert!(bytes.starts_with(b"%PDF"));
        }

        // Rows finish in any order, so only the final count is checked.
        let mut updates = Vec::new();
        while let Ok(update) = rx.try_recv() {
            updates.push(update);
        }
        assert!(updates
            .iter()
            .any(|u| matches!(u, MergeUpdate::Task { processed: 2, total_rows: 2 })));
    }

    #[test]
    fn fails_without_data_source() {
        let (dir, store) = temp_store();
        let config = Config {
            output_dir: dir.path().join("out"),
            ..Config::default()
        };
        let template_id = store
            .save_template(&MappingTemplate {
                id: None,
                name: "Letter".into(),
                source: DocumentSource::Bytes(fixtures::blank_pdf(&[(612.0, 792.0)])),
                mappings: Vec::new(),
                datasource_md5: None,
            })
            .unwrap();
        let (tx, _rx) = mpsc::channel(16);
        let err = merge_blocking(tx, "job", &template_id, &store, &config).unwrap_err();
        assert!(err.contains("no data source"));
    }
}
