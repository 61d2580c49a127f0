use super::output_path;
use crate::config::Config;
use crate::error::{AppError, Result};
use actix_files::NamedFile;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::web;
use uuid::Uuid;

/// Serves the PDF a merge job produced for one data row.
pub(crate) async fn process(
    path: web::Path<(String, usize)>,
    config: web::Data<Config>,
) -> Result<NamedFile> {
    let (job_id, row) = path.into_inner();
    // Job ids are UUIDs; anything else must not reach the filesystem.
    if Uuid::parse_str(&job_id).is_err() {
        return Err(AppError::BadRequest(format!("invalid job id '{}'", job_id)));
    }

    let file = output_path(&config, &job_id, row);
    let named = NamedFile::open(&file)
        .map_err(|_| AppError::NotFound(format!("no output for row {} of job {}", row, job_id)))?;
    Ok(named
        .set_content_type(mime_guess::mime::APPLICATION_PDF)
        .set_content_disposition(ContentDisposition {
            disposition: DispositionType::Inline,
            parameters: vec![DispositionParam::Filename(format!("row_{}.pdf", row + 1))],
        }))
}
