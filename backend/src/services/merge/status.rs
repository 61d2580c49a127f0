use crate::error::{AppError, Result};
use crate::job_controller::state::JobsState;
use actix_web::{web, HttpResponse};

pub(crate) async fn process(
    job_id: web::Path<String>,
    state: web::Data<JobsState>,
) -> Result<HttpResponse> {
    let jobs = state.jobs.read().await;
    match jobs.get(job_id.as_str()) {
        Some(status) => Ok(HttpResponse::Ok().json(status)),
        None => Err(AppError::NotFound(format!("job {}", job_id))),
    }
}
