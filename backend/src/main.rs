mod config;
mod error;
mod job_controller;
mod pdf;
mod services;
mod store;

use crate::config::Config;
use crate::error::AppError;
use crate::job_controller::state::{start_job_updater, JobsState};
use crate::store::Store;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use env_logger::Env;
use include_dir::{include_dir, Dir};
use log::info;
use mime_guess::from_path;
use std::thread;
use std::time::Duration;

static STATIC_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/static/dist");

async fn serve_embedded(req: HttpRequest) -> HttpResponse {
    let path = req.path().trim_start_matches('/');
    let file_path = if path.is_empty() { "index.html" } else { path };

    match STATIC_DIR.get_file(file_path) {
        Some(file) => {
            let mime = from_path(file_path).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime.as_ref())
                .body(file.contents().to_vec())
        }
        None => match STATIC_DIR.get_file("index.html") {
            Some(index) => HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(index.contents().to_vec()),
            None => HttpResponse::NotFound().body("Not Found"),
        },
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env();
    let store = Store::new(&config.db_path);
    store
        .init()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    info!("Templates stored in {}", store.path().display());

    let url = config.url();
    if config.open_browser {
        let url_clone = url.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(500));
            let _ = webbrowser::open(&url_clone);
        });
    }

    // Initialize job controller state and its updater task.
    let (jobs_state, rx) = JobsState::new(100);
    tokio::spawn(start_job_updater(jobs_state.clone(), rx));

    info!("Server running at {}", url);

    let bind = (config.host.clone(), config.port);
    let json_limit = config.json_limit_bytes();
    let jobs_state = web::Data::new(jobs_state);
    let store = web::Data::new(store);
    let config = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            .app_data(
                web::JsonConfig::default()
                    .limit(json_limit)
                    .error_handler(|err, _| AppError::BadRequest(err.to_string()).into()),
            )
            .app_data(jobs_state.clone())
            .app_data(store.clone())
            .app_data(config.clone())
            .service(services::fill::configure_routes())
            .service(services::templates::configure_routes())
            .service(services::data_sources::csv::configure_routes())
            .service(services::merge::configure_routes())
            .default_service(web::route().to(serve_embedded))
    })
        .bind(bind)?
        .run()
        .await
}
