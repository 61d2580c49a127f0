//! # Template Service Module
//!
//! This module aggregates all API endpoints related to the management of mapping
//! templates: a named document together with the field mappings placed on it.
//! It acts as a router, directing incoming HTTP requests under the `/api/templates`
//! path to the appropriate handler logic defined in its sub-modules.
//!
//! ## Sub-modules:
//! - `get`: Lists stored templates and retrieves a single one.
//! - `save`: Creates and updates templates.
//! - `delete`: Removes a template.
//! - `fill`: Stamps caller-supplied data onto a stored template's document.

mod delete;
mod fill;
mod get;
mod save;

use actix_web::web::{delete, get, post, scope};
use actix_web::Scope;

/// The base path for all template-related API endpoints.
const API_PATH: &str = "/api/templates";

/// Configures and returns the Actix `Scope` for all template-related routes.
///
/// # Registered Routes:
///
/// *   **`POST /save`**:
///     - **Handler**: `save::process`
///     - **Description**: Creates a new template or updates an existing one from a
///       JSON `MappingTemplate`. Responds with `{ "id": ... }`; templates sent
///       without an id are assigned one.
///
/// *   **`GET /`**:
///     - **Handler**: `get::list`
///     - **Description**: Summaries of every stored template.
///
/// *   **`GET /{template_id}`**:
///     - **Handler**: `get::process`
///     - **Description**: The complete template, including its document and mappings.
///
/// *   **`DELETE /{template_id}`**:
///     - **Handler**: `delete::process`
///     - **Description**: Removes the template. `404` when it does not exist.
///
/// *   **`POST /{template_id}/fill`**:
///     - **Handler**: `fill::process`
///     - **Description**: Takes a JSON object of field values and returns the
///       template's document with those values stamped at the mapped positions.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(get::list))
        .route("/save", post().to(save::process))
        .route("/{template_id}", get().to(get::process))
        .route("/{template_id}", delete().to(delete::process))
        .route("/{template_id}/fill", post().to(fill::process))
}
