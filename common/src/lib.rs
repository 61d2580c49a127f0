//! Types shared by the backend and the WASM frontend: the mapping and form
//! models, HTTP request payloads, job status, and the coordinate math used to
//! turn clicks on a rendered page into document points.

pub mod geometry;
pub mod jobs;
pub mod model;
pub mod requests;
