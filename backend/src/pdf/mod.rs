//! # PDF Mutation Layer
//!
//! Everything that touches PDF bytes lives here. Parsing, object-graph edits and
//! serialization are delegated to `lopdf`; this module only decides *what* to
//! change:
//!
//! - `stamp`: draws mapped data values as text at fixed page coordinates.
//! - `acroform`: lists, fills, reads back and flattens AcroForm fields.
//! - `pages`: reports page sizes for the mapping overlay.
//!
//! All entry points take and return raw bytes so the HTTP layer and the merge
//! worker can call them from blocking threads without sharing a `Document`.

pub mod acroform;
mod objects;
pub mod pages;
pub mod stamp;

#[cfg(test)]
pub(crate) mod fixtures;

use lopdf::Document;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("could not read PDF: {0}")]
    Load(lopdf::Error),

    #[error("could not write PDF: {0}")]
    Save(String),

    #[error("unexpected PDF structure: {0}")]
    Structure(String),

    #[error("could not flatten field '{0}': it has no appearance stream")]
    Flatten(String),

    #[error("invalid document source: {0}")]
    Source(#[from] common::model::source::SourceError),
}

impl From<lopdf::Error> for PdfError {
    fn from(e: lopdf::Error) -> Self {
        PdfError::Structure(e.to_string())
    }
}

impl From<std::io::Error> for PdfError {
    fn from(e: std::io::Error) -> Self {
        PdfError::Save(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PdfError>;

/// Parses `bytes` into a `Document`.
pub(crate) fn load(bytes: &[u8]) -> Result<Document> {
    Document::load_mem(bytes).map_err(PdfError::Load)
}

/// Serializes `doc` back into bytes.
pub(crate) fn save(doc: &mut Document) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    Ok(out)
}
