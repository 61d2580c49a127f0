pub mod data_sources;
pub mod fill;
pub mod merge;
pub mod templates;
