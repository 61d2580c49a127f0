pub mod data_sources;
pub mod pdf_mapper;
