pub mod csv;
pub mod data;
pub mod datasource;
pub mod field_mapping;
pub mod form_field;
pub mod source;
pub mod template;
