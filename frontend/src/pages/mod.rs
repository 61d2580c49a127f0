pub mod form_fill_demo;
pub mod mapping_demo;
