//! Runtime state of the mapper.
//!
//! The mapping list is owned here and pushed to the parent through
//! `on_change`; the parent never has to write it back.

use common::geometry::PageSize;
use common::model::field_mapping::FieldMapping;

use super::helpers::clamp_page;
use super::props::PdfMapperProps;

pub struct PdfMapper {
    pub mappings: Vec<FieldMapping>,

    /// Field placed by the next click on the page.
    pub selected_field: Option<String>,

    /// 1-based page shown in the viewer.
    pub current_page: u32,

    /// Size of every page in points, empty until the document has loaded.
    pub page_sizes: Vec<PageSize>,

    /// `blob:` URL of the loaded document. Revoked when replaced and on destroy.
    pub object_url: Option<String>,

    pub loading: bool,
    pub error: Option<String>,

    /// Incremented on every load; results of older loads are discarded.
    pub generation: u32,
}

impl PdfMapper {
    pub fn new(props: &PdfMapperProps) -> Self {
        Self {
            mappings: props.initial_mappings.clone(),
            selected_field: None,
            current_page: 1,
            page_sizes: Vec::new(),
            object_url: None,
            loading: false,
            error: None,
            generation: 0,
        }
    }

    pub fn page_count(&self) -> u32 {
        self.page_sizes.len() as u32
    }

    pub fn current_page_size(&self) -> Option<PageSize> {
        self.page_sizes
            .get(self.current_page.checked_sub(1)? as usize)
            .copied()
    }

    pub fn go_to_page(&mut self, page: u32) -> bool {
        let page = clamp_page(page, self.page_count());
        if page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }
}
