use common::geometry::PageSize;

pub enum Msg {
    /// The document finished loading. `generation` identifies the load that
    /// produced it so a stale result can be dropped.
    Loaded {
        generation: u32,
        url: String,
        pages: Vec<PageSize>,
    },
    LoadFailed {
        generation: u32,
        error: String,
    },
    SelectField(String),
    /// A click on the page overlay, in CSS pixels from the page's top-left corner.
    PlaceAt { offset_x: f64, offset_y: f64 },
    RemoveMapping(usize),
    SetFontSize(usize, Option<f32>),
    GoToPage(u32),
    Save,
}
