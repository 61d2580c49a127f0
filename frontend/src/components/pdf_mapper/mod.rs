//! `PdfMapper`: places data fields on a PDF by clicking on its pages.
//!
//! Clicks are converted from screen pixels to document points with
//! `common::geometry`, appended to the mapping list and reported through the
//! `on_change` callback. The component owns one object URL for the loaded
//! document.

use yew::platform::spawn_local;
use yew::prelude::*;

mod helpers;
mod messages;
mod props;
mod state;
mod update;
mod view;

use crate::api;
use crate::helpers::{object_url, replace_object_url, PDF_MIME};
pub use messages::Msg;
pub use props::{PdfMapperProps, DEFAULT_RENDER_SCALE};
pub use state::PdfMapper;

impl Component for PdfMapper {
    type Message = Msg;
    type Properties = PdfMapperProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut mapper = PdfMapper::new(ctx.props());
        mapper.load_document(ctx);
        mapper
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        let props = ctx.props();
        if props.source != old_props.source {
            self.mappings = props.initial_mappings.clone();
            self.current_page = 1;
            self.load_document(ctx);
        } else if props.initial_mappings != old_props.initial_mappings {
            self.mappings = props.initial_mappings.clone();
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        replace_object_url(&mut self.object_url, None);
    }
}

impl PdfMapper {
    /// Resolves the source, asks the backend for its page sizes and publishes
    /// the bytes as an object URL for the viewer.
    fn load_document(&mut self, ctx: &Context<Self>) {
        self.generation += 1;
        self.loading = true;
        self.error = None;

        let generation = self.generation;
        let source = ctx.props().source.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            let loaded = async {
                let source = api::resolve_source(source).await?;
                let bytes = source.to_bytes().map_err(|e| e.to_string())?;
                let pages = api::page_sizes(source).await?;
                let url = object_url(&bytes, PDF_MIME)?;
                Ok::<_, String>((url, pages))
            }
            .await;

            link.send_message(match loaded {
                Ok((url, pages)) => Msg::Loaded {
                    generation,
                    url,
                    pages,
                },
                Err(error) => Msg::LoadFailed { generation, error },
            });
        });
    }
}
