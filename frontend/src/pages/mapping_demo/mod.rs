//! Coordinate mapping example: open a PDF, place fields on it, save it as a
//! template, then preview or download a filled copy. Templates with a CSV
//! data source can also be filled once per row on the server.

use yew::prelude::*;

mod messages;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use state::MappingDemo;

use crate::helpers::{replace_object_url, set_window_dirty_flag};

impl Component for MappingDemo {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        update::refresh_templates(ctx.link());
        MappingDemo::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        replace_object_url(&mut self.preview_url, None);
        set_window_dirty_flag(false);
    }
}
