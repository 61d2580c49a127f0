use crate::app::App;

mod api;
mod app;
mod components;
mod helpers;
mod pages;
mod tops_sheet;

fn main() {
    yew::Renderer::<App>::new().render();
}
