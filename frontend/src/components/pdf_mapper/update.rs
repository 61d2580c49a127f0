//! Update function for the mapper, Elm style: mutate the state for `msg` and
//! report whether the view must re-render.

use common::geometry::screen_to_document;
use common::model::field_mapping::{place_mapping, remove_mapping};
use yew::prelude::*;

use crate::helpers::{replace_object_url, revoke_object_url, show_toast};

use super::helpers::clamp_page;
use super::messages::Msg;
use super::state::PdfMapper;

pub fn update(component: &mut PdfMapper, ctx: &Context<PdfMapper>, msg: Msg) -> bool {
    match msg {
        Msg::Loaded {
            generation,
            url,
            pages,
        } => {
            if generation != component.generation {
                revoke_object_url(&url);
                return false;
            }
            replace_object_url(&mut component.object_url, Some(url));
            component.page_sizes = pages;
            component.current_page = clamp_page(component.current_page, component.page_count());
            component.loading = false;
            true
        }
        Msg::LoadFailed { generation, error } => {
            if generation != component.generation {
                return false;
            }
            gloo_console::error!(format!("failed to load document: {}", error));
            show_toast(&format!("Could not load the document: {}", error));
            component.loading = false;
            component.error = Some(error);
            true
        }
        Msg::SelectField(name) => {
            if component.selected_field.as_deref() == Some(name.as_str()) {
                component.selected_field = None;
            } else {
                component.selected_field = Some(name);
            }
            true
        }
        Msg::PlaceAt { offset_x, offset_y } => {
            let Some(field) = component.selected_field.clone() else {
                show_toast("Select a field before clicking on the page.");
                return false;
            };
            if component.current_page_size().is_none() {
                return false;
            }
            let (x, y) = screen_to_document(offset_x, offset_y, ctx.props().render_scale);
            place_mapping(&mut component.mappings, &field, component.current_page, x, y);
            notify_change(component, ctx);
            true
        }
        Msg::RemoveMapping(index) => {
            if remove_mapping(&mut component.mappings, index).is_none() {
                return false;
            }
            notify_change(component, ctx);
            true
        }
        Msg::SetFontSize(index, size) => match component.mappings.get_mut(index) {
            Some(mapping) => {
                mapping.font_size = size.filter(|s| s.is_finite() && *s > 0.0);
                notify_change(component, ctx);
                true
            }
            None => false,
        },
        Msg::GoToPage(page) => component.go_to_page(page),
        Msg::Save => {
            ctx.props().on_save.emit(component.mappings.clone());
            false
        }
    }
}

fn notify_change(component: &PdfMapper, ctx: &Context<PdfMapper>) {
    ctx.props().on_change.emit(component.mappings.clone());
}
