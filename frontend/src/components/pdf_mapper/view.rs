//! View for the mapper: a field palette and the list of mappings on the
//! current page beside the document, which is shown by the browser's own PDF
//! viewer under a transparent overlay that receives the clicks.

use common::model::field_mapping::mappings_for_page;
use web_sys::HtmlInputElement;
use yew::html::Scope;
use yew::prelude::*;

use super::helpers::{frame_style, marker_style, overlay_style, placement_count, viewer_src};
use super::messages::Msg;
use super::state::PdfMapper;

pub fn view(component: &PdfMapper, ctx: &Context<PdfMapper>) -> Html {
    let link = ctx.link();
    html! {
        <div class="pdf-mapper">
            <aside class="mapper-sidebar">
                { build_field_palette(component, ctx) }
                { build_mapping_list(component, link) }
                <button class="primary-btn" onclick={link.callback(|_| Msg::Save)}>
                    { "Save mappings" }
                </button>
            </aside>
            <section class="mapper-main">
                { build_page_bar(component, link) }
                { build_page(component, ctx) }
            </section>
        </div>
    }
}

fn build_field_palette(component: &PdfMapper, ctx: &Context<PdfMapper>) -> Html {
    let link = ctx.link();
    let fields = &ctx.props().field_names;
    if fields.is_empty() {
        return html! { <p class="hint">{ "No fields to place yet." }</p> };
    }

    html! {
        <div class="field-palette">
            <h4>{ "Fields" }</h4>
            { for fields.iter().map(|name| {
                let selected = component.selected_field.as_deref() == Some(name.as_str());
                let count = placement_count(&component.mappings, name);
                let field = name.clone();
                html! {
                    <button
                        class={classes!("chip", selected.then_some("active"))}
                        onclick={link.callback(move |_| Msg::SelectField(field.clone()))}
                    >
                        { name.clone() }
                        if count > 0 {
                            <span class="chip-count">{ count.to_string() }</span>
                        }
                    </button>
                }
            }) }
        </div>
    }
}

fn build_mapping_list(component: &PdfMapper, link: &Scope<PdfMapper>) -> Html {
    html! {
        <div class="mapping-list">
            <h4>{ format!("On page {}", component.current_page) }</h4>
            { for mappings_for_page(&component.mappings, component.current_page).map(|(index, mapping)| {
                let on_size = link.callback(move |e: Event| {
                    let input: HtmlInputElement = e.target_unchecked_into();
                    Msg::SetFontSize(index, input.value().trim().parse().ok())
                });
                html! {
                    <div class="mapping-row" key={index}>
                        <span title={format!("x {:.1}, y {:.1}", mapping.x, mapping.y)}>
                            { mapping.display_label() }
                        </span>
                        <input
                            type="number"
                            min="4"
                            max="96"
                            step="0.5"
                            title="Font size (pt)"
                            value={mapping.font_size().to_string()}
                            onchange={on_size}
                        />
                        <button
                            class="icon-btn"
                            title="Remove"
                            onclick={link.callback(move |_| Msg::RemoveMapping(index))}
                        >
                            { "✕" }
                        </button>
                    </div>
                }
            }) }
        </div>
    }
}

fn build_page_bar(component: &PdfMapper, link: &Scope<PdfMapper>) -> Html {
    let page = component.current_page;
    let count = component.page_count();
    html! {
        <div class="page-bar">
            <button
                class="icon-btn"
                disabled={page <= 1}
                onclick={link.callback(move |_| Msg::GoToPage(page.saturating_sub(1)))}
            >
                { "‹" }
            </button>
            <span>{ format!("Page {} / {}", page, count.max(1)) }</span>
            <button
                class="icon-btn"
                disabled={page >= count}
                onclick={link.callback(move |_| Msg::GoToPage(page + 1))}
            >
                { "›" }
            </button>
        </div>
    }
}

fn build_page(component: &PdfMapper, ctx: &Context<PdfMapper>) -> Html {
    if component.loading {
        return html! { <div class="spinner-box"><div class="spin"></div></div> };
    }
    if let Some(error) = &component.error {
        return html! { <div class="error-box">{ error.clone() }</div> };
    }
    let (Some(url), Some(size)) = (&component.object_url, component.current_page_size()) else {
        return html! {};
    };

    let scale = ctx.props().render_scale;
    let overlay = overlay_style(size, scale);
    let on_click = ctx.link().callback(|e: MouseEvent| Msg::PlaceAt {
        offset_x: e.offset_x() as f64,
        offset_y: e.offset_y() as f64,
    });

    html! {
        <div class="page-frame" style={frame_style(size, scale)}>
            // Keyed on the page so the viewer reloads at the new fragment.
            <embed
                key={component.current_page}
                src={viewer_src(url, component.current_page, scale)}
                type="application/pdf"
                style="width:100%;height:100%;border:none;"
            />
            <div class="page-overlay" style={overlay} onclick={on_click}>
                { for mappings_for_page(&component.mappings, component.current_page).map(|(index, mapping)| {
                    let on_remove = ctx.link().callback(move |e: MouseEvent| {
                        e.stop_propagation();
                        Msg::RemoveMapping(index)
                    });
                    html! {
                        <div class="marker" key={index} style={marker_style(mapping, scale)}>
                            <span>{ mapping.display_label() }</span>
                            <button class="marker-remove" title="Remove" onclick={on_remove}>{ "✕" }</button>
                        </div>
                    }
                }) }
            </div>
        </div>
    }
}
