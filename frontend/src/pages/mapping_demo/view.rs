//! View for the mapping example: document and template controls, the field
//! palette with sample values, the mapper itself, and the fill actions.

use common::jobs::{merge_summary_rows, JobStatus};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::html::Scope;
use yew::prelude::*;

use crate::api::merge_output_url;
use crate::components::data_sources::csv::CsvDataSourceComponent;
use crate::components::pdf_mapper::PdfMapper;
use crate::tops_sheet::top_sheet::TopSheet;

use super::messages::Msg;
use super::state::MappingDemo;

pub fn view(component: &MappingDemo, ctx: &Context<MappingDemo>) -> Html {
    let link = ctx.link();
    html! {
        <div class="demo mapping-demo">
            { build_document_bar(link) }
            { build_template_bar(component, link) }
            { build_fields(component, link) }
            {
                match &component.source {
                    Some(source) => html! {
                        <PdfMapper
                            source={source.clone()}
                            field_names={component.field_names.clone()}
                            initial_mappings={component.loaded_mappings.clone()}
                            on_change={link.callback(Msg::MappingsChanged)}
                            on_save={link.callback(Msg::SaveTemplate)}
                        />
                    },
                    None => html! { <p class="hint">{ "Choose a PDF to start placing fields." }</p> },
                }
            }
            { build_actions(component, link) }
            { build_preview(component, link) }
        </div>
    }
}

fn build_document_bar(link: &Scope<MappingDemo>) -> Html {
    let on_file = link.batch_callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        input.files().and_then(|files| files.get(0)).map(Msg::PdfSelected)
    });
    let on_url = link.callback(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::SetUrlInput(input.value())
    });

    html! {
        <div class="toolbar">
            <label class="icon-btn">
                <i class="material-icons">{"picture_as_pdf"}</i>
                <span class="icon-label">{"Open PDF"}</span>
                <input type="file" accept="application/pdf,.pdf" style="display:none;" onchange={on_file} />
            </label>
            <input type="url" placeholder="…or a PDF URL" oninput={on_url} />
            <button class="icon-btn" onclick={link.callback(|_| Msg::LoadUrl)}>{"Load"}</button>
        </div>
    }
}

fn build_template_bar(component: &MappingDemo, link: &Scope<MappingDemo>) -> Html {
    let on_pick = link.callback(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        Msg::LoadTemplate(select.value())
    });
    let on_name = link.callback(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::SetTemplateName(input.value())
    });
    let mappings = component.mappings.clone();

    html! {
        <div class="toolbar">
            <select onchange={on_pick}>
                <option value="" selected={component.template_id.is_none()}>{"Saved templates…"}</option>
                { for component.templates.iter().map(|t| html! {
                    <option
                        value={t.id.clone()}
                        selected={component.template_id.as_deref() == Some(t.id.as_str())}
                    >
                        { format!("{} ({} fields{})", t.name, t.mapping_count, if t.has_datasource { ", CSV" } else { "" }) }
                    </option>
                }) }
            </select>
            <input
                type="text"
                placeholder="Template name"
                value={component.template_name.clone()}
                oninput={on_name}
            />
            <button
                class="icon-btn"
                title="Save template"
                style="position: relative;"
                disabled={component.source.is_none()}
                onclick={link.callback(move |_| Msg::SaveTemplate(mappings.clone()))}
            >
                <i class="material-icons">{"save"}</i>
                if component.is_dirty() {
                    <span class="dirty-dot" title="Unsaved changes" />
                }
            </button>
            <CsvDataSourceComponent
                template_id={component.template_id.clone()}
                on_csv_changed={link.callback(Msg::ColumnsLoaded)}
            />
        </div>
    }
}

fn build_fields(component: &MappingDemo, link: &Scope<MappingDemo>) -> Html {
    let on_new = link.callback(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::SetNewField(input.value())
    });
    let on_key = link.batch_callback(|e: KeyboardEvent| (e.key() == "Enter").then_some(Msg::AddField));

    html! {
        <div class="fields-panel">
            <div class="toolbar">
                <input
                    type="text"
                    placeholder="New field name"
                    value={component.new_field.clone()}
                    oninput={on_new}
                    onkeydown={on_key}
                />
                <button class="icon-btn" onclick={link.callback(|_| Msg::AddField)}>{"Add field"}</button>
            </div>
            <table class="sample-values">
                { for component.field_names.iter().map(|name| {
                    let field = name.clone();
                    let on_value = link.callback(move |e: InputEvent| {
                        let input: HtmlInputElement = e.target_unchecked_into();
                        Msg::SetSample(field.clone(), input.value())
                    });
                    html! {
                        <tr key={name.clone()}>
                            <td>{ name.clone() }</td>
                            <td>
                                <input
                                    type="text"
                                    placeholder="sample value"
                                    value={component.sample_values.get(name).cloned().unwrap_or_default()}
                                    oninput={on_value}
                                />
                            </td>
                        </tr>
                    }
                }) }
            </table>
        </div>
    }
}

fn build_actions(component: &MappingDemo, link: &Scope<MappingDemo>) -> Html {
    let has_source = component.source.is_some();
    html! {
        <div class="toolbar">
            <button class="primary-btn" disabled={!has_source} onclick={link.callback(|_| Msg::Preview)}>
                {"Preview"}
            </button>
            <button class="primary-btn" disabled={!has_source} onclick={link.callback(|_| Msg::Download)}>
                {"Download"}
            </button>
            <button
                class="primary-btn"
                disabled={component.template_id.is_none()}
                onclick={link.callback(|_| Msg::StartMerge)}
            >
                {"One PDF per CSV row"}
            </button>
            { build_merge_status(component) }
        </div>
    }
}

fn build_merge_status(component: &MappingDemo) -> Html {
    let Some(job) = &component.merge else {
        return html! {};
    };
    match &job.status {
        JobStatus::Pending => html! { <span>{"Queued…"}</span> },
        JobStatus::InProgress(percent) => html! {
            <progress max="100" value={percent.to_string()} />
        },
        JobStatus::Failed(reason) => html! { <span class="error-text">{ reason.clone() }</span> },
        JobStatus::Completed(summary) => {
            let rows = merge_summary_rows(summary).unwrap_or(0);
            html! {
                <span class="merge-output">
                    { summary.clone() }
                    { for (0..rows).map(|row| html! {
                        <a href={merge_output_url(&job.job_id, row)} target="_blank">
                            { format!("#{}", row + 1) }
                        </a>
                    }) }
                </span>
            }
        }
    }
}

fn build_preview(component: &MappingDemo, link: &Scope<MappingDemo>) -> Html {
    html! {
        <TopSheet
            node_ref={component.preview_ref.clone()}
            title="Preview"
            on_close={link.callback(|_| Msg::ClosePreview)}
        >
            {
                if component.preview_loading {
                    html! {
                        <div class="spinner-box">
                            <div class="spin"></div>
                            <div>{"Filling PDF..."}</div>
                        </div>
                    }
                } else if let Some(url) = &component.preview_url {
                    html! { <iframe src={url.clone()} class="preview-frame" /> }
                } else {
                    html! {}
                }
            }
        </TopSheet>
    }
}
