//! Update function for the mapping example.
//!
//! Network calls run in `spawn_local` and report back with a message; every
//! failure ends up in `Msg::Failed`, which shows a toast.

use common::jobs::JobStatus;
use common::model::source::DocumentSource;
use common::model::template::MappingTemplate;
use gloo_file::futures::read_as_bytes;
use gloo_timers::future::TimeoutFuture;
use yew::html::Scope;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::helpers::{
    object_url, replace_object_url, set_window_dirty_flag, show_toast, PDF_MIME,
};
use crate::tops_sheet::top_sheet::open_top_sheet;

use super::messages::Msg;
use super::state::{valid_field_name, MappingDemo, MergeJob};

const MERGE_POLL_MS: u32 = 500;

pub fn update(component: &mut MappingDemo, ctx: &Context<MappingDemo>, msg: Msg) -> bool {
    match msg {
        Msg::TemplatesLoaded(templates) => {
            component.templates = templates;
            true
        }
        Msg::PdfSelected(file) => {
            let link = ctx.link().clone();
            spawn_local(async move {
                let name = file.name();
                let file = gloo_file::File::from(file);
                match read_as_bytes(&file).await {
                    Ok(bytes) => link.send_message(Msg::PdfRead { name, bytes }),
                    Err(e) => link.send_message(Msg::Failed(e.to_string())),
                }
            });
            false
        }
        Msg::PdfRead { name, bytes } => {
            open_document(component, DocumentSource::Bytes(bytes), name);
            true
        }
        Msg::SetUrlInput(url) => {
            component.url_input = url;
            false
        }
        Msg::LoadUrl => {
            let url = component.url_input.trim().to_string();
            if url.is_empty() {
                return false;
            }
            let name = url.rsplit('/').next().unwrap_or("document.pdf").to_string();
            open_document(component, DocumentSource::Url(url), name);
            true
        }
        Msg::SetNewField(name) => {
            component.new_field = name;
            false
        }
        Msg::AddField => {
            let name = component.new_field.trim().to_string();
            if !valid_field_name(&name) {
                show_toast("Field names may contain letters, digits, spaces, '-', '_' and '.'.");
                return false;
            }
            if component.add_field(&name) {
                component.new_field.clear();
            }
            true
        }
        Msg::ColumnsLoaded(columns) => {
            for column in columns {
                component.add_field(&column.title);
                if let Some(sample) = column.first_row {
                    component.sample_values.insert(column.title, sample);
                }
            }
            true
        }
        Msg::SetSample(field, value) => {
            component.sample_values.insert(field, value);
            false
        }
        Msg::MappingsChanged(mappings) => {
            component.mappings = mappings;
            set_window_dirty_flag(component.is_dirty());
            true
        }
        Msg::SetTemplateName(name) => {
            component.template_name = name;
            set_window_dirty_flag(component.is_dirty());
            true
        }
        Msg::SaveTemplate(mappings) => {
            let Some(source) = component.source.clone() else {
                return false;
            };
            if component.template_name.trim().is_empty() {
                show_toast("Give the template a name before saving.");
                return false;
            }
            component.mappings = mappings;
            let template = MappingTemplate {
                id: component.template_id.clone(),
                name: component.template_name.trim().to_string(),
                source,
                mappings: component.mappings.clone(),
                datasource_md5: None,
            };
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(match api::save_template(template).await {
                    Ok(id) => Msg::Saved(id),
                    Err(e) => Msg::Failed(format!("Could not save the template: {}", e)),
                });
            });
            false
        }
        Msg::Saved(id) => {
            component.template_id = Some(id);
            component.saved_md5 = Some(component.content_md5());
            set_window_dirty_flag(false);
            show_toast("Template saved.");
            refresh_templates(ctx.link());
            true
        }
        Msg::LoadTemplate(id) => {
            if id.is_empty() {
                return false;
            }
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(match api::get_template(&id).await {
                    Ok(template) => Msg::TemplateLoaded(template),
                    Err(e) => Msg::Failed(format!("Could not load the template: {}", e)),
                });
            });
            false
        }
        Msg::TemplateLoaded(template) => {
            component.adopt_mapped_fields(&template.mappings);
            component.source = Some(template.source);
            component.file_name = format!("{}.pdf", template.name);
            component.template_name = template.name;
            component.template_id = template.id;
            component.loaded_mappings = template.mappings.clone();
            component.mappings = template.mappings;
            component.saved_md5 = Some(component.content_md5());
            component.merge = None;
            set_window_dirty_flag(false);
            show_toast("Template loaded.");
            true
        }
        Msg::Preview => {
            let Some(source) = component.source.clone() else {
                return false;
            };
            component.preview_loading = true;
            open_top_sheet(&component.preview_ref);

            let mappings = component.mappings.clone();
            let data = component.model_data();
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(match api::fill_pdf(source, mappings, data).await {
                    Ok(pdf) => Msg::PreviewReady(pdf),
                    Err(e) => Msg::Failed(format!("Could not fill the document: {}", e)),
                });
            });
            true
        }
        Msg::PreviewReady(pdf) => {
            component.preview_loading = false;
            match object_url(&pdf, PDF_MIME) {
                Ok(url) => replace_object_url(&mut component.preview_url, Some(url)),
                Err(e) => show_toast(&e),
            }
            true
        }
        Msg::ClosePreview => {
            component.preview_loading = false;
            replace_object_url(&mut component.preview_url, None);
            true
        }
        Msg::Download => {
            let Some(source) = component.source.clone() else {
                return false;
            };
            let file_name = component.file_name.clone();
            let mappings = component.mappings.clone();
            let data = component.model_data();
            let link = ctx.link().clone();
            spawn_local(async move {
                if let Err(e) = api::download_filled_pdf(&file_name, source, mappings, data).await {
                    link.send_message(Msg::Failed(format!("Download failed: {}", e)));
                }
            });
            false
        }
        Msg::StartMerge => {
            let Some(template_id) = component.template_id.clone() else {
                show_toast("Save the template and attach a CSV file first.");
                return false;
            };
            if component.is_dirty() {
                show_toast("Save your changes before generating documents.");
                return false;
            }
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(match api::start_merge(&template_id).await {
                    Ok(job_id) => Msg::MergeStarted(job_id),
                    Err(e) => Msg::Failed(format!("Could not start the job: {}", e)),
                });
            });
            false
        }
        Msg::MergeStarted(job_id) => {
            component.merge = Some(MergeJob {
                job_id: job_id.clone(),
                status: JobStatus::Pending,
            });
            poll_merge(ctx.link().clone(), job_id);
            true
        }
        Msg::MergeProgress { job_id, status } => match &mut component.merge {
            Some(job) if job.job_id == job_id => {
                if let JobStatus::Failed(reason) = &status {
                    show_toast(&format!("Generation failed: {}", reason));
                }
                job.status = status;
                true
            }
            _ => false,
        },
        Msg::Failed(error) => {
            gloo_console::error!(error.clone());
            component.preview_loading = false;
            show_toast(&error);
            true
        }
    }
}

/// Switches to a new document. Mappings belong to the previous document, so
/// they are dropped along with the template link.
fn open_document(component: &mut MappingDemo, source: DocumentSource, name: String) {
    component.source = Some(source);
    component.file_name = name;
    component.template_id = None;
    component.saved_md5 = None;
    component.mappings.clear();
    component.loaded_mappings.clear();
    component.merge = None;
    set_window_dirty_flag(false);
}

pub fn refresh_templates(link: &Scope<MappingDemo>) {
    let link = link.clone();
    spawn_local(async move {
        match api::list_templates().await {
            Ok(templates) => link.send_message(Msg::TemplatesLoaded(templates)),
            Err(e) => gloo_console::warn!(format!("could not list templates: {}", e)),
        }
    });
}

/// Polls the job until it finishes. Updates for a job that is no longer
/// shown are ignored by `Msg::MergeProgress`.
fn poll_merge(link: Scope<MappingDemo>, job_id: String) {
    spawn_local(async move {
        loop {
            TimeoutFuture::new(MERGE_POLL_MS).await;
            match api::merge_status(&job_id).await {
                Ok(status) => {
                    let finished = status.is_finished();
                    link.send_message(Msg::MergeProgress {
                        job_id: job_id.clone(),
                        status,
                    });
                    if finished {
                        break;
                    }
                }
                Err(e) => {
                    link.send_message(Msg::Failed(format!("Lost track of the job: {}", e)));
                    break;
                }
            }
        }
    });
}
