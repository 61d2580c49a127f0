//! Toolbar button that attaches a CSV data source to a saved template.
//!
//! The file is uploaded to `/api/data_sources/csv/upload`; the returned
//! columns are forwarded through `on_csv_changed` so the page can offer the
//! column titles as placeable fields.

use common::model::csv::ColumnCheck;
use web_sys::HtmlInputElement;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::helpers::show_toast;

#[derive(Properties, PartialEq)]
pub struct CsvDataSourceProps {
    /// Template the data belongs to. Uploading is disabled until it is saved.
    #[prop_or_default]
    pub template_id: Option<String>,
    #[prop_or_default]
    pub on_csv_changed: Callback<Vec<ColumnCheck>>,
}

pub enum Msg {
    OpenFileDialog,
    FileSelected(web_sys::File),
    Uploaded(Vec<ColumnCheck>),
    UploadFailed(String),
}

pub struct CsvDataSourceComponent {
    file_input_ref: NodeRef,
    uploading: bool,
}

impl Component for CsvDataSourceComponent {
    type Message = Msg;
    type Properties = CsvDataSourceProps;

    fn create(_ctx: &Context<Self>) -> Self {
        CsvDataSourceComponent {
            file_input_ref: NodeRef::default(),
            uploading: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::OpenFileDialog => {
                if ctx.props().template_id.is_none() {
                    show_toast("Save the template before attaching a CSV file.");
                    return false;
                }
                if let Some(input) = self.file_input_ref.cast::<HtmlInputElement>() {
                    input.click();
                }
                false
            }
            Msg::FileSelected(file) => {
                let Some(template_id) = ctx.props().template_id.clone() else {
                    return false;
                };
                self.uploading = true;
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(match api::upload_csv(&template_id, &file).await {
                        Ok(columns) => Msg::Uploaded(columns),
                        Err(e) => Msg::UploadFailed(e),
                    });
                });
                true
            }
            Msg::Uploaded(columns) => {
                self.uploading = false;
                show_toast(&format!("CSV attached: {} columns.", columns.len()));
                ctx.props().on_csv_changed.emit(columns);
                true
            }
            Msg::UploadFailed(error) => {
                self.uploading = false;
                show_toast(&format!("Could not attach the CSV file: {}", error));
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let on_change = link.batch_callback(|e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let file = input.files().and_then(|files| files.get(0));
            // Lets the same file be chosen again after editing it.
            input.set_value("");
            file.map(Msg::FileSelected)
        });

        html! {
            <>
                <button
                    class="icon-btn"
                    title="CSV data source"
                    disabled={self.uploading}
                    onclick={link.callback(|_| Msg::OpenFileDialog)}
                >
                    <i class="material-icons">{"table_chart"}</i>
                    <span class="icon-label">{ if self.uploading { "Uploading…" } else { "CSV" } }</span>
                </button>
                <input
                    type="file"
                    accept=".csv,text/csv"
                    style="display:none;"
                    ref={self.file_input_ref.clone()}
                    onchange={on_change}
                />
            </>
        }
    }
}
