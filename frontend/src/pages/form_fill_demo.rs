//! AcroForm example: open a PDF form, edit the detected fields and download a
//! filled copy. A flattened download that the server cannot produce falls back
//! to a regular, still editable, filled form.

use std::collections::BTreeMap;

use common::model::data::{DataValue, ModelData};
use common::model::form_field::{FormFieldDescriptor, FormFieldType};
use common::model::source::DocumentSource;
use gloo_file::futures::read_as_bytes;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::html::Scope;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::helpers::{filled_file_name, save_bytes, show_toast, PDF_MIME};

pub enum Msg {
    PdfSelected(web_sys::File),
    Loaded {
        name: String,
        source: DocumentSource,
        fields: Vec<FormFieldDescriptor>,
        values: BTreeMap<String, String>,
    },
    SetValue(String, String),
    SetFlatten(bool),
    Download,
    Downloaded,
    Failed(String),
}

pub struct FormFillDemo {
    source: Option<DocumentSource>,
    file_name: String,
    fields: Vec<FormFieldDescriptor>,
    values: BTreeMap<String, String>,
    flatten: bool,
    busy: bool,
}

impl Component for FormFillDemo {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            source: None,
            file_name: String::new(),
            fields: Vec::new(),
            values: BTreeMap::new(),
            flatten: true,
            busy: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::PdfSelected(file) => {
                self.busy = true;
                let link = ctx.link().clone();
                spawn_local(async move {
                    let name = file.name();
                    let loaded = async {
                        let bytes = read_as_bytes(&gloo_file::File::from(file))
                            .await
                            .map_err(|e| e.to_string())?;
                        let source = DocumentSource::Bytes(bytes);
                        let fields = api::detect_form_fields(source.clone()).await?;
                        let values = api::read_form_values(source.clone()).await?;
                        Ok::<_, String>((source, fields, values))
                    }
                    .await;
                    link.send_message(match loaded {
                        Ok((source, fields, values)) => Msg::Loaded {
                            name,
                            source,
                            fields,
                            values,
                        },
                        Err(e) => Msg::Failed(format!("Could not read the form: {}", e)),
                    });
                });
                true
            }
            Msg::Loaded {
                name,
                source,
                fields,
                values,
            } => {
                if fields.is_empty() {
                    show_toast("This PDF has no form fields.");
                }
                self.busy = false;
                self.source = Some(source);
                self.file_name = name;
                self.fields = fields;
                self.values = values;
                true
            }
            Msg::SetValue(field, value) => {
                self.values.insert(field, value);
                true
            }
            Msg::SetFlatten(flatten) => {
                self.flatten = flatten;
                true
            }
            Msg::Download => {
                let Some(source) = self.source.clone() else {
                    return false;
                };
                self.busy = true;
                download(
                    ctx.link().clone(),
                    source,
                    model_data(&self.fields, &self.values),
                    self.flatten,
                    filled_file_name(&self.file_name),
                );
                true
            }
            Msg::Downloaded => {
                self.busy = false;
                true
            }
            Msg::Failed(error) => {
                gloo_console::error!(error.clone());
                show_toast(&error);
                self.busy = false;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let on_file = link.batch_callback(|e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            input.files().and_then(|files| files.get(0)).map(Msg::PdfSelected)
        });
        let on_flatten = link.callback(|e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            Msg::SetFlatten(input.checked())
        });

        html! {
            <div class="demo form-fill-demo">
                <div class="toolbar">
                    <label class="icon-btn">
                        <i class="material-icons">{"description"}</i>
                        <span class="icon-label">{"Open PDF form"}</span>
                        <input type="file" accept="application/pdf,.pdf" style="display:none;" onchange={on_file} />
                    </label>
                    <label>
                        <input type="checkbox" checked={self.flatten} onchange={on_flatten} />
                        {" Flatten"}
                    </label>
                    <button
                        class="primary-btn"
                        disabled={self.source.is_none() || self.busy}
                        onclick={link.callback(|_| Msg::Download)}
                    >
                        {"Download filled PDF"}
                    </button>
                    if self.busy {
                        <div class="spin small"></div>
                    }
                </div>
                <table class="form-fields">
                    { for self.fields.iter().map(|field| self.field_row(field, link)) }
                </table>
            </div>
        }
    }
}

impl FormFillDemo {
    fn field_row(&self, field: &FormFieldDescriptor, link: &Scope<Self>) -> Html {
        let value = self.values.get(&field.name).cloned().unwrap_or_default();
        let name = field.name.clone();
        let input = match field.field_type {
            FormFieldType::Checkbox => {
                let on_change = link.callback(move |e: Event| {
                    let input: HtmlInputElement = e.target_unchecked_into();
                    Msg::SetValue(name.clone(), input.checked().to_string())
                });
                let checked = is_checked(&value);
                html! { <input type="checkbox" {checked} onchange={on_change} /> }
            }
            FormFieldType::Dropdown | FormFieldType::Radio => {
                let on_change = link.callback(move |e: Event| {
                    let select: HtmlSelectElement = e.target_unchecked_into();
                    Msg::SetValue(name.clone(), select.value())
                });
                html! {
                    <select onchange={on_change}>
                        <option value="" selected={value.is_empty()}>{"—"}</option>
                        { for field.options.iter().flatten().map(|option| html! {
                            <option value={option.clone()} selected={*option == value}>
                                { option.clone() }
                            </option>
                        }) }
                    </select>
                }
            }
            FormFieldType::Text | FormFieldType::Other => {
                let on_input = link.callback(move |e: InputEvent| {
                    let input: HtmlInputElement = e.target_unchecked_into();
                    Msg::SetValue(name.clone(), input.value())
                });
                html! { <input type="text" value={value} oninput={on_input} /> }
            }
        };

        html! {
            <tr key={field.name.clone()}>
                <td>{ field.name.clone() }</td>
                <td class="field-type">{ format!("{:?}", field.field_type).to_lowercase() }</td>
                <td>{ input }</td>
            </tr>
        }
    }
}

/// Checkbox state from either a read-back appearance state (`Yes`, `On`,
/// `Off`) or a value set in the page (`true`, `false`).
fn is_checked(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "off" | "false" | "0" | "no"
    )
}

/// Edited values as model data. Checkboxes become booleans; blank values are
/// left out so the field keeps its current content.
fn model_data(fields: &[FormFieldDescriptor], values: &BTreeMap<String, String>) -> ModelData {
    fields
        .iter()
        .filter_map(|field| {
            let value = values.get(&field.name)?;
            let value = match field.field_type {
                FormFieldType::Checkbox => DataValue::Bool(is_checked(value)),
                _ if value.is_empty() => return None,
                _ => DataValue::Text(value.clone()),
            };
            Some((field.name.clone(), value))
        })
        .collect()
}

/// Fills and saves the form. When flattening fails the form is filled again
/// without flattening, the only fallback offered.
fn download(
    link: Scope<FormFillDemo>,
    source: DocumentSource,
    data: ModelData,
    flatten: bool,
    file_name: String,
) {
    spawn_local(async move {
        let mut filled = api::fill_form(source.clone(), data.clone(), None, flatten).await;
        if flatten {
            if let Err(e) = &filled {
                gloo_console::warn!(format!("flattening failed, retrying without: {}", e));
                show_toast("This form could not be flattened; downloading it editable instead.");
                filled = api::fill_form(source, data, None, false).await;
            }
        }

        link.send_message(
            match filled.and_then(|pdf| save_bytes(&file_name, &pdf, PDF_MIME)) {
                Ok(()) => Msg::Downloaded,
                Err(e) => Msg::Failed(format!("Could not fill the form: {}", e)),
            },
        );
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, field_type: FormFieldType) -> FormFieldDescriptor {
        FormFieldDescriptor {
            name: name.to_string(),
            field_type,
            options: None,
        }
    }

    #[test]
    fn model_data_types_values_by_field() {
        let fields = vec![
            field("name", FormFieldType::Text),
            field("agree", FormFieldType::Checkbox),
            field("country", FormFieldType::Dropdown),
            field("untouched", FormFieldType::Text),
        ];
        let values = BTreeMap::from([
            ("name".to_string(), "Jane".to_string()),
            ("agree".to_string(), "Yes".to_string()),
            ("country".to_string(), String::new()),
        ]);

        let data = model_data(&fields, &values);
        assert_eq!(data["name"], DataValue::Text("Jane".into()));
        assert_eq!(data["agree"], DataValue::Bool(true));
        assert!(!data.contains_key("country"));
        assert!(!data.contains_key("untouched"));
    }

    #[test]
    fn read_back_states_map_to_checked() {
        assert!(is_checked("Yes"));
        assert!(is_checked("On"));
        assert!(is_checked("true"));
        assert!(!is_checked("Off"));
        assert!(!is_checked("false"));
        assert!(!is_checked(""));
    }
}
