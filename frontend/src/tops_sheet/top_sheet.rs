//! Full-screen sheet that slides over the page, used to preview filled PDFs.
//!
//! The sheet is always mounted; [`open_top_sheet`] and [`close_top_sheet`]
//! toggle its `show` class so the CSS transition in `index.html` runs.

use gloo_timers::callback::Timeout;
use uuid::Uuid;
use web_sys::HtmlElement;
use yew::{html, Callback, Component, Context, Html, MouseEvent, NodeRef, Properties};

pub struct TopSheet {
    pub id: String,
}

#[derive(Properties, PartialEq)]
pub struct Props {
    #[prop_or_default]
    pub children: Html,
    pub node_ref: NodeRef,
    #[prop_or_default]
    pub title: String,
    /// Called after the sheet has been asked to close.
    #[prop_or_default]
    pub on_close: Callback<()>,
}

impl Component for TopSheet {
    type Message = ();
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            id: format!("id-{}", Uuid::new_v4()),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let on_close = {
            let sheet = props.node_ref.clone();
            let on_close = props.on_close.clone();
            Callback::from(move |_: MouseEvent| {
                close_top_sheet(&sheet);
                on_close.emit(());
            })
        };

        html! {
            <div class="top-sheet" id={self.id.clone()} ref={props.node_ref.clone()}>
                <div class="top-sheet-header">
                    <span>{ props.title.clone() }</span>
                    <button class="icon-btn" title="Close" onclick={on_close}>{ "✕" }</button>
                </div>
                <div class="top-sheet-body">
                    { props.children.clone() }
                </div>
            </div>
        }
    }
}

fn set_shown(top_sheet_ref: &NodeRef, shown: bool) {
    if let Some(top_sheet) = top_sheet_ref.cast::<HtmlElement>() {
        // Deferred so a sheet rendered in the same frame still animates.
        Timeout::new(50, move || {
            let classes = top_sheet.class_list();
            let _ = if shown {
                classes.add_1("show")
            } else {
                classes.remove_1("show")
            };
        })
        .forget();
    }
}

pub fn open_top_sheet(top_sheet_ref: &NodeRef) {
    set_shown(top_sheet_ref, true);
}

pub fn close_top_sheet(top_sheet_ref: &NodeRef) {
    set_shown(top_sheet_ref, false);
}
