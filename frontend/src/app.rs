use crate::pages::form_fill_demo::FormFillDemo;
use crate::pages::mapping_demo::MappingDemo;
use yew::{classes, html, Component, Context, Html};

#[derive(Clone, Copy, PartialEq)]
pub enum Tab {
    Mapping,
    FormFill,
}

pub enum Msg {
    SetTab(Tab),
}

pub struct App {
    active_tab: Tab,
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            active_tab: Tab::Mapping,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SetTab(tab) => {
                let changed = self.active_tab != tab;
                self.active_tab = tab;
                changed
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let tab_class = |tab: Tab| classes!("tab-btn", (self.active_tab == tab).then_some("active"));

        html! {
            <div class="app">
                <div class="tab-bar">
                    <button
                        class={tab_class(Tab::Mapping)}
                        onclick={link.callback(|_| Msg::SetTab(Tab::Mapping))}
                    >
                        {"Coordinate mapping"}
                    </button>
                    <button
                        class={tab_class(Tab::FormFill)}
                        onclick={link.callback(|_| Msg::SetTab(Tab::FormFill))}
                    >
                        {"Form filling"}
                    </button>
                </div>
                {
                    match self.active_tab {
                        Tab::Mapping => html! { <MappingDemo /> },
                        Tab::FormFill => html! { <FormFillDemo /> },
                    }
                }
            </div>
        }
    }
}
