use std::rc::Rc;

use pharmacy_api::ApiClient;
use pharmacy_core::{Selection, TriageConfig};
use web_sys::{console, HtmlSelectElement};
use yew::prelude::*;
use yew::TargetCast;

use crate::styles;
use crate::views::{AlertsView, DashboardView, InventoryView, NewOrderView, OrdersView};

/// Client API dùng chung; so sánh theo con trỏ để props của Yew không render thừa.
#[derive(Clone)]
pub struct ApiHandle(Rc<ApiClient>);

impl ApiHandle {
    pub fn new(client: ApiClient) -> Self {
        Self(Rc::new(client))
    }

    pub fn client(&self) -> ApiClient {
        (*self.0).clone()
    }
}

impl PartialEq for ApiHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Thông báo tạm thời hiển thị đầu trang.
#[derive(Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Dashboard,
    Inventory,
    Orders,
    NewOrder,
    Alerts,
}

impl Section {
    const ALL: [Section; 5] = [
        Section::Dashboard,
        Section::Inventory,
        Section::Orders,
        Section::NewOrder,
        Section::Alerts,
    ];

    fn label(self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Inventory => "Inventory",
            Section::Orders => "Orders",
            Section::NewOrder => "New Order",
            Section::Alerts => "Alerts",
        }
    }
}

/// Props chung cho mọi màn hình.
#[derive(Properties, PartialEq, Clone)]
pub struct ViewProps {
    pub api: ApiHandle,
    pub config: TriageConfig,
    pub notify: Callback<Notice>,
    pub navigate: Callback<Section>,
}

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub api: ApiHandle,
    pub config: TriageConfig,
}

#[function_component(PharmacyApp)]
pub fn pharmacy_app(props: &AppProps) -> Html {
    use_effect_with((), |_| {
        if let Some(window) = web_sys::window() {
            if let Some(document) = window.document() {
                if let Err(err) = styles::ensure_styles(&document) {
                    console::error_1(&err);
                }
            }
        }
        || ()
    });

    let section = use_state(|| Section::Dashboard);
    let notice = use_state(|| None::<Notice>);

    let notify = {
        let notice = notice.clone();
        Callback::from(move |next: Notice| notice.set(Some(next)))
    };
    let navigate = {
        let section = section.clone();
        let notice = notice.clone();
        Callback::from(move |next: Section| {
            notice.set(None);
            section.set(next);
        })
    };
    let on_close_notice = {
        let notice = notice.clone();
        Callback::from(move |_| notice.set(None))
    };

    let view_props = ViewProps {
        api: props.api.clone(),
        config: props.config.clone(),
        notify,
        navigate: navigate.clone(),
    };

    let body = match *section {
        Section::Dashboard => html! { <DashboardView ..view_props /> },
        Section::Inventory => html! { <InventoryView ..view_props /> },
        Section::Orders => html! { <OrdersView ..view_props /> },
        Section::NewOrder => html! { <NewOrderView ..view_props /> },
        Section::Alerts => html! { <AlertsView ..view_props /> },
    };

    html! {
        <div class="pharmacy-root">
            <nav class="pharmacy-nav" aria-label="Điều hướng chính">
                <h1>{"Pharmacy Dashboard"}</h1>
                {
                    for Section::ALL.into_iter().map(|item| {
                        let navigate = navigate.clone();
                        let onclick = Callback::from(move |_| navigate.emit(item));
                        html! {
                            <button
                                type="button"
                                class={classes!("nav-item", (*section == item).then_some("is-active"))}
                                onclick={onclick}
                            >
                                { item.label() }
                            </button>
                        }
                    })
                }
            </nav>
            <main class="pharmacy-main">
                {
                    match &*notice {
                        Some(current) => html! {
                            <div
                                class="notice"
                                role="status"
                                data-level={if current.level == NoticeLevel::Error { "error" } else { "success" }}
                            >
                                <div>
                                    <strong>{ current.title.clone() }</strong>
                                    <p>{ current.message.clone() }</p>
                                </div>
                                <button type="button" class="button" onclick={on_close_notice} aria-label="Đóng thông báo">{"×"}</button>
                            </div>
                        },
                        None => html! {},
                    }
                }
                { body }
            </main>
        </div>
    }
}

/// Đọc giá trị của `<select>` trong handler `onchange`.
pub fn select_value(event: Event) -> String {
    event.target_unchecked_into::<HtmlSelectElement>().value()
}

/// Dựng các `<option>` cho một dropdown có lựa chọn "all".
pub fn select_options<'a>(
    all_label: &str,
    current: &str,
    options: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Html {
    html! {
        <>
            <option value="all" selected={current == "all"}>{ all_label.to_string() }</option>
            {
                for options.into_iter().map(|(value, label)| html! {
                    <option value={value.to_string()} selected={current == value}>{ label.to_string() }</option>
                })
            }
        </>
    }
}

/// Giá trị `<option>` tương ứng với một [`Selection`].
pub fn selection_value<T: Copy>(selection: &Selection<T>, word: fn(T) -> &'static str) -> &'static str {
    match selection {
        Selection::All => "all",
        Selection::Only(value) => word(*value),
    }
}
