use pharmacy_core::{DashboardOverview, Order};
use yew::prelude::*;

use crate::app::{Section, ViewProps};
use crate::format::{format_currency, format_time};
use crate::hooks::use_fetch;

#[function_component(DashboardView)]
pub fn dashboard_view(props: &ViewProps) -> Html {
    let stats = use_fetch(&props.api, &props.notify, |api| async move {
        api.dashboard_stats().await
    });
    let orders = use_fetch(&props.api, &props.notify, |api| async move { api.orders().await });
    let alerts = use_fetch(&props.api, &props.notify, |api| async move { api.alerts().await });

    let stats_state = stats.state();
    let orders_state = orders.state();
    let alerts_state = alerts.state();
    let loading = stats_state.is_loading() || orders_state.is_loading() || alerts_state.is_loading();

    let overview = DashboardOverview::build(
        stats_state.data(),
        orders_state.items(),
        alerts_state.items(),
        &props.config,
    );

    let go = |section: Section| {
        let navigate = props.navigate.clone();
        Callback::from(move |_| navigate.emit(section))
    };

    html! {
        <>
            <header class="section-header">
                <div>
                    <h2>{"Pharmacy Dashboard"}</h2>
                    <p>{"Priority view of orders, stock and alerts."}</p>
                </div>
                if loading {
                    <span class="loading">{"Loading..."}</span>
                }
            </header>

            if !overview.stats_available && !stats_state.is_loading() {
                <div class="notice" data-level="error">
                    {"Unable to load dashboard data. Using fallback values."}
                </div>
            }

            if let Some(banner) = overview.critical_banner() {
                <section class="card" data-level="critical">
                    <div class="section-header">
                        <div>
                            <h3>{"Critical Alerts"}</h3>
                            <p>{ banner }</p>
                        </div>
                        <button type="button" class="button" onclick={go(Section::Alerts)}>{"Review Now"}</button>
                    </div>
                    <ul class="row-list">
                        { for overview.critical_alerts.iter().map(|alert| html! {
                            <li>
                                <strong>{ alert.medication_name.clone() }</strong>
                                {" - "}
                                { alert.message.clone() }
                            </li>
                        }) }
                    </ul>
                </section>
            }

            <div class="card-grid">
                <section class="card">
                    <div class="section-header">
                        <div>
                            <h3>{"Recent Orders"}</h3>
                            <span class="badge" data-level="critical">{ format!("{} SOS", overview.sos_in_recent) }</span>
                        </div>
                        <button type="button" class="button" onclick={go(Section::Orders)}>{"View All Orders"}</button>
                    </div>
                    <ul class="row-list">
                        if overview.recent_orders.is_empty() {
                            <li class="empty-state">{"No orders yet."}</li>
                        } else {
                            { for overview.recent_orders.iter().copied().map(render_recent_order) }
                        }
                    </ul>
                </section>
                <section class="card">
                    <h3>{"Quick Actions"}</h3>
                    <div class="row-list">
                        <button type="button" class="button primary" onclick={go(Section::NewOrder)}>{"New Prescription Order"}</button>
                        <button type="button" class="button" onclick={go(Section::Inventory)}>{"Check Inventory"}</button>
                        <button type="button" class="button" onclick={go(Section::Orders)}>{"Track Orders"}</button>
                        <button type="button" class="button" onclick={go(Section::Alerts)}>{"View Alerts"}</button>
                    </div>
                </section>
            </div>

            <div class="stat-grid">
                { stat_card("Total Medications", overview.stats.total_medications.to_string(), "Items in inventory", "secondary") }
                { stat_card("Low Stock Alerts", overview.stats.low_stock_items.to_string(), "Require attention", "warning") }
                { stat_card("Pending Orders", overview.stats.pending_orders.to_string(), "Awaiting processing", "secondary") }
                { stat_card("SOS Orders", overview.stats.sos_orders.to_string(), "Emergency priority", "critical") }
                { stat_card("Completed Today", overview.stats.completed_today.to_string(), "Orders dispensed", "success") }
                { stat_card("Revenue", format_currency(overview.stats.revenue), "Today", "success") }
            </div>
        </>
    }
}

fn render_recent_order(order: &Order) -> Html {
    html! {
        <li class="card" data-level={order.priority.level()}>
            <div class="row-meta">
                <strong>{ order.patient_name.clone() }</strong>
                <span>{ order.id.clone() }</span>
                <span class="badge" data-level={order.priority.level()}>{ order.priority.as_str().to_uppercase() }</span>
                <span class="badge" data-level={order.status.level()}>{ order.status.as_str() }</span>
                <span>{ format_time(order.created_at) }</span>
            </div>
        </li>
    }
}

fn stat_card(title: &str, value: String, caption: &str, level: &'static str) -> Html {
    html! {
        <section class="card" data-level={level}>
            <span class="stat-caption">{ title.to_string() }</span>
            <div class="stat-value">{ value }</div>
            <span class="stat-caption">{ caption.to_string() }</span>
        </section>
    }
}
