use chrono::Utc;
use pharmacy_core::{
    triage_alerts, AlertFilter, AlertSeverity, AlertType, InventoryAlert, SeverityStats,
};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::app::{select_options, select_value, selection_value, Notice, Section, ViewProps};
use crate::format::{format_relative_time, format_timestamp};
use crate::hooks::use_fetch;

#[function_component(AlertsView)]
pub fn alerts_view(props: &ViewProps) -> Html {
    let alerts = use_fetch(&props.api, &props.notify, |api| async move { api.alerts().await });
    let filter = use_state(AlertFilter::default);

    let on_severity = {
        let filter = filter.clone();
        Callback::from(move |event: Event| {
            let mut next = (*filter).clone();
            next.severity = select_value(event).parse().unwrap_or_default();
            filter.set(next);
        })
    };
    let on_kind = {
        let filter = filter.clone();
        Callback::from(move |event: Event| {
            let mut next = (*filter).clone();
            next.kind = select_value(event).parse().unwrap_or_default();
            filter.set(next);
        })
    };
    let on_refresh = {
        let refetch = alerts.refetch.clone();
        Callback::from(move |_| refetch.emit(()))
    };

    let state = alerts.state();
    // Đếm trên toàn bộ danh sách, không theo bộ lọc.
    let stats = SeverityStats::from_alerts(state.items());
    let visible = triage_alerts(state.items(), &filter);
    let now = Utc::now();

    let dismiss = |alert: &InventoryAlert| {
        let api = props.api.clone();
        let notify = props.notify.clone();
        let refetch = alerts.refetch.clone();
        let id = alert.id.clone();
        Callback::from(move |_| {
            let api = api.client();
            let id = id.clone();
            let notify = notify.clone();
            let refetch = refetch.clone();
            spawn_local(async move {
                match api.dismiss_alert(&id).await {
                    Ok(()) => {
                        notify.emit(Notice::success(
                            "Alert Dismissed",
                            "The alert has been removed from your dashboard",
                        ));
                        refetch.emit(());
                    }
                    Err(err) => notify.emit(Notice::error("Error", err.to_string())),
                }
            });
        })
    };
    let to_inventory = {
        let navigate = props.navigate.clone();
        Callback::from(move |_| navigate.emit(Section::Inventory))
    };

    html! {
        <>
            <header class="section-header">
                <div>
                    <h2>{"Inventory Alerts"}</h2>
                    <p>{ format!("{} of {} alerts", visible.len(), state.items().len()) }</p>
                </div>
                <button type="button" class="button" onclick={on_refresh} disabled={state.is_loading()}>{"Refresh Alerts"}</button>
            </header>

            <div class="stat-grid">
                { severity_card("Critical", stats.critical, "critical") }
                { severity_card("Warning", stats.warning, "warning") }
                { severity_card("Info", stats.info, "secondary") }
            </div>

            <div class="toolbar">
                <select onchange={on_severity} aria-label="Filter by severity">
                    { select_options(
                        "All Severities",
                        selection_value(&filter.severity, AlertSeverity::as_str),
                        AlertSeverity::ALL.into_iter().map(|s| (s.as_str(), s.label())),
                    ) }
                </select>
                <select onchange={on_kind} aria-label="Filter by alert type">
                    { select_options(
                        "All Types",
                        selection_value(&filter.kind, AlertType::as_str),
                        AlertType::ALL.into_iter().map(|k| (k.as_str(), k.title())),
                    ) }
                </select>
            </div>

            if state.is_loading() && state.items().is_empty() {
                <p class="loading">{"Loading alerts..."}</p>
            } else if visible.is_empty() {
                <p class="empty-state">{"No alerts match the current filters."}</p>
            } else {
                <ul class="row-list">
                    { for visible.into_iter().map(|alert| html! {
                        <li class="card" key={alert.id.clone()} data-level={alert.severity.as_str()}>
                            <div class="section-header">
                                <div>
                                    <h3>{ alert.kind.title() }</h3>
                                    <div class="row-meta">
                                        <span class="badge" data-level={alert.severity.as_str()}>{ alert.severity.label() }</span>
                                        <strong>{ alert.medication_name.clone() }</strong>
                                        <span title={format_timestamp(alert.created_at)}>{ format_relative_time(alert.created_at, now) }</span>
                                    </div>
                                </div>
                                <div class="row-meta">
                                    <button type="button" class="button primary" onclick={to_inventory.clone()}>{ alert.kind.action_label() }</button>
                                    <button type="button" class="button" onclick={dismiss(alert)}>{"Dismiss"}</button>
                                </div>
                            </div>
                            <p>{ alert.message.clone() }</p>
                        </li>
                    }) }
                </ul>
            }
        </>
    }
}

fn severity_card(label: &str, count: usize, level: &'static str) -> Html {
    html! {
        <section class="card" data-level={level}>
            <span class="stat-caption">{ label.to_string() }</span>
            <div class="stat-value">{ count }</div>
        </section>
    }
}
