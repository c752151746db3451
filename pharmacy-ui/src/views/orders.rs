use chrono::Utc;
use pharmacy_core::{triage_orders, Order, OrderFilter, OrderPriority, OrderStatus};
use web_sys::HtmlInputElement;
use yew::platform::spawn_local;
use yew::prelude::*;
use yew::TargetCast;

use crate::app::{select_options, select_value, selection_value, ApiHandle, Notice, ViewProps};
use crate::format::{format_relative_time, format_timestamp};
use crate::hooks::use_fetch;

#[function_component(OrdersView)]
pub fn orders_view(props: &ViewProps) -> Html {
    let orders = use_fetch(&props.api, &props.notify, |api| async move { api.orders().await });
    let filter = use_state(OrderFilter::default);

    let on_search = {
        let filter = filter.clone();
        Callback::from(move |event: InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            let mut next = (*filter).clone();
            next.search = input.value();
            filter.set(next);
        })
    };
    let on_status = {
        let filter = filter.clone();
        Callback::from(move |event: Event| {
            let mut next = (*filter).clone();
            next.status = select_value(event).parse().unwrap_or_default();
            filter.set(next);
        })
    };
    let on_priority = {
        let filter = filter.clone();
        Callback::from(move |event: Event| {
            let mut next = (*filter).clone();
            next.priority = select_value(event).parse().unwrap_or_default();
            filter.set(next);
        })
    };
    let on_refresh = {
        let refetch = orders.refetch.clone();
        Callback::from(move |_| refetch.emit(()))
    };

    let state = orders.state();
    let sorted = triage_orders(state.items(), &filter);
    let current_status = selection_value(&filter.status, OrderStatus::as_str);
    let current_priority = selection_value(&filter.priority, OrderPriority::as_str);

    html! {
        <>
            <header class="section-header">
                <div>
                    <h2>{"Order Tracking"}</h2>
                    <p>{ format!("{} orders shown", sorted.len()) }</p>
                </div>
                <button type="button" class="button" onclick={on_refresh} disabled={state.is_loading()}>{"Refresh Status"}</button>
            </header>

            <div class="card">
                {"Orders are automatically prioritized: "}
                <strong>{"SOS (Emergency)"}</strong>{" → "}<strong>{"Urgent"}</strong>{" → "}<strong>{"Routine"}</strong>
                {". SOS orders are processed immediately and bypass standard queues."}
            </div>

            <div class="toolbar">
                <input
                    type="search"
                    placeholder="Search by patient name or order ID..."
                    value={filter.search.clone()}
                    oninput={on_search}
                    aria-label="Search orders"
                />
                <select onchange={on_status} aria-label="Filter by status">
                    { select_options("All Statuses", current_status, OrderStatus::ALL.into_iter().map(|s| (s.as_str(), s.label()))) }
                </select>
                <select onchange={on_priority} aria-label="Filter by priority">
                    { select_options("All Priorities", current_priority, OrderPriority::ALL.into_iter().map(|p| (p.as_str(), p.label()))) }
                </select>
            </div>

            if state.is_loading() && state.items().is_empty() {
                <p class="loading">{"Loading orders..."}</p>
            } else if sorted.is_empty() {
                <p class="empty-state">{"No orders match the current filters."}</p>
            } else {
                <ul class="row-list">
                    { for sorted.into_iter().map(|order| html! {
                        <OrderCard
                            key={order.id.clone()}
                            order={order.clone()}
                            api={props.api.clone()}
                            notify={props.notify.clone()}
                            on_changed={orders.refetch.clone()}
                        />
                    }) }
                </ul>
            }
        </>
    }
}

#[derive(Properties, PartialEq)]
struct OrderCardProps {
    order: Order,
    api: ApiHandle,
    notify: Callback<Notice>,
    on_changed: Callback<()>,
}

#[function_component(OrderCard)]
fn order_card(props: &OrderCardProps) -> Html {
    let order = &props.order;

    let on_status = {
        let api = props.api.clone();
        let notify = props.notify.clone();
        let on_changed = props.on_changed.clone();
        let id = order.id.clone();
        Callback::from(move |event: Event| {
            let status: OrderStatus = match select_value(event).parse() {
                Ok(status) => status,
                Err(message) => {
                    notify.emit(Notice::error("Error", message));
                    return;
                }
            };

            let api = api.client();
            let id = id.clone();
            let notify = notify.clone();
            let on_changed = on_changed.clone();
            spawn_local(async move {
                match api.update_order_status(&id, status).await {
                    Ok(updated) => {
                        notify.emit(Notice::success(
                            "Order Updated",
                            format!("Order {} is now {}", updated.id, updated.status.label()),
                        ));
                        on_changed.emit(());
                    }
                    Err(err) => notify.emit(Notice::error("Error", err.to_string())),
                }
            });
        })
    };

    let now = Utc::now();
    let eta = order
        .completion_eta(now)
        .filter(|_| order.status == OrderStatus::Processing);

    html! {
        <li class="card" data-level={if order.is_sos() { "critical" } else { "" }}>
            <div class="section-header">
                <div>
                    <h3>{ order.patient_name.clone() }</h3>
                    <div class="row-meta">
                        <span>{ order.id.clone() }</span>
                        if let Some(patient_id) = &order.patient_id {
                            <span>{ format!("Patient ID: {patient_id}") }</span>
                        }
                        <span>{ format_timestamp(order.created_at) }</span>
                        <span>{ format_relative_time(order.created_at, now) }</span>
                    </div>
                </div>
                <div class="row-meta">
                    <span class="badge" data-level={order.priority.level()}>{ order.priority.label() }</span>
                    <span class="badge" data-level={order.status.level()}>{ order.status.label() }</span>
                    <select onchange={on_status} aria-label="Update order status">
                        { for OrderStatus::ALL.into_iter().map(|status| html! {
                            <option value={status.as_str()} selected={status == order.status}>{ status.label() }</option>
                        }) }
                    </select>
                </div>
            </div>

            <ul class="row-list">
                { for order.medications.iter().map(|item| html! {
                    <li>
                        <strong>{ item.medication_name.clone() }</strong>
                        {" "}
                        { format!("{} {}", item.quantity, item.unit) }
                        if let Some(dosage) = &item.dosage {
                            { format!(" • {dosage}") }
                        }
                        if let Some(instructions) = &item.instructions {
                            <p class="stat-caption">{ instructions.clone() }</p>
                        }
                    </li>
                }) }
            </ul>

            <div class="row-meta">
                if let Some(pharmacist) = &order.assigned_pharmacist {
                    <span>{ format!("Pharmacist: {pharmacist}") }</span>
                }
                <span>{ format!("Updated {}", format_timestamp(order.updated_at)) }</span>
                if let Some(eta) = eta {
                    <span class="badge" data-level="warning">{ eta.to_string() }</span>
                }
            </div>

            if let Some(notes) = &order.notes {
                <p class="stat-caption">{ notes.clone() }</p>
            }

            if order.is_sos() {
                <p class="badge" data-level="critical">{ format!("Emergency Priority - {}", order.priority.description()) }</p>
            }
        </li>
    }
}
