use chrono::Utc;
use pharmacy_core::{
    categories, filter_inventory, InventoryFilter, Medication, Selection, StockFilter,
};
use web_sys::HtmlInputElement;
use yew::platform::spawn_local;
use yew::prelude::*;
use yew::TargetCast;

use crate::app::{select_options, select_value, ApiHandle, Notice, ViewProps};
use crate::format::{format_currency, format_date};
use crate::hooks::use_fetch;

#[function_component(InventoryView)]
pub fn inventory_view(props: &ViewProps) -> Html {
    let medications = use_fetch(&props.api, &props.notify, |api| async move {
        api.medications().await
    });
    let filter = use_state(InventoryFilter::default);

    let on_search = {
        let filter = filter.clone();
        Callback::from(move |event: InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            let mut next = (*filter).clone();
            next.search = input.value();
            filter.set(next);
        })
    };
    let on_category = {
        let filter = filter.clone();
        Callback::from(move |event: Event| {
            let mut next = (*filter).clone();
            next.category = select_value(event).parse().unwrap_or_default();
            filter.set(next);
        })
    };
    let on_stock = {
        let filter = filter.clone();
        Callback::from(move |event: Event| {
            let mut next = (*filter).clone();
            next.stock = select_value(event).parse().unwrap_or(StockFilter::All);
            filter.set(next);
        })
    };
    let on_refresh = {
        let refetch = medications.refetch.clone();
        Callback::from(move |_| refetch.emit(()))
    };

    let state = medications.state();
    let all = state.items();
    let visible = filter_inventory(all, &filter);
    let category_names = categories(all);
    let current_category = match &filter.category {
        Selection::All => "all".to_string(),
        Selection::Only(category) => category.clone(),
    };
    let current_stock = match filter.stock {
        StockFilter::All => "all",
        StockFilter::Low => "low",
        StockFilter::Sufficient => "sufficient",
    };

    html! {
        <>
            <header class="section-header">
                <div>
                    <h2>{"Inventory Management"}</h2>
                    <p>{ format!("{} of {} medications", visible.len(), all.len()) }</p>
                </div>
                <button type="button" class="button" onclick={on_refresh} disabled={state.is_loading()}>{"Refresh"}</button>
            </header>

            <div class="toolbar">
                <input
                    type="search"
                    placeholder="Search medications..."
                    value={filter.search.clone()}
                    oninput={on_search}
                    aria-label="Search medications"
                />
                <select onchange={on_category} aria-label="Filter by category">
                    { select_options("All Categories", &current_category, category_names.iter().map(|name| (*name, *name))) }
                </select>
                <select onchange={on_stock} aria-label="Filter by stock level">
                    { select_options("All Stock Levels", current_stock, [("low", "Low Stock"), ("sufficient", "Sufficient Stock")]) }
                </select>
            </div>

            if state.is_loading() && all.is_empty() {
                <p class="loading">{"Loading inventory..."}</p>
            } else if visible.is_empty() {
                <p class="empty-state">{"No medications match the current filters."}</p>
            } else {
                <div class="card-grid">
                    { for visible.into_iter().map(|medication| html! {
                        <MedicationCard
                            key={medication.id.clone()}
                            medication={medication.clone()}
                            api={props.api.clone()}
                            expiring_soon_days={props.config.expiring_soon_days}
                            notify={props.notify.clone()}
                            on_changed={medications.refetch.clone()}
                        />
                    }) }
                </div>
            }
        </>
    }
}

#[derive(Properties, PartialEq)]
struct MedicationCardProps {
    medication: Medication,
    api: ApiHandle,
    expiring_soon_days: u32,
    notify: Callback<Notice>,
    on_changed: Callback<()>,
}

#[function_component(MedicationCard)]
fn medication_card(props: &MedicationCardProps) -> Html {
    let medication = &props.medication;
    let restock = use_state(String::new);
    let saving = use_state(|| false);

    let on_restock_input = {
        let restock = restock.clone();
        Callback::from(move |event: InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            restock.set(input.value());
        })
    };

    let on_restock = {
        let restock = restock.clone();
        let saving = saving.clone();
        let api = props.api.clone();
        let notify = props.notify.clone();
        let on_changed = props.on_changed.clone();
        let id = medication.id.clone();
        let name = medication.name.clone();
        Callback::from(move |_| {
            let Ok(quantity) = restock.trim().parse::<u32>() else {
                notify.emit(Notice::error("Validation Error", "Stock quantity must be a whole number"));
                return;
            };

            saving.set(true);
            let api = api.client();
            let id = id.clone();
            let name = name.clone();
            let restock = restock.clone();
            let saving = saving.clone();
            let notify = notify.clone();
            let on_changed = on_changed.clone();
            spawn_local(async move {
                match api.update_medication_stock(&id, quantity).await {
                    Ok(updated) => {
                        notify.emit(Notice::success(
                            "Stock Updated",
                            format!("{name} now has {} {}", updated.stock_quantity, updated.unit),
                        ));
                        restock.set(String::new());
                        on_changed.emit(());
                    }
                    Err(err) => notify.emit(Notice::error("Error", err.to_string())),
                }
                saving.set(false);
            });
        })
    };

    let level = medication.stock_level();
    let expiring = medication.is_expiring_soon(Utc::now().date_naive(), props.expiring_soon_days);

    html! {
        <article class="card" data-level={level.level()}>
            <div class="section-header">
                <div>
                    <h3>{ medication.name.clone() }</h3>
                    if let Some(generic) = &medication.generic_name {
                        <p>{ generic.clone() }</p>
                    }
                </div>
                <span class="badge" data-level={level.level()}>{ level.label() }</span>
            </div>
            <div class="row-meta">
                <span>{ medication.category.clone() }</span>
                <span>{ format!("{} / min {} {}", medication.stock_quantity, medication.min_stock_level, medication.unit) }</span>
                <span>{ format_currency(medication.price) }</span>
            </div>
            <div class="row-meta">
                <span>{ format!("Exp: {}", format_date(medication.expiry_date)) }</span>
                if expiring {
                    <span class="badge" data-level="warning">{"Expiring Soon"}</span>
                }
                <span>{ format!("Batch {}", medication.batch_number) }</span>
                <span>{ medication.supplier.clone() }</span>
            </div>
            if let Some(description) = &medication.description {
                <p class="stat-caption">{ description.clone() }</p>
            }
            <div class="toolbar">
                <input
                    type="number"
                    min="0"
                    placeholder="New stock quantity"
                    value={(*restock).clone()}
                    oninput={on_restock_input}
                    aria-label="New stock quantity"
                />
                <button type="button" class="button" onclick={on_restock} disabled={*saving}>{"Update Stock"}</button>
            </div>
        </article>
    }
}
