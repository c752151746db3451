use pharmacy_core::{
    validate_stock, DraftError, InventoryFilter, LineItemUpdate, Medication, OrderDraft,
    OrderPriority,
};
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::platform::spawn_local;
use yew::prelude::*;
use yew::TargetCast;

use crate::app::{select_value, Notice, ViewProps};
use crate::format::format_currency;
use crate::hooks::use_fetch;

/// Số kết quả tối đa của ô tìm thuốc.
const SEARCH_LIMIT: usize = 8;

#[function_component(NewOrderView)]
pub fn new_order_view(props: &ViewProps) -> Html {
    let medications = use_fetch(&props.api, &props.notify, |api| async move {
        api.medications().await
    });
    let draft = use_state(OrderDraft::default);
    let search = use_state(String::new);
    let submitting = use_state(|| false);

    let edit = |apply: fn(&mut OrderDraft, String)| {
        let draft = draft.clone();
        move |value: String| {
            let mut next = (*draft).clone();
            apply(&mut next, value);
            draft.set(next);
        }
    };

    let on_patient_name = {
        let apply = edit(|draft, value| draft.patient_name = value);
        Callback::from(move |event: InputEvent| {
            apply(event.target_unchecked_into::<HtmlInputElement>().value())
        })
    };
    let on_patient_id = {
        let apply = edit(|draft, value| draft.patient_id = value);
        Callback::from(move |event: InputEvent| {
            apply(event.target_unchecked_into::<HtmlInputElement>().value())
        })
    };
    let on_notes = {
        let apply = edit(|draft, value| draft.notes = value);
        Callback::from(move |event: InputEvent| {
            apply(event.target_unchecked_into::<HtmlTextAreaElement>().value())
        })
    };
    let on_priority = {
        let apply = edit(|draft, value| {
            if let Ok(priority) = value.parse::<OrderPriority>() {
                draft.priority = priority;
            }
        });
        Callback::from(move |event: Event| apply(select_value(event)))
    };
    let on_search = {
        let search = search.clone();
        Callback::from(move |event: InputEvent| {
            search.set(event.target_unchecked_into::<HtmlInputElement>().value());
        })
    };

    let state = medications.state();
    let catalog = state.items();

    let on_submit = {
        let draft = draft.clone();
        let submitting = submitting.clone();
        let api = props.api.clone();
        let notify = props.notify.clone();
        let catalog = catalog.to_vec();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if *submitting {
                return;
            }
            if let Err(err) = draft.prepare(&catalog) {
                notify.emit(validation_notice(&err));
                return;
            }

            submitting.set(true);
            let api = api.client();
            let mut pending = (*draft).clone();
            let draft = draft.clone();
            let submitting = submitting.clone();
            let notify = notify.clone();
            let catalog = catalog.clone();
            spawn_local(async move {
                let patient_name = pending.patient_name.trim().to_string();
                match api.submit_draft(&mut pending, &catalog).await {
                    Ok(order) => {
                        draft.set(pending);
                        notify.emit(Notice::success(
                            "Order Created Successfully",
                            format!("Order {} has been created for {patient_name}", order.id),
                        ));
                    }
                    Err(err) => notify.emit(Notice::error("Error", err.to_string())),
                }
                submitting.set(false);
            });
        })
    };
    let on_clear = {
        let draft = draft.clone();
        Callback::from(move |_| draft.set(OrderDraft::default()))
    };

    let matches: Vec<&Medication> = if search.trim().is_empty() {
        Vec::new()
    } else {
        let filter = InventoryFilter {
            search: (*search).clone(),
            ..InventoryFilter::default()
        };
        catalog
            .iter()
            .filter(|medication| filter.matches_search(medication))
            .take(SEARCH_LIMIT)
            .collect()
    };

    html! {
        <>
            <header class="section-header">
                <div>
                    <h2>{"New Prescription Order"}</h2>
                    <p>{"Create a new prescription order for a patient."}</p>
                </div>
            </header>

            <form class="card-grid" onsubmit={on_submit}>
                <section class="card">
                    <h3>{"Patient Information"}</h3>
                    <div class="row-list form-grid">
                        <label>
                            {"Patient Name *"}
                            <input
                                type="text"
                                placeholder="Enter patient name"
                                value={draft.patient_name.clone()}
                                oninput={on_patient_name}
                            />
                        </label>
                        <label>
                            {"Patient ID"}
                            <input
                                type="text"
                                placeholder="Optional patient ID"
                                value={draft.patient_id.clone()}
                                oninput={on_patient_id}
                            />
                        </label>
                        <label>
                            {"Priority"}
                            <select onchange={on_priority}>
                                { for OrderPriority::ALL.into_iter().map(|priority| html! {
                                    <option value={priority.as_str()} selected={priority == draft.priority}>{ priority.label() }</option>
                                }) }
                            </select>
                        </label>
                        <p class="stat-caption">{ draft.priority.description() }</p>
                        <label>
                            {"Notes"}
                            <textarea
                                placeholder="Additional notes or special instructions"
                                value={draft.notes.clone()}
                                oninput={on_notes}
                            />
                        </label>
                    </div>
                </section>

                <section class="card">
                    <h3>{"Add Medications"}</h3>
                    <input
                        type="search"
                        placeholder="Search medications by name..."
                        value={(*search).clone()}
                        oninput={on_search}
                        aria-label="Search medications"
                    />
                    if state.is_loading() && catalog.is_empty() {
                        <p class="loading">{"Loading medications..."}</p>
                    }
                    <ul class="row-list">
                        { for matches.into_iter().map(|medication| {
                            let draft = draft.clone();
                            let search = search.clone();
                            let picked = medication.clone();
                            let onclick = Callback::from(move |_| {
                                let mut next = (*draft).clone();
                                next.add_line_item(&picked);
                                draft.set(next);
                                search.set(String::new());
                            });
                            html! {
                                <li class="row-meta">
                                    <strong>{ medication.name.clone() }</strong>
                                    <span>{ medication.category.clone() }</span>
                                    <span>{ format!("Stock: {} {}", medication.stock_quantity, medication.unit) }</span>
                                    <span>{ format_currency(medication.price) }</span>
                                    <button type="button" class="button" onclick={onclick}>{"Add"}</button>
                                </li>
                            }
                        }) }
                    </ul>
                </section>

                <section class="card">
                    <h3>{ format!("Order Items ({})", draft.lines().len()) }</h3>
                    if draft.lines().is_empty() {
                        <p class="empty-state">{"No medications added yet."}</p>
                    } else {
                        <ul class="row-list">
                            { for draft.lines().iter().map(|line| {
                                let id = line.medication_id.clone();
                                let update = |build: fn(String) -> LineItemUpdate| {
                                    let draft = draft.clone();
                                    let id = id.clone();
                                    Callback::from(move |event: InputEvent| {
                                        let value = event.target_unchecked_into::<HtmlInputElement>().value();
                                        let mut next = (*draft).clone();
                                        next.update_line_item(&id, build(value));
                                        draft.set(next);
                                    })
                                };
                                let on_quantity = update(|value| LineItemUpdate::Quantity(value.trim().parse().unwrap_or(0)));
                                let on_dosage = update(LineItemUpdate::Dosage);
                                let on_instructions = update(LineItemUpdate::Instructions);
                                let on_remove = {
                                    let draft = draft.clone();
                                    let id = id.clone();
                                    Callback::from(move |_| {
                                        let mut next = (*draft).clone();
                                        next.remove_line_item(&id);
                                        draft.set(next);
                                    })
                                };
                                let in_stock = validate_stock(catalog, &line.medication_id, line.quantity);

                                html! {
                                    <li class="card line-item" key={line.medication_id.clone()} data-insufficient={(!in_stock).to_string()}>
                                        <div class="section-header">
                                            <strong>{ line.medication_name.clone() }</strong>
                                            <button type="button" class="button" onclick={on_remove}>{"Remove"}</button>
                                        </div>
                                        <div class="toolbar">
                                            <label>
                                                { format!("Quantity ({})", line.unit) }
                                                <input type="number" min="1" value={line.quantity.to_string()} oninput={on_quantity} />
                                            </label>
                                            <label>
                                                {"Dosage"}
                                                <input type="text" placeholder="e.g., 1 tablet" value={line.dosage.clone()} oninput={on_dosage} />
                                            </label>
                                            <label>
                                                {"Instructions"}
                                                <input type="text" placeholder="e.g., Take with food" value={line.instructions.clone()} oninput={on_instructions} />
                                            </label>
                                        </div>
                                        if !in_stock {
                                            <span class="badge" data-level="warning">{"Insufficient Stock"}</span>
                                        }
                                    </li>
                                }
                            }) }
                        </ul>
                    }
                    <div class="toolbar">
                        <button type="button" class="button" onclick={on_clear} disabled={*submitting}>{"Clear Form"}</button>
                        <button type="submit" class="button primary" disabled={*submitting}>
                            { if *submitting { "Creating Order..." } else { "Create Order" } }
                        </button>
                    </div>
                </section>
            </form>
        </>
    }
}

fn validation_notice(err: &DraftError) -> Notice {
    match err {
        DraftError::InsufficientStock { .. } => Notice::error("Stock Insufficient", err.to_string()),
        _ => Notice::error("Validation Error", err.to_string()),
    }
}
