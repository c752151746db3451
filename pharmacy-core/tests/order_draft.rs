use std::cell::Cell;

use chrono::NaiveDate;
use pharmacy_core::{
    validate_stock, DraftError, LineItemUpdate, Medication, NewOrder, OrderDraft, OrderPriority,
    OrderStatus, SubmitError,
};

fn medication(id: &str, name: &str, stock: u32) -> Medication {
    Medication {
        id: id.to_string(),
        name: name.to_string(),
        generic_name: None,
        category: "Antibiotics".to_string(),
        stock_quantity: stock,
        min_stock_level: 5,
        unit: "capsules".to_string(),
        price: 0.25,
        expiry_date: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
        batch_number: "AMX-2024-001".to_string(),
        supplier: "PharmaCorp Ltd".to_string(),
        description: None,
    }
}

fn catalog() -> Vec<Medication> {
    vec![
        medication("med-1", "Amoxicillin 500mg", 8),
        medication("med-2", "Omeprazole 20mg", 180),
    ]
}

#[test]
fn stock_check_is_boundary_inclusive() {
    let catalog = catalog();
    assert!(!validate_stock(&catalog, "med-1", 10));
    assert!(validate_stock(&catalog, "med-1", 8));
    assert!(!validate_stock(&catalog, "missing", 1));
    assert!(!validate_stock(&[], "med-1", 0));
}

#[test]
fn adding_same_medication_twice_bumps_quantity() {
    let catalog = catalog();
    let mut draft = OrderDraft::new();
    draft.add_line_item(&catalog[0]);
    draft.add_line_item(&catalog[0]);

    assert_eq!(draft.lines().len(), 1);
    assert_eq!(draft.lines()[0].quantity, 2);
    assert_eq!(draft.lines()[0].unit, "capsules");
    assert!(draft.lines()[0].dosage.is_empty());
    assert!(draft.lines()[0].instructions.is_empty());
}

#[test]
fn update_and_remove_target_matching_line_only() {
    let catalog = catalog();
    let mut draft = OrderDraft::new();
    draft.add_line_item(&catalog[0]);
    draft.add_line_item(&catalog[1]);

    draft.update_line_item("med-2", LineItemUpdate::Quantity(30));
    draft.update_line_item("med-2", LineItemUpdate::Dosage("20mg".into()));
    draft.update_line_item("med-2", LineItemUpdate::Instructions("Before breakfast".into()));
    draft.update_line_item("unknown", LineItemUpdate::Quantity(99));

    assert_eq!(draft.lines()[0].quantity, 1);
    assert_eq!(draft.lines()[1].quantity, 30);
    assert_eq!(draft.lines()[1].dosage, "20mg");
    assert_eq!(draft.lines()[1].instructions, "Before breakfast");

    draft.remove_line_item("med-1");
    assert_eq!(draft.lines().len(), 1);
    assert_eq!(draft.lines()[0].medication_id, "med-2");
}

#[test]
fn empty_patient_name_never_reaches_create() {
    let catalog = catalog();
    let mut draft = OrderDraft::new();
    draft.patient_name = "   ".to_string();
    draft.add_line_item(&catalog[1]);

    let calls = Cell::new(0);
    let result = draft.submit_with(&catalog, |_order: NewOrder| {
        calls.set(calls.get() + 1);
        Ok::<_, String>(())
    });

    assert!(matches!(
        result,
        Err(SubmitError::Validation(DraftError::MissingPatientName))
    ));
    assert_eq!(calls.get(), 0);
    assert_eq!(draft.lines().len(), 1);
}

#[test]
fn empty_line_items_are_rejected() {
    let mut draft = OrderDraft::new();
    draft.patient_name = "Mary Johnson".to_string();
    assert_eq!(draft.prepare(&catalog()), Err(DraftError::NoLineItems));
}

#[test]
fn insufficient_stock_blocks_submission() {
    let catalog = catalog();
    let mut draft = OrderDraft::new();
    draft.patient_name = "John Smith".to_string();
    draft.add_line_item(&catalog[0]);
    draft.update_line_item("med-1", LineItemUpdate::Quantity(10));

    assert_eq!(draft.insufficient_lines(&catalog).len(), 1);

    let err = draft.prepare(&catalog).unwrap_err();
    assert_eq!(
        err,
        DraftError::InsufficientStock {
            medication_id: "med-1".to_string(),
            medication_name: "Amoxicillin 500mg".to_string(),
            available: Some(8),
            requested: 10,
        }
    );
    assert_eq!(
        err.to_string(),
        "Not enough stock for Amoxicillin 500mg. Available: 8"
    );
}

#[test]
fn zero_quantity_is_rejected() {
    let catalog = catalog();
    let mut draft = OrderDraft::new();
    draft.patient_name = "John Smith".to_string();
    draft.add_line_item(&catalog[1]);
    draft.update_line_item("med-2", LineItemUpdate::Quantity(0));

    assert!(matches!(
        draft.prepare(&catalog),
        Err(DraftError::InvalidQuantity { .. })
    ));
}

#[test]
fn successful_submit_sends_pending_order_and_clears_form() {
    let catalog = catalog();
    let mut draft = OrderDraft::new();
    draft.patient_name = "  Robert Davis ".to_string();
    draft.patient_id = "PAT-003".to_string();
    draft.priority = OrderPriority::Urgent;
    draft.notes = "Post-operative pain management".to_string();
    draft.add_line_item(&catalog[0]);
    draft.update_line_item("med-1", LineItemUpdate::Quantity(8));
    draft.update_line_item("med-1", LineItemUpdate::Dosage("500mg".into()));

    let mut sent = None;
    let result = draft.submit_with(&catalog, |order| {
        sent = Some(order);
        Ok::<_, String>("ORD-777")
    });

    assert_eq!(result.unwrap(), "ORD-777");
    let sent = sent.unwrap();
    assert_eq!(sent.patient_name, "Robert Davis");
    assert_eq!(sent.patient_id.as_deref(), Some("PAT-003"));
    assert_eq!(sent.status, OrderStatus::Pending);
    assert_eq!(sent.priority, OrderPriority::Urgent);
    assert_eq!(sent.medications.len(), 1);
    assert_eq!(sent.medications[0].dosage.as_deref(), Some("500mg"));
    assert_eq!(sent.medications[0].instructions, None);

    assert!(draft.is_empty());
    assert_eq!(draft.priority, OrderPriority::Routine);
}

#[test]
fn failed_create_keeps_draft_for_retry() {
    let catalog = catalog();
    let mut draft = OrderDraft::new();
    draft.patient_name = "Li Wei".to_string();
    draft.add_line_item(&catalog[1]);
    let before = draft.clone();

    let result: Result<(), _> = draft.submit_with(&catalog, |_| Err("API request failed: Bad Gateway"));

    match result {
        Err(SubmitError::Create(message)) => assert_eq!(message, "API request failed: Bad Gateway"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(draft, before);
}

#[test]
fn new_order_body_uses_camel_case_and_skips_empty_fields() {
    let catalog = catalog();
    let mut draft = OrderDraft::new();
    draft.patient_name = "John Smith".to_string();
    draft.add_line_item(&catalog[1]);

    let body = serde_json::to_value(draft.prepare(&catalog).unwrap()).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "patientName": "John Smith",
            "medications": [{
                "medicationId": "med-2",
                "medicationName": "Omeprazole 20mg",
                "quantity": 1,
                "unit": "capsules"
            }],
            "status": "pending",
            "priority": "routine"
        })
    );
}

#[test]
fn patient_details_alone_leave_item_list_empty() {
    let mut draft = OrderDraft::new();
    draft.patient_name = "Emily Johnson".to_string();

    assert!(!draft.is_empty());
    assert!(draft.lines().is_empty());
    assert_eq!(draft.prepare(&catalog()), Err(DraftError::NoLineItems));

    draft.add_line_item(&catalog()[1]);
    draft.remove_line_item("med-2");
    assert!(draft.lines().is_empty());
}
