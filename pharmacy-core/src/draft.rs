//! Đơn thuốc nháp của form "New Order": giữ trạng thái tạm trên client và
//! kiểm tra tồn kho trước khi gửi.

use serde::{Deserialize, Serialize};

use crate::model::{Medication, NewOrder, OrderItem, OrderPriority, OrderStatus};

/// Một dòng thuốc đang soạn. Liều dùng và hướng dẫn để trống nghĩa là không gửi.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DraftLine {
    pub medication_id: String,
    pub medication_name: String,
    pub quantity: u32,
    pub unit: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub instructions: String,
}

impl DraftLine {
    fn to_item(&self) -> OrderItem {
        OrderItem {
            medication_id: self.medication_id.clone(),
            medication_name: self.medication_name.clone(),
            quantity: self.quantity,
            unit: self.unit.clone(),
            dosage: non_empty(&self.dosage),
            instructions: non_empty(&self.instructions),
        }
    }
}

/// Trường có thể sửa trên một dòng thuốc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum LineItemUpdate {
    Quantity(u32),
    Dosage(String),
    Instructions(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("Patient name is required")]
    MissingPatientName,
    #[error("At least one medication must be added")]
    NoLineItems,
    #[error("Quantity for {medication_name} must be at least 1")]
    InvalidQuantity { medication_name: String },
    #[error("Not enough stock for {medication_name}. Available: {}", display_available(available))]
    InsufficientStock {
        medication_id: String,
        medication_name: String,
        available: Option<u32>,
        requested: u32,
    },
}

/// Lỗi khi gửi đơn: hoặc chưa qua kiểm tra, hoặc bước tạo đơn thất bại.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError<E> {
    #[error(transparent)]
    Validation(DraftError),
    #[error("Failed to create order: {0}")]
    Create(E),
}

/// `true` khi thuốc có trong danh mục và đủ số lượng (biên bằng vẫn đủ).
pub fn validate_stock(catalog: &[Medication], medication_id: &str, quantity: u32) -> bool {
    catalog
        .iter()
        .find(|medication| medication.id == medication_id)
        .is_some_and(|medication| medication.stock_quantity >= quantity)
}

/// Form đơn thuốc. Dạng JSON dùng camelCase như mô hình trao đổi với API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderDraft {
    pub patient_name: String,
    pub patient_id: String,
    pub priority: OrderPriority,
    pub notes: String,
    lines: Vec<DraftLine>,
}

impl OrderDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[DraftLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Thêm thuốc vào đơn; nếu đã có thì tăng số lượng thêm 1.
    pub fn add_line_item(&mut self, medication: &Medication) {
        if let Some(line) = self.line_mut(&medication.id) {
            line.quantity = line.quantity.saturating_add(1);
            return;
        }

        self.lines.push(DraftLine {
            medication_id: medication.id.clone(),
            medication_name: medication.name.clone(),
            quantity: 1,
            unit: medication.unit.clone(),
            dosage: String::new(),
            instructions: String::new(),
        });
    }

    /// Thay một trường của dòng thuốc; không có dòng tương ứng thì bỏ qua.
    pub fn update_line_item(&mut self, medication_id: &str, update: LineItemUpdate) {
        let Some(line) = self.line_mut(medication_id) else {
            return;
        };

        match update {
            LineItemUpdate::Quantity(quantity) => line.quantity = quantity,
            LineItemUpdate::Dosage(dosage) => line.dosage = dosage,
            LineItemUpdate::Instructions(instructions) => line.instructions = instructions,
        }
    }

    pub fn remove_line_item(&mut self, medication_id: &str) {
        self.lines.retain(|line| line.medication_id != medication_id);
    }

    /// Các dòng đang vượt tồn kho, dùng để gắn nhãn "insufficient stock".
    pub fn insufficient_lines<'a>(&'a self, catalog: &[Medication]) -> Vec<&'a DraftLine> {
        self.lines
            .iter()
            .filter(|line| !validate_stock(catalog, &line.medication_id, line.quantity))
            .collect()
    }

    /// Kiểm tra đơn và dựng thân request, không thay đổi trạng thái form.
    pub fn prepare(&self, catalog: &[Medication]) -> Result<NewOrder, DraftError> {
        if self.patient_name.trim().is_empty() {
            return Err(DraftError::MissingPatientName);
        }
        if self.lines.is_empty() {
            return Err(DraftError::NoLineItems);
        }

        for line in &self.lines {
            if line.quantity == 0 {
                return Err(DraftError::InvalidQuantity {
                    medication_name: line.medication_name.clone(),
                });
            }
            if !validate_stock(catalog, &line.medication_id, line.quantity) {
                let known = catalog
                    .iter()
                    .find(|medication| medication.id == line.medication_id);
                return Err(DraftError::InsufficientStock {
                    medication_id: line.medication_id.clone(),
                    medication_name: known
                        .map_or_else(|| line.medication_name.clone(), |m| m.name.clone()),
                    available: known.map(|m| m.stock_quantity),
                    requested: line.quantity,
                });
            }
        }

        Ok(NewOrder {
            patient_name: self.patient_name.trim().to_string(),
            patient_id: non_empty(&self.patient_id),
            medications: self.lines.iter().map(DraftLine::to_item).collect(),
            status: OrderStatus::Pending,
            priority: self.priority,
            assigned_pharmacist: None,
            notes: non_empty(&self.notes),
            estimated_completion_time: None,
        })
    }

    /// Kiểm tra rồi giao đơn cho `create`. Form chỉ được xoá khi `create` thành công;
    /// kiểm tra thất bại thì `create` không được gọi.
    pub fn submit_with<T, E, F>(&mut self, catalog: &[Medication], create: F) -> Result<T, SubmitError<E>>
    where
        F: FnOnce(NewOrder) -> Result<T, E>,
    {
        let order = self.prepare(catalog).map_err(SubmitError::Validation)?;
        let created = create(order).map_err(SubmitError::Create)?;
        self.clear();
        Ok(created)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn line_mut(&mut self, medication_id: &str) -> Option<&mut DraftLine> {
        self.lines
            .iter_mut()
            .find(|line| line.medication_id == medication_id)
    }
}

fn display_available(available: &Option<u32>) -> String {
    available.map_or_else(|| "unknown".to_string(), |count| count.to_string())
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
