mod alerts;
mod dashboard;
mod inventory;
mod new_order;
mod orders;

pub use alerts::AlertsView;
pub use dashboard::DashboardView;
pub use inventory::InventoryView;
pub use new_order::NewOrderView;
pub use orders::OrdersView;
