use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand};
use pharmacy_api::{parse_snapshot_str, ApiClient, PortalSnapshot};
use pharmacy_core::{
    filter_inventory, triage_alerts, triage_orders, AlertFilter, AlertSeverity, AlertType,
    ApiConfig, DashboardOverview, InventoryFilter, LineItemUpdate, Medication, OrderDraft,
    OrderFilter, OrderPriority, OrderStatus, Selection, SeverityStats, StockFilter, TriageConfig,
};
use serde::Deserialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "pharmacy-cli",
    about = "Xem và thao tác dữ liệu bảng điều khiển nhà thuốc từ dòng lệnh."
)]
struct Cli {
    /// File cấu hình TOML với các bảng `[api]` và `[triage]`.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Ghi đè địa chỉ API trong file cấu hình.
    #[arg(long, env = "PHARMACY_API_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Đọc dữ liệu từ snapshot JSON thay vì gọi API.
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Tăng mức log (`-v` là debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Số liệu tổng quan, cảnh báo critical và các đơn gần nhất.
    Stats,
    /// Danh mục thuốc trong kho.
    Inventory {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        category: Selection<String>,
        #[arg(long, default_value = "all")]
        stock: StockFilter,
    },
    /// Đơn thuốc theo thứ tự ưu tiên.
    Orders {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        status: Selection<OrderStatus>,
        #[arg(long, default_value = "all")]
        priority: Selection<OrderPriority>,
    },
    /// Cảnh báo kho theo mức nghiêm trọng.
    Alerts {
        #[arg(long, default_value = "all")]
        severity: Selection<AlertSeverity>,
        #[arg(long = "type", default_value = "all")]
        kind: Selection<AlertType>,
    },
    /// Bỏ qua một cảnh báo.
    Dismiss { id: String },
    /// Đổi trạng thái đơn.
    SetStatus { id: String, status: OrderStatus },
    /// Cập nhật số lượng tồn kho của một thuốc.
    Restock { id: String, quantity: u32 },
    /// Tạo đơn mới từ các mã thuốc.
    NewOrder {
        #[arg(long)]
        patient: String,
        #[arg(long)]
        patient_id: Option<String>,
        #[arg(long, default_value = "routine")]
        priority: OrderPriority,
        #[arg(long)]
        notes: Option<String>,
        /// `<mã thuốc>[:số lượng]`, lặp lại cho nhiều thuốc.
        #[arg(long = "item", required = true, value_parser = parse_item)]
        items: Vec<(String, u32)>,
    },
    /// Ghi toàn bộ dữ liệu hiện tại ra file snapshot JSON.
    Export {
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    api: ApiConfig,
    triage: TriageConfig,
}

fn load_config(path: Option<&Path>, base_url: Option<String>) -> anyhow::Result<FileConfig> {
    let mut config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Không đọc được file cấu hình {path:?}"))?;
            toml::from_str(&raw).with_context(|| format!("File cấu hình {path:?} không hợp lệ"))?
        }
        None => FileConfig::default(),
    };
    if let Some(base_url) = base_url {
        config.api.base_url = base_url;
    }
    Ok(config)
}

fn parse_item(raw: &str) -> Result<(String, u32), String> {
    let (id, quantity) = match raw.split_once(':') {
        Some((id, quantity)) => {
            let quantity = quantity
                .trim()
                .parse()
                .map_err(|_| format!("Số lượng không hợp lệ trong `{raw}`"))?;
            (id, quantity)
        }
        None => (raw, 1),
    };
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("Thiếu mã thuốc trong `{raw}`"));
    }
    Ok((id.to_string(), quantity))
}

/// Thêm các `--item` vào đơn; cùng một thuốc lặp lại thì cộng dồn số lượng.
fn add_items(
    draft: &mut OrderDraft,
    items: &[(String, u32)],
    catalog: &[Medication],
) -> anyhow::Result<()> {
    for (id, quantity) in items {
        let medication = catalog
            .iter()
            .find(|medication| &medication.id == id)
            .with_context(|| format!("Không tìm thấy thuốc {id}"))?;
        let existing = draft
            .lines()
            .iter()
            .find(|line| &line.medication_id == id)
            .map(|line| line.quantity);
        if existing.is_none() {
            draft.add_line_item(medication);
        }
        let total = existing.unwrap_or(0).saturating_add(*quantity);
        draft.update_line_item(id, LineItemUpdate::Quantity(total));
    }
    Ok(())
}

/// Nguồn dữ liệu: API thật hoặc snapshot đọc từ file.
enum Source {
    Live(ApiClient),
    Offline(PortalSnapshot),
}

impl Source {
    fn open(cli: &Cli, config: &FileConfig) -> anyhow::Result<Self> {
        match &cli.snapshot {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Không đọc được file {path:?}"))?;
                let snapshot = parse_snapshot_str(&raw)?;
                debug!(path = %path.display(), "dùng snapshot ngoại tuyến");
                Ok(Source::Offline(snapshot))
            }
            None => Ok(Source::Live(ApiClient::new(config.api.clone())?)),
        }
    }

    async fn load(self) -> anyhow::Result<PortalSnapshot> {
        match self {
            Source::Live(client) => Ok(client.snapshot().await?),
            Source::Offline(snapshot) => Ok(snapshot),
        }
    }

    fn live(self) -> anyhow::Result<ApiClient> {
        match self {
            Source::Live(client) => Ok(client),
            Source::Offline(_) => bail!("Lệnh này cần kết nối API, không dùng được với --snapshot"),
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = if verbose > 0 { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref(), cli.base_url.clone())?;
    let source = Source::open(&cli, &config)?;

    match cli.command {
        Command::Stats => {
            let data = source.load().await?;
            print_stats(&data, &config.triage);
        }
        Command::Inventory {
            search,
            category,
            stock,
        } => {
            let data = source.load().await?;
            let filter = InventoryFilter {
                search,
                category,
                stock,
            };
            let today = Utc::now().date_naive();
            let visible = filter_inventory(&data.medications, &filter);
            println!("{} of {} medications", visible.len(), data.medications.len());
            for medication in visible {
                let expiring = medication.is_expiring_soon(today, config.triage.expiring_soon_days);
                println!(
                    "{:<10} {:<28} {:<18} {:>6} / {:<6} {:<10} exp {}{}",
                    medication.id,
                    medication.name,
                    medication.category,
                    medication.stock_quantity,
                    medication.min_stock_level,
                    medication.stock_level().label(),
                    medication.expiry_date,
                    if expiring { " (expiring soon)" } else { "" },
                );
            }
        }
        Command::Orders {
            search,
            status,
            priority,
        } => {
            let data = source.load().await?;
            let filter = OrderFilter {
                search,
                status,
                priority,
            };
            let now = Utc::now();
            for order in triage_orders(&data.orders, &filter) {
                let eta = match (order.status, order.completion_eta(now)) {
                    (OrderStatus::Processing, Some(eta)) => eta.to_string(),
                    _ => String::new(),
                };
                println!(
                    "{:<10} {:<16} {:<12} {:<24} {:<3} items  {}",
                    order.id,
                    order.priority.label(),
                    order.status.label(),
                    order.patient_name,
                    order.medications.len(),
                    eta,
                );
            }
        }
        Command::Alerts { severity, kind } => {
            let data = source.load().await?;
            let stats = SeverityStats::from_alerts(&data.alerts);
            println!(
                "Critical: {}  Warning: {}  Info: {}",
                stats.critical, stats.warning, stats.info
            );
            let filter = AlertFilter { severity, kind };
            for alert in triage_alerts(&data.alerts, &filter) {
                println!(
                    "{:<10} {:<9} {:<20} {}",
                    alert.id,
                    alert.severity.label(),
                    alert.kind.title(),
                    alert.message,
                );
            }
        }
        Command::Dismiss { id } => {
            source.live()?.dismiss_alert(&id).await?;
            println!("Alert {id} dismissed");
        }
        Command::SetStatus { id, status } => {
            let order = source.live()?.update_order_status(&id, status).await?;
            println!("Order {} is now {}", order.id, order.status.label());
        }
        Command::Restock { id, quantity } => {
            let medication = source.live()?.update_medication_stock(&id, quantity).await?;
            println!(
                "{} now has {} {}",
                medication.name, medication.stock_quantity, medication.unit
            );
        }
        Command::NewOrder {
            patient,
            patient_id,
            priority,
            notes,
            items,
        } => {
            let client = source.live()?;
            let catalog = client.medications().await?;
            let mut draft = OrderDraft::default();
            draft.patient_name = patient;
            draft.patient_id = patient_id.unwrap_or_default();
            draft.priority = priority;
            draft.notes = notes.unwrap_or_default();
            add_items(&mut draft, &items, &catalog)?;

            let order = client.submit_draft(&mut draft, &catalog).await?;
            println!("Order {} has been created for {}", order.id, order.patient_name);
        }
        Command::Export { output } => {
            let data = source.load().await?;
            let json = serde_json::to_string_pretty(&data)?;
            std::fs::write(&output, json)
                .with_context(|| format!("Không ghi được file {output:?}"))?;
            info!(
                path = %output.display(),
                medications = data.medications.len(),
                orders = data.orders.len(),
                alerts = data.alerts.len(),
                "đã ghi snapshot"
            );
        }
    }

    Ok(())
}

fn print_stats(data: &PortalSnapshot, triage: &TriageConfig) {
    let overview = DashboardOverview::build(
        data.stats.as_ref(),
        &data.orders,
        &data.alerts,
        triage,
    );
    if !overview.stats_available {
        println!("Unable to load dashboard data. Using fallback values.");
    }

    let stats = &overview.stats;
    println!("Total Medications: {}", stats.total_medications);
    println!("Low Stock Alerts:  {}", stats.low_stock_items);
    println!("Pending Orders:    {}", stats.pending_orders);
    println!("SOS Orders:        {}", stats.sos_orders);
    println!("Completed Today:   {}", stats.completed_today);
    println!("Revenue:           ${:.2}", stats.revenue);

    if let Some(banner) = overview.critical_banner() {
        println!("\n{banner}");
        for alert in &overview.critical_alerts {
            println!("  {} - {}", alert.medication_name, alert.message);
        }
    }

    println!("\nRecent Orders ({} SOS)", overview.sos_in_recent);
    for order in &overview.recent_orders {
        println!(
            "  {:<10} {:<24} {:<8} {}",
            order.id,
            order.patient_name,
            order.priority.as_str().to_uppercase(),
            order.status.as_str(),
        );
    }
}
