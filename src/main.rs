//! 訂單指派規劃命令列

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use fulfillment_core::{
    AssignmentPlan, Order, PlanningError, RegistryConfig, WeightAdvisory, WorkerRegistry,
};
use fulfillment_optimizer::{AssignmentPlanner, PlannerOptions, SolverBackend};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// 無可行指派時的結束碼，與一般錯誤 (1) 區分
const EXIT_INFEASIBLE: u8 = 2;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 為當日訂單指派工人類型並輸出 JSON
    Plan(PlanArgs),
}

#[derive(clap::Args)]
struct PlanArgs {
    /// 訂單 JSON 檔（陣列：order_id, num_items, total_weight_kg）
    #[arg(long)]
    orders: PathBuf,

    /// 工人登錄表 JSON 檔，省略時使用預設班表
    #[arg(long)]
    workers: Option<PathBuf>,

    /// 求解時限（秒）
    #[arg(long)]
    time_limit_secs: Option<u64>,

    #[arg(long, value_enum, default_value_t = Backend::Milp)]
    backend: Backend,

    /// 規劃日期 (YYYY-MM-DD)
    #[arg(long)]
    plan_date: Option<NaiveDate>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    Milp,
    BranchAndBound,
}

impl From<Backend> for SolverBackend {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Milp => SolverBackend::Milp,
            Backend::BranchAndBound => SolverBackend::BranchAndBound,
        }
    }
}

#[derive(Serialize)]
struct WorkerRow<'a> {
    worker: &'a str,
    order_count: usize,
    total_items: u64,
    total_hours: f64,
    total_cost: f64,
    average_cost: Option<f64>,
    utilization: Option<f64>,
}

#[derive(Serialize)]
struct Report<'a> {
    status: &'static str,
    run_id: String,
    plan_date: Option<NaiveDate>,
    total_cost: Decimal,
    workers: Vec<WorkerRow<'a>>,
    advisories: &'a [WeightAdvisory],
    assignments: &'a [fulfillment_core::Assignment],
}

impl<'a> From<&'a AssignmentPlan> for Report<'a> {
    fn from(plan: &'a AssignmentPlan) -> Self {
        let workers = plan
            .workers
            .iter()
            .map(|s| WorkerRow {
                worker: &s.worker,
                order_count: s.order_count,
                total_items: s.total_items,
                total_hours: s.total_hours,
                total_cost: s.total_cost,
                average_cost: s.average_cost(),
                utilization: s.utilization(),
            })
            .collect();
        Self {
            status: "Optimal",
            run_id: plan.run_id.to_string(),
            plan_date: plan.plan_date,
            total_cost: plan.total_cost_rounded(),
            workers,
            advisories: &plan.advisories,
            assignments: &plan.assignments,
        }
    }
}

#[derive(Serialize)]
struct Rejection {
    status: &'static str,
    message: String,
}

fn load_orders(path: &Path) -> anyhow::Result<Vec<Order>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("無法讀取訂單檔 {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("訂單檔格式錯誤 {}", path.display()))
}

fn load_registry(path: Option<&Path>) -> anyhow::Result<WorkerRegistry> {
    let Some(path) = path else {
        info!("未指定工人登錄表，使用預設班表");
        return Ok(WorkerRegistry::standard_shift());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("無法讀取工人登錄表 {}", path.display()))?;
    let registry = RegistryConfig::from_json_str(&raw)
        .and_then(|config| config.to_registry())
        .with_context(|| format!("工人登錄表無效 {}", path.display()))?;
    Ok(registry)
}

/// 一次規劃的輸出：JSON 內容與對應的結束碼
#[derive(Debug)]
enum PlanReport {
    Planned(String),
    Infeasible(String),
}

impl PlanReport {
    fn json(&self) -> &str {
        match self {
            PlanReport::Planned(json) | PlanReport::Infeasible(json) => json,
        }
    }

    fn exit_code(&self) -> u8 {
        match self {
            PlanReport::Planned(_) => 0,
            PlanReport::Infeasible(_) => EXIT_INFEASIBLE,
        }
    }
}

fn build_planner(args: &PlanArgs, registry: WorkerRegistry) -> AssignmentPlanner {
    let mut options = PlannerOptions::default().with_backend(args.backend.into());
    if let Some(secs) = args.time_limit_secs {
        options = options.with_time_limit(Duration::from_secs(secs));
    }
    if let Some(date) = args.plan_date {
        options = options.with_plan_date(date);
    }
    AssignmentPlanner::new(Arc::new(registry), options)
}

/// 規劃並轉為 JSON；不可行是正常結果，其餘規劃錯誤往上傳遞
fn render_plan(planner: &AssignmentPlanner, orders: &[Order]) -> anyhow::Result<PlanReport> {
    match planner.plan(orders) {
        Ok(plan) => {
            let json = serde_json::to_string_pretty(&Report::from(&plan))?;
            Ok(PlanReport::Planned(json))
        }
        Err(e @ PlanningError::Infeasible(_)) => {
            let rejection = Rejection {
                status: "Infeasible",
                message: e.to_string(),
            };
            Ok(PlanReport::Infeasible(serde_json::to_string_pretty(&rejection)?))
        }
        Err(e) => Err(e).context("規劃失敗"),
    }
}

fn execute(args: &PlanArgs) -> anyhow::Result<PlanReport> {
    // Step 1: 載入輸入
    let orders = load_orders(&args.orders)?;
    let registry = load_registry(args.workers.as_deref())?;

    // Step 2: 規劃並輸出
    let planner = build_planner(args, registry);
    render_plan(&planner, &orders)
}

fn plan(args: PlanArgs) -> anyhow::Result<ExitCode> {
    let report = execute(&args)?;
    println!("{}", report.json());
    Ok(ExitCode::from(report.exit_code()))
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Commands::Plan(args) => plan(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::Value;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SCENARIO_WORKERS: &str = r#"{
        "A": { "speed": 1000, "wage": 10, "max_hours": 0.2 },
        "B": { "speed": 10, "wage": 1 }
    }"#;

    const SCENARIO_ORDERS: &str = r#"[
        { "order_id": 1, "num_items": 10, "total_weight_kg": 1.0 },
        { "order_id": 2, "num_items": 20, "total_weight_kg": 2.0 },
        { "order_id": 3, "num_items": 200, "total_weight_kg": 20.0 }
    ]"#;

    fn json_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn plan_args(orders: &NamedTempFile, workers: Option<&NamedTempFile>) -> PlanArgs {
        PlanArgs {
            orders: orders.path().to_path_buf(),
            workers: workers.map(|f| f.path().to_path_buf()),
            time_limit_secs: None,
            backend: Backend::Milp,
            plan_date: None,
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_plan_flags() {
        let cli = Cli::try_parse_from([
            "fulfillment",
            "plan",
            "--orders",
            "orders.json",
            "--backend",
            "branch-and-bound",
            "--time-limit-secs",
            "5",
            "--plan-date",
            "2025-11-03",
            "--verbose",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Commands::Plan(args) = cli.command;
        assert_eq!(args.orders, PathBuf::from("orders.json"));
        assert!(args.workers.is_none());
        assert_eq!(args.time_limit_secs, Some(5));
        assert!(matches!(args.backend, Backend::BranchAndBound));
        assert_eq!(args.plan_date, NaiveDate::from_ymd_opt(2025, 11, 3));
    }

    #[test]
    fn test_rejects_malformed_plan_date() {
        let parsed = Cli::try_parse_from([
            "fulfillment",
            "plan",
            "--orders",
            "orders.json",
            "--plan-date",
            "03/11/2025",
        ]);

        assert!(parsed.is_err());
    }

    #[test]
    fn test_planned_report_json() {
        let orders = json_file(SCENARIO_ORDERS);
        let workers = json_file(SCENARIO_WORKERS);
        let mut args = plan_args(&orders, Some(&workers));
        args.plan_date = NaiveDate::from_ymd_opt(2025, 11, 3);

        let report = execute(&args).unwrap();

        assert_eq!(report.exit_code(), 0);
        let json: Value = serde_json::from_str(report.json()).unwrap();
        assert_eq!(json["status"], "Optimal");
        assert_eq!(json["total_cost"], "5.00");
        assert_eq!(json["plan_date"], "2025-11-03");
        assert_eq!(json["assignments"].as_array().unwrap().len(), 3);
        assert_eq!(json["assignments"][2]["assigned_worker"], "A");
        assert_eq!(json["workers"][1]["order_count"], 2);
    }

    #[test]
    fn test_infeasible_report_and_exit_code() {
        let orders = json_file(SCENARIO_ORDERS);
        let workers = json_file(r#"{ "A": { "speed": 10, "wage": 1, "max_hours": 0 } }"#);

        let report = execute(&plan_args(&orders, Some(&workers))).unwrap();

        assert!(matches!(report, PlanReport::Infeasible(_)));
        assert_eq!(report.exit_code(), EXIT_INFEASIBLE);
        let json: Value = serde_json::from_str(report.json()).unwrap();
        assert_eq!(json["status"], "Infeasible");
    }

    #[test]
    fn test_default_shift_when_workers_omitted() {
        let orders = json_file(SCENARIO_ORDERS);

        let report = execute(&plan_args(&orders, None)).unwrap();

        let json: Value = serde_json::from_str(report.json()).unwrap();
        let names: Vec<_> = json["workers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|w| w["worker"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["Robot", "Senior", "Junior"]);
    }

    #[test]
    fn test_errors_propagate_as_failures() {
        let missing = PlanArgs {
            orders: PathBuf::from("/nonexistent/orders.json"),
            workers: None,
            time_limit_secs: None,
            backend: Backend::Milp,
            plan_date: None,
        };
        assert!(execute(&missing).is_err());

        // 重複訂單ID屬於建模錯誤，不是不可行
        let orders = json_file(
            r#"[
                { "order_id": 1, "num_items": 10 },
                { "order_id": 1, "num_items": 20 }
            ]"#,
        );
        let err = execute(&plan_args(&orders, None)).unwrap_err();
        let planning = err.downcast_ref::<PlanningError>().unwrap();
        assert!(planning.aborts_before_solve());

        let broken = json_file(r#"{ "A": { "speed": 0, "wage": 1 } }"#);
        assert!(execute(&plan_args(&orders, Some(&broken))).is_err());
    }
}
