//! 單日班表指派示例

use chrono::NaiveDate;
use fulfillment_core::{Order, WorkerRegistry};
use fulfillment_optimizer::{AssignmentPlanner, PlannerOptions, SolverBackend};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== 單日訂單指派示例 ===\n");

    // 預設班表：Robot / Senior / Junior
    let registry = Arc::new(WorkerRegistry::standard_shift());
    for worker in registry.iter() {
        println!(
            "  - {}: {} 件/小時, ${}/小時, 上限 {:?}",
            worker.name, worker.throughput_rate, worker.cost_rate, worker.max_hours
        );
    }

    // 訂單：件數 1~40，重量約每件 0.4 kg
    let orders: Vec<Order> = (1..=60u64)
        .map(|id| {
            let items = (id * 7 % 40 + 1) as u32;
            Order::new(id, items, f64::from(items) * 0.4)
        })
        .collect();

    let date = NaiveDate::from_ymd_opt(2025, 11, 3).ok_or("無效日期")?;
    let options = PlannerOptions::default()
        .with_backend(SolverBackend::Milp)
        .with_plan_date(date);
    let planner = AssignmentPlanner::new(registry, options);

    let plan = planner.plan(&orders)?;

    println!("\n規劃日期 {}，總成本 ${}", date, plan.total_cost_rounded());
    for summary in &plan.workers {
        println!(
            "  - {}: {} 張訂單, {:.2} 小時, ${:.2}（平均 ${:.2}）",
            summary.worker,
            summary.order_count,
            summary.total_hours,
            summary.total_cost,
            summary.average_cost().unwrap_or(0.0)
        );
    }
    if !plan.advisories.is_empty() {
        println!("\n重量提示:");
        for advisory in &plan.advisories {
            println!(
                "  - 訂單 {} 由 {} 處理，{:.1} kg 超過 {:.1} kg",
                advisory.order_id, advisory.worker, advisory.weight_kg, advisory.limit_kg
            );
        }
    }

    Ok(())
}
