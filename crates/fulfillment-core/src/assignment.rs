//! 指派結果模型

use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::order::OrderId;
use crate::worker::MaxHours;

/// 單張訂單的指派結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// 訂單ID
    pub order_id: OrderId,

    /// 指派的工人類型
    pub assigned_worker: String,

    /// 實際成本
    pub cost: f64,

    /// 品項數量
    pub num_items: u32,

    /// 總重量（公斤）
    pub total_weight_kg: f64,

    /// 耗用工時
    pub hours: f64,
}

/// 單一工人類型的彙總
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerSummary {
    pub worker: String,
    pub order_count: usize,
    pub total_items: u64,
    pub total_hours: f64,
    pub total_cost: f64,
    pub max_hours: MaxHours,
}

impl WorkerSummary {
    /// 創建空彙總
    pub fn empty(worker: impl Into<String>, max_hours: MaxHours) -> Self {
        Self {
            worker: worker.into(),
            order_count: 0,
            total_items: 0,
            total_hours: 0.0,
            total_cost: 0.0,
            max_hours,
        }
    }

    /// 累加一筆指派
    pub fn record(&mut self, assignment: &Assignment) {
        self.order_count += 1;
        self.total_items += u64::from(assignment.num_items);
        self.total_hours += assignment.hours;
        self.total_cost += assignment.cost;
    }

    /// 每張訂單平均成本
    pub fn average_cost(&self) -> Option<f64> {
        (self.order_count > 0).then(|| self.total_cost / self.order_count as f64)
    }

    /// 有限工時的使用率（0~1）
    pub fn utilization(&self) -> Option<f64> {
        match self.max_hours {
            MaxHours::Limited(limit) if limit > 0.0 => Some(self.total_hours / limit),
            _ => None,
        }
    }
}

/// 訂單重量超過工人類型建議上限的提示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightAdvisory {
    pub order_id: OrderId,
    pub worker: String,
    pub weight_kg: f64,
    pub limit_kg: f64,
}

/// 一次規劃執行的完整結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentPlan {
    /// 規劃執行ID
    pub run_id: Uuid,

    /// 規劃日期
    pub plan_date: Option<NaiveDate>,

    /// 依輸入順序排列的指派
    pub assignments: Vec<Assignment>,

    /// 依登錄表順序排列的工人彙總
    pub workers: Vec<WorkerSummary>,

    /// 依指派重新計算的總成本
    pub total_cost: f64,

    /// 求解器回報的目標值
    pub objective_value: f64,

    /// 重量提示
    pub advisories: Vec<WeightAdvisory>,
}

impl AssignmentPlan {
    /// 查詢訂單指派的工人類型
    pub fn worker_for(&self, order_id: &OrderId) -> Option<&str> {
        self.assignments
            .iter()
            .find(|a| &a.order_id == order_id)
            .map(|a| a.assigned_worker.as_str())
    }

    /// 查詢工人類型彙總
    pub fn summary_for(&self, worker: &str) -> Option<&WorkerSummary> {
        self.workers.iter().find(|s| s.worker == worker)
    }

    /// 總成本（四捨五入到分，固定兩位小數）
    pub fn total_cost_rounded(&self) -> Decimal {
        let mut cents = Decimal::from_f64(self.total_cost)
            .unwrap_or(Decimal::ZERO)
            .round_dp(2);
        cents.rescale(2);
        cents
    }

    /// 訂單數量
    pub fn order_count(&self) -> usize {
        self.assignments.len()
    }
}
