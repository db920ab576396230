//! 結果擷取與一致性檢查
//!
//! 僅在求解狀態為 Optimal 時擷取。二元變數的值以 0.5 為門檻判定是否選中，
//! 以容忍求解器的浮點殘差。擷取後檢查：
//! 1. 每張訂單恰好選中一種工人類型
//! 2. 模型的每條限制式（單一指派、工時上限）在選中結果上皆成立
//! 3. 重新計算的總成本與求解器回報的目標值一致
//!
//! 任何檢查失敗都代表求解器或擷取有缺陷，必須中止，不得輸出部分結果。

use chrono::NaiveDate;
use fulfillment_core::{
    Assignment, AssignmentPlan, PlanningError, Result, WeightAdvisory, WorkerSummary,
};
use fulfillment_model::{AssignmentModel, ModelConstraint, VariableMatrix};
use uuid::Uuid;

use crate::solver::{SolveOutcome, SolvedModel};

/// 變數值超過此門檻視為選中
pub const SELECTION_THRESHOLD: f64 = 0.5;

/// 工時上限比較的預設容許誤差
pub const DEFAULT_CAPACITY_EPSILON: f64 = 1e-6;

/// 總成本與目標值比較的預設容許誤差（絕對值，另按目標值規模放大）
pub const DEFAULT_OBJECTIVE_TOLERANCE: f64 = 1e-6;

/// 結果擷取器
#[derive(Debug, Clone, Copy)]
pub struct ResultExtractor {
    capacity_epsilon: f64,
    objective_tolerance: f64,
}

impl Default for ResultExtractor {
    fn default() -> Self {
        Self {
            capacity_epsilon: DEFAULT_CAPACITY_EPSILON,
            objective_tolerance: DEFAULT_OBJECTIVE_TOLERANCE,
        }
    }
}

impl ResultExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置工時容許誤差
    pub fn with_capacity_epsilon(mut self, epsilon: f64) -> Self {
        self.capacity_epsilon = epsilon;
        self
    }

    /// 建構器模式：設置目標值容許誤差
    pub fn with_objective_tolerance(mut self, tolerance: f64) -> Self {
        self.objective_tolerance = tolerance;
        self
    }

    /// 非最佳狀態直接轉為對應錯誤，不嘗試擷取
    pub fn extract(
        &self,
        model: &AssignmentModel,
        outcome: &SolveOutcome,
        run_id: Uuid,
        plan_date: Option<NaiveDate>,
    ) -> Result<AssignmentPlan> {
        match outcome {
            SolveOutcome::Optimal(solved) => self.extract_optimal(model, solved, run_id, plan_date),
            SolveOutcome::Infeasible => Err(PlanningError::Infeasible(format!(
                "{} 張訂單無法在現有工時上限內完成指派",
                model.num_orders()
            ))),
            SolveOutcome::Unbounded => Err(PlanningError::Unbounded),
            SolveOutcome::Error(message) => Err(PlanningError::Solver(message.clone())),
        }
    }

    fn extract_optimal(
        &self,
        model: &AssignmentModel,
        solved: &SolvedModel,
        run_id: Uuid,
        plan_date: Option<NaiveDate>,
    ) -> Result<AssignmentPlan> {
        let values = &solved.values;
        if !values.same_shape(model.cost()) {
            return Err(PlanningError::InvariantViolation(format!(
                "變數矩陣維度 {}×{} 與模型 {}×{} 不符",
                values.rows(),
                values.cols(),
                model.num_orders(),
                model.num_workers()
            )));
        }

        let mut workers: Vec<WorkerSummary> = model
            .registry()
            .iter()
            .map(|w| WorkerSummary::empty(w.name.clone(), w.max_hours))
            .collect();
        let mut assignments = Vec::with_capacity(model.num_orders());
        let mut advisories = Vec::new();
        let mut choices = Vec::with_capacity(model.num_orders());

        for (o, order) in model.orders().iter().enumerate() {
            let selected: Vec<usize> = values
                .row(o)
                .iter()
                .enumerate()
                .filter(|(_, value)| **value > SELECTION_THRESHOLD)
                .map(|(w, _)| w)
                .collect();

            let w = match selected.as_slice() {
                [w] => *w,
                _ => {
                    return Err(PlanningError::InvariantViolation(format!(
                        "訂單 {} 選中 {} 種工人類型",
                        order.id,
                        selected.len()
                    )))
                }
            };

            let worker = model.worker(w);
            let assignment = Assignment {
                order_id: order.id.clone(),
                assigned_worker: worker.name.clone(),
                cost: worker.cost_for(order),
                num_items: order.item_count,
                total_weight_kg: order.weight_kg,
                hours: worker.hours_for(order),
            };
            workers[w].record(&assignment);

            if let Some(limit_kg) = worker.max_order_weight_kg {
                if worker.exceeds_weight_advisory(order) {
                    advisories.push(WeightAdvisory {
                        order_id: order.id.clone(),
                        worker: worker.name.clone(),
                        weight_kg: order.weight_kg,
                        limit_kg,
                    });
                }
            }

            assignments.push(assignment);
            choices.push(w);
        }

        let chosen = VariableMatrix::from_fn(model.num_orders(), model.num_workers(), |o, w| {
            if choices[o] == w {
                1.0
            } else {
                0.0
            }
        });
        for constraint in model.constraints() {
            let name = model.constraint_name(constraint);
            if !model.is_satisfied(constraint, &chosen, self.capacity_epsilon) {
                return Err(PlanningError::InvariantViolation(format!(
                    "限制式 {} 不成立",
                    name
                )));
            }
            if let ModelConstraint::Capacity { worker, bound } = *constraint {
                let load = model.worker_load(&chosen, worker);
                if load >= bound - self.capacity_epsilon {
                    tracing::debug!("限制式 {} 已滿載：{:.3} / {:.3} 小時", name, load, bound);
                }
            }
        }

        let total_cost: f64 = assignments.iter().map(|a| a.cost).sum();
        let tolerance = self.objective_tolerance * solved.objective.abs().max(1.0);
        if (total_cost - solved.objective).abs() > tolerance {
            return Err(PlanningError::InvariantViolation(format!(
                "總成本 {:.6} 與求解器目標值 {:.6} 不一致",
                total_cost, solved.objective
            )));
        }

        if !advisories.is_empty() {
            tracing::warn!("{} 張訂單超過工人類型建議重量", advisories.len());
        }

        Ok(AssignmentPlan {
            run_id,
            plan_date,
            assignments,
            workers,
            total_cost,
            objective_value: solved.objective,
            advisories,
        })
    }
}
