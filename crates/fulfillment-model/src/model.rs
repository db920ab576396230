//! 指派最佳化模型
//!
//! 決策變數 `x[o][w] ∈ {0,1}` 以 (訂單索引, 工人類型索引) 定址，
//! 目標函數與限制式的係數都在建模時預先算好，求解後端只需照表建立變數。

use fulfillment_core::{MaxHours, Order, WorkerRegistry, WorkerType};

use crate::matrix::VariableMatrix;

/// 限制式
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelConstraint {
    /// 每張訂單恰好指派給一種工人：`Σ_w x[o][w] = 1`
    SingleOwnership { order: usize },

    /// 工人類型工時上限：`Σ_o hours[o][w] · x[o][w] ≤ bound`
    Capacity { worker: usize, bound: f64 },
}

/// 建構完成的模型（單次規劃執行專用，不可重複使用於其他輸入）
#[derive(Debug, Clone)]
pub struct AssignmentModel {
    pub(crate) orders: Vec<Order>,
    pub(crate) registry: WorkerRegistry,
    pub(crate) cost: VariableMatrix<f64>,
    pub(crate) hours: VariableMatrix<f64>,
    pub(crate) constraints: Vec<ModelConstraint>,
}

impl AssignmentModel {
    /// 訂單（輸入順序）
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn registry(&self) -> &WorkerRegistry {
        &self.registry
    }

    pub fn worker(&self, idx: usize) -> &WorkerType {
        &self.registry.workers()[idx]
    }

    /// 目標函數係數 cost(o,w)
    pub fn cost(&self) -> &VariableMatrix<f64> {
        &self.cost
    }

    /// 工時係數 hours(o,w)
    pub fn hours(&self) -> &VariableMatrix<f64> {
        &self.hours
    }

    pub fn constraints(&self) -> &[ModelConstraint] {
        &self.constraints
    }

    pub fn num_orders(&self) -> usize {
        self.orders.len()
    }

    pub fn num_workers(&self) -> usize {
        self.registry.len()
    }

    pub fn num_variables(&self) -> usize {
        self.num_orders() * self.num_workers()
    }

    /// 工人類型在模型中使用的有限工時上限
    pub fn capacity_bound(&self, worker: usize) -> Option<f64> {
        self.constraints.iter().find_map(|c| match c {
            ModelConstraint::Capacity { worker: w, bound } if *w == worker => Some(*bound),
            _ => None,
        })
    }

    /// 工人類型原始宣告的工時上限
    pub fn declared_max_hours(&self, worker: usize) -> MaxHours {
        self.worker(worker).max_hours
    }

    /// 所有訂單都交給某工人類型時的總工時
    pub fn total_required_hours(&self, worker: usize) -> f64 {
        self.hours.column(worker).sum()
    }

    /// 以變數值計算目標函數
    pub fn objective_value(&self, values: &VariableMatrix<f64>) -> f64 {
        self.cost
            .as_slice()
            .iter()
            .zip(values.as_slice())
            .map(|(c, x)| c * x)
            .sum()
    }

    /// 以變數值計算某工人類型的工時負載
    pub fn worker_load(&self, values: &VariableMatrix<f64>, worker: usize) -> f64 {
        self.hours
            .column(worker)
            .zip(values.column(worker))
            .map(|(h, x)| h * x)
            .sum()
    }

    /// 限制式名稱（供一致性檢查錯誤與日誌使用）
    pub fn constraint_name(&self, constraint: &ModelConstraint) -> String {
        match constraint {
            ModelConstraint::SingleOwnership { order } => {
                format!("single_ownership_order_{}", self.orders[*order].id)
            }
            ModelConstraint::Capacity { worker, .. } => {
                format!("max_capacity_{}", self.worker(*worker).name)
            }
        }
    }

    /// 檢查變數值是否滿足某條限制式
    pub fn is_satisfied(
        &self,
        constraint: &ModelConstraint,
        values: &VariableMatrix<f64>,
        epsilon: f64,
    ) -> bool {
        match constraint {
            ModelConstraint::SingleOwnership { order } => {
                let total: f64 = values.row(*order).iter().sum();
                (total - 1.0).abs() <= epsilon
            }
            ModelConstraint::Capacity { worker, bound } => {
                self.worker_load(values, *worker) <= bound + epsilon
            }
        }
    }
}
