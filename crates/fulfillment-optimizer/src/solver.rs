//! 求解器介面
//!
//! 求解後端視為黑盒：輸入建構完成的模型，回傳狀態與（最佳時）每個決策變數的值。
//! 多個最佳解成本相同時，選出哪一個由各後端自行決定，不同後端之間可能不同。

use fulfillment_model::{AssignmentModel, VariableMatrix};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 求解狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    SolverError,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SolveStatus::Optimal => "Optimal",
            SolveStatus::Infeasible => "Infeasible",
            SolveStatus::Unbounded => "Unbounded",
            SolveStatus::SolverError => "SolverError",
        };
        f.write_str(label)
    }
}

/// 最佳解
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedModel {
    /// 每個 (訂單, 工人類型) 決策變數的值，可能帶有浮點殘差
    pub values: VariableMatrix<f64>,

    /// 求解器回報的目標值
    pub objective: f64,
}

impl SolvedModel {
    /// 由變數值與後端回報的目標值建立
    pub fn new(values: VariableMatrix<f64>, objective: f64) -> Self {
        Self { values, objective }
    }

    /// 由變數值建立，目標值依模型係數重算（無求解過程的平凡解）
    pub fn from_values(model: &AssignmentModel, values: VariableMatrix<f64>) -> Self {
        let objective = model.objective_value(&values);
        Self { values, objective }
    }
}

/// 求解結果
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    Optimal(SolvedModel),
    Infeasible,
    Unbounded,
    /// 求解器崩潰、逾時或回傳無法辨識的狀態；不附帶任何部分結果
    Error(String),
}

impl SolveOutcome {
    pub fn status(&self) -> SolveStatus {
        match self {
            SolveOutcome::Optimal(_) => SolveStatus::Optimal,
            SolveOutcome::Infeasible => SolveStatus::Infeasible,
            SolveOutcome::Unbounded => SolveStatus::Unbounded,
            SolveOutcome::Error(_) => SolveStatus::SolverError,
        }
    }

    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveOutcome::Optimal(_))
    }

    /// 最佳目標值
    pub fn objective(&self) -> Option<f64> {
        match self {
            SolveOutcome::Optimal(solved) => Some(solved.objective),
            _ => None,
        }
    }
}

/// 可替換的求解後端
pub trait AssignmentSolver: Send + Sync {
    /// 後端名稱（日誌用）
    fn name(&self) -> &str;

    /// 求解模型
    fn solve(&self, model: &AssignmentModel) -> SolveOutcome;
}

/// 沒有任何訂單時不需呼叫後端：空指派即為最佳解
pub(crate) fn trivial_outcome(model: &AssignmentModel) -> Option<SolveOutcome> {
    (model.num_orders() == 0).then(|| {
        let values = VariableMatrix::filled(0, model.num_workers(), 0.0);
        SolveOutcome::Optimal(SolvedModel::from_values(model, values))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_status() {
        let solved = SolvedModel {
            values: VariableMatrix::filled(1, 1, 1.0),
            objective: 3.0,
        };

        assert_eq!(SolveOutcome::Optimal(solved).objective(), Some(3.0));
        assert_eq!(SolveOutcome::Infeasible.status(), SolveStatus::Infeasible);
        assert_eq!(SolveOutcome::Unbounded.objective(), None);
        assert_eq!(
            SolveOutcome::Error("crash".into()).status(),
            SolveStatus::SolverError
        );
        assert!(!SolveOutcome::Infeasible.is_optimal());
        assert_eq!(SolveStatus::SolverError.to_string(), "SolverError");
    }
}
