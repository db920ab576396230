//! # Fulfillment Core
//!
//! 核心資料模型與類型定義

pub mod assignment;
pub mod config;
pub mod order;
pub mod worker;

// Re-export 主要類型
pub use assignment::{Assignment, AssignmentPlan, WeightAdvisory, WorkerSummary};
pub use config::{RegistryConfig, WorkerConfig};
pub use order::{total_items, Order, OrderId};
pub use worker::{MaxHours, WorkerRegistry, WorkerType};

/// 規劃錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum PlanningError {
    /// 工人登錄表無效（例如產能非正數）
    #[error("工人配置錯誤: {0}")]
    Configuration(String),

    /// 訂單資料無效、ID 重複或登錄表為空
    #[error("模型建構錯誤: {0}")]
    ModelConstruction(String),

    /// 求解器崩潰、逾時或回傳無法辨識的狀態
    #[error("求解器錯誤: {0}")]
    Solver(String),

    /// 現有產能下不存在可行指派
    #[error("無可行指派: {0}")]
    Infeasible(String),

    /// 目標函數無界
    #[error("模型無界")]
    Unbounded,

    /// 求解後一致性檢查失敗
    #[error("結果一致性檢查失敗: {0}")]
    InvariantViolation(String),
}

impl PlanningError {
    /// 求解終止但未產生指派（不可行、無界、求解器錯誤）
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            PlanningError::Infeasible(_) | PlanningError::Unbounded | PlanningError::Solver(_)
        )
    }

    /// 是否為不可行（正常終止結果，非程式錯誤）
    pub fn is_infeasible(&self) -> bool {
        matches!(self, PlanningError::Infeasible(_))
    }

    /// 是否必須中止整個流程
    pub fn is_fatal(&self) -> bool {
        matches!(self, PlanningError::InvariantViolation(_))
    }

    /// 是否在呼叫求解器之前就已中止
    pub fn aborts_before_solve(&self) -> bool {
        matches!(
            self,
            PlanningError::Configuration(_) | PlanningError::ModelConstruction(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PlanningError>;
