//! # Fulfillment Model
//!
//! 指派最佳化模型建構：變數矩陣、目標函數、限制式

pub mod builder;
pub mod matrix;
pub mod model;
pub mod validation;

// Re-export 主要類型
pub use builder::{ModelBuilder, UNBOUNDED_HEADROOM};
pub use matrix::VariableMatrix;
pub use model::{AssignmentModel, ModelConstraint};
pub use validation::{collect_input_issues, validate_input, InputIssue, InputIssueKind};

/// 模型規模統計
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelStats {
    pub orders: usize,
    pub workers: usize,
    pub variables: usize,
    pub constraints: usize,
}

impl From<&AssignmentModel> for ModelStats {
    fn from(model: &AssignmentModel) -> Self {
        Self {
            orders: model.num_orders(),
            workers: model.num_workers(),
            variables: model.num_variables(),
            constraints: model.constraints().len(),
        }
    }
}
