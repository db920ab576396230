//! 建模前的輸入檢查
//!
//! 檢查項目：
//! - 登錄表不可為空
//! - 訂單品項數必須為正
//! - 訂單ID 不可重複
//!
//! 所有問題一次收集後回報，避免使用者逐筆修正重跑。

use fulfillment_core::{Order, PlanningError, WorkerRegistry};
use std::collections::HashSet;

/// 輸入問題類別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputIssueKind {
    EmptyRegistry,
    NonPositiveItemCount,
    DuplicateOrderId,
}

/// 單一輸入問題
#[derive(Debug, Clone, PartialEq)]
pub struct InputIssue {
    pub kind: InputIssueKind,
    pub message: String,
}

impl InputIssue {
    fn new(kind: InputIssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// 收集所有輸入問題
pub fn collect_input_issues(orders: &[Order], registry: &WorkerRegistry) -> Vec<InputIssue> {
    let mut issues = Vec::new();

    if registry.is_empty() {
        issues.push(InputIssue::new(
            InputIssueKind::EmptyRegistry,
            "工人登錄表為空",
        ));
    }

    let mut seen = HashSet::with_capacity(orders.len());
    for order in orders {
        if order.item_count == 0 {
            issues.push(InputIssue::new(
                InputIssueKind::NonPositiveItemCount,
                format!("訂單 {} 品項數必須為正", order.id),
            ));
        }
        if !seen.insert(&order.id) {
            issues.push(InputIssue::new(
                InputIssueKind::DuplicateOrderId,
                format!("訂單ID 重複: {}", order.id),
            ));
        }
    }

    issues
}

/// 檢查輸入，有任何問題即回傳 `ModelConstruction` 錯誤
pub fn validate_input(orders: &[Order], registry: &WorkerRegistry) -> fulfillment_core::Result<()> {
    let issues = collect_input_issues(orders, registry);
    if issues.is_empty() {
        return Ok(());
    }

    let message = issues
        .iter()
        .map(|i| i.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    Err(PlanningError::ModelConstruction(message))
}
