//! 求解時限
//!
//! 後端在獨立執行緒上執行，主執行緒最多等待設定的時間。逾時後回報求解器錯誤，
//! 被放棄的執行緒會自行跑完並丟棄結果。

use fulfillment_model::AssignmentModel;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::solver::{AssignmentSolver, SolveOutcome};

/// 為任一後端加上牆鐘時限
#[derive(Clone)]
pub struct TimeLimitedSolver {
    inner: Arc<dyn AssignmentSolver>,
    limit: Duration,
    name: String,
}

impl TimeLimitedSolver {
    pub fn new(inner: Arc<dyn AssignmentSolver>, limit: Duration) -> Self {
        let name = format!("{} (limit {:?})", inner.name(), limit);
        Self { inner, limit, name }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }
}

impl AssignmentSolver for TimeLimitedSolver {
    fn name(&self) -> &str {
        &self.name
    }

    fn solve(&self, model: &AssignmentModel) -> SolveOutcome {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let model = model.clone();

        let spawned = thread::Builder::new()
            .name("fulfillment-solver".to_string())
            .spawn(move || {
                // 接收端可能已因逾時放棄
                let _ = tx.send(inner.solve(&model));
            });
        if let Err(e) = spawned {
            return SolveOutcome::Error(format!("無法啟動求解執行緒: {}", e));
        }

        match rx.recv_timeout(self.limit) {
            Ok(outcome) => outcome,
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!("{} 逾時", self.inner.name());
                SolveOutcome::Error(format!("求解逾時（{:?}）", self.limit))
            }
            Err(RecvTimeoutError::Disconnected) => {
                SolveOutcome::Error("求解執行緒異常結束".to_string())
            }
        }
    }
}
