//! 規劃執行狀態機
//!
//! `Unbuilt → Built → Solved(status) → {Extracted | Rejected}`，只能前進，不可重入。

use chrono::NaiveDate;
use fulfillment_core::{PlanningError, Result};
use uuid::Uuid;

use crate::solver::SolveStatus;

/// 規劃執行狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Unbuilt,
    Built,
    Solved(SolveStatus),
    /// 成功產生指派
    Extracted,
    /// 不可行、無界或求解器錯誤，未產生指派
    Rejected(SolveStatus),
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Extracted | RunState::Rejected(_))
    }

    /// 檢查狀態轉移是否合法
    pub fn can_advance_to(&self, next: RunState) -> bool {
        match (self, next) {
            (RunState::Unbuilt, RunState::Built) => true,
            (RunState::Built, RunState::Solved(_)) => true,
            (RunState::Solved(SolveStatus::Optimal), RunState::Extracted) => true,
            (RunState::Solved(status), RunState::Rejected(rejected)) => {
                *status != SolveStatus::Optimal && *status == rejected
            }
            _ => false,
        }
    }
}

/// 單次規劃執行
#[derive(Debug, Clone)]
pub struct PlanningRun {
    run_id: Uuid,
    plan_date: Option<NaiveDate>,
    state: RunState,
}

impl PlanningRun {
    /// 創建新的規劃執行
    pub fn new(plan_date: Option<NaiveDate>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            plan_date,
            state: RunState::Unbuilt,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn plan_date(&self) -> Option<NaiveDate> {
        self.plan_date
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// 前進到下一個狀態
    pub fn advance(&mut self, next: RunState) -> Result<()> {
        if !self.state.can_advance_to(next) {
            return Err(PlanningError::InvariantViolation(format!(
                "規劃執行 {} 狀態轉移不合法: {:?} → {:?}",
                self.run_id, self.state, next
            )));
        }
        tracing::debug!("規劃執行 {}: {:?} → {:?}", self.run_id, self.state, next);
        self.state = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_successful_run() {
        let mut run = PlanningRun::new(NaiveDate::from_ymd_opt(2025, 11, 3));

        run.advance(RunState::Built).unwrap();
        run.advance(RunState::Solved(SolveStatus::Optimal)).unwrap();
        run.advance(RunState::Extracted).unwrap();

        assert!(run.state().is_terminal());
        assert_eq!(run.plan_date(), NaiveDate::from_ymd_opt(2025, 11, 3));
    }

    #[rstest]
    #[case(SolveStatus::Infeasible)]
    #[case(SolveStatus::Unbounded)]
    #[case(SolveStatus::SolverError)]
    fn test_rejected_run(#[case] status: SolveStatus) {
        let mut run = PlanningRun::new(None);

        run.advance(RunState::Built).unwrap();
        run.advance(RunState::Solved(status)).unwrap();
        assert!(run.advance(RunState::Extracted).is_err());
        run.advance(RunState::Rejected(status)).unwrap();

        assert_eq!(run.state(), RunState::Rejected(status));
    }

    #[rstest]
    #[case(RunState::Unbuilt, RunState::Solved(SolveStatus::Optimal))]
    #[case(RunState::Built, RunState::Built)]
    #[case(RunState::Solved(SolveStatus::Optimal), RunState::Rejected(SolveStatus::Optimal))]
    #[case(RunState::Solved(SolveStatus::Infeasible), RunState::Rejected(SolveStatus::SolverError))]
    #[case(RunState::Extracted, RunState::Built)]
    #[case(RunState::Rejected(SolveStatus::Infeasible), RunState::Unbuilt)]
    fn test_illegal_transitions(#[case] from: RunState, #[case] to: RunState) {
        assert!(!from.can_advance_to(to));
    }

    #[test]
    fn test_no_reentry() {
        let mut run = PlanningRun::new(None);
        run.advance(RunState::Built).unwrap();

        assert!(matches!(
            run.advance(RunState::Built),
            Err(PlanningError::InvariantViolation(_))
        ));
    }
}
