//! 指派規劃主流程

use chrono::NaiveDate;
use fulfillment_core::{total_items, AssignmentPlan, Order, Result, WorkerRegistry};
use fulfillment_model::{ModelBuilder, ModelStats, UNBOUNDED_HEADROOM};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::branch_bound::BranchAndBoundSolver;
use crate::extract::{ResultExtractor, DEFAULT_CAPACITY_EPSILON, DEFAULT_OBJECTIVE_TOLERANCE};
use crate::milp::MilpSolver;
use crate::run_state::{PlanningRun, RunState};
use crate::solver::{AssignmentSolver, SolveStatus};
use crate::time_limit::TimeLimitedSolver;

/// 求解後端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SolverBackend {
    /// 0/1 整數規劃（good_lp / microlp）
    #[default]
    Milp,
    /// 分支定界
    BranchAndBound,
}

/// 規劃選項
#[derive(Debug, Clone)]
pub struct PlannerOptions {
    pub backend: SolverBackend,

    /// 求解牆鐘時限，None 表示不限
    pub time_limit: Option<Duration>,

    pub plan_date: Option<NaiveDate>,

    pub capacity_epsilon: f64,

    pub objective_tolerance: f64,

    pub unbounded_headroom: f64,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            backend: SolverBackend::default(),
            time_limit: None,
            plan_date: None,
            capacity_epsilon: DEFAULT_CAPACITY_EPSILON,
            objective_tolerance: DEFAULT_OBJECTIVE_TOLERANCE,
            unbounded_headroom: UNBOUNDED_HEADROOM,
        }
    }
}

impl PlannerOptions {
    /// 建構器模式：設置求解後端
    pub fn with_backend(mut self, backend: SolverBackend) -> Self {
        self.backend = backend;
        self
    }

    /// 建構器模式：設置求解時限
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// 建構器模式：設置規劃日期
    pub fn with_plan_date(mut self, date: NaiveDate) -> Self {
        self.plan_date = Some(date);
        self
    }

    /// 依選項建立求解後端
    pub fn build_solver(&self) -> Arc<dyn AssignmentSolver> {
        let solver: Arc<dyn AssignmentSolver> = match self.backend {
            SolverBackend::Milp => Arc::new(MilpSolver::new()),
            SolverBackend::BranchAndBound => Arc::new(BranchAndBoundSolver::new()),
        };
        match self.time_limit {
            Some(limit) => Arc::new(TimeLimitedSolver::new(solver, limit)),
            None => solver,
        }
    }
}

/// 一次規劃執行的結果與最終狀態
#[derive(Debug)]
pub struct PlanOutcome {
    pub run: PlanningRun,
    pub result: Result<AssignmentPlan>,
}

/// 指派規劃器
///
/// 持有唯讀的登錄表與求解後端，每次呼叫都建立全新的模型，可跨執行緒共用。
#[derive(Clone)]
pub struct AssignmentPlanner {
    registry: Arc<WorkerRegistry>,
    solver: Arc<dyn AssignmentSolver>,
    options: PlannerOptions,
}

impl AssignmentPlanner {
    /// 依選項建立規劃器
    pub fn new(registry: Arc<WorkerRegistry>, options: PlannerOptions) -> Self {
        let solver = options.build_solver();
        Self {
            registry,
            solver,
            options,
        }
    }

    /// 使用自訂後端建立規劃器（忽略選項中的後端與時限）
    pub fn with_solver(
        registry: Arc<WorkerRegistry>,
        solver: Arc<dyn AssignmentSolver>,
        options: PlannerOptions,
    ) -> Self {
        Self {
            registry,
            solver,
            options,
        }
    }

    pub fn registry(&self) -> &WorkerRegistry {
        &self.registry
    }

    pub fn options(&self) -> &PlannerOptions {
        &self.options
    }

    /// 規劃並回傳指派
    pub fn plan(&self, orders: &[Order]) -> Result<AssignmentPlan> {
        self.run(orders, self.options.plan_date).result
    }

    /// 指定日期規劃
    pub fn plan_on(&self, date: NaiveDate, orders: &[Order]) -> Result<AssignmentPlan> {
        self.run(orders, Some(date)).result
    }

    /// 執行完整流程並保留狀態
    pub fn run(&self, orders: &[Order], plan_date: Option<NaiveDate>) -> PlanOutcome {
        let mut run = PlanningRun::new(plan_date);
        let result = self.execute(&mut run, orders);

        match &result {
            Ok(plan) => tracing::info!(
                "規劃執行 {} 完成：{} 張訂單，總成本 ${}",
                run.run_id(),
                plan.order_count(),
                plan.total_cost_rounded()
            ),
            Err(e) if e.is_fatal() => tracing::error!("規劃執行 {} 中止: {}", run.run_id(), e),
            Err(e) => tracing::warn!("規劃執行 {} 未產生指派: {}", run.run_id(), e),
        }

        PlanOutcome { run, result }
    }

    fn execute(&self, run: &mut PlanningRun, orders: &[Order]) -> Result<AssignmentPlan> {
        tracing::info!(
            "開始規劃 {}：訂單 {} 筆，品項 {} 件，後端 {}",
            run.run_id(),
            orders.len(),
            total_items(orders),
            self.solver.name()
        );
        let start_time = std::time::Instant::now();

        // Step 1: 建模
        let model = ModelBuilder::new(&self.registry)
            .with_unbounded_headroom(self.options.unbounded_headroom)
            .build(orders)?;
        run.advance(RunState::Built)?;
        let stats = ModelStats::from(&model);
        tracing::debug!(
            "模型：變數 {} 個，限制式 {} 條",
            stats.variables,
            stats.constraints
        );

        // Step 2: 求解
        let outcome = self.solver.solve(&model);
        let status = outcome.status();
        run.advance(RunState::Solved(status))?;
        tracing::info!("求解狀態 {}，耗時 {:?}", status, start_time.elapsed());

        // Step 3: 擷取與檢查
        if status != SolveStatus::Optimal {
            run.advance(RunState::Rejected(status))?;
        }
        let plan = ResultExtractor::new()
            .with_capacity_epsilon(self.options.capacity_epsilon)
            .with_objective_tolerance(self.options.objective_tolerance)
            .extract(&model, &outcome, run.run_id(), run.plan_date())?;
        run.advance(RunState::Extracted)?;

        Ok(plan)
    }
}
