//! # Fulfillment Optimizer
//!
//! 求解後端、結果擷取與規劃主流程

pub mod branch_bound;
pub mod extract;
pub mod milp;
pub mod planner;
pub mod run_state;
pub mod solver;
pub mod time_limit;

// Re-export 主要類型
pub use branch_bound::BranchAndBoundSolver;
pub use extract::{ResultExtractor, SELECTION_THRESHOLD};
pub use milp::MilpSolver;
pub use planner::{AssignmentPlanner, PlanOutcome, PlannerOptions, SolverBackend};
pub use run_state::{PlanningRun, RunState};
pub use solver::{AssignmentSolver, SolveOutcome, SolveStatus, SolvedModel};
pub use time_limit::TimeLimitedSolver;
