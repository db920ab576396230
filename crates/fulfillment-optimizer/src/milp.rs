//! 混合整數規劃後端（good_lp + microlp）

use fulfillment_model::{AssignmentModel, ModelConstraint, VariableMatrix};
use good_lp::{
    constraint, microlp, variable, variables, Expression, ResolutionError, Solution as _,
    SolverModel, Variable,
};
use std::panic::{self, AssertUnwindSafe};

use crate::solver::{trivial_outcome, AssignmentSolver, SolveOutcome, SolvedModel};

/// 以 0/1 整數規劃精確求解
#[derive(Debug, Clone, Copy, Default)]
pub struct MilpSolver;

impl MilpSolver {
    pub fn new() -> Self {
        Self
    }

    fn solve_model(model: &AssignmentModel) -> SolveOutcome {
        // Step 1: 決策變數 x[o][w] ∈ {0,1}
        let mut vars = variables!();
        let x: VariableMatrix<Variable> =
            VariableMatrix::from_fn(model.num_orders(), model.num_workers(), |_, _| {
                vars.add(variable().binary())
            });

        // Step 2: 目標函數 Σ cost(o,w) · x[o][w]
        let objective = model
            .cost()
            .as_slice()
            .iter()
            .zip(x.as_slice())
            .fold(Expression::from(0.0), |acc, (cost, var)| acc + *cost * *var);

        // 保留一份目標式，求解後由解本身計算回報值
        let reported = objective.clone();
        let mut problem = vars.minimise(objective).using(microlp);

        // Step 3: 限制式
        for c in model.constraints() {
            match *c {
                ModelConstraint::SingleOwnership { order } => {
                    let assigned = x
                        .row(order)
                        .iter()
                        .fold(Expression::from(0.0), |acc, var| acc + *var);
                    problem = problem.with(constraint!(assigned == 1.0));
                }
                ModelConstraint::Capacity { worker, bound } => {
                    let load = model
                        .hours()
                        .column(worker)
                        .zip(x.column(worker))
                        .fold(Expression::from(0.0), |acc, (hours, var)| {
                            acc + *hours * *var
                        });
                    problem = problem.with(constraint!(load <= bound));
                }
            }
        }

        // Step 4: 求解
        match problem.solve() {
            Ok(solution) => {
                let values = x.map(|var| solution.value(*var));
                let objective = solution.eval(reported);
                SolveOutcome::Optimal(SolvedModel::new(values, objective))
            }
            Err(ResolutionError::Infeasible) => SolveOutcome::Infeasible,
            Err(ResolutionError::Unbounded) => SolveOutcome::Unbounded,
            Err(e) => SolveOutcome::Error(e.to_string()),
        }
    }
}

impl AssignmentSolver for MilpSolver {
    fn name(&self) -> &str {
        "milp"
    }

    fn solve(&self, model: &AssignmentModel) -> SolveOutcome {
        if let Some(outcome) = trivial_outcome(model) {
            return outcome;
        }

        tracing::debug!(
            "MILP 求解：變數 {} 個，限制式 {} 條",
            model.num_variables(),
            model.constraints().len()
        );

        // 後端內部 panic 一律視為求解器錯誤
        panic::catch_unwind(AssertUnwindSafe(|| Self::solve_model(model))).unwrap_or_else(|_| {
            tracing::error!("MILP 求解器內部錯誤");
            SolveOutcome::Error("MILP 求解器內部錯誤".to_string())
        })
    }
}
