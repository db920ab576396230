//! 分支定界後端
//!
//! 深度優先列舉每張訂單的工人類型，以「已選成本 + 其餘訂單最低成本」為下界剪枝。
//! 結果為精確最佳解，但最壞情況為指數時間，適合小批次與交叉驗證。

use fulfillment_model::{AssignmentModel, VariableMatrix};
use std::time::{Duration, Instant};

use crate::solver::{trivial_outcome, AssignmentSolver, SolveOutcome, SolvedModel};

/// 工時比較的容許誤差
const CAPACITY_EPSILON: f64 = 1e-9;

/// 每隔多少節點檢查一次時限
const DEADLINE_CHECK_INTERVAL: u64 = 1024;

/// 分支定界求解器
#[derive(Debug, Clone, Default)]
pub struct BranchAndBoundSolver {
    node_limit: Option<u64>,
    time_limit: Option<Duration>,
}

impl BranchAndBoundSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置搜尋節點上限，超過即回報求解器錯誤
    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = Some(nodes);
        self
    }

    /// 建構器模式：設置時限，到期即中止搜尋並回報求解器錯誤
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }
}

impl AssignmentSolver for BranchAndBoundSolver {
    fn name(&self) -> &str {
        "branch-and-bound"
    }

    fn solve(&self, model: &AssignmentModel) -> SolveOutcome {
        if let Some(outcome) = trivial_outcome(model) {
            return outcome;
        }

        let mut search = Search::new(model, self.node_limit, self.time_limit);
        if !search.every_order_fits() {
            return SolveOutcome::Infeasible;
        }
        search.descend(0);

        tracing::debug!("分支定界搜尋節點 {} 個", search.nodes);

        if let Some(reason) = search.aborted {
            return SolveOutcome::Error(reason);
        }
        match search.best {
            Some((objective, choice)) => {
                let values =
                    VariableMatrix::from_fn(model.num_orders(), model.num_workers(), |o, w| {
                        if choice[o] == w {
                            1.0
                        } else {
                            0.0
                        }
                    });
                SolveOutcome::Optimal(SolvedModel::new(values, objective))
            }
            None => SolveOutcome::Infeasible,
        }
    }
}

struct Search<'m> {
    model: &'m AssignmentModel,
    /// 分支順序（訂單索引），最低與次低成本差距大的先分支
    sequence: Vec<usize>,
    /// 每張訂單的候選工人類型，依成本遞增
    candidates: Vec<Vec<usize>>,
    /// sequence[depth..] 的最低成本總和
    suffix_min_cost: Vec<f64>,
    remaining: Vec<f64>,
    current: Vec<usize>,
    cost_so_far: f64,
    best: Option<(f64, Vec<usize>)>,
    nodes: u64,
    node_limit: Option<u64>,
    deadline: Option<Instant>,
    aborted: Option<String>,
}

impl<'m> Search<'m> {
    fn new(
        model: &'m AssignmentModel,
        node_limit: Option<u64>,
        time_limit: Option<Duration>,
    ) -> Self {
        let cost = model.cost();
        let candidates: Vec<Vec<usize>> = (0..model.num_orders())
            .map(|o| {
                let mut workers: Vec<usize> = (0..model.num_workers()).collect();
                workers.sort_by(|a, b| cost[(o, *a)].total_cmp(&cost[(o, *b)]));
                workers
            })
            .collect();

        let regret = |o: usize| -> f64 {
            match candidates[o].as_slice() {
                [first, second, ..] => cost[(o, *second)] - cost[(o, *first)],
                _ => 0.0,
            }
        };
        let mut sequence: Vec<usize> = (0..model.num_orders()).collect();
        sequence.sort_by(|a, b| regret(*b).total_cmp(&regret(*a)));

        let mut suffix_min_cost = vec![0.0; sequence.len() + 1];
        for depth in (0..sequence.len()).rev() {
            let o = sequence[depth];
            suffix_min_cost[depth] = suffix_min_cost[depth + 1] + cost[(o, candidates[o][0])];
        }

        let remaining = (0..model.num_workers())
            .map(|w| model.capacity_bound(w).unwrap_or(0.0))
            .collect();

        Self {
            model,
            sequence,
            candidates,
            suffix_min_cost,
            remaining,
            current: vec![usize::MAX; model.num_orders()],
            cost_so_far: 0.0,
            best: None,
            nodes: 0,
            node_limit,
            deadline: time_limit.map(|limit| Instant::now() + limit),
            aborted: None,
        }
    }

    /// 每張訂單至少能單獨放進某個工人類型
    fn every_order_fits(&self) -> bool {
        let hours = self.model.hours();
        (0..self.model.num_orders()).all(|o| {
            (0..self.model.num_workers())
                .any(|w| hours[(o, w)] <= self.remaining[w] + CAPACITY_EPSILON)
        })
    }

    fn limit_reached(&mut self) -> bool {
        if let Some(limit) = self.node_limit {
            if self.nodes > limit {
                self.aborted = Some(format!("超過搜尋節點上限 {}", limit));
                return true;
            }
        }
        if let Some(deadline) = self.deadline {
            if self.nodes % DEADLINE_CHECK_INTERVAL == 0 && Instant::now() >= deadline {
                self.aborted = Some("分支定界搜尋逾時".to_string());
                return true;
            }
        }
        false
    }

    fn descend(&mut self, depth: usize) {
        self.nodes += 1;
        if self.limit_reached() {
            return;
        }

        if depth == self.sequence.len() {
            let improved = self
                .best
                .as_ref()
                .map_or(true, |(best, _)| self.cost_so_far < *best);
            if improved {
                self.best = Some((self.cost_so_far, self.current.clone()));
            }
            return;
        }

        let lower_bound = self.cost_so_far + self.suffix_min_cost[depth];
        if let Some((best, _)) = &self.best {
            if lower_bound >= *best - CAPACITY_EPSILON {
                return;
            }
        }

        let order = self.sequence[depth];
        for k in 0..self.candidates[order].len() {
            let worker = self.candidates[order][k];
            let hours = self.model.hours()[(order, worker)];
            if hours > self.remaining[worker] + CAPACITY_EPSILON {
                continue;
            }
            let cost = self.model.cost()[(order, worker)];

            self.remaining[worker] -= hours;
            self.current[order] = worker;
            self.cost_so_far += cost;

            self.descend(depth + 1);

            self.cost_so_far -= cost;
            self.remaining[worker] += hours;

            if self.aborted.is_some() {
                return;
            }
        }
        self.current[order] = usize::MAX;
    }
}
