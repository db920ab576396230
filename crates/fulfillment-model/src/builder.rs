//! 模型建構器

use fulfillment_core::{total_items, MaxHours, Order, WorkerRegistry, WorkerType};

use crate::matrix::VariableMatrix;
use crate::model::{AssignmentModel, ModelConstraint};
use crate::validation::validate_input;

/// 不限工時的工人類型在模型中的上限 = 理論最大負載 × 此倍數 + 1 小時
pub const UNBOUNDED_HEADROOM: f64 = 2.0;

/// 模型建構器
///
/// 登錄表由呼叫端明確傳入，同一份登錄表可同時供多個規劃執行唯讀共用。
pub struct ModelBuilder<'a> {
    registry: &'a WorkerRegistry,
    unbounded_headroom: f64,
}

impl<'a> ModelBuilder<'a> {
    /// 創建新的模型建構器
    pub fn new(registry: &'a WorkerRegistry) -> Self {
        Self {
            registry,
            unbounded_headroom: UNBOUNDED_HEADROOM,
        }
    }

    /// 建構器模式：設置無上限工時的放大倍數（至少為 1）
    pub fn with_unbounded_headroom(mut self, headroom: f64) -> Self {
        self.unbounded_headroom = if headroom.is_finite() {
            headroom.max(1.0)
        } else {
            UNBOUNDED_HEADROOM
        };
        self
    }

    /// 建構模型
    pub fn build(&self, orders: &[Order]) -> fulfillment_core::Result<AssignmentModel> {
        tracing::debug!(
            "開始建模：訂單 {} 筆，品項 {} 件，工人類型 {} 種",
            orders.len(),
            total_items(orders),
            self.registry.len()
        );

        // Step 1: 輸入檢查
        validate_input(orders, self.registry)?;

        // Step 2: 預先計算每個 (訂單, 工人類型) 的工時與成本係數
        let workers = self.registry.workers();
        let rows = orders.len();
        let cols = workers.len();
        let hours =
            VariableMatrix::from_fn_par(rows, cols, |o, w| workers[w].hours_for(&orders[o]));
        let cost =
            VariableMatrix::from_fn_par(rows, cols, |o, w| workers[w].cost_for(&orders[o]));

        // Step 3: 限制式
        let mut constraints = Vec::with_capacity(rows + cols);
        constraints.extend((0..rows).map(|order| ModelConstraint::SingleOwnership { order }));
        for (w, worker) in workers.iter().enumerate() {
            let required: f64 = hours.column(w).sum();
            let bound = self.encode_capacity(worker, required);
            tracing::debug!(
                "工人類型 {}: 上限 {:.3} 小時（全部承接需 {:.3} 小時）",
                worker.name,
                bound,
                required
            );
            constraints.push(ModelConstraint::Capacity { worker: w, bound });
        }

        tracing::debug!(
            "建模完成：變數 {} 個，限制式 {} 條",
            rows * cols,
            constraints.len()
        );

        Ok(AssignmentModel {
            orders: orders.to_vec(),
            registry: self.registry.clone(),
            cost,
            hours,
            constraints,
        })
    }

    /// 將工時上限轉為有限數值；不限工時時使用必定不會綁住的大數
    fn encode_capacity(&self, worker: &WorkerType, required_hours: f64) -> f64 {
        match worker.max_hours {
            MaxHours::Limited(hours) => hours,
            MaxHours::Unlimited => required_hours * self.unbounded_headroom + 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fulfillment_core::PlanningError;
    use rstest::rstest;

    fn scenario_registry() -> WorkerRegistry {
        WorkerRegistry::new(vec![
            WorkerType::new("A", 1000.0, 10.0, MaxHours::Limited(0.2)),
            WorkerType::new("B", 10.0, 1.0, MaxHours::Unlimited),
        ])
        .unwrap()
    }

    fn scenario_orders() -> Vec<Order> {
        vec![
            Order::new(1u64, 10, 1.0),
            Order::new(2u64, 20, 2.0),
            Order::new(3u64, 200, 20.0),
        ]
    }

    #[test]
    fn test_build_dense_model() {
        let registry = scenario_registry();
        let model = ModelBuilder::new(&registry).build(&scenario_orders()).unwrap();

        assert_eq!(model.num_orders(), 3);
        assert_eq!(model.num_workers(), 2);
        assert_eq!(model.num_variables(), 6);
        assert_eq!(model.constraints().len(), 5);

        // 200 件：A 0.2 小時 × $10 = $2；B 20 小時 × $1 = $20
        assert!((model.hours()[(2, 0)] - 0.2).abs() < 1e-12);
        assert!((model.cost()[(2, 0)] - 2.0).abs() < 1e-12);
        assert!((model.cost()[(2, 1)] - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_unbounded_capacity_is_finite_and_slack() {
        let registry = scenario_registry();
        let model = ModelBuilder::new(&registry).build(&scenario_orders()).unwrap();

        assert_eq!(model.capacity_bound(0), Some(0.2));
        let bound = model.capacity_bound(1).unwrap();
        assert!(bound.is_finite());
        // 230 件 / 10 件每小時 = 23 小時
        assert!(bound > model.total_required_hours(1));
        assert!(model.declared_max_hours(1).is_unlimited());
    }

    #[test]
    fn test_headroom_clamped() {
        let registry = scenario_registry();
        let model = ModelBuilder::new(&registry)
            .with_unbounded_headroom(0.1)
            .build(&scenario_orders())
            .unwrap();

        assert!(model.capacity_bound(1).unwrap() > model.total_required_hours(1));
    }

    #[test]
    fn test_constraint_names() {
        let registry = scenario_registry();
        let model = ModelBuilder::new(&registry).build(&scenario_orders()).unwrap();
        let names: Vec<_> = model
            .constraints()
            .iter()
            .map(|c| model.constraint_name(c))
            .collect();

        assert_eq!(names[0], "single_ownership_order_1");
        assert_eq!(names[4], "max_capacity_B");
    }

    #[test]
    fn test_objective_and_load() {
        let registry = scenario_registry();
        let model = ModelBuilder::new(&registry).build(&scenario_orders()).unwrap();
        let values =
            VariableMatrix::from_fn(3, 2, |o, w| if (o == 2) == (w == 0) { 1.0 } else { 0.0 });

        assert!((model.objective_value(&values) - 5.0).abs() < 1e-9);
        assert!((model.worker_load(&values, 0) - 0.2).abs() < 1e-9);
        assert!((model.worker_load(&values, 1) - 3.0).abs() < 1e-9);
        assert!(model
            .constraints()
            .iter()
            .all(|c| model.is_satisfied(c, &values, 1e-9)));
    }

    #[rstest]
    #[case(vec![Order::new(1u64, 0, 1.0)])]
    #[case(vec![Order::new(1u64, 2, 1.0), Order::new(1u64, 3, 1.0)])]
    fn test_invalid_orders(#[case] orders: Vec<Order>) {
        let registry = scenario_registry();
        assert!(matches!(
            ModelBuilder::new(&registry).build(&orders),
            Err(PlanningError::ModelConstruction(_))
        ));
    }

    #[test]
    fn test_empty_registry() {
        let registry = WorkerRegistry::default();
        assert!(matches!(
            ModelBuilder::new(&registry).build(&scenario_orders()),
            Err(PlanningError::ModelConstruction(_))
        ));
    }

    #[test]
    fn test_no_orders_builds_empty_model() {
        let registry = scenario_registry();
        let model = ModelBuilder::new(&registry).build(&[]).unwrap();

        assert_eq!(model.num_variables(), 0);
        assert_eq!(model.capacity_bound(1), Some(1.0));
    }
}
