//! 工人類型與產能登錄表

use serde::{Deserialize, Serialize};

use crate::order::Order;
use crate::{PlanningError, Result};

/// 每個規劃期可用工時上限
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MaxHours {
    /// 有限工時
    Limited(f64),
    /// 實際上無上限（例如可向派遣公司調人）
    Unlimited,
}

impl MaxHours {
    /// 有限工時的數值；無上限時為 None
    pub fn limit(&self) -> Option<f64> {
        match self {
            MaxHours::Limited(hours) => Some(*hours),
            MaxHours::Unlimited => None,
        }
    }

    /// 是否為無上限
    pub fn is_unlimited(&self) -> bool {
        matches!(self, MaxHours::Unlimited)
    }

    /// 檢查工時是否在上限內（容許浮點誤差）
    pub fn admits(&self, hours: f64, epsilon: f64) -> bool {
        match self {
            MaxHours::Limited(limit) => hours <= limit + epsilon,
            MaxHours::Unlimited => true,
        }
    }
}

impl From<Option<f64>> for MaxHours {
    fn from(value: Option<f64>) -> Self {
        value.map_or(MaxHours::Unlimited, MaxHours::Limited)
    }
}

/// 工人類型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerType {
    /// 類型名稱（登錄表內唯一）
    pub name: String,

    /// 產能（件/小時）
    pub throughput_rate: f64,

    /// 時薪（貨幣/小時）
    pub cost_rate: f64,

    /// 規劃期工時上限
    pub max_hours: MaxHours,

    /// 單張訂單建議重量上限（公斤），僅作為事後提示，不進入模型
    pub max_order_weight_kg: Option<f64>,
}

impl WorkerType {
    /// 創建新的工人類型
    pub fn new(
        name: impl Into<String>,
        throughput_rate: f64,
        cost_rate: f64,
        max_hours: MaxHours,
    ) -> Self {
        Self {
            name: name.into(),
            throughput_rate,
            cost_rate,
            max_hours,
            max_order_weight_kg: None,
        }
    }

    /// 建構器模式：設置單張訂單建議重量上限
    pub fn with_max_order_weight(mut self, weight_kg: f64) -> Self {
        self.max_order_weight_kg = Some(weight_kg);
        self
    }

    /// 處理訂單所需工時
    pub fn hours_for(&self, order: &Order) -> f64 {
        order.hours_at(self.throughput_rate)
    }

    /// 處理訂單的人力成本 = (品項數 / 產能) × 時薪
    pub fn cost_for(&self, order: &Order) -> f64 {
        self.hours_for(order) * self.cost_rate
    }

    /// 訂單重量是否超過建議上限
    pub fn exceeds_weight_advisory(&self, order: &Order) -> bool {
        self.max_order_weight_kg
            .is_some_and(|limit| order.weight_kg > limit)
    }

    /// 載入時檢查參數，產能為零會在求解時造成除以零
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PlanningError::Configuration(
                "工人類型名稱不可為空".to_string(),
            ));
        }
        if !self.throughput_rate.is_finite() || self.throughput_rate <= 0.0 {
            return Err(PlanningError::Configuration(format!(
                "{}: 產能必須為正數，實際為 {}",
                self.name, self.throughput_rate
            )));
        }
        if !self.cost_rate.is_finite() || self.cost_rate < 0.0 {
            return Err(PlanningError::Configuration(format!(
                "{}: 時薪不可為負數，實際為 {}",
                self.name, self.cost_rate
            )));
        }
        if let MaxHours::Limited(hours) = self.max_hours {
            if !hours.is_finite() || hours < 0.0 {
                return Err(PlanningError::Configuration(format!(
                    "{}: 工時上限不可為負數，實際為 {}",
                    self.name, hours
                )));
            }
        }
        if let Some(weight) = self.max_order_weight_kg {
            if !weight.is_finite() || weight < 0.0 {
                return Err(PlanningError::Configuration(format!(
                    "{}: 重量上限不可為負數，實際為 {}",
                    self.name, weight
                )));
            }
        }
        Ok(())
    }
}

/// 工人產能登錄表
///
/// 規劃期間唯讀，可在多個規劃執行之間共用。保留加入順序作為顯示順序。
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct WorkerRegistry {
    workers: Vec<WorkerType>,
}

impl WorkerRegistry {
    /// 創建並驗證登錄表
    pub fn new(workers: Vec<WorkerType>) -> Result<Self> {
        for (idx, worker) in workers.iter().enumerate() {
            worker.validate()?;
            if workers[..idx].iter().any(|w| w.name == worker.name) {
                return Err(PlanningError::Configuration(format!(
                    "工人類型重複: {}",
                    worker.name
                )));
            }
        }
        Ok(Self { workers })
    }

    /// 預設班表：一台機器人、兩名資深人員、派遣新人不限量（8 小時班）
    pub fn standard_shift() -> Self {
        Self {
            workers: vec![
                WorkerType::new("Robot", 140.0, 5.0, MaxHours::Limited(8.0))
                    .with_max_order_weight(5.0),
                WorkerType::new("Senior", 65.0, 28.0, MaxHours::Limited(16.0)),
                WorkerType::new("Junior", 25.0, 16.0, MaxHours::Unlimited),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub fn workers(&self) -> &[WorkerType] {
        &self.workers
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorkerType> {
        self.workers.iter()
    }

    /// 依名稱查找工人類型
    pub fn get(&self, name: &str) -> Option<&WorkerType> {
        self.workers.iter().find(|w| w.name == name)
    }

    /// 依名稱查找索引
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.workers.iter().position(|w| w.name == name)
    }

    /// 複製一份並替換指定工人類型的工時上限
    pub fn with_max_hours(&self, name: &str, max_hours: MaxHours) -> Result<Self> {
        let idx = self
            .index_of(name)
            .ok_or_else(|| PlanningError::Configuration(format!("找不到工人類型: {}", name)))?;
        let mut workers = self.workers.clone();
        workers[idx].max_hours = max_hours;
        Self::new(workers)
    }
}
