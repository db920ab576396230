//! 訂單模型

use serde::{Deserialize, Serialize};
use std::fmt;

/// 訂單識別碼
///
/// 上游載入器可能提供整數或字串編號，兩者皆保留原樣。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderId {
    /// 數字編號
    Number(u64),
    /// 字串編號
    Code(String),
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderId::Number(n) => write!(f, "{}", n),
            OrderId::Code(code) => f.write_str(code),
        }
    }
}

impl From<u64> for OrderId {
    fn from(n: u64) -> Self {
        OrderId::Number(n)
    }
}

impl From<&str> for OrderId {
    fn from(code: &str) -> Self {
        OrderId::Code(code.to_string())
    }
}

impl From<String> for OrderId {
    fn from(code: String) -> Self {
        OrderId::Code(code)
    }
}

/// 待揀貨訂單（已清洗）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// 訂單ID
    #[serde(rename = "order_id")]
    pub id: OrderId,

    /// 品項數量
    #[serde(rename = "num_items")]
    pub item_count: u32,

    /// 總重量（公斤）
    #[serde(rename = "total_weight_kg", alias = "total_weight", default)]
    pub weight_kg: f64,
}

impl Order {
    /// 創建新的訂單
    pub fn new(id: impl Into<OrderId>, item_count: u32, weight_kg: f64) -> Self {
        Self {
            id: id.into(),
            item_count,
            weight_kg,
        }
    }

    /// 以指定產能（件/小時）處理此訂單所需工時
    pub fn hours_at(&self, throughput_rate: f64) -> f64 {
        f64::from(self.item_count) / throughput_rate
    }
}

/// 訂單批次的總品項數
pub fn total_items(orders: &[Order]) -> u64 {
    orders.iter().map(|o| u64::from(o.item_count)).sum()
}
