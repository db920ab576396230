//! 工人登錄表配置
//!
//! 配置格式為 JSON 物件：工人類型名稱 → `{ speed, wage, max_hours, max_order_weight_kg }`。
//! `max_hours` 缺省或為 `null` 表示不限工時。物件鍵的順序即為顯示順序。

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::worker::{MaxHours, WorkerRegistry, WorkerType};
use crate::{PlanningError, Result};

/// 單一工人類型的配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// 產能（件/小時）
    pub speed: f64,

    /// 時薪
    pub wage: f64,

    /// 每班工時上限，None 表示不限
    #[serde(default)]
    pub max_hours: Option<f64>,

    /// 單張訂單建議重量上限（公斤）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_order_weight_kg: Option<f64>,
}

impl WorkerConfig {
    /// 創建新的工人配置（預設不限工時）
    pub fn new(speed: f64, wage: f64) -> Self {
        Self {
            speed,
            wage,
            max_hours: None,
            max_order_weight_kg: None,
        }
    }

    /// 建構器模式：設置工時上限
    pub fn with_max_hours(mut self, hours: f64) -> Self {
        self.max_hours = Some(hours);
        self
    }

    /// 建構器模式：設置單張訂單建議重量上限
    pub fn with_max_order_weight(mut self, weight_kg: f64) -> Self {
        self.max_order_weight_kg = Some(weight_kg);
        self
    }

    /// 轉換為工人類型
    pub fn to_worker_type(&self, name: &str) -> WorkerType {
        WorkerType {
            name: name.to_string(),
            throughput_rate: self.speed,
            cost_rate: self.wage,
            max_hours: MaxHours::from(self.max_hours),
            max_order_weight_kg: self.max_order_weight_kg,
        }
    }
}

/// 登錄表配置（保留鍵順序）
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegistryConfig {
    entries: Vec<(String, WorkerConfig)>,
}

impl RegistryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：加入工人類型
    pub fn with_worker(mut self, name: impl Into<String>, config: WorkerConfig) -> Self {
        self.entries.push((name.into(), config));
        self
    }

    /// 從 JSON 字串讀取
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| PlanningError::Configuration(format!("無法解析工人配置: {}", e)))
    }

    pub fn entries(&self) -> &[(String, WorkerConfig)] {
        &self.entries
    }

    /// 驗證並建立登錄表
    pub fn to_registry(&self) -> Result<WorkerRegistry> {
        WorkerRegistry::new(
            self.entries
                .iter()
                .map(|(name, config)| config.to_worker_type(name))
                .collect(),
        )
    }
}

impl From<&WorkerRegistry> for RegistryConfig {
    fn from(registry: &WorkerRegistry) -> Self {
        let entries = registry
            .iter()
            .map(|w| {
                (
                    w.name.clone(),
                    WorkerConfig {
                        speed: w.throughput_rate,
                        wage: w.cost_rate,
                        max_hours: w.max_hours.limit(),
                        max_order_weight_kg: w.max_order_weight_kg,
                    },
                )
            })
            .collect();
        Self { entries }
    }
}

impl TryFrom<RegistryConfig> for WorkerRegistry {
    type Error = PlanningError;

    fn try_from(config: RegistryConfig) -> Result<Self> {
        config.to_registry()
    }
}

impl Serialize for RegistryConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, config) in &self.entries {
            map.serialize_entry(name, config)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RegistryConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RegistryVisitor;

        impl<'de> Visitor<'de> for RegistryVisitor {
            type Value = RegistryConfig;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of worker type name to worker config")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, WorkerConfig)> = Vec::new();
                while let Some((name, config)) = access.next_entry::<String, WorkerConfig>()? {
                    if entries.iter().any(|(n, _)| *n == name) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate worker type `{}`",
                            name
                        )));
                    }
                    entries.push((name, config));
                }
                Ok(RegistryConfig { entries })
            }
        }

        deserializer.deserialize_map(RegistryVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHIFT_JSON: &str = r#"{
        "Robot":  { "speed": 140, "wage": 5.0,  "max_hours": 8, "max_order_weight_kg": 5.0 },
        "Senior": { "speed": 65,  "wage": 28.0, "max_hours": 16 },
        "Junior": { "speed": 25,  "wage": 16.0, "max_hours": null }
    }"#;

    #[test]
    fn test_parse_registry_config() {
        let config = RegistryConfig::from_json_str(SHIFT_JSON).unwrap();
        let registry = config.to_registry().unwrap();

        assert_eq!(registry, WorkerRegistry::standard_shift());
    }

    #[test]
    fn test_key_order_preserved() {
        let json = r#"{"Zeta": {"speed": 1, "wage": 1}, "Alpha": {"speed": 2, "wage": 1}}"#;
        let registry = RegistryConfig::from_json_str(json)
            .unwrap()
            .to_registry()
            .unwrap();

        assert_eq!(registry.workers()[0].name, "Zeta");
        assert_eq!(registry.workers()[1].name, "Alpha");
        assert!(registry.workers()[0].max_hours.is_unlimited());
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let json = r#"{"A": {"speed": 1, "wage": 1}, "A": {"speed": 2, "wage": 1}}"#;
        assert!(matches!(
            RegistryConfig::from_json_str(json),
            Err(PlanningError::Configuration(_))
        ));
    }

    #[test]
    fn test_zero_speed_fails_fast() {
        let config = RegistryConfig::new()
            .with_worker("Broken", WorkerConfig::new(0.0, 10.0).with_max_hours(8.0));

        assert!(matches!(
            WorkerRegistry::try_from(config),
            Err(PlanningError::Configuration(_))
        ));
    }

    #[test]
    fn test_registry_round_trip_through_config() {
        let registry = WorkerRegistry::standard_shift();
        let json = serde_json::to_string(&RegistryConfig::from(&registry)).unwrap();
        let restored = RegistryConfig::from_json_str(&json)
            .unwrap()
            .to_registry()
            .unwrap();

        assert_eq!(restored, registry);
    }
}
