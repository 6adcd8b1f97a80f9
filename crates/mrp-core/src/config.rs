//! 計劃策略配置

use serde::{Deserialize, Serialize};

use crate::{Horizon, Period};

/// 時界擴展策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HorizonPolicy {
    /// 預先推算：淨算前依拓撲順序傳遞提前期，一次決定最終時界，
    /// 所有物料都在同一個時界上計算
    #[default]
    PrePass,

    /// 動態擴展：計算中遇到更早的下單期間才擴展時界，
    /// 已計算完成的物料不會重算，其較早期間以期初可用量補齊
    Dynamic,
}

/// 單次 MRP 計算的策略配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanningPolicy {
    /// 是否允許在第 1 期以前（含第 0 期與負期間）下達計劃訂單
    /// - false: 下單期間必須 >= 1，否則不下單並產生警告（預設）
    /// - true: 任何期間都可下單，時界可往過去擴展
    #[serde(default)]
    pub allow_past_periods: bool,

    /// 時界擴展策略
    #[serde(default)]
    pub horizon_policy: HorizonPolicy,

    /// 指定時界（未指定時由總需求推算）
    #[serde(default)]
    pub horizon: Option<Horizon>,
}

impl PlanningPolicy {
    /// 創建預設策略
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置是否允許過去期間下單
    ///
    /// # 範例
    /// ```
    /// # use mrp_core::PlanningPolicy;
    /// let policy = PlanningPolicy::new().with_allow_past_periods(true);
    /// assert!(policy.is_admissible(-2));
    /// ```
    pub fn with_allow_past_periods(mut self, allow: bool) -> Self {
        self.allow_past_periods = allow;
        self
    }

    /// 建構器模式：設置時界擴展策略
    pub fn with_horizon_policy(mut self, policy: HorizonPolicy) -> Self {
        self.horizon_policy = policy;
        self
    }

    /// 建構器模式：指定時界
    pub fn with_horizon(mut self, horizon: Horizon) -> Self {
        self.horizon = Some(horizon);
        self
    }

    /// 檢查下單期間是否可接受
    pub fn is_admissible(&self, when_needed: Period) -> bool {
        self.allow_past_periods || when_needed >= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = PlanningPolicy::new();

        assert!(!policy.allow_past_periods);
        assert_eq!(policy.horizon_policy, HorizonPolicy::PrePass);
        assert!(policy.horizon.is_none());
        assert!(policy.is_admissible(1));
        assert!(!policy.is_admissible(0));
        assert!(!policy.is_admissible(-3));
    }

    #[test]
    fn test_policy_builder() {
        let policy = PlanningPolicy::new()
            .with_allow_past_periods(true)
            .with_horizon_policy(HorizonPolicy::Dynamic)
            .with_horizon(Horizon::new(1, 12).unwrap());

        assert!(policy.is_admissible(-10));
        assert_eq!(policy.horizon_policy, HorizonPolicy::Dynamic);
        assert_eq!(policy.horizon.map(|h| h.max_period), Some(12));
    }

    #[test]
    fn test_policy_from_json() {
        let policy: PlanningPolicy =
            serde_json::from_str(r#"{ "allow_past_periods": true, "horizon_policy": "Dynamic" }"#)
                .unwrap();

        assert!(policy.allow_past_periods);
        assert_eq!(policy.horizon_policy, HorizonPolicy::Dynamic);
    }
}
