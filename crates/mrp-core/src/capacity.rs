//! 產能資料模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::Period;

/// 物料的資源用量：資源ID → 每單位產出消耗量
pub type ResourceProfile = BTreeMap<String, Decimal>;

/// 產能表（資源 × 期間 → 剩餘產能）
///
/// 只有確認的計劃訂單會扣減產能；計算期間不會增加。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapacityTable {
    cells: BTreeMap<String, BTreeMap<Period, Decimal>>,
}

impl CapacityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置某資源某期間的產能
    pub fn with_capacity(mut self, resource: impl Into<String>, period: Period, qty: Decimal) -> Self {
        self.set_capacity(resource, period, qty);
        self
    }

    /// 建構器模式：為某資源的一段期間設置相同產能
    pub fn with_uniform_capacity<I>(mut self, resource: impl Into<String>, periods: I, qty: Decimal) -> Self
    where
        I: IntoIterator<Item = Period>,
    {
        let resource = resource.into();
        for period in periods {
            self.set_capacity(resource.clone(), period, qty);
        }
        self
    }

    /// 設置產能（覆蓋）
    pub fn set_capacity(&mut self, resource: impl Into<String>, period: Period, qty: Decimal) {
        self.cells
            .entry(resource.into())
            .or_default()
            .insert(period, qty);
    }

    /// 剩餘產能（未定義的格子視為 0）
    pub fn remaining(&self, resource: &str, period: Period) -> Decimal {
        self.cells
            .get(resource)
            .and_then(|periods| periods.get(&period))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// 扣減產能
    pub fn debit(&mut self, resource: &str, period: Period, qty: Decimal) {
        let remaining = self.remaining(resource, period);
        self.set_capacity(resource.to_string(), period, remaining - qty);
    }

    /// 已定義的資源
    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
