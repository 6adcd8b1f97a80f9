//! 產能閘門
//!
//! 計劃訂單確認前檢查物料所用的每項資源；全部足夠才扣減產能並確認，
//! 否則整張訂單不下（不減量、不延後、不部分扣減）。

use mrp_core::{CapacityTable, OrderAttempt, Period, ResourceProfile};
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex, PoisonError};

/// 產能可行性檢查
pub trait CapacityGate {
    /// 檢查並確認訂單；確認時同步扣減產能
    fn try_commit(&mut self, profile: &ResourceProfile, period: Period, quantity: Decimal) -> OrderAttempt;

    /// 目前剩餘產能（無產能限制時為 None）
    fn snapshot(&self) -> Option<CapacityTable>;
}

/// 無產能限制
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconstrained;

impl CapacityGate for Unconstrained {
    fn try_commit(&mut self, _profile: &ResourceProfile, _period: Period, quantity: Decimal) -> OrderAttempt {
        OrderAttempt::Committed(quantity)
    }

    fn snapshot(&self) -> Option<CapacityTable> {
        None
    }
}

/// 找出第一項產能不足的資源（依資源ID順序）及其短缺量
fn first_shortfall(
    table: &CapacityTable,
    profile: &ResourceProfile,
    period: Period,
    quantity: Decimal,
) -> Option<(String, Decimal)> {
    profile
        .iter()
        .filter(|(_, usage)| **usage > Decimal::ZERO)
        .find_map(|(resource, usage)| {
            let required = quantity * *usage;
            let remaining = table.remaining(resource, period);
            (required > remaining).then(|| (resource.clone(), required - remaining))
        })
}

impl CapacityGate for CapacityTable {
    fn try_commit(&mut self, profile: &ResourceProfile, period: Period, quantity: Decimal) -> OrderAttempt {
        if let Some((resource, shortfall)) = first_shortfall(self, profile, period, quantity) {
            return OrderAttempt::RejectedInsufficientCapacity {
                resource,
                shortfall,
            };
        }

        for (resource, usage) in profile {
            if *usage > Decimal::ZERO {
                self.debit(resource, period, quantity * *usage);
            }
        }
        OrderAttempt::Committed(quantity)
    }

    fn snapshot(&self) -> Option<CapacityTable> {
        Some(self.clone())
    }
}

/// 跨執行緒共用的產能表
///
/// 檢查與扣減在同一把鎖內完成，多個產品族群並行計算時不會超額分配。
#[derive(Debug, Clone, Default)]
pub struct SharedCapacity {
    table: Arc<Mutex<CapacityTable>>,
}

impl SharedCapacity {
    pub fn new(table: CapacityTable) -> Self {
        Self {
            table: Arc::new(Mutex::new(table)),
        }
    }
}

impl CapacityGate for SharedCapacity {
    fn try_commit(&mut self, profile: &ResourceProfile, period: Period, quantity: Decimal) -> OrderAttempt {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        table.try_commit(profile, period, quantity)
    }

    fn snapshot(&self) -> Option<CapacityTable> {
        let table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        Some(table.clone())
    }
}
