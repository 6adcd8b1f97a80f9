//! 計算上下文
//!
//! 單次 MRP 計算的全部可變狀態：物料、時界、產能。
//! 計算期間只有淨算迴圈會寫入。

use mrp_core::{
    OrderAttempt, OrderAttemptRecord, PartRegistry, Period, ResourceProfile,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::capacity::CapacityGate;
use crate::horizon::HorizonTracker;
use crate::netting::NetRequirement;
use crate::pegging::PeggingRecord;
use crate::MrpWarning;

/// 計算上下文
pub struct PlanningContext<'a, G> {
    /// 物料（計算中就地更新）
    pub registry: PartRegistry,

    /// 時界追蹤器
    pub horizon: HorizonTracker,

    /// 產能閘門
    pub gate: G,

    /// 物料的資源用量
    pub profiles: &'a BTreeMap<String, ResourceProfile>,

    /// 各物料的淨算明細
    pub netting: BTreeMap<String, Vec<NetRequirement>>,

    /// 下單嘗試記錄
    pub attempts: Vec<OrderAttemptRecord>,

    /// 需求追溯
    pub pegging: Vec<PeggingRecord>,

    /// 警告信息
    pub warnings: Vec<MrpWarning>,
}

impl<'a, G: CapacityGate> PlanningContext<'a, G> {
    pub fn new(
        registry: PartRegistry,
        horizon: HorizonTracker,
        gate: G,
        profiles: &'a BTreeMap<String, ResourceProfile>,
    ) -> Self {
        Self {
            registry,
            horizon,
            gate,
            profiles,
            netting: BTreeMap::new(),
            attempts: Vec::new(),
            pegging: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// 依物料的資源用量檢查產能（沒有用量設定的物料不受限制）
    pub fn admit(&mut self, part_id: &str, period: Period, quantity: Decimal) -> OrderAttempt {
        match self.profiles.get(part_id) {
            Some(profile) => self.gate.try_commit(profile, period, quantity),
            None => OrderAttempt::Committed(quantity),
        }
    }
}
