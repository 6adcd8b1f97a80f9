//! # MRP Calculation Engine
//!
//! 核心 MRP 計算引擎：相依圖排程、逐期淨算、批量取整、BOM 展開與產能檢查

pub mod calculator;
pub mod capacity;
pub mod context;
pub mod graph;
pub mod horizon;
pub mod lot_sizing;
pub mod netting;
pub mod pegging;

// Re-export 主要類型
pub use calculator::MrpCalculator;
pub use capacity::{CapacityGate, SharedCapacity, Unconstrained};
pub use context::PlanningContext;
pub use graph::{DependencyGraph, ReadyQueue};
pub use horizon::HorizonTracker;
pub use lot_sizing::LotSizingCalculator;
pub use netting::{NetRequirement, NettingCalculator};
pub use pegging::{PeggingCalculator, PeggingRecord};

use mrp_core::{
    CapacityTable, Horizon, OrderAttemptRecord, PartRegistry, PartSchedule, Period, PlannedOrder,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// MRP 計算結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MrpResult {
    /// 各物料的時間序列（以最終時界逐期排列）
    pub schedules: BTreeMap<String, PartSchedule>,

    /// 計劃訂單（依物料ID、下達期間排序）
    pub planned_orders: Vec<PlannedOrder>,

    /// 各物料的淨算明細
    pub netting: BTreeMap<String, Vec<NetRequirement>>,

    /// 下單嘗試記錄（含被拒絕的訂單）
    pub order_attempts: Vec<OrderAttemptRecord>,

    /// 需求追溯
    pub pegging: Vec<PeggingRecord>,

    /// 警告信息
    pub warnings: Vec<MrpWarning>,

    /// 最終時界
    pub horizon: Horizon,

    /// 物料處理順序
    pub processing_order: Vec<String>,

    /// 剩餘產能（無產能限制時為 None）
    pub remaining_capacity: Option<CapacityTable>,

    /// 計算後的物料（含展開後的總需求）
    pub parts: PartRegistry,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl MrpResult {
    /// 創建空的計算結果
    pub fn empty(horizon: Horizon) -> Self {
        Self {
            schedules: BTreeMap::new(),
            planned_orders: Vec::new(),
            netting: BTreeMap::new(),
            order_attempts: Vec::new(),
            pegging: Vec::new(),
            warnings: Vec::new(),
            horizon,
            processing_order: Vec::new(),
            remaining_capacity: None,
            parts: PartRegistry::new(),
            calculation_time_ms: None,
        }
    }

    /// 添加警告
    pub fn add_warning(&mut self, warning: MrpWarning) {
        self.warnings.push(warning);
    }

    /// 某物料的時間序列
    pub fn schedule(&self, part_id: &str) -> Option<&PartSchedule> {
        self.schedules.get(part_id)
    }

    /// 某物料在某期間的計劃訂單下達量（無則為 0）
    pub fn release(&self, part_id: &str, period: Period) -> Decimal {
        self.schedule(part_id)
            .and_then(|schedule| schedule.release_at(period))
            .unwrap_or(Decimal::ZERO)
    }

    /// 某物料的計劃訂單
    pub fn orders_for<'a>(&'a self, part_id: &'a str) -> impl Iterator<Item = &'a PlannedOrder> + 'a {
        self.planned_orders
            .iter()
            .filter(move |order| order.part_id == part_id)
    }

    /// 被拒絕的下單嘗試
    pub fn rejected_attempts(&self) -> impl Iterator<Item = &OrderAttemptRecord> {
        self.order_attempts
            .iter()
            .filter(|attempt| !attempt.outcome.is_committed())
    }

    /// 是否有錯誤等級的警告
    pub fn has_errors(&self) -> bool {
        self.warnings
            .iter()
            .any(|warning| warning.severity == WarningSeverity::Error)
    }
}

/// MRP 警告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MrpWarning {
    pub part_id: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl MrpWarning {
    pub fn new(part_id: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            part_id,
            message,
            severity,
        }
    }

    pub fn info(part_id: String, message: String) -> Self {
        Self::new(part_id, message, WarningSeverity::Info)
    }

    pub fn warning(part_id: String, message: String) -> Self {
        Self::new(part_id, message, WarningSeverity::Warning)
    }

    pub fn error(part_id: String, message: String) -> Self {
        Self::new(part_id, message, WarningSeverity::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningSeverity {
    Info,
    Warning,
    Error,
}
