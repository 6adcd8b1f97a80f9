//! # MRP Core
//!
//! 核心資料模型與類型定義

pub mod calendar;
pub mod capacity;
pub mod config;
pub mod demand;
pub mod horizon;
pub mod part;
pub mod plan;
pub mod registry;
pub mod supply;

// Re-export 主要類型
pub use calendar::{BucketSize, PeriodCalendar};
pub use capacity::{CapacityTable, ResourceProfile};
pub use config::{HorizonPolicy, PlanningPolicy};
pub use demand::{Demand, DemandType};
pub use horizon::Horizon;
pub use part::{Part, ProcurementType};
pub use plan::{OrderAttempt, OrderAttemptRecord, PartSchedule, PlannedOrder, PlannedOrderType};
pub use registry::PartRegistry;
pub use supply::{Supply, SupplyType};

/// 計劃期間（整數，可為負值，代表過去的期間）
pub type Period = i32;

/// MRP 錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum MrpError {
    #[error("未載入任何物料")]
    NoPartsLoaded,

    #[error("相依圖中沒有根物料（BOM 存在循環或完全互相依賴）")]
    NoRootInDependencyGraph,

    #[error("BOM 引用了未登錄的子件: {parent} → {component}")]
    UnknownComponent { parent: String, component: String },

    #[error("找不到物料: {0}")]
    UnknownPart(String),

    #[error("物料重複登錄: {0}")]
    DuplicatePart(String),

    #[error("物料 {part_id} 的批量必須大於零（目前為 {lot_size}）")]
    InvalidLotSize {
        part_id: String,
        lot_size: rust_decimal::Decimal,
    },

    #[error("無效的計劃時界: {min} > {max}")]
    InvalidHorizon { min: Period, max: Period },

    #[error("無效的日期: {0}")]
    InvalidDate(String),

    #[error("序列化錯誤: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MrpError>;
