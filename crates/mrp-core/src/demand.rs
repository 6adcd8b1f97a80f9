//! 需求模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Period, PeriodCalendar};

/// 需求類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemandType {
    /// 銷售訂單
    SalesOrder,
    /// 銷售預測
    Forecast,
    /// 主生產排程（由外部排程或優化器提供）
    MasterSchedule,
}

/// 獨立需求（BOM 展開產生的相依需求直接寫入子件的總需求，不經過此結構）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Demand {
    /// 物料ID
    pub part_id: String,

    /// 需求數量
    pub quantity: Decimal,

    /// 需求期間
    pub period: Period,

    /// 需求類型
    pub demand_type: DemandType,

    /// 來源單據（如銷售訂單號）
    pub source_ref: Option<String>,
}

impl Demand {
    /// 創建新的需求
    pub fn new(
        part_id: impl Into<String>,
        quantity: Decimal,
        period: Period,
        demand_type: DemandType,
    ) -> Self {
        Self {
            part_id: part_id.into(),
            quantity,
            period,
            demand_type,
            source_ref: None,
        }
    }

    /// 以日期創建需求（依期間日曆換算期間）
    pub fn on_date(
        part_id: impl Into<String>,
        quantity: Decimal,
        required_date: NaiveDate,
        demand_type: DemandType,
        calendar: &PeriodCalendar,
    ) -> Self {
        Self::new(part_id, quantity, calendar.period_of(required_date), demand_type)
    }

    /// 建構器模式：設置來源單據
    pub fn with_source_ref(mut self, source_ref: impl Into<String>) -> Self {
        self.source_ref = Some(source_ref.into());
        self
    }

    /// 檢查是否為確定需求（非預測）
    pub fn is_firm(&self) -> bool {
        self.demand_type != DemandType::Forecast
    }
}
