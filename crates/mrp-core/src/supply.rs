//! 供應模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Period, PeriodCalendar};

/// 供應類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupplyType {
    /// 採購訂單
    PurchaseOrder,
    /// 生產工單
    WorkOrder,
    /// 調撥在途
    Transfer,
}

/// 預計收貨（已下達、在途的訂單）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supply {
    /// 物料ID
    pub part_id: String,

    /// 供應數量
    pub quantity: Decimal,

    /// 到貨期間
    pub period: Period,

    /// 供應類型
    pub supply_type: SupplyType,

    /// 來源單據
    pub source_ref: Option<String>,
}

impl Supply {
    /// 創建新的供應
    pub fn new(
        part_id: impl Into<String>,
        quantity: Decimal,
        period: Period,
        supply_type: SupplyType,
    ) -> Self {
        Self {
            part_id: part_id.into(),
            quantity,
            period,
            supply_type,
            source_ref: None,
        }
    }

    /// 以到貨日期創建供應
    pub fn on_date(
        part_id: impl Into<String>,
        quantity: Decimal,
        available_date: NaiveDate,
        supply_type: SupplyType,
        calendar: &PeriodCalendar,
    ) -> Self {
        Self::new(part_id, quantity, calendar.period_of(available_date), supply_type)
    }

    /// 建構器模式：設置來源單據
    pub fn with_source_ref(mut self, source_ref: impl Into<String>) -> Self {
        self.source_ref = Some(source_ref.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_supply() {
        let supply = Supply::new("BIKE-001", Decimal::from(50), 2, SupplyType::PurchaseOrder)
            .with_source_ref("PO-12345");

        assert_eq!(supply.part_id, "BIKE-001");
        assert_eq!(supply.quantity, Decimal::from(50));
        assert_eq!(supply.period, 2);
        assert_eq!(supply.source_ref.as_deref(), Some("PO-12345"));
    }

    #[test]
    fn test_supply_on_date() {
        let calendar = PeriodCalendar::daily(NaiveDate::from_ymd_opt(2025, 11, 1).unwrap());
        let supply = Supply::on_date(
            "WHEEL-001",
            Decimal::from(10),
            NaiveDate::from_ymd_opt(2025, 11, 18).unwrap(),
            SupplyType::WorkOrder,
            &calendar,
        );

        assert_eq!(supply.period, 18);
    }
}
