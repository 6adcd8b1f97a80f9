//! 計劃訂單與輸出模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Part, Period, PeriodCalendar, ProcurementType, Result};

/// 計劃訂單類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlannedOrderType {
    /// 採購
    Purchase,
    /// 生產
    Production,
    /// 調撥
    Transfer,
}

impl From<ProcurementType> for PlannedOrderType {
    fn from(procurement_type: ProcurementType) -> Self {
        match procurement_type {
            ProcurementType::Buy => PlannedOrderType::Purchase,
            ProcurementType::Make => PlannedOrderType::Production,
            ProcurementType::Transfer => PlannedOrderType::Transfer,
        }
    }
}

/// 計劃訂單（MRP計算結果）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedOrder {
    /// 計劃訂單ID（由物料ID與下達期間決定，重算時不變）
    pub id: Uuid,

    /// 物料ID
    pub part_id: String,

    /// 計劃數量
    pub quantity: Decimal,

    /// 下達期間（開始）
    pub release_period: Period,

    /// 需求期間（完成）
    pub due_period: Period,

    /// 訂單類型
    pub order_type: PlannedOrderType,
}

impl PlannedOrder {
    /// 創建新的計劃訂單
    pub fn new(
        part_id: impl Into<String>,
        quantity: Decimal,
        release_period: Period,
        due_period: Period,
        order_type: PlannedOrderType,
    ) -> Self {
        let part_id = part_id.into();
        let key = format!("{}@{}", part_id, release_period);
        Self {
            id: Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()),
            part_id,
            quantity,
            release_period,
            due_period,
            order_type,
        }
    }

    /// 提前期（期間數）
    pub fn lead_time(&self) -> i32 {
        self.due_period - self.release_period
    }

    /// 檢查是否為採購訂單
    pub fn is_purchase(&self) -> bool {
        self.order_type == PlannedOrderType::Purchase
    }

    /// 檢查是否為生產訂單
    pub fn is_production(&self) -> bool {
        self.order_type == PlannedOrderType::Production
    }
}

/// 單次下單嘗試的結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OrderAttempt {
    /// 已確認下單
    Committed(Decimal),

    /// 產能不足，未下單（不扣減任何產能）
    RejectedInsufficientCapacity { resource: String, shortfall: Decimal },

    /// 下單期間不可接受（早於第 1 期且不允許過去期間）
    RejectedInadmissiblePeriod { when_needed: Period },
}

impl OrderAttempt {
    pub fn is_committed(&self) -> bool {
        matches!(self, OrderAttempt::Committed(_))
    }
}

/// 下單嘗試記錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderAttemptRecord {
    /// 物料ID
    pub part_id: String,

    /// 發現缺料的需求期間
    pub due_period: Period,

    /// 下達期間
    pub release_period: Period,

    /// 建議數量（已按批量取整）
    pub requested_qty: Decimal,

    /// 結果
    pub outcome: OrderAttempt,
}

/// 單一物料的時間序列輸出（以最終時界逐期排列）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartSchedule {
    /// 物料ID
    pub part_id: String,

    /// 期間（遞增且連續）
    pub periods: Vec<Period>,

    /// 各期計劃訂單下達量
    pub planned_order_releases: Vec<Decimal>,

    /// 各期預計可用量
    pub projected_available: Vec<Decimal>,
}

impl PartSchedule {
    /// 從已計算的物料組出時間序列
    ///
    /// 物料自身未計算到的較早期間（動態時界），可用量以期初可用量
    /// 加上截至該期的預計收貨補齊，與淨算時併入期初的收貨一致。
    pub fn from_part<I>(part: &Part, periods: I) -> Self
    where
        I: IntoIterator<Item = Period>,
    {
        let periods: Vec<Period> = periods.into_iter().collect();
        let earlier_receipts: Decimal = match periods.first() {
            Some(first) => part.scheduled_receipts.range(..*first).map(|(_, qty)| *qty).sum(),
            None => Decimal::ZERO,
        };
        let mut carried = part.initial_available() + earlier_receipts;
        let mut projected_available = Vec::with_capacity(periods.len());

        for period in &periods {
            match part.projected_available.get(period) {
                Some(balance) => carried = *balance,
                None => carried += part.scheduled_receipt(*period),
            }
            projected_available.push(carried);
        }

        Self {
            part_id: part.id.clone(),
            planned_order_releases: periods
                .iter()
                .map(|period| part.planned_order_release(*period))
                .collect(),
            projected_available,
            periods,
        }
    }

    /// 某期間的計劃訂單下達量
    pub fn release_at(&self, period: Period) -> Option<Decimal> {
        self.index_of(period)
            .and_then(|index| self.planned_order_releases.get(index).copied())
    }

    /// 某期間的預計可用量
    pub fn available_at(&self, period: Period) -> Option<Decimal> {
        self.index_of(period)
            .and_then(|index| self.projected_available.get(index).copied())
    }

    /// 計劃訂單總量
    pub fn total_released(&self) -> Decimal {
        self.planned_order_releases.iter().sum()
    }

    /// 以日曆日期標記各期間（期間開始日、下達量、可用量）
    pub fn dated(&self, calendar: &PeriodCalendar) -> Result<Vec<(NaiveDate, Decimal, Decimal)>> {
        self.periods
            .iter()
            .zip(&self.planned_order_releases)
            .zip(&self.projected_available)
            .map(|((period, release), available)| {
                Ok((calendar.period_start(*period)?, *release, *available))
            })
            .collect()
    }

    fn index_of(&self, period: Period) -> Option<usize> {
        let first = *self.periods.first()?;
        let index = usize::try_from(period - first).ok()?;
        (index < self.periods.len()).then_some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_planned_order() {
        let order = PlannedOrder::new(
            "BIKE-001",
            Decimal::from(100),
            3,
            5,
            ProcurementType::Make.into(),
        );

        assert_eq!(order.part_id, "BIKE-001");
        assert_eq!(order.lead_time(), 2);
        assert!(order.is_production());
        assert!(!order.is_purchase());
    }

    #[test]
    fn test_planned_order_id_is_stable() {
        let first = PlannedOrder::new("FRAME-001", Decimal::from(5), 2, 4, PlannedOrderType::Purchase);
        let again = PlannedOrder::new("FRAME-001", Decimal::from(9), 2, 4, PlannedOrderType::Purchase);
        let other = PlannedOrder::new("FRAME-001", Decimal::from(5), 3, 5, PlannedOrderType::Purchase);

        assert_eq!(first.id, again.id);
        assert_ne!(first.id, other.id);
    }

    #[test]
    fn test_schedule_from_part() {
        let mut part = Part::new("WHEEL-001").with_on_hand(Decimal::from(20));
        part.planned_order_releases.insert(-1, Decimal::from(50));
        part.projected_available.insert(1, Decimal::from(20));
        part.projected_available.insert(2, Decimal::from(5));

        let schedule = PartSchedule::from_part(&part, -1..=2);

        assert_eq!(schedule.periods, vec![-1, 0, 1, 2]);
        assert_eq!(schedule.release_at(-1), Some(Decimal::from(50)));
        assert_eq!(schedule.release_at(0), Some(Decimal::ZERO));
        // 未計算的較早期間以期初可用量補齊
        assert_eq!(schedule.available_at(-1), Some(Decimal::from(20)));
        assert_eq!(schedule.available_at(2), Some(Decimal::from(5)));
        assert_eq!(schedule.available_at(3), None);
        assert_eq!(schedule.total_released(), Decimal::from(50));
    }

    #[test]
    fn test_backfill_includes_scheduled_receipts() {
        // 淨算只涵蓋第 2、3 期；第 -3 與第 0 期的收貨要反映在補齊的期間
        let mut part = Part::new("BODY-001")
            .with_on_hand(Decimal::from(5))
            .with_scheduled_receipt(-3, Decimal::from(1))
            .with_scheduled_receipt(0, Decimal::from(100));
        part.projected_available.insert(2, Decimal::from(106));
        part.projected_available.insert(3, Decimal::from(105));

        let schedule = PartSchedule::from_part(&part, -2..=3);

        assert_eq!(
            schedule.projected_available,
            [6, 6, 106, 106, 106, 105].map(Decimal::from).to_vec()
        );
    }

    #[test]
    fn test_lookup_with_uneven_series() {
        let schedule = PartSchedule {
            part_id: "BODY-001".to_string(),
            periods: vec![1, 2, 3],
            planned_order_releases: vec![Decimal::ONE],
            projected_available: Vec::new(),
        };

        assert_eq!(schedule.release_at(1), Some(Decimal::ONE));
        assert_eq!(schedule.release_at(2), None);
        assert_eq!(schedule.available_at(1), None);
    }

    #[test]
    fn test_dated_schedule() {
        let part = Part::new("SCREW-001").with_on_hand(Decimal::from(7));
        let schedule = PartSchedule::from_part(&part, 1..=2);
        let calendar = PeriodCalendar::weekly(NaiveDate::from_ymd_opt(2025, 11, 3).unwrap());

        let dated = schedule.dated(&calendar).unwrap();
        assert_eq!(dated[1].0, NaiveDate::from_ymd_opt(2025, 11, 10).unwrap());
        assert_eq!(dated[1].2, Decimal::from(7));
    }
}
