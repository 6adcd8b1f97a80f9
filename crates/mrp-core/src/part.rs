//! 物料模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::Period;

/// 採購類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProcurementType {
    /// 採購
    Buy,
    /// 生產
    #[default]
    Make,
    /// 調撥
    Transfer,
}

/// 物料（成品、半成品或原物料）
///
/// 靜態參數在載入時設定；`gross_requirements` 會被 BOM 展開累加，
/// `planned_order_releases` 與 `projected_available` 是計算輸出。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    /// 物料ID
    pub id: String,

    /// 現有庫存
    #[serde(default)]
    pub on_hand_qty: Decimal,

    /// 已分配數量（鎖定）
    #[serde(default)]
    pub allocated_qty: Decimal,

    /// 安全庫存
    #[serde(default)]
    pub safety_stock: Decimal,

    /// 提前期（期間數）
    #[serde(default)]
    pub lead_time: u32,

    /// 批量（訂購量必須是此數的倍數，必須大於零）
    #[serde(default = "default_lot_size")]
    pub lot_size: Decimal,

    /// 損耗率（保留欄位，目前不影響展開數量）
    #[serde(default)]
    pub scrap_factor: Option<Decimal>,

    /// 採購/生產標記
    #[serde(default)]
    pub procurement_type: ProcurementType,

    /// BOM：子件ID → 單位用量
    #[serde(default)]
    pub bom: BTreeMap<String, Decimal>,

    /// 總需求（期間 → 數量）
    #[serde(default)]
    pub gross_requirements: BTreeMap<Period, Decimal>,

    /// 預計收貨（期間 → 數量）
    #[serde(default)]
    pub scheduled_receipts: BTreeMap<Period, Decimal>,

    /// 計劃訂單下達（期間 → 數量）
    #[serde(default)]
    pub planned_order_releases: BTreeMap<Period, Decimal>,

    /// 預計可用量（期間 → 數量，可為負）
    #[serde(default)]
    pub projected_available: BTreeMap<Period, Decimal>,
}

fn default_lot_size() -> Decimal {
    Decimal::ONE
}

impl Part {
    /// 創建新的物料（批量 1、無庫存、無提前期）
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            on_hand_qty: Decimal::ZERO,
            allocated_qty: Decimal::ZERO,
            safety_stock: Decimal::ZERO,
            lead_time: 0,
            lot_size: Decimal::ONE,
            scrap_factor: None,
            procurement_type: ProcurementType::Make,
            bom: BTreeMap::new(),
            gross_requirements: BTreeMap::new(),
            scheduled_receipts: BTreeMap::new(),
            planned_order_releases: BTreeMap::new(),
            projected_available: BTreeMap::new(),
        }
    }

    /// 建構器模式：設置現有庫存
    pub fn with_on_hand(mut self, qty: Decimal) -> Self {
        self.on_hand_qty = qty;
        self
    }

    /// 建構器模式：設置已分配數量
    pub fn with_allocated(mut self, qty: Decimal) -> Self {
        self.allocated_qty = qty;
        self
    }

    /// 建構器模式：設置安全庫存
    pub fn with_safety_stock(mut self, qty: Decimal) -> Self {
        self.safety_stock = qty;
        self
    }

    /// 建構器模式：設置提前期
    pub fn with_lead_time(mut self, periods: u32) -> Self {
        self.lead_time = periods;
        self
    }

    /// 建構器模式：設置批量
    pub fn with_lot_size(mut self, lot_size: Decimal) -> Self {
        self.lot_size = lot_size;
        self
    }

    /// 建構器模式：設置損耗率
    pub fn with_scrap_factor(mut self, factor: Decimal) -> Self {
        self.scrap_factor = Some(factor);
        self
    }

    /// 建構器模式：設置採購類型
    pub fn with_procurement_type(mut self, procurement_type: ProcurementType) -> Self {
        self.procurement_type = procurement_type;
        self
    }

    /// 建構器模式：添加 BOM 子件
    pub fn with_component(mut self, component_id: impl Into<String>, qty_per: Decimal) -> Self {
        self.bom.insert(component_id.into(), qty_per);
        self
    }

    /// 建構器模式：添加總需求
    pub fn with_requirement(mut self, period: Period, qty: Decimal) -> Self {
        self.add_gross_requirement(period, qty);
        self
    }

    /// 建構器模式：添加預計收貨
    pub fn with_scheduled_receipt(mut self, period: Period, qty: Decimal) -> Self {
        *self.scheduled_receipts.entry(period).or_insert(Decimal::ZERO) += qty;
        self
    }

    /// 期初可用量（現有 - 已分配）
    pub fn initial_available(&self) -> Decimal {
        self.on_hand_qty - self.allocated_qty
    }

    /// 累加總需求（BOM 展開時使用，不覆蓋既有需求）
    pub fn add_gross_requirement(&mut self, period: Period, qty: Decimal) {
        *self.gross_requirements.entry(period).or_insert(Decimal::ZERO) += qty;
    }

    /// 某期間的總需求（無記錄時為 0）
    pub fn gross_requirement(&self, period: Period) -> Decimal {
        self.gross_requirements
            .get(&period)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// 某期間的預計收貨（無記錄時為 0）
    pub fn scheduled_receipt(&self, period: Period) -> Decimal {
        self.scheduled_receipts
            .get(&period)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// 某期間的計劃訂單下達量（無記錄時為 0）
    pub fn planned_order_release(&self, period: Period) -> Decimal {
        self.planned_order_releases
            .get(&period)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// 是否有子件
    pub fn has_components(&self) -> bool {
        !self.bom.is_empty()
    }

    /// 清除上一次計算的輸出
    pub fn clear_outputs(&mut self) {
        self.planned_order_releases.clear();
        self.projected_available.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_part() {
        let part = Part::new("BIKE-001");

        assert_eq!(part.id, "BIKE-001");
        assert_eq!(part.lot_size, Decimal::ONE);
        assert_eq!(part.lead_time, 0);
        assert!(!part.has_components());
        assert_eq!(part.gross_requirement(5), Decimal::ZERO);
    }

    #[test]
    fn test_part_builder() {
        let part = Part::new("FRAME-001")
            .with_on_hand(Decimal::from(100))
            .with_allocated(Decimal::from(30))
            .with_safety_stock(Decimal::from(10))
            .with_lead_time(2)
            .with_lot_size(Decimal::from(25))
            .with_procurement_type(ProcurementType::Buy)
            .with_component("TUBE-001", Decimal::from(3));

        assert_eq!(part.initial_available(), Decimal::from(70));
        assert_eq!(part.safety_stock, Decimal::from(10));
        assert_eq!(part.lead_time, 2);
        assert_eq!(part.procurement_type, ProcurementType::Buy);
        assert_eq!(part.bom.get("TUBE-001"), Some(&Decimal::from(3)));
    }

    #[test]
    fn test_gross_requirements_accumulate() {
        let mut part = Part::new("WHEEL-001").with_requirement(3, Decimal::from(40));

        // 相依需求累加而非覆蓋
        part.add_gross_requirement(3, Decimal::from(60));
        part.add_gross_requirement(-1, Decimal::from(5));

        assert_eq!(part.gross_requirement(3), Decimal::from(100));
        assert_eq!(part.gross_requirement(-1), Decimal::from(5));
        assert_eq!(part.gross_requirements.len(), 2);
    }

    #[test]
    fn test_deserialize_defaults() {
        let part: Part = serde_json::from_str(r#"{ "id": "SCREW-001" }"#).unwrap();

        assert_eq!(part.lot_size, Decimal::ONE);
        assert_eq!(part.procurement_type, ProcurementType::Make);
        assert!(part.scheduled_receipts.is_empty());
    }
}
