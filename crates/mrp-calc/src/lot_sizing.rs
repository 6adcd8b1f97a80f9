//! 批量規則實現

use rust_decimal::Decimal;

/// 批量規則計算器
pub struct LotSizingCalculator;

impl LotSizingCalculator {
    /// 將缺料量向上取整到批量的倍數
    ///
    /// 回傳不小於 `shortage` 的最小批量倍數；缺料量不為正時回傳 0。
    pub fn round_up(shortage: Decimal, lot_size: Decimal) -> Decimal {
        if shortage <= Decimal::ZERO || lot_size <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        Self::lots_needed(shortage, lot_size) * lot_size
    }

    /// 需要的批數
    pub fn lots_needed(shortage: Decimal, lot_size: Decimal) -> Decimal {
        if shortage <= Decimal::ZERO || lot_size <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        (shortage / lot_size).ceil()
    }
}
