//! 需求追溯
//!
//! 記錄 BOM 展開時每一筆相依需求的來源（父件、期間、數量），
//! 可由子件往上追溯到最終產品。

use mrp_core::Period;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 相依需求追溯記錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeggingRecord {
    /// 父件ID（產生需求的計劃訂單所屬物料）
    pub parent_id: String,

    /// 子件ID
    pub component_id: String,

    /// 需求期間（父件計劃訂單的下達期間）
    pub period: Period,

    /// 需求數量（父件訂單量 × 單位用量）
    pub quantity: Decimal,
}

impl PeggingRecord {
    pub fn new(
        parent_id: impl Into<String>,
        component_id: impl Into<String>,
        period: Period,
        quantity: Decimal,
    ) -> Self {
        Self {
            parent_id: parent_id.into(),
            component_id: component_id.into(),
            period,
            quantity,
        }
    }
}

/// 需求追溯計算器
pub struct PeggingCalculator;

impl PeggingCalculator {
    /// 單層追溯：某子件的所有相依需求來源
    pub fn sources<'a>(records: &'a [PeggingRecord], component_id: &str) -> Vec<&'a PeggingRecord> {
        records
            .iter()
            .filter(|record| record.component_id == component_id)
            .collect()
    }

    /// 某子件的相依需求總量
    pub fn dependent_quantity(records: &[PeggingRecord], component_id: &str) -> Decimal {
        Self::sources(records, component_id)
            .iter()
            .map(|record| record.quantity)
            .sum()
    }

    /// 多層追溯：從最終產品到此子件的所有路徑（依字典順序）
    pub fn paths_to_roots(records: &[PeggingRecord], component_id: &str) -> Vec<Vec<String>> {
        let mut paths = BTreeSet::new();
        let mut stack = vec![vec![component_id.to_string()]];

        while let Some(path) = stack.pop() {
            let head = &path[0];
            let parents: BTreeSet<&str> = records
                .iter()
                .filter(|record| &record.component_id == head)
                .map(|record| record.parent_id.as_str())
                .collect();

            if parents.is_empty() {
                if path.len() > 1 {
                    paths.insert(path);
                }
                continue;
            }

            for parent in parents {
                if path.iter().any(|id| id == parent) {
                    continue;
                }
                let mut extended = Vec::with_capacity(path.len() + 1);
                extended.push(parent.to_string());
                extended.extend(path.iter().cloned());
                stack.push(extended);
            }
        }

        paths.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bike_pegging() -> Vec<PeggingRecord> {
        vec![
            PeggingRecord::new("BIKE", "FRAME", 3, Decimal::from(50)),
            PeggingRecord::new("BIKE", "WHEEL", 3, Decimal::from(100)),
            PeggingRecord::new("FRAME", "TUBE", 1, Decimal::from(150)),
            PeggingRecord::new("WHEEL", "TUBE", 2, Decimal::from(100)),
        ]
    }

    #[test]
    fn test_single_level_pegging() {
        let records = bike_pegging();

        let sources = PeggingCalculator::sources(&records, "TUBE");
        assert_eq!(sources.len(), 2);
        assert_eq!(
            PeggingCalculator::dependent_quantity(&records, "TUBE"),
            Decimal::from(250)
        );
        assert!(PeggingCalculator::sources(&records, "BIKE").is_empty());
    }

    #[test]
    fn test_multi_level_pegging() {
        let records = bike_pegging();

        let paths = PeggingCalculator::paths_to_roots(&records, "TUBE");
        assert_eq!(
            paths,
            vec![
                vec!["BIKE".to_string(), "FRAME".to_string(), "TUBE".to_string()],
                vec!["BIKE".to_string(), "WHEEL".to_string(), "TUBE".to_string()],
            ]
        );
        // 最終產品本身沒有追溯路徑
        assert!(PeggingCalculator::paths_to_roots(&records, "BIKE").is_empty());
    }
}
