//! 計劃時界

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::{MrpError, Period, Result};

/// 計劃時界（含頭尾的期間範圍）
///
/// `min_period` 只會往前擴展；`max_period` 在計算開始時固定。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "HorizonBounds")]
pub struct Horizon {
    pub min_period: Period,
    pub max_period: Period,
}

/// 反序列化用的原始邊界，經 `Horizon::new` 檢查後才轉成時界
#[derive(Deserialize)]
struct HorizonBounds {
    min_period: Period,
    max_period: Period,
}

impl TryFrom<HorizonBounds> for Horizon {
    type Error = MrpError;

    fn try_from(bounds: HorizonBounds) -> Result<Self> {
        Self::new(bounds.min_period, bounds.max_period)
    }
}

impl Horizon {
    /// 創建新的時界
    pub fn new(min_period: Period, max_period: Period) -> Result<Self> {
        if min_period > max_period {
            return Err(MrpError::InvalidHorizon {
                min: min_period,
                max: max_period,
            });
        }
        Ok(Self {
            min_period,
            max_period,
        })
    }

    /// 由一組期間推算時界（空集合回傳 None）
    pub fn spanning<I>(periods: I) -> Option<Self>
    where
        I: IntoIterator<Item = Period>,
    {
        periods.into_iter().fold(None, |acc, period| match acc {
            None => Some(Self {
                min_period: period,
                max_period: period,
            }),
            Some(h) => Some(Self {
                min_period: h.min_period.min(period),
                max_period: h.max_period.max(period),
            }),
        })
    }

    /// 將起點往前擴展到 `period`，有擴展時回傳 true
    pub fn extend_to(&mut self, period: Period) -> bool {
        if period < self.min_period {
            self.min_period = period;
            true
        } else {
            false
        }
    }

    pub fn contains(&self, period: Period) -> bool {
        self.min_period <= period && period <= self.max_period
    }

    /// 期間數量（起點晚於終點時為 0）
    pub fn len(&self) -> usize {
        usize::try_from(i64::from(self.max_period) - i64::from(self.min_period) + 1).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 重新檢查邊界（欄位可直接修改，使用前需確認起點不晚於終點）
    pub fn validated(self) -> Result<Self> {
        Self::new(self.min_period, self.max_period)
    }

    /// 依序遍歷所有期間
    pub fn periods(&self) -> RangeInclusive<Period> {
        self.min_period..=self.max_period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_horizon() {
        assert!(matches!(
            Horizon::new(5, 1),
            Err(MrpError::InvalidHorizon { min: 5, max: 1 })
        ));
    }

    #[test]
    fn test_spanning() {
        let horizon = Horizon::spanning([4, 1, 9, 3]).unwrap();
        assert_eq!(horizon, Horizon::new(1, 9).unwrap());
        assert_eq!(horizon.len(), 9);

        assert!(Horizon::spanning(Vec::new()).is_none());
    }

    #[test]
    fn test_inverted_bounds_have_no_periods() {
        let inverted = Horizon {
            min_period: 5,
            max_period: 1,
        };

        assert_eq!(inverted.len(), 0);
        assert!(inverted.is_empty());
        assert!(matches!(
            inverted.validated(),
            Err(MrpError::InvalidHorizon { min: 5, max: 1 })
        ));
        assert!(!Horizon::new(1, 1).unwrap().is_empty());
    }

    #[test]
    fn test_deserialize_rejects_inverted_bounds() {
        let parsed: Horizon =
            serde_json::from_str(r#"{ "min_period": -2, "max_period": 6 }"#).unwrap();
        assert_eq!(parsed, Horizon::new(-2, 6).unwrap());

        let inverted = serde_json::from_str::<Horizon>(r#"{ "min_period": 5, "max_period": 1 }"#);
        assert!(inverted.is_err());
    }

    #[test]
    fn test_extend_only_backward() {
        let mut horizon = Horizon::new(1, 6).unwrap();

        assert!(!horizon.extend_to(3));
        assert!(horizon.extend_to(-2));
        assert!(!horizon.extend_to(0));

        assert_eq!(horizon.min_period, -2);
        assert_eq!(horizon.max_period, 6);
        assert_eq!(horizon.periods().collect::<Vec<_>>().first(), Some(&-2));
        assert!(horizon.contains(-2));
        assert!(!horizon.contains(7));
    }
}
