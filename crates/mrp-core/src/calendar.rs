//! 期間日曆
//!
//! 將整數期間對應到日曆日期。第 1 期從錨定日開始，
//! 第 0 期與負期間代表錨定日以前的時間桶。

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{MrpError, Period, Result};

/// 時間桶大小
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BucketSize {
    /// 每日
    Daily,
    /// 每週
    Weekly,
    /// 每月（以錨定日的日期為分界）
    Monthly,
}

/// 期間日曆
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodCalendar {
    /// 第 1 期的開始日期
    pub anchor: NaiveDate,

    /// 時間桶大小
    pub bucket: BucketSize,
}

impl PeriodCalendar {
    /// 創建新的期間日曆
    pub fn new(anchor: NaiveDate, bucket: BucketSize) -> Self {
        Self { anchor, bucket }
    }

    /// 每日分桶
    pub fn daily(anchor: NaiveDate) -> Self {
        Self::new(anchor, BucketSize::Daily)
    }

    /// 每週分桶
    pub fn weekly(anchor: NaiveDate) -> Self {
        Self::new(anchor, BucketSize::Weekly)
    }

    /// 每月分桶
    pub fn monthly(anchor: NaiveDate) -> Self {
        Self::new(anchor, BucketSize::Monthly)
    }

    /// 期間的開始日期
    pub fn period_start(&self, period: Period) -> Result<NaiveDate> {
        let offset = i64::from(period) - 1;
        let date = match self.bucket {
            BucketSize::Daily => self.anchor.checked_add_signed(Duration::days(offset)),
            BucketSize::Weekly => self.anchor.checked_add_signed(Duration::weeks(offset)),
            BucketSize::Monthly => self.shift_months(offset),
        };

        date.ok_or_else(|| MrpError::InvalidDate(format!("第 {} 期超出日期範圍", period)))
    }

    /// 日期所在的期間
    pub fn period_of(&self, date: NaiveDate) -> Period {
        let offset = match self.bucket {
            BucketSize::Daily => (date - self.anchor).num_days(),
            BucketSize::Weekly => (date - self.anchor).num_days().div_euclid(7),
            BucketSize::Monthly => {
                let months = i64::from(date.year() - self.anchor.year()) * 12
                    + i64::from(date.month()) - i64::from(self.anchor.month());
                // 每月分桶以錨定日的日期為分界，未到分界日仍屬上一期
                match self.shift_months(months) {
                    Some(start) if date < start => months - 1,
                    _ => months,
                }
            }
        };

        (offset + 1) as Period
    }

    fn shift_months(&self, offset: i64) -> Option<NaiveDate> {
        let months = Months::new(offset.unsigned_abs() as u32);
        if offset >= 0 {
            self.anchor.checked_add_months(months)
        } else {
            self.anchor.checked_sub_months(months)
        }
    }
}
