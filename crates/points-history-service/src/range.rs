//! 日期区间解析
//!
//! 查询参数中的日期按配置的本地时区偏移解释：`start` 取当日 00:00:00，
//! `end` 覆盖到当日 23:59:59（实现为次日零点的开区间）。

use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::{HistoryError, Result};

/// UTC 下的半开区间 [from, until)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub from: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

/// 由小时数构造时区偏移，超出 ±23 时报错
pub fn offset_from_hours(hours: i32) -> Result<FixedOffset> {
    FixedOffset::east_opt(hours * 3600)
        .ok_or_else(|| HistoryError::Internal(format!("无效的时区偏移: {hours}")))
}

fn parse_day(raw: &str, name: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        HistoryError::Validation(format!("{name} 日期格式无效，应为 yyyy-mm-dd: {raw}"))
    })
}

fn local_midnight(day: NaiveDate, offset: FixedOffset) -> Result<DateTime<Utc>> {
    offset
        .from_local_datetime(&day.and_time(NaiveTime::MIN))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| HistoryError::Internal(format!("无法解析本地时间: {day}")))
}

impl TimeRange {
    /// 解析查询参数，缺失的边界视为不限
    pub fn parse(start: Option<&str>, end: Option<&str>, offset: FixedOffset) -> Result<Self> {
        let start_day = start
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_day(s, "start"))
            .transpose()?;
        let end_day = end
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_day(s, "end"))
            .transpose()?;

        if let (Some(s), Some(e)) = (start_day, end_day) {
            if s > e {
                return Err(HistoryError::Validation(format!(
                    "start ({s}) 不能晚于 end ({e})"
                )));
            }
        }

        let from = start_day
            .map(|day| local_midnight(day, offset))
            .transpose()?;
        let until = end_day
            .map(|day| {
                let next = day
                    .checked_add_days(Days::new(1))
                    .ok_or_else(|| HistoryError::Validation(format!("end 超出范围: {day}")))?;
                local_midnight(next, offset)
            })
            .transpose()?;

        Ok(Self { from, until })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| at >= from) && self.until.is_none_or(|until| at < until)
    }
}
