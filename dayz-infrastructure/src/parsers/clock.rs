use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Turns time-of-day stamps into full timestamps, advancing the date when
/// the clock wraps past midnight.
#[derive(Debug, Default)]
pub(crate) struct LogClock {
    date: Option<NaiveDate>,
    last: Option<NaiveTime>,
}

impl LogClock {
    pub(crate) fn set_date(&mut self, date: NaiveDate) {
        self.date = Some(date);
        self.last = None;
    }

    pub(crate) fn stamp(&mut self, time: NaiveTime) -> Option<NaiveDateTime> {
        let mut date = self.date?;
        if let Some(last) = self.last {
            if last - time > Duration::hours(12) {
                date = date.succ_opt()?;
                self.date = Some(date);
            }
        }
        self.last = Some(time);
        Some(date.and_time(time))
    }
}
