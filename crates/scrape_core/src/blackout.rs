use chrono::{DateTime, FixedOffset, NaiveTime, Utc};

/// Recurring daily maintenance window during which new jobs are rejected.
///
/// The window is evaluated in a fixed reference offset, not the host zone.
/// The start instant is inside the window, the end instant is outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlackoutWindow {
    pub utc_offset: FixedOffset,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Default for BlackoutWindow {
    /// 22:58 to 00:31 the next day, at UTC+05:30.
    fn default() -> Self {
        Self {
            utc_offset: FixedOffset::east_opt(5 * 3600 + 30 * 60).expect("offset in range"),
            start: NaiveTime::from_hms_opt(22, 58, 0).expect("valid time"),
            end: NaiveTime::from_hms_opt(0, 31, 0).expect("valid time"),
        }
    }
}

impl BlackoutWindow {
    /// Whether `now` falls inside the window.
    ///
    /// When `start > end` the window spans midnight and the end boundary
    /// belongs to the next calendar day.
    pub fn in_blackout(&self, now: DateTime<Utc>) -> bool {
        let local = now.with_timezone(&self.utc_offset).time();
        if self.start <= self.end {
            local >= self.start && local < self.end
        } else {
            local >= self.start || local < self.end
        }
    }
}
