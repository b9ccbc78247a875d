use chrono::{DateTime, FixedOffset, NaiveDate, Offset, TimeZone, Utc};

/// Decides which calendar day a timestamp belongs to. Injected so that day
/// boundaries do not depend on the host clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalDay {
    offset: FixedOffset,
}

impl LocalDay {
    pub fn utc() -> Self {
        Self::from_offset_minutes(0)
    }

    /// Out-of-range offsets (beyond +/-24h) fall back to UTC.
    pub fn from_offset_minutes(minutes: i32) -> Self {
        let offset = FixedOffset::east_opt(minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix());
        Self { offset }
    }

    pub fn date_of<Tz: TimeZone>(&self, timestamp: &DateTime<Tz>) -> NaiveDate {
        timestamp.with_timezone(&self.offset).date_naive()
    }

    /// Current wall-clock instant expressed in this offset.
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}
