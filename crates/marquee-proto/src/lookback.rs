use crate::protocol::Added;

pub const SECS_PER_DAY: i64 = 86_400;

/// Age window for recently-added records, in whole days. Zero disables it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lookback {
    pub days: u32,
}

impl Lookback {
    pub fn days(days: u32) -> Self {
        Self { days }
    }

    /// Oldest `addedAt` (epoch seconds) that survives, or `None` when disabled.
    pub fn cutoff(&self, now: i64) -> Option<i64> {
        (self.days > 0).then(|| now - i64::from(self.days) * SECS_PER_DAY)
    }

    /// Keep records added at or after the cutoff. Records without an
    /// `addedAt` are dropped unless the window is disabled.
    pub fn apply<T: Added>(&self, records: Vec<T>, now: i64) -> Vec<T> {
        let Some(cutoff) = self.cutoff(now) else {
            return records;
        };
        records
            .into_iter()
            .filter(|r| r.added_at().is_some_and(|t| t >= cutoff))
            .collect()
    }
}
