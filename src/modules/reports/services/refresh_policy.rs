use std::time::{Duration, Instant};

/// When a read should be preceded by a full rebuild
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPolicy {
    /// Rebuild before every read
    #[default]
    EveryRead,
    /// Rebuild when the last successful rebuild is older than the interval
    Interval(Duration),
    /// Rebuild only when nothing has been built yet or the cache was invalidated
    Manual,
}

impl RefreshPolicy {
    pub fn needs_rebuild(&self, last_success: Option<Instant>, invalidated: bool) -> bool {
        if invalidated {
            return true;
        }
        match (self, last_success) {
            (RefreshPolicy::EveryRead, _) => true,
            (_, None) => true,
            (RefreshPolicy::Interval(interval), Some(at)) => at.elapsed() >= *interval,
            (RefreshPolicy::Manual, Some(_)) => false,
        }
    }
}
