// src/watch/types.rs
use chrono::{DateTime, Utc};

use crate::watch::category::Category;

/// One item lifted out of a collection response, with the category-specific
/// field names already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedItem {
    pub id: String,
    pub label: String,
    /// Parent project label; `None` for projects themselves.
    pub project: Option<String>,
    pub created_on: DateTime<Utc>,
    pub changed_on: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Updated,
}

/// A change detected in one polling cycle. Built per item, consumed by the
/// aggregator, discarded once the cycle's signal exists.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub category: Category,
    pub kind: ChangeKind,
    pub item: ParsedItem,
}

/// The instant before which changes are considered already notified.
///
/// Owned by the polling loop and threaded through each cycle explicitly; it
/// only ever moves forward, and only in a cycle that emitted a change signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Watermark(DateTime<Utc>);

impl Watermark {
    pub fn new(at: DateTime<Utc>) -> Self {
        Watermark(at)
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }

    /// Forward-only advance; a `now` behind the current mark is a no-op.
    #[must_use]
    pub fn advanced_to(self, now: DateTime<Utc>) -> Self {
        Watermark(self.0.max(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn watermark_moves_forward_only() {
        let t0 = Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap();
        let wm = Watermark::new(t0);

        let later = t0 + chrono::Duration::seconds(20);
        assert_eq!(wm.advanced_to(later).instant(), later);

        let earlier = t0 - chrono::Duration::seconds(20);
        assert_eq!(wm.advanced_to(earlier).instant(), t0);
    }
}
