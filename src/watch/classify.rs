// src/watch/classify.rs
use crate::watch::types::{ChangeKind, ParsedItem, Watermark};

/// Outcome of holding one item against the watermark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Not touched since the watermark; contributes nothing.
    Skip,
    Changed(ChangeKind),
}

/// Pure decision: an item changed iff its `last-changed-on` lies strictly
/// after the watermark, and it counts as created iff both of its stamps are
/// the same instant.
///
/// The equality check is exact. A service that writes the two stamps with
/// sub-second skew for a brand-new item will surface it as `Updated`; known
/// limitation, kept as-is.
pub fn classify(item: &ParsedItem, watermark: Watermark) -> Classification {
    if item.changed_on <= watermark.instant() {
        return Classification::Skip;
    }
    if item.changed_on == item.created_on {
        Classification::Changed(ChangeKind::Created)
    } else {
        Classification::Changed(ChangeKind::Updated)
    }
}
