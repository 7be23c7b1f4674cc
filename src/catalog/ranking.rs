//! Display order for the work log.
//!
//! Two tiers: multi-record groups first (largest count first), then one-off
//! jobs (most recent first). The sort is stable, so ties keep their incoming
//! order and re-ranking a ranked list is a no-op.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::types::WorkOrderGroup;

/// Most recent first; unparseable dates sort after every valid one.
fn compare_dates_desc(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Pairwise ordering used by [`rank_groups`].
pub fn compare_groups(a: &WorkOrderGroup, b: &WorkOrderGroup) -> Ordering {
    match (a.is_multi(), b.is_multi()) {
        (true, true) => b.count.cmp(&a.count),
        (false, false) => compare_dates_desc(a.latest(), b.latest()),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
    }
}

pub fn rank_groups(mut groups: Vec<WorkOrderGroup>) -> Vec<WorkOrderGroup> {
    groups.sort_by(compare_groups);
    groups
}
