//! Search box + dropdown filters over ranked groups.

use serde::{Deserialize, Serialize};

use crate::types::WorkOrderGroup;

/// Current search/filter inputs. Empty strings mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub type_filter: String,
    #[serde(default)]
    pub state_filter: String,
}

impl FilterCriteria {
    pub fn new(query: &str, type_filter: &str, state_filter: &str) -> Self {
        Self {
            query: query.to_string(),
            type_filter: type_filter.to_string(),
            state_filter: state_filter.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.type_filter.is_empty() && self.state_filter.is_empty()
    }
}

/// Literal predicate: case-insensitive substring on title, companies and
/// locations; exact match on type and on any member's state. All ANDed.
pub fn group_matches(group: &WorkOrderGroup, criteria: &FilterCriteria) -> bool {
    matches_query(group, &criteria.query)
        && (criteria.type_filter.is_empty() || group.type_of_work == criteria.type_filter)
        && (criteria.state_filter.is_empty()
            || group
                .work_orders
                .iter()
                .any(|o| o.state == criteria.state_filter))
}

fn matches_query(group: &WorkOrderGroup, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    let hit = |haystack: &str| haystack.to_lowercase().contains(&needle);

    hit(group.title.as_str())
        || group.companies.iter().any(|c| hit(c.as_str()))
        || group.locations.iter().any(|l| hit(l.as_str()))
}

/// Borrowing filter: every result is one of the input groups, in input order.
pub fn filter_groups<'a>(
    groups: &'a [WorkOrderGroup],
    criteria: &FilterCriteria,
) -> Vec<&'a WorkOrderGroup> {
    groups.iter().filter(|g| group_matches(g, criteria)).collect()
}
