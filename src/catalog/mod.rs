//! Work-order catalog: the immutable record snapshot behind the work log,
//! its ranked per-title groups, and the lookups the detail views need.
//!
//! Pipeline: records → `group_by_title` → `rank_groups` → `filter_groups`
//! → `Browser` page window. Everything up to the browser is pure.

pub mod browse;
pub mod color;
pub mod filter;
pub mod grouping;
pub mod location;
pub mod ranking;

use std::collections::BTreeSet;

use serde::Serialize;

use crate::types::{FilterOptions, WorkOrder, WorkOrderGroup};

pub use browse::{BrowseAction, BrowseState, Browser};
pub use color::WorkTypeColor;
pub use filter::{filter_groups, group_matches, FilterCriteria};
pub use grouping::group_by_title;
pub use location::{display_location, sanitize_city, SERVICE_LOCATION};
pub use ranking::rank_groups;

/// Loaded records plus their ranked groups. Built once per load.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<WorkOrder>,
    groups: Vec<WorkOrderGroup>,
}

impl Catalog {
    pub fn new(records: Vec<WorkOrder>) -> Self {
        let groups = rank_groups(group_by_title(&records));
        log::info!(
            "Work log catalog: {} records in {} groups ({} repeat engagements)",
            records.len(),
            groups.len(),
            groups.iter().filter(|g| g.is_multi()).count()
        );
        Self { records, groups }
    }

    pub fn records(&self) -> &[WorkOrder] {
        &self.records
    }

    /// Ranked groups
    pub fn groups(&self) -> &[WorkOrderGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<&WorkOrderGroup> {
        filter_groups(&self.groups, criteria)
    }

    /// Detail view lookup by exact id.
    pub fn find_by_id(&self, id: &str) -> Option<&WorkOrder> {
        find_by_id(&self.records, id)
    }

    /// Records for a group detail view, in export order.
    pub fn orders_with_title(&self, title: &str) -> Vec<&WorkOrder> {
        orders_with_title(&self.records, title)
    }

    pub fn filter_options(&self) -> FilterOptions {
        filter_options(&self.records)
    }

    /// Summary for a group detail view; `None` renders "not found".
    pub fn group_summary(&self, title: &str) -> Option<GroupSummary> {
        GroupSummary::from_orders(&self.orders_with_title(title))
    }
}

pub fn find_by_id<'a>(records: &'a [WorkOrder], id: &str) -> Option<&'a WorkOrder> {
    records.iter().find(|o| o.id == id)
}

pub fn orders_with_title<'a>(records: &'a [WorkOrder], title: &str) -> Vec<&'a WorkOrder> {
    records.iter().filter(|o| o.title == title).collect()
}

/// Dropdown values: unique types and states, each sorted.
pub fn filter_options(records: &[WorkOrder]) -> FilterOptions {
    let types: BTreeSet<&str> = records.iter().map(|o| o.type_of_work.as_str()).collect();
    let states: BTreeSet<&str> = records.iter().map(|o| o.state.as_str()).collect();
    FilterOptions {
        types: types.into_iter().map(String::from).collect(),
        states: states.into_iter().map(String::from).collect(),
    }
}

/// Everything the group detail page shows besides the per-order cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub title: String,
    pub type_of_work: String,
    pub color: WorkTypeColor,
    pub count: usize,
    pub locations: Vec<String>,
    pub companies: Vec<String>,
    pub states: Vec<String>,
    pub work_orders: Vec<WorkOrder>,
}

impl GroupSummary {
    pub fn from_orders(orders: &[&WorkOrder]) -> Option<Self> {
        let first = orders.first()?;
        Some(Self {
            title: first.title.clone(),
            type_of_work: first.type_of_work.clone(),
            color: WorkTypeColor::for_type(&first.type_of_work),
            count: orders.len(),
            locations: grouping::unique_in_order(
                orders.iter().map(|o| display_location(&o.city, &o.state)),
            ),
            companies: grouping::unique_in_order(orders.iter().map(|o| o.company.clone())),
            states: grouping::unique_in_order(orders.iter().map(|o| o.state.clone())),
            work_orders: orders.iter().map(|o| (*o).clone()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::grouping::tests::order;

    fn catalog() -> Catalog {
        let mut net = order("wo-3", "Network Setup", "2024-03-01", "Atlanta", "GA", "Beta Corp");
        net.type_of_work = "Networking".to_string();
        Catalog::new(vec![
            order("wo-2", "POS Install", "2024-02-01", "Knoxville", "TN", "Acme"),
            order("wo-1", "POS Install", "2024-01-01", "Nashville", "TN", "Acme"),
            net,
        ])
    }

    #[test]
    fn test_catalog_ranks_groups_on_build() {
        let catalog = catalog();
        assert_eq!(catalog.records().len(), 3);
        let titles: Vec<&str> = catalog.groups().iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["POS Install", "Network Setup"]);
        assert_eq!(catalog.groups()[0].id, "wo-1");
    }

    #[test]
    fn test_find_by_id() {
        let catalog = catalog();
        assert_eq!(catalog.find_by_id("wo-3").map(|o| o.title.as_str()), Some("Network Setup"));
        assert!(catalog.find_by_id("wo-9").is_none());
    }

    #[test]
    fn test_group_summary_keeps_export_order() {
        let catalog = catalog();
        let summary = catalog.group_summary("POS Install").expect("summary");
        assert_eq!(summary.count, 2);
        assert_eq!(summary.work_orders[0].id, "wo-2");
        assert_eq!(summary.locations, vec!["Knoxville, TN", "Nashville, TN"]);
        assert_eq!(summary.states, vec!["TN"]);
        assert_eq!(summary.color, WorkTypeColor::for_type("Point of Sale"));
        assert!(catalog.group_summary("Missing").is_none());
    }

    #[test]
    fn test_filter_options_are_sorted_and_unique() {
        let options = catalog().filter_options();
        assert_eq!(options.types, vec!["Networking", "Point of Sale"]);
        assert_eq!(options.states, vec!["GA", "TN"]);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::new(Vec::new());
        assert!(catalog.is_empty());
        assert!(catalog.groups().is_empty());
        assert!(catalog.filter(&FilterCriteria::default()).is_empty());
        assert_eq!(catalog.filter_options(), FilterOptions::default());
    }
}
