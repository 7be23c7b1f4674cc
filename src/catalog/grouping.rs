//! Partition work orders into per-title groups and compute the aggregate
//! fields shown on each tile.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::catalog::location::display_location;
use crate::types::{WorkOrder, WorkOrderGroup};

/// Ascending by date; unparseable dates sort after every valid one.
pub(crate) fn compare_dates_asc(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Unique values in first-occurrence order.
pub(crate) fn unique_in_order<I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

/// Group records by exact title. No trimming or case folding: titles that
/// differ only in whitespace or case form separate groups.
///
/// Groups come out in order of each title's first appearance in `records`;
/// ranking is a separate step.
pub fn group_by_title(records: &[WorkOrder]) -> Vec<WorkOrderGroup> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut partitions: Vec<Vec<&WorkOrder>> = Vec::new();

    for order in records {
        match index.get(order.title.as_str()) {
            Some(&slot) => partitions[slot].push(order),
            None => {
                index.insert(order.title.as_str(), partitions.len());
                partitions.push(vec![order]);
            }
        }
    }

    partitions.into_iter().filter_map(build_group).collect()
}

fn build_group(mut members: Vec<&WorkOrder>) -> Option<WorkOrderGroup> {
    members.sort_by(|a, b| compare_dates_asc(a.service_date(), b.service_date()));

    let first = *members.first()?;
    let last = *members.last()?;

    let locations = unique_in_order(
        members
            .iter()
            .map(|o| display_location(&o.city, &o.state)),
    );
    let companies = unique_in_order(members.iter().map(|o| o.company.clone()));

    Some(WorkOrderGroup {
        title: first.title.clone(),
        type_of_work: first.type_of_work.clone(),
        count: members.len(),
        earliest_date: first.service_date.clone(),
        latest_date: last.service_date.clone(),
        id: first.id.clone(),
        locations,
        companies,
        work_orders: members.into_iter().cloned().collect(),
    })
}
