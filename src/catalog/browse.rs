//! Incremental reveal over the filtered work log.
//!
//! `BrowseState` is an immutable value; `BrowseState::apply` is the reducer.
//! `Browser` owns the single live state for a view, plus the memoised
//! filter result for the current criteria.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::catalog::filter::{group_matches, FilterCriteria};
use crate::catalog::Catalog;
use crate::types::WorkOrderGroup;

/// Groups revealed per page
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// UI feedback pause before the next page appears
pub const DEFAULT_LOAD_MORE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseAction {
    SetQuery(String),
    SetTypeFilter(String),
    SetStateFilter(String),
    ClearFilters,
    /// Reveal one more page out of `available` filtered groups
    ShowMore { available: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseState {
    pub criteria: FilterCriteria,
    pub display_count: usize,
    pub page_size: usize,
}

impl Default for BrowseState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl BrowseState {
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            criteria: FilterCriteria::default(),
            display_count: page_size,
            page_size,
        }
    }

    /// Pure reducer. Changing any filter value resets the reveal window to one
    /// page; setting a filter to its current value leaves it alone.
    pub fn apply(&self, action: BrowseAction) -> BrowseState {
        match action {
            BrowseAction::SetQuery(query) => self.with_criteria(FilterCriteria {
                query,
                ..self.criteria.clone()
            }),
            BrowseAction::SetTypeFilter(type_filter) => self.with_criteria(FilterCriteria {
                type_filter,
                ..self.criteria.clone()
            }),
            BrowseAction::SetStateFilter(state_filter) => self.with_criteria(FilterCriteria {
                state_filter,
                ..self.criteria.clone()
            }),
            BrowseAction::ClearFilters => self.with_criteria(FilterCriteria::default()),
            BrowseAction::ShowMore { available } => {
                if !self.has_more(available) {
                    return self.clone();
                }
                BrowseState {
                    display_count: (self.display_count + self.page_size).min(available),
                    ..self.clone()
                }
            }
        }
    }

    fn with_criteria(&self, criteria: FilterCriteria) -> BrowseState {
        if criteria == self.criteria {
            return self.clone();
        }
        BrowseState {
            criteria,
            display_count: self.page_size,
            page_size: self.page_size,
        }
    }

    pub fn has_more(&self, available: usize) -> bool {
        available > self.display_count
    }
}

/// Live browsing session over one loaded catalog.
pub struct Browser {
    catalog: Arc<Catalog>,
    state: BrowseState,
    load_more_delay: Duration,
    /// Indices into `catalog.groups()` matching `memo_criteria`
    memo: Vec<usize>,
    memo_criteria: FilterCriteria,
}

impl Browser {
    pub fn new(catalog: Arc<Catalog>, page_size: usize, load_more_delay: Duration) -> Self {
        let state = BrowseState::new(page_size);
        let memo_criteria = state.criteria.clone();
        let memo = (0..catalog.groups().len()).collect();
        Self {
            catalog,
            state,
            load_more_delay,
            memo,
            memo_criteria,
        }
    }

    pub fn state(&self) -> &BrowseState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn dispatch(&mut self, action: BrowseAction) {
        self.state = self.state.apply(action);
        self.refresh_memo();
    }

    pub fn set_query(&mut self, query: &str) {
        self.dispatch(BrowseAction::SetQuery(query.to_string()));
    }

    pub fn set_type_filter(&mut self, type_filter: &str) {
        self.dispatch(BrowseAction::SetTypeFilter(type_filter.to_string()));
    }

    pub fn set_state_filter(&mut self, state_filter: &str) {
        self.dispatch(BrowseAction::SetStateFilter(state_filter.to_string()));
    }

    pub fn clear_filters(&mut self) {
        self.dispatch(BrowseAction::ClearFilters);
    }

    fn refresh_memo(&mut self) {
        if self.memo_criteria == self.state.criteria {
            return;
        }
        let groups = self.catalog.groups();
        self.memo = groups
            .iter()
            .enumerate()
            .filter(|(_, g)| group_matches(g, &self.state.criteria))
            .map(|(i, _)| i)
            .collect();
        self.memo_criteria = self.state.criteria.clone();
        log::debug!(
            "Work log filter {:?} -> {} of {} groups",
            self.memo_criteria,
            self.memo.len(),
            groups.len()
        );
    }

    /// Filtered + ranked groups (the full list, not just the visible page).
    pub fn filtered(&self) -> Vec<&WorkOrderGroup> {
        let groups = self.catalog.groups();
        self.memo.iter().map(|&i| &groups[i]).collect()
    }

    pub fn filtered_len(&self) -> usize {
        self.memo.len()
    }

    pub fn visible(&self) -> Vec<&WorkOrderGroup> {
        let groups = self.catalog.groups();
        self.memo
            .iter()
            .take(self.state.display_count)
            .map(|&i| &groups[i])
            .collect()
    }

    pub fn has_more(&self) -> bool {
        self.state.has_more(self.filtered_len())
    }

    /// Reveal the next page after the feedback delay. Returns whether
    /// anything was added.
    pub async fn load_more(&mut self) -> bool {
        if !self.has_more() {
            return false;
        }
        if !self.load_more_delay.is_zero() {
            tokio::time::sleep(self.load_more_delay).await;
        }
        let before = self.state.display_count;
        self.dispatch(BrowseAction::ShowMore {
            available: self.filtered_len(),
        });
        self.state.display_count > before
    }
}
