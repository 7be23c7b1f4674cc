//! AI/OS work log: the grouped, ranked and filterable catalog of past service
//! engagements, plus the small offline tools that keep its inputs healthy.

pub mod catalog;
pub mod contact;
pub mod enrich;
pub mod error;
pub mod json_loader;
pub mod media;
pub mod state;
pub mod types;
pub mod util;

pub use catalog::{Browser, Catalog, FilterCriteria};
pub use error::CatalogError;
pub use json_loader::{load_catalog, LoadState};
pub use types::{Config, WorkOrder, WorkOrderGroup};
