use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::catalog::browse::{DEFAULT_LOAD_MORE_DELAY, DEFAULT_PAGE_SIZE};

/// Application configuration (~/.aios/config.json)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// File path or http(s) URL of the work-order export
    #[serde(default = "default_data_source")]
    pub data_source: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Artificial pause before "load more" reveals the next page
    #[serde(default = "default_load_more_delay_ms")]
    pub load_more_delay_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub video: VideoConfig,
    #[serde(default)]
    pub contact: ContactConfig,
}

fn default_data_source() -> String {
    "public/data/processed-work-orders.json".to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_load_more_delay_ms() -> u64 {
    DEFAULT_LOAD_MORE_DELAY.as_millis() as u64
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_source: default_data_source(),
            page_size: default_page_size(),
            load_more_delay_ms: default_load_more_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            video: VideoConfig::default(),
            contact: ContactConfig::default(),
        }
    }
}

/// Background video sources, in playback preference order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoConfig {
    #[serde(default = "default_video_sources")]
    pub sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_image: Option<String>,
    /// Directory the source paths are relative to when checked on disk
    #[serde(default = "default_local_root")]
    pub local_root: String,
    #[serde(default = "default_local_base_url")]
    pub local_base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed_base_url: Option<String>,
}

fn default_video_sources() -> Vec<String> {
    [
        "/videos/7020018_Particle_Dot_1080p_optimized.mp4",
        "/videos/7020018_Particle_Dot_3840x2160.mp4",
        "/videos/6994947_Cyber_Ai_1080p_optimized.mp4",
        "/videos/6994947_Cyber_Ai_3840x2160.mp4",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_local_root() -> String {
    "public".to_string()
}

fn default_local_base_url() -> String {
    "http://localhost:3001".to_string()
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            sources: default_video_sources(),
            fallback_image: None,
            local_root: default_local_root(),
            local_base_url: default_local_base_url(),
            deployed_base_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactConfig {
    #[serde(default = "default_submit_delay_ms")]
    pub submit_delay_ms: u64,
}

fn default_submit_delay_ms() -> u64 {
    2000
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            submit_delay_ms: default_submit_delay_ms(),
        }
    }
}

// =============================================================================
// Work orders
// =============================================================================

/// One historical service engagement from the static export.
///
/// Records are never mutated after load; the catalog treats the whole set as
/// an immutable snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
    /// Raw export value; may be empty or unparseable, see [`WorkOrder::service_date`]
    #[serde(default, deserialize_with = "null_as_empty")]
    pub service_date: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub type_of_work: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub state: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub country: String,
    /// Anonymized/generalized upstream
    #[serde(default, deserialize_with = "null_as_empty")]
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closeout_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_extraction_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_extraction_success: Option<bool>,
    /// Export columns this crate doesn't model; written back untouched
    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

/// Rows are not schema-checked: `null` reads as an empty string.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl WorkOrder {
    /// Parsed service date, `None` when the export holds something unparseable.
    pub fn service_date(&self) -> Option<NaiveDate> {
        crate::util::parse_service_date(&self.service_date)
    }
}

/// All records sharing an identical title, displayed as one project.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderGroup {
    pub title: String,
    /// Taken from the earliest member
    pub type_of_work: String,
    pub count: usize,
    /// Ascending by service date
    pub work_orders: Vec<WorkOrder>,
    pub earliest_date: String,
    pub latest_date: String,
    /// Unique "City, ST" strings in discovery order
    pub locations: Vec<String>,
    pub companies: Vec<String>,
    /// Id of the earliest member; the routing key when `count == 1`
    pub id: String,
}

impl WorkOrderGroup {
    pub fn is_multi(&self) -> bool {
        self.count > 1
    }

    pub fn latest(&self) -> Option<NaiveDate> {
        crate::util::parse_service_date(&self.latest_date)
    }
}

/// Sorted unique values for the type and state dropdowns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub types: Vec<String>,
    pub states: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_from_empty_json() {
        let config: Config = serde_json::from_str("{}").expect("parse");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.load_more_delay_ms, 500);
        assert_eq!(config.video.sources.len(), 4);
        assert_eq!(config.contact.submit_delay_ms, 2000);
        assert_eq!(config.data_source, "public/data/processed-work-orders.json");
    }

    #[test]
    fn test_work_order_accepts_minimal_export_row() {
        let json = r#"{
            "id": "wo-1",
            "serviceDate": "2024-01-05",
            "title": "POS Install",
            "typeOfWork": "Point of Sale",
            "city": "Nashville",
            "state": "TN",
            "company": "Regional Restaurant Group",
            "rating": 5.0
        }"#;
        let order: WorkOrder = serde_json::from_str(json).expect("parse");
        assert_eq!(order.country, "");
        assert_eq!(order.rating, Some(5.0));
        assert_eq!(order.buyer_rating, None);
        assert_eq!(
            order.service_date(),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );

        let out = serde_json::to_value(&order).expect("serialize");
        assert!(out.get("closeoutNotes").is_none());
        assert_eq!(out["typeOfWork"], "Point of Sale");
    }

    #[test]
    fn test_work_order_tolerates_missing_and_null_fields() {
        let order: WorkOrder =
            serde_json::from_str(r#"{"id": "wo-2", "serviceDate": null, "city": null}"#)
                .expect("parse");
        assert_eq!(order.service_date, "");
        assert_eq!(order.service_date(), None);
        assert_eq!(order.city, "");
        assert_eq!(order.title, "");
    }

    #[test]
    fn test_unmodelled_columns_round_trip() {
        let json = r#"{"id": "wo-3", "serviceDate": "2024-02-01", "title": "Install",
                       "zip": "37201", "hours": 3}"#;
        let order: WorkOrder = serde_json::from_str(json).expect("parse");
        assert_eq!(order.extra.get("zip"), Some(&Value::from("37201")));
        assert!(!order.extra.contains_key("title"));

        let out = serde_json::to_value(&order).expect("serialize");
        assert_eq!(out["zip"], "37201");
        assert_eq!(out["hours"], 3);
    }
}
