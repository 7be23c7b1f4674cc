//! Merge OCR-extracted work-order text into the export.
//!
//! Extraction results are keyed by whatever id the OCR pass found; both sides
//! are normalised to their first run of digits before matching.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::types::WorkOrder;

/// One row of the OCR pass output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedText {
    pub filename: String,
    #[serde(default)]
    pub work_order_id: Option<String>,
    #[serde(default)]
    pub service_description: Option<String>,
    #[serde(default)]
    pub closeout_notes: Option<String>,
    #[serde(default)]
    pub extraction_success: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStatistics {
    pub total_existing_orders: usize,
    pub total_extracted_records: usize,
    pub successful_matches: usize,
    /// Percent of existing orders that matched
    pub match_rate: f64,
}

#[derive(Debug, Clone)]
pub struct EnrichmentResult {
    pub orders: Vec<WorkOrder>,
    pub statistics: MatchStatistics,
}

fn digit_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+").expect("static regex"))
}

/// First run of digits, else the trimmed id.
pub fn normalize_id(raw: &str) -> String {
    match digit_run().find(raw) {
        Some(m) => m.as_str().to_string(),
        None => raw.trim().to_string(),
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

/// Attach extracted descriptions and closeout notes to matching orders.
/// Orders without a match pass through untouched.
pub fn enrich_work_orders(orders: &[WorkOrder], extracted: &[ExtractedText]) -> EnrichmentResult {
    let mut lookup: HashMap<String, &ExtractedText> = HashMap::new();
    for item in extracted {
        if let Some(id) = item.work_order_id.as_deref().filter(|id| !id.is_empty()) {
            lookup.insert(normalize_id(id), item);
        }
    }
    log::info!("Created lookup for {} extracted records", lookup.len());

    let mut matched = 0usize;
    let enriched: Vec<WorkOrder> = orders
        .iter()
        .map(|order| {
            let mut out = order.clone();
            if let Some(item) = lookup.get(&normalize_id(&order.id)) {
                if let Some(description) = non_empty(&item.service_description) {
                    out.service_description = Some(description);
                }
                if let Some(notes) = non_empty(&item.closeout_notes) {
                    out.closeout_notes = Some(notes);
                }
                out.text_extraction_source = Some(item.filename.clone());
                out.text_extraction_success = Some(item.extraction_success);
                matched += 1;
                log::debug!("Matched order {} with {}", order.id, item.filename);
            }
            out
        })
        .collect();

    let match_rate = if orders.is_empty() {
        0.0
    } else {
        matched as f64 / orders.len() as f64 * 100.0
    };
    log::info!(
        "Matched {} of {} work orders with extracted text ({:.1}%)",
        matched,
        orders.len(),
        match_rate
    );

    EnrichmentResult {
        orders: enriched,
        statistics: MatchStatistics {
            total_existing_orders: orders.len(),
            total_extracted_records: extracted.len(),
            successful_matches: matched,
            match_rate,
        },
    }
}

/// `<dir>/<stem>_statistics.json` next to the enriched export.
pub fn statistics_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "enhanced-work-orders".to_string());
    output.with_file_name(format!("{}_statistics.json", stem))
}

pub fn read_json_array<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, CatalogError> {
    if !path.exists() {
        return Err(CatalogError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| CatalogError::Parse(format!("{}: {}", path.display(), e)))
}

/// Write enriched orders plus the sibling statistics file. Returns the
/// statistics path.
pub fn write_enriched(output: &Path, result: &EnrichmentResult) -> Result<PathBuf, CatalogError> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, serde_json::to_string_pretty(&result.orders)?)?;

    let stats_path = statistics_path(output);
    std::fs::write(&stats_path, serde_json::to_string_pretty(&result.statistics)?)?;

    log::info!("Enhanced work orders saved to: {}", output.display());
    log::info!("Statistics saved to: {}", stats_path.display());
    Ok(stats_path)
}

/// Read both inputs, enrich, write. The whole offline step.
pub fn run_enrichment(
    existing: &Path,
    extracted: &Path,
    output: &Path,
) -> Result<MatchStatistics, CatalogError> {
    let orders: Vec<WorkOrder> = read_json_array(existing)?;
    log::info!("Loaded {} existing work orders", orders.len());
    let texts: Vec<ExtractedText> = read_json_array(extracted)?;
    log::info!("Loaded {} extracted text records", texts.len());

    let result = enrich_work_orders(&orders, &texts);
    write_enriched(output, &result)?;
    Ok(result.statistics)
}
