//! # Seasonal Stock Alerts
//!
//! Stateless policy functions that bucket products into low-stock severity
//! bands using season-dependent thresholds.
//!
//! ## Season Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Southern hemisphere, simplified to 2 seasons:                          │
//! │                                                                         │
//! │    Summer = Dec–May   (summer + autumn)   → threshold_summer            │
//! │    Winter = Jun–Nov   (winter + spring)   → threshold_winter            │
//! │                                                                         │
//! │  Construction activity drops in the wet winter months, so the yard      │
//! │  keeps a higher buffer then and a leaner one over summer.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Severity Bands
//! The ratio of stock to the active threshold is computed in basis points
//! (1 bps = 0.01%), keeping band boundaries exact under integer arithmetic:
//!
//! | Ratio          | Severity  |
//! |----------------|-----------|
//! | > 75%          | Normal    |
//! | > 50% to 75%   | Warning   |
//! | > 25% to 50%   | Low       |
//! | ≤ 25%          | Critical  |
//!
//! Products are listed only when at or below 105% of the threshold (a
//! pre-alert margin), and products with no configured threshold (≤ 0) are
//! excluded entirely.

use serde::{Deserialize, Serialize};

use crate::types::Product;

// =============================================================================
// Season Configuration
// =============================================================================

/// Months (1-12) that use the summer threshold: December through May.
pub const SUMMER_MONTHS: [u32; 6] = [12, 1, 2, 3, 4, 5];

/// Months (1-12) that use the winter threshold: June through November.
pub const WINTER_MONTHS: [u32; 6] = [6, 7, 8, 9, 10, 11];

/// Products at or below this ratio of their threshold appear in the alert
/// report. 10_500 bps = 105%, a small pre-alert margin above the threshold.
pub const PRE_ALERT_CUTOFF_BPS: i64 = 10_500;

/// The two operating seasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Summer,
    Winter,
}

impl Season {
    /// Maps a calendar month (1-12) to its season.
    pub fn for_month(month: u32) -> Season {
        if WINTER_MONTHS.contains(&month) {
            Season::Winter
        } else {
            Season::Summer
        }
    }
}

/// Returns the stock threshold that applies to `product` in `month` (1-12).
pub fn seasonal_threshold(product: &Product, month: u32) -> i64 {
    match Season::for_month(month) {
        Season::Winter => product.threshold_winter,
        Season::Summer => product.threshold_summer,
    }
}

// =============================================================================
// Severity
// =============================================================================

/// Low-stock severity band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockSeverity {
    Normal,
    Warning,
    Low,
    Critical,
}

/// Ratio of stock to threshold in basis points (floor division).
///
/// `threshold` must be positive; callers filter non-positive thresholds out
/// before calling.
pub fn stock_ratio_bps(stock: i64, threshold: i64) -> i64 {
    stock * 10_000 / threshold
}

/// Ratio of a product's stock to its seasonal threshold for `month` (1-12).
///
/// Returns `None` when the active threshold is not positive, which excludes
/// the product from alerting.
pub fn product_ratio_bps(product: &Product, month: u32) -> Option<i64> {
    let threshold = seasonal_threshold(product, month);
    if threshold <= 0 {
        return None;
    }
    Some(stock_ratio_bps(product.stock, threshold))
}

/// Buckets a ratio (in basis points) into its severity band.
pub fn severity_for_ratio_bps(ratio_bps: i64) -> StockSeverity {
    if ratio_bps > 7_500 {
        StockSeverity::Normal
    } else if ratio_bps > 5_000 {
        StockSeverity::Warning
    } else if ratio_bps > 2_500 {
        StockSeverity::Low
    } else {
        StockSeverity::Critical
    }
}

// =============================================================================
// Alert Report
// =============================================================================

/// One row of the low-stock alert report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAlert {
    pub product_id: String,
    pub name: String,
    pub stock: i64,
    /// The threshold active for the report month.
    pub threshold: i64,
    pub threshold_winter: i64,
    pub threshold_summer: i64,
    /// Stock-to-threshold ratio in basis points.
    pub ratio_bps: i64,
    pub severity: StockSeverity,
}

impl StockAlert {
    /// Ratio as a display percentage, e.g. 62.5 for 6250 bps.
    #[inline]
    pub fn ratio_percent(&self) -> f64 {
        self.ratio_bps as f64 / 100.0
    }
}

/// Builds the alert report for a month (1-12), most critical first.
///
/// - Products whose active threshold is ≤ 0 are skipped (alerting not
///   configured for them).
/// - Only products at or below [`PRE_ALERT_CUTOFF_BPS`] are included.
/// - Sorted by ratio ascending, so the most starved products lead.
pub fn build_stock_alerts(products: &[Product], month: u32) -> Vec<StockAlert> {
    let mut alerts: Vec<StockAlert> = products
        .iter()
        .filter_map(|product| {
            let ratio_bps = product_ratio_bps(product, month)?;
            if ratio_bps > PRE_ALERT_CUTOFF_BPS {
                return None;
            }

            Some(StockAlert {
                product_id: product.id.clone(),
                name: product.name.clone(),
                stock: product.stock,
                threshold: seasonal_threshold(product, month),
                threshold_winter: product.threshold_winter,
                threshold_summer: product.threshold_summer,
                ratio_bps,
                severity: severity_for_ratio_bps(ratio_bps),
            })
        })
        .collect();

    alerts.sort_by_key(|alert| alert.ratio_bps);
    alerts
}

// =============================================================================
// Unit Tests
// =============================================================================
