//! Report configuration and category dispatch
//!
//! Every report variant is one engine driven by a [`ReportKind`]. Settings
//! come from defaults, an optional YAML file, then command-line overrides.
//!
//! ```yaml
//! sales:
//!   month_format: short
//!   key_has_header: true
//! manufactured:
//!   layout: fixed_cells
//!   fixed_cells:
//!     sheet: Batch Record
//!     lot_number: B2
//!     manufacture_date: B3
//!     lot_size: B4
//!   on_failure: continue
//! ```

use crate::core::dates::MonthFormat;
use crate::error::ReportResult;
use crate::types::Category;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for the monthly sales report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalesOptions {
    pub month_format: MonthFormat,
    /// Also accept numeric serial dates in the date column
    pub serial_dates: bool,
    pub date_column: usize,
    pub purchase_column: usize,
    /// Skip the first row of the key sheet
    pub key_has_header: bool,
}

impl Default for SalesOptions {
    fn default() -> Self {
        Self {
            month_format: MonthFormat::Long,
            serial_dates: false,
            date_column: 0,
            purchase_column: 1,
            key_has_header: false,
        }
    }
}

/// Label synonyms searched by the label-scan batch layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSynonyms {
    pub lot_number: Vec<String>,
    pub manufacture_date: Vec<String>,
    pub lot_size: Vec<String>,
}

impl Default for LabelSynonyms {
    fn default() -> Self {
        let owned = |labels: &[&str]| labels.iter().map(|s| s.to_string()).collect();
        Self {
            lot_number: owned(&["lot #", "lot number"]),
            manufacture_date: owned(&["date", "manufacture date"]),
            lot_size: owned(&["kit lot size", "current lot size", "lot size"]),
        }
    }
}

/// Hardcoded cell positions for the fixed-cell batch layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedCells {
    pub sheet: String,
    pub lot_number: String,
    pub manufacture_date: String,
    pub lot_size: String,
}

impl Default for FixedCells {
    fn default() -> Self {
        Self {
            sheet: "Batch Record".to_string(),
            lot_number: "B2".to_string(),
            manufacture_date: "B3".to_string(),
            lot_size: "B4".to_string(),
        }
    }
}

/// How batch fields are located on a production sheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchLayout {
    /// Search the first sheet for label cells
    #[default]
    LabelScan,
    /// Read fixed addresses from a named sheet
    FixedCells,
}

/// What a multi-file run does when one input fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Report the input as skipped and keep going
    #[default]
    Continue,
    /// Stop and discard everything combined so far
    Abort,
}

/// Settings for the combined manufacturing report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManufacturedOptions {
    pub layout: BatchLayout,
    /// Product name used when cell A1 is empty
    pub fallback_product: String,
    pub labels: LabelSynonyms,
    pub fixed_cells: FixedCells,
    pub on_failure: FailurePolicy,
}

impl Default for ManufacturedOptions {
    fn default() -> Self {
        Self {
            layout: BatchLayout::LabelScan,
            fallback_product: "Unknown Product".to_string(),
            labels: LabelSynonyms::default(),
            fixed_cells: FixedCells::default(),
            on_failure: FailurePolicy::Continue,
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub sales: SalesOptions,
    pub manufactured: ManufacturedOptions,
}

impl ReportConfig {
    /// Load a YAML configuration file; missing keys keep their defaults
    pub fn load(path: &Path) -> ReportResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> ReportResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Pick the engine configuration for a category
    pub fn kind_for(&self, category: Category) -> ReportKind {
        match category {
            Category::Sales => ReportKind::Sales(self.sales.clone()),
            Category::Manufactured => ReportKind::Manufactured(self.manufactured.clone()),
        }
    }
}

/// Engine configuration for one report run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportKind {
    Sales(SalesOptions),
    Manufactured(ManufacturedOptions),
}

impl ReportKind {
    /// Default configuration for a category
    pub fn for_category(category: Category) -> Self {
        ReportConfig::default().kind_for(category)
    }

    pub fn category(&self) -> Category {
        match self {
            ReportKind::Sales(_) => Category::Sales,
            ReportKind::Manufactured(_) => Category::Manufactured,
        }
    }

    /// Name of the generated worksheet
    pub fn sheet_name(&self) -> &'static str {
        match self {
            ReportKind::Sales(_) => "Sales Report",
            ReportKind::Manufactured(_) => "Combined Report",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReportConfig::default();
        assert_eq!(config.sales.month_format, MonthFormat::Long);
        assert_eq!(config.sales.date_column, 0);
        assert_eq!(config.sales.purchase_column, 1);
        assert_eq!(config.manufactured.layout, BatchLayout::LabelScan);
        assert!(config
            .manufactured
            .labels
            .lot_size
            .contains(&"lot size".to_string()));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
sales:
  month_format: short
manufactured:
  layout: fixed_cells
  fixed_cells:
    lot_number: C7
  on_failure: abort
"#;
        let config = ReportConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.sales.month_format, MonthFormat::Short);
        assert_eq!(config.sales.purchase_column, 1);
        assert_eq!(config.manufactured.layout, BatchLayout::FixedCells);
        assert_eq!(config.manufactured.fixed_cells.lot_number, "C7");
        assert_eq!(config.manufactured.fixed_cells.sheet, "Batch Record");
        assert_eq!(config.manufactured.on_failure, FailurePolicy::Abort);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(ReportConfig::from_yaml("  \n").unwrap(), ReportConfig::default());
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let result = ReportConfig::from_yaml("sales:\n  month_format: fortnightly\n");
        assert!(matches!(result, Err(crate::error::ReportError::Config(_))));
    }

    #[test]
    fn test_category_dispatch() {
        let sales = ReportKind::for_category(Category::Sales);
        assert!(matches!(sales, ReportKind::Sales(_)));
        assert_eq!(sales.sheet_name(), "Sales Report");

        let manufactured = ReportKind::for_category(Category::Manufactured);
        assert_eq!(manufactured.category(), Category::Manufactured);
        assert_eq!(manufactured.sheet_name(), "Combined Report");
    }
}
