use crate::error::{ReportError, ReportResult};
use serde::{Deserialize, Serialize};
use std::fmt;

//==============================================================================
// Report Categories
//==============================================================================

/// Report category selected by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Monthly product quantities from a sales transaction log
    Sales,
    /// Lot/date/size rows combined from manufacturing batch sheets
    Manufactured,
}

impl Category {
    pub fn name(&self) -> &'static str {
        match self {
            Category::Sales => "Sales",
            Category::Manufactured => "Manufactured",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//==============================================================================
// Cell Values
//==============================================================================

/// Raw value of a spreadsheet cell.
///
/// Empty cells are not represented; a missing cell is `None` wherever a
/// lookup can miss. Serial dates arrive as `Number`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Integer(i64),
    Boolean(bool),
}

impl CellValue {
    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Empty text, numeric zero and `false` carry no usable value
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Text(s) => s.is_empty(),
            CellValue::Number(n) => *n == 0.0,
            CellValue::Integer(i) => *i == 0,
            CellValue::Boolean(b) => !b,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            // Whole floats print without a fractional part ("5", not "5.0")
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<u64> for CellValue {
    fn from(n: u64) -> Self {
        CellValue::Integer(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

//==============================================================================
// Report Table
//==============================================================================

/// Header row plus data rows, every row as wide as the header
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTable {
    header: Vec<CellValue>,
    rows: Vec<Vec<CellValue>>,
}

impl ReportTable {
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CellValue>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a data row; it must have exactly as many columns as the header
    pub fn push_row(&mut self, row: Vec<CellValue>) -> ReportResult<()> {
        if row.len() != self.header.len() {
            return Err(ReportError::RaggedRow {
                expected: self.header.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn header(&self) -> &[CellValue] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Number of data rows (header excluded)
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header first, then data rows, as the array-of-arrays written to a sheet
    pub fn to_rows(&self) -> Vec<Vec<CellValue>> {
        std::iter::once(self.header.clone())
            .chain(self.rows.iter().cloned())
            .collect()
    }
}

//==============================================================================
// Batch Records
//==============================================================================

/// Fields extracted from one manufacturing sheet.
///
/// Every field stays optional until resolved; `into_row` refuses to build a
/// partially filled row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchRecord {
    pub sheet: String,
    pub product: Option<CellValue>,
    pub manufacture_date: Option<CellValue>,
    pub lot_number: Option<CellValue>,
    pub lot_size: Option<CellValue>,
}

impl BatchRecord {
    /// Names of the required fields that did not resolve
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.lot_number.is_none() {
            missing.push("lot number");
        }
        if self.manufacture_date.is_none() {
            missing.push("manufacture date");
        }
        if self.lot_size.is_none() {
            missing.push("lot size");
        }
        missing
    }

    /// Build the output row `[Product?, Date, Lot #, Number of kits]`
    pub fn into_row(self, with_product: bool) -> ReportResult<Vec<CellValue>> {
        let missing = self.missing_fields();
        match (self.manufacture_date, self.lot_number, self.lot_size) {
            (Some(date), Some(lot), Some(size)) => {
                let mut row = Vec::with_capacity(4);
                if with_product {
                    row.push(self.product.unwrap_or_else(|| "Unknown Product".into()));
                }
                row.extend([date, lot, size]);
                Ok(row)
            }
            _ => Err(ReportError::MissingRequiredCells {
                sheet: self.sheet,
                fields: missing,
            }),
        }
    }
}
