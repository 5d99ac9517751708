//! In-memory workbook model: named sheets holding sparse cell grids

use crate::error::{ReportError, ReportResult};
use crate::types::CellValue;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Zero-based cell position.
///
/// Ordering is row-major (row first, then column), which is the scan order
/// used by the label locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellAddress {
    pub row: u32,
    pub col: u32,
}

impl CellAddress {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Cell immediately to the right, same row
    pub fn right(&self) -> Self {
        Self::new(self.row, self.col + 1)
    }

    /// Parse A1 notation ("B12", "aa3", "$C$4")
    pub fn parse(reference: &str) -> ReportResult<Self> {
        let invalid = || ReportError::InvalidAddress(reference.to_string());
        let cleaned: String = reference.trim().chars().filter(|c| *c != '$').collect();

        let split = cleaned
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (letters, digits) = cleaned.split_at(split);
        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }

        let col = Self::column_letter_to_index(letters).ok_or_else(invalid)?;
        let row: u32 = digits.parse().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }

        Ok(Self::new(row - 1, col))
    }

    /// Convert a column index to letters (0 → A, 25 → Z, 26 → AA)
    pub fn column_index_to_letter(index: u32) -> String {
        let mut result = String::new();
        let mut idx = index;

        loop {
            let remainder = (idx % 26) as u8;
            result.insert(0, (b'A' + remainder) as char);
            if idx < 26 {
                break;
            }
            idx = idx / 26 - 1;
        }

        result
    }

    fn column_letter_to_index(letters: &str) -> Option<u32> {
        let mut index: u32 = 0;
        for c in letters.chars() {
            let digit = (c.to_ascii_uppercase() as u32) - ('A' as u32) + 1;
            index = index.checked_mul(26)?.checked_add(digit)?;
        }
        index.checked_sub(1)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            Self::column_index_to_letter(self.col),
            self.row + 1
        )
    }
}

impl FromStr for CellAddress {
    type Err = ReportError;

    fn from_str(s: &str) -> ReportResult<Self> {
        Self::parse(s)
    }
}

/// Inclusive bounding box of a sheet's occupied cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetRange {
    pub start: CellAddress,
    pub end: CellAddress,
}

impl SheetRange {
    pub fn contains(&self, addr: CellAddress) -> bool {
        (self.start.row..=self.end.row).contains(&addr.row)
            && (self.start.col..=self.end.col).contains(&addr.col)
    }

    fn extend(&mut self, addr: CellAddress) {
        self.start.row = self.start.row.min(addr.row);
        self.start.col = self.start.col.min(addr.col);
        self.end.row = self.end.row.max(addr.row);
        self.end.col = self.end.col.max(addr.col);
    }
}

impl fmt::Display for SheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

/// Sparse grid of cells.
///
/// Cells outside the declared range do not exist; setting a cell grows the
/// range to cover it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    name: String,
    cells: BTreeMap<CellAddress, CellValue>,
    range: Option<SheetRange>,
    decode_error: Option<String>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
            range: None,
            decode_error: None,
        }
    }

    /// Placeholder for a sheet whose contents could not be decoded.
    ///
    /// It keeps its name and position; selecting it for a report fails.
    pub fn unreadable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            decode_error: Some(reason.into()),
            ..Self::new(name)
        }
    }

    pub fn decode_error(&self) -> Option<&str> {
        self.decode_error.as_deref()
    }

    /// Build a sheet from row-major array-of-arrays anchored at A1
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<Option<CellValue>>>) -> Self {
        let mut sheet = Self::new(name);
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                if let Some(value) = value {
                    sheet.set(CellAddress::new(r as u32, c as u32), value);
                }
            }
        }
        sheet
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set(&mut self, addr: CellAddress, value: CellValue) {
        match self.range.as_mut() {
            Some(range) => range.extend(addr),
            None => {
                self.range = Some(SheetRange {
                    start: addr,
                    end: addr,
                })
            }
        }
        self.cells.insert(addr, value);
    }

    /// Widen the declared range without adding cells
    pub fn declare_range(&mut self, range: SheetRange) {
        match self.range.as_mut() {
            Some(current) => {
                current.extend(range.start);
                current.extend(range.end);
            }
            None => self.range = Some(range),
        }
    }

    pub fn cell(&self, addr: CellAddress) -> Option<&CellValue> {
        self.cells.get(&addr)
    }

    /// Look a cell up by A1 reference
    pub fn cell_at(&self, reference: &str) -> ReportResult<Option<&CellValue>> {
        Ok(self.cell(CellAddress::parse(reference)?))
    }

    pub fn range(&self) -> Option<SheetRange> {
        self.range
    }

    /// Occupied cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (CellAddress, &CellValue)> {
        self.cells.iter().map(|(addr, value)| (*addr, value))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-major array-of-arrays relative to the range's top-left corner.
    ///
    /// Index 0 of each row is the first column of the range, not column A.
    pub fn rows(&self) -> Vec<Vec<Option<CellValue>>> {
        let Some(range) = self.range else {
            return Vec::new();
        };
        let width = (range.end.col - range.start.col + 1) as usize;
        let height = (range.end.row - range.start.row + 1) as usize;

        let mut rows = vec![vec![None; width]; height];
        for (addr, value) in &self.cells {
            let r = (addr.row - range.start.row) as usize;
            let c = (addr.col - range.start.col) as usize;
            rows[r][c] = Some(value.clone());
        }
        rows
    }
}

/// Ordered collection of named sheets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    name: String,
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sheets: Vec::new(),
        }
    }

    pub fn with_sheet(mut self, sheet: Sheet) -> Self {
        self.add_sheet(sheet);
        self
    }

    /// Name of the source document (usually its file name)
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_sheet(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(Sheet::name).collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_at(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    /// First sheet, or `MissingSheet` for a workbook without sheets
    pub fn first_sheet(&self) -> ReportResult<&Sheet> {
        let sheet = self.sheets.first().ok_or_else(|| {
            ReportError::MissingSheet(format!("{}: no sheets in workbook", self.name))
        })?;
        self.readable(sheet)
    }

    /// Sheet by name, or `MissingSheet`
    pub fn require_sheet(&self, name: &str) -> ReportResult<&Sheet> {
        let sheet = self
            .sheet(name)
            .ok_or_else(|| ReportError::MissingSheet(format!("{}: '{}'", self.name, name)))?;
        self.readable(sheet)
    }

    fn readable<'s>(&self, sheet: &'s Sheet) -> ReportResult<&'s Sheet> {
        match sheet.decode_error() {
            Some(reason) => Err(ReportError::MalformedDocument {
                name: self.name.clone(),
                reason: format!("sheet '{}': {}", sheet.name(), reason),
            }),
            None => Ok(sheet),
        }
    }
}
