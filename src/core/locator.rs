//! Label lookup inside loosely structured sheets

use crate::core::dates::format_serial_date;
use crate::excel::{CellAddress, Sheet};
use crate::types::CellValue;
use tracing::debug;

/// Finds label cells and reads the value stored beside them
pub struct CellLocator<'a> {
    sheet: &'a Sheet,
}

impl<'a> CellLocator<'a> {
    pub fn new(sheet: &'a Sheet) -> Self {
        Self { sheet }
    }

    /// First cell, in row-major order, whose lower-cased text equals one of
    /// `synonyms`.
    ///
    /// Synonyms are compared lower-cased and untrimmed. Blank cells never
    /// match. `None` is an ordinary outcome, not an error.
    pub fn find_label<S: AsRef<str>>(&self, synonyms: &[S]) -> Option<CellAddress> {
        let wanted: Vec<String> = synonyms.iter().map(|s| s.as_ref().to_lowercase()).collect();
        let range = self.sheet.range()?;

        let found = self
            .sheet
            .cells()
            .filter(|(addr, _)| range.contains(*addr))
            .filter(|(_, value)| !value.is_blank())
            .find(|(_, value)| {
                let text = value.to_string().to_lowercase();
                wanted.iter().any(|w| *w == text)
            });

        match found {
            Some((addr, value)) => {
                debug!(sheet = %self.sheet.name(), %addr, label = %value, "found label");
                Some(addr)
            }
            None => {
                debug!(sheet = %self.sheet.name(), ?wanted, "label not found");
                None
            }
        }
    }

    /// Value of the cell right of `position`; absent or blank neighbours are `None`
    pub fn next_value(&self, position: Option<CellAddress>) -> Option<CellValue> {
        let neighbour = position?.right();
        let value = self.sheet.cell(neighbour).filter(|v| !v.is_blank()).cloned();
        debug!(sheet = %self.sheet.name(), addr = %neighbour, ?value, "next cell value");
        value
    }

    /// Locate a label and read its neighbour in one step
    pub fn value_beside<S: AsRef<str>>(&self, synonyms: &[S]) -> Option<CellValue> {
        self.next_value(self.find_label(synonyms))
    }

    /// Like [`value_beside`](Self::value_beside), rendering numeric serial
    /// dates as `MM/DD/YYYY`. Text passes through unchanged.
    pub fn date_beside<S: AsRef<str>>(&self, synonyms: &[S]) -> Option<CellValue> {
        self.value_beside(synonyms).map(display_date)
    }
}

/// Render a numeric date as `MM/DD/YYYY`; other values are returned as-is
pub fn display_date(value: CellValue) -> CellValue {
    match value.as_f64().and_then(format_serial_date) {
        Some(formatted) => CellValue::Text(formatted),
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch_sheet() -> Sheet {
        Sheet::from_rows(
            "Batch",
            vec![
                vec![Some("Widget Kit".into())],
                vec![Some("Lot Number".into()), Some("L-2024-7".into())],
                vec![Some("DATE".into()), Some(CellValue::Number(45413.0))],
                vec![
                    None,
                    Some("Kit Lot Size".into()),
                    Some(CellValue::Integer(250)),
                ],
                vec![Some("lot #".into()), Some("second".into())],
            ],
        )
    }

    #[test]
    fn test_find_label_case_insensitive() {
        let sheet = batch_sheet();
        let locator = CellLocator::new(&sheet);
        assert_eq!(
            locator.find_label(&["lot #", "lot number"]),
            Some(CellAddress::new(1, 0))
        );
        assert_eq!(
            locator.find_label(&["kit lot size"]),
            Some(CellAddress::new(3, 1))
        );
    }

    #[test]
    fn test_find_label_returns_first_in_row_major_order() {
        let sheet = Sheet::from_rows(
            "Scan",
            vec![
                vec![None, None, Some("Date".into())],
                vec![Some("date".into())],
            ],
        );
        let locator = CellLocator::new(&sheet);
        assert_eq!(locator.find_label(&["date"]), Some(CellAddress::new(0, 2)));
    }

    #[test]
    fn test_find_label_exact_match_only() {
        let sheet = Sheet::from_rows("Scan", vec![vec![Some("Lot #:".into())]]);
        let locator = CellLocator::new(&sheet);
        assert_eq!(locator.find_label(&["lot #"]), None);
    }

    #[test]
    fn test_find_label_matches_numeric_text() {
        let sheet = Sheet::from_rows("Scan", vec![vec![Some(CellValue::Number(42.0))]]);
        let locator = CellLocator::new(&sheet);
        assert_eq!(locator.find_label(&["42"]), Some(CellAddress::new(0, 0)));
    }

    #[test]
    fn test_next_value_reads_right_neighbour() {
        let sheet = batch_sheet();
        let locator = CellLocator::new(&sheet);
        assert_eq!(
            locator.value_beside(&["lot number"]),
            Some(CellValue::from("L-2024-7"))
        );
        assert_eq!(
            locator.value_beside(&["kit lot size"]),
            Some(CellValue::Integer(250))
        );
    }

    #[test]
    fn test_next_value_not_found_propagates() {
        let sheet = batch_sheet();
        let locator = CellLocator::new(&sheet);
        assert_eq!(locator.next_value(None), None);
        assert_eq!(locator.value_beside(&["expiry"]), None);
    }

    #[test]
    fn test_next_value_empty_neighbour() {
        let sheet = Sheet::from_rows(
            "Batch",
            vec![vec![Some("Lot #".into()), Some("".into())]],
        );
        let locator = CellLocator::new(&sheet);
        assert_eq!(locator.value_beside(&["lot #"]), None);
    }

    #[test]
    fn test_date_beside_formats_serial_dates() {
        let sheet = batch_sheet();
        let locator = CellLocator::new(&sheet);
        assert_eq!(
            locator.date_beside(&["date", "manufacture date"]),
            Some(CellValue::from("05/01/2024"))
        );
    }

    #[test]
    fn test_date_beside_passes_text_through() {
        let sheet = Sheet::from_rows(
            "Batch",
            vec![vec![Some("Date".into()), Some("May 1st".into())]],
        );
        let locator = CellLocator::new(&sheet);
        assert_eq!(
            locator.date_beside(&["date"]),
            Some(CellValue::from("May 1st"))
        );
    }
}
