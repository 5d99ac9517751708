//! Product × month quantity matrix for sales logs

use crate::config::SalesOptions;
use crate::core::dates::{parse_date_text, serial_to_date, MonthKey};
use crate::core::products::{ProductExtractor, ProductVocabulary};
use crate::error::ReportResult;
use crate::types::{CellValue, ReportTable};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Quantities for one product
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductRecord {
    by_month: BTreeMap<MonthKey, u64>,
    total: u64,
}

impl ProductRecord {
    fn zeroed(months: &[MonthKey]) -> Self {
        Self {
            by_month: months.iter().map(|m| (*m, 0)).collect(),
            total: 0,
        }
    }

    fn add(&mut self, month: MonthKey, quantity: u64) {
        let slot = self.by_month.entry(month).or_insert(0);
        *slot = slot.saturating_add(quantity);
        self.total = self.total.saturating_add(quantity);
    }

    /// Quantity for `month`; months never seen read as 0
    pub fn quantity(&self, month: &MonthKey) -> u64 {
        self.by_month.get(month).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.total
    }
}

/// Result of aggregating one sales sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyReport {
    /// Distinct months present in the data, chronological
    pub months: Vec<MonthKey>,
    /// Every tracked product, sorted by code
    pub products: BTreeMap<String, ProductRecord>,
}

impl MonthlyReport {
    /// `[Product, month1, ..., Total]` header, one row per product
    pub fn to_table(&self) -> ReportResult<ReportTable> {
        let header = std::iter::once("Product".to_string())
            .chain(self.months.iter().map(MonthKey::label))
            .chain(std::iter::once("Total".to_string()));
        let mut table = ReportTable::new(header);

        for (product, record) in &self.products {
            let mut row = Vec::with_capacity(self.months.len() + 2);
            row.push(CellValue::from(product.as_str()));
            row.extend(self.months.iter().map(|m| CellValue::from(record.quantity(m))));
            row.push(CellValue::from(record.total()));
            table.push_row(row)?;
        }

        Ok(table)
    }
}

/// Buckets purchase quantities by product and month
pub struct MonthlyAggregator<'a> {
    options: &'a SalesOptions,
    extractor: ProductExtractor,
}

impl<'a> MonthlyAggregator<'a> {
    pub fn new(options: &'a SalesOptions) -> Self {
        Self {
            options,
            extractor: ProductExtractor::new(),
        }
    }

    /// Aggregate row-major sheet data.
    ///
    /// With `key` the vocabulary is fixed; without it products are discovered
    /// from every row's purchase text before quantities are summed.
    pub fn aggregate(
        &self,
        rows: &[Vec<Option<CellValue>>],
        key: Option<ProductVocabulary>,
    ) -> MonthlyReport {
        let vocabulary = match key {
            Some(vocabulary) => vocabulary,
            None => self
                .extractor
                .discover(rows.iter().filter_map(|row| self.purchase_text(row))),
        };
        info!(
            products = vocabulary.products().len(),
            keyed = vocabulary.is_keyed(),
            "product vocabulary ready"
        );

        // Rows that carry a usable date, paired with their month
        let dated: Vec<(MonthKey, &Vec<Option<CellValue>>)> = rows
            .iter()
            .filter_map(|row| {
                let date = self.row_date(row)?;
                Some((MonthKey::from_date(date, self.options.month_format), row))
            })
            .collect();

        let months: Vec<MonthKey> = dated
            .iter()
            .map(|(month, _)| *month)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let labels: Vec<String> = months.iter().map(MonthKey::label).collect();
        debug!(?labels, "months identified");

        let mut products: BTreeMap<String, ProductRecord> = vocabulary
            .products()
            .iter()
            .map(|p| (p.clone(), ProductRecord::zeroed(&months)))
            .collect();

        for (month, row) in dated {
            let Some(text) = self.purchase_text(row) else {
                continue;
            };
            for purchase in self.extractor.accepted(text, &vocabulary) {
                if let Some(record) = products.get_mut(&purchase.product) {
                    record.add(month, purchase.quantity);
                }
            }
        }

        MonthlyReport { months, products }
    }

    fn purchase_text<'r>(&self, row: &'r [Option<CellValue>]) -> Option<&'r str> {
        row.get(self.options.purchase_column)?.as_ref()?.as_str()
    }

    /// Calendar date of a row: date text, or a serial number when enabled
    fn row_date(&self, row: &[Option<CellValue>]) -> Option<NaiveDate> {
        match row.get(self.options.date_column)?.as_ref()? {
            CellValue::Text(text) => parse_date_text(text),
            value if self.options.serial_dates => value.as_f64().and_then(serial_to_date),
            _ => None,
        }
    }
}
