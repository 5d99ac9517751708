//! Purchase-text parsing: "5 ABC10 3 XYZ-2" → (5, ABC10), (3, XYZ-2)

use crate::excel::Sheet;
use regex::Regex;
use std::collections::BTreeSet;
use tracing::debug;

/// Quantity, whitespace, then a word token optionally joined by hyphens.
/// ASCII classes only.
const PURCHASE_PATTERN: &str = r"([0-9]+)\s+([A-Za-z0-9_]+(?:-[A-Za-z0-9_]+)*)";

/// One accepted purchase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    pub quantity: u64,
    pub product: String,
}

/// Set of product codes a report tracks.
///
/// `Keyed` comes from an external key sheet and filters matches;
/// `Discovered` is built from the purchase text itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductVocabulary {
    Keyed(BTreeSet<String>),
    Discovered(BTreeSet<String>),
}

impl ProductVocabulary {
    /// Read product codes from the first column of a key sheet.
    ///
    /// Values are stringified and trimmed; blanks are skipped.
    pub fn from_key_sheet(sheet: &Sheet, skip_header: bool) -> Self {
        let codes = sheet
            .rows()
            .into_iter()
            .skip(usize::from(skip_header))
            .filter_map(|row| row.into_iter().next().flatten())
            .map(|value| value.to_string().trim().to_string())
            .filter(|code| !code.is_empty())
            .collect();
        ProductVocabulary::Keyed(codes)
    }

    pub fn keyed<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ProductVocabulary::Keyed(codes.into_iter().map(Into::into).collect())
    }

    pub fn products(&self) -> &BTreeSet<String> {
        match self {
            ProductVocabulary::Keyed(codes) | ProductVocabulary::Discovered(codes) => codes,
        }
    }

    pub fn contains(&self, product: &str) -> bool {
        self.products().contains(product)
    }

    pub fn is_keyed(&self) -> bool {
        matches!(self, ProductVocabulary::Keyed(_))
    }
}

/// Matches purchase entries in free text
#[derive(Debug, Clone)]
pub struct ProductExtractor {
    pattern: Regex,
}

impl Default for ProductExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductExtractor {
    pub fn new() -> Self {
        Self {
            // The pattern is a compile-time constant
            pattern: Regex::new(PURCHASE_PATTERN).unwrap(),
        }
    }

    /// Every (quantity, product) pair in `text`, left to right, non-overlapping.
    ///
    /// A quantity that does not fit in `u64` drops that match only.
    pub fn matches<'t>(&'t self, text: &'t str) -> impl Iterator<Item = Purchase> + 't {
        self.pattern.captures_iter(text).filter_map(|caps| {
            let raw_quantity = caps.get(1)?.as_str();
            let product = caps.get(2)?.as_str();
            match raw_quantity.parse::<u64>() {
                Ok(quantity) => Some(Purchase {
                    quantity,
                    product: product.to_string(),
                }),
                Err(_) => {
                    debug!(raw_quantity, product, "skipping malformed quantity");
                    None
                }
            }
        })
    }

    /// Matches whose product belongs to `vocabulary`
    pub fn accepted<'t>(
        &'t self,
        text: &'t str,
        vocabulary: &'t ProductVocabulary,
    ) -> impl Iterator<Item = Purchase> + 't {
        self.matches(text)
            .filter(move |purchase| vocabulary.contains(&purchase.product))
    }

    /// Build a discovered vocabulary from every purchase text
    pub fn discover<'t, I>(&self, texts: I) -> ProductVocabulary
    where
        I: IntoIterator<Item = &'t str>,
    {
        let mut codes = BTreeSet::new();
        for text in texts {
            for purchase in self.matches(text) {
                if codes.insert(purchase.product.clone()) {
                    debug!(product = %purchase.product, "identified product");
                }
            }
        }
        ProductVocabulary::Discovered(codes)
    }
}
