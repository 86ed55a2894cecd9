//! `fare_products.txt` rows.

use super::types::GtfsDecimal;
use crate::table::{Record, TableId};

/// A purchasable fare product.
#[derive(Debug, Clone, PartialEq)]
pub struct FareProductRecord {
    csv_row_number: u64,
    /// Identifies the fare product.
    pub fare_product_id: String,
    /// Cost of the product.
    pub amount: Option<GtfsDecimal>,
    /// ISO 4217 currency code of `amount`.
    pub currency: Option<String>,
}

impl FareProductRecord {
    /// Creates a product with no price.
    pub fn new(csv_row_number: u64, fare_product_id: impl Into<String>) -> Self {
        Self {
            csv_row_number,
            fare_product_id: fare_product_id.into(),
            amount: None,
            currency: None,
        }
    }

    /// Sets the price.
    pub fn with_price(mut self, amount: GtfsDecimal, currency: impl Into<String>) -> Self {
        self.amount = Some(amount);
        self.currency = Some(currency.into());
        self
    }

    /// True if `amount` is set.
    pub fn has_amount(&self) -> bool {
        self.amount.is_some()
    }

    /// True if `currency` is set.
    pub fn has_currency(&self) -> bool {
        self.currency.is_some()
    }
}

impl Record for FareProductRecord {
    const TABLE: TableId = TableId::new(super::FARE_PRODUCTS_FILE);
    const INDEXED_FIELDS: &'static [&'static str] = &["fare_product_id"];

    fn csv_row_number(&self) -> u64 {
        self.csv_row_number
    }

    fn index_key(&self, field: &str) -> Option<&str> {
        match field {
            "fare_product_id" => Some(&self.fare_product_id),
            _ => None,
        }
    }
}
