//! Fare amounts must use their currency's number of fraction digits.

use crate::core::{NoticeContainer, NoticeKind, RecordRule, Severity};
use crate::error::RuleFault;
use crate::gtfs::{FareProductRecord, FARE_PRODUCTS_FILE};
use crate::table::Record;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// ISO 4217 minor units for the currencies GTFS feeds use in practice.
static CURRENCY_MINOR_UNITS: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    [
        ("AED", 2),
        ("ARS", 2),
        ("AUD", 2),
        ("BHD", 3),
        ("BRL", 2),
        ("CAD", 2),
        ("CHF", 2),
        ("CLP", 0),
        ("CNY", 2),
        ("COP", 2),
        ("CZK", 2),
        ("DKK", 2),
        ("EUR", 2),
        ("GBP", 2),
        ("HKD", 2),
        ("HUF", 2),
        ("IDR", 2),
        ("ILS", 2),
        ("INR", 2),
        ("ISK", 0),
        ("JOD", 3),
        ("JPY", 0),
        ("KRW", 0),
        ("KWD", 3),
        ("MXN", 2),
        ("MYR", 2),
        ("NOK", 2),
        ("NZD", 2),
        ("OMR", 3),
        ("PEN", 2),
        ("PHP", 2),
        ("PLN", 2),
        ("RON", 2),
        ("SAR", 2),
        ("SEK", 2),
        ("SGD", 2),
        ("THB", 2),
        ("TND", 3),
        ("TRY", 2),
        ("TWD", 2),
        ("UAH", 2),
        ("USD", 2),
        ("VND", 0),
        ("ZAR", 2),
    ]
    .into_iter()
    .collect()
});

/// Minor units of an ISO 4217 currency code, if known.
pub fn currency_minor_units(currency: &str) -> Option<u32> {
    CURRENCY_MINOR_UNITS.get(currency).copied()
}

/// An amount is written with more or fewer decimals than its currency uses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidCurrencyAmount {
    pub filename: &'static str,
    pub csv_row_number: u64,
    pub field_name: &'static str,
    pub amount: String,
    pub currency_code: String,
}

impl NoticeKind for InvalidCurrencyAmount {
    const CODE: &'static str = "invalid_currency_amount";
    const SEVERITY: Severity = Severity::Error;
}

/// Compares the written scale of `fare_products.amount` with the minor units
/// of `fare_products.currency`.
///
/// Rows without an amount or currency, and rows in a currency the table does
/// not know, are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct FareProductAmountRule;

impl RecordRule for FareProductAmountRule {
    type Record = FareProductRecord;

    fn name(&self) -> &str {
        "fare_product_amount"
    }

    fn validate(
        &self,
        record: &FareProductRecord,
        notices: &mut NoticeContainer,
    ) -> Result<(), RuleFault> {
        let (Some(amount), Some(currency)) = (&record.amount, &record.currency) else {
            return Ok(());
        };
        let Some(minor_units) = currency_minor_units(currency) else {
            return Ok(());
        };
        if amount.scale() != minor_units {
            notices.push(InvalidCurrencyAmount {
                filename: FARE_PRODUCTS_FILE,
                csv_row_number: record.csv_row_number(),
                field_name: "amount",
                amount: amount.as_str().to_string(),
                currency_code: currency.clone(),
            });
        }
        Ok(())
    }
}
