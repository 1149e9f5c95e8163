//! Currency table and exchange rate abstractions

use crate::core::error::ConversionError;
use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub label: String,
    pub symbol: String,
}

impl Currency {
    fn new(code: &str, label: &str, symbol: &str) -> Self {
        Currency {
            code: code.to_string(),
            label: label.to_string(),
            symbol: symbol.to_string(),
        }
    }
}

/// Ordered, read-only list of the currencies a user can pick from.
#[derive(Debug, Clone)]
pub struct CurrencyTable {
    currencies: Vec<Currency>,
}

impl CurrencyTable {
    /// Builds a table, rejecting empty lists, malformed codes and duplicates.
    pub fn new(currencies: Vec<Currency>) -> Result<Self> {
        if currencies.is_empty() {
            bail!("Currency table must contain at least one currency");
        }

        let mut seen = HashSet::new();
        for currency in &currencies {
            let code = &currency.code;
            if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
                bail!("Invalid currency code: {code:?}");
            }
            if !seen.insert(code.as_str()) {
                bail!("Duplicate currency code: {code}");
            }
        }

        Ok(CurrencyTable { currencies })
    }

    pub fn builtin() -> Self {
        CurrencyTable {
            currencies: vec![
                Currency::new("USD", "US Dollar", "$"),
                Currency::new("EUR", "Euro", "€"),
                Currency::new("BRL", "Brazilian Real", "R$"),
                Currency::new("GBP", "British Pound", "£"),
                Currency::new("JPY", "Japanese Yen", "¥"),
                Currency::new("ARS", "Argentine Peso", "$"),
                Currency::new("CAD", "Canadian Dollar", "C$"),
                Currency::new("AUD", "Australian Dollar", "A$"),
                Currency::new("CHF", "Swiss Franc", "CHF"),
                Currency::new("CNY", "Chinese Yuan", "¥"),
            ],
        }
    }

    /// Case-insensitive lookup returning the canonical record.
    pub fn get(&self, code: &str) -> Option<&Currency> {
        let code = code.trim();
        self.currencies
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }

    pub fn resolve(&self, code: &str) -> Result<&Currency> {
        self.get(code)
            .ok_or_else(|| anyhow!("Unsupported currency: {}", code.trim()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Currency> {
        self.currencies.iter()
    }

}

impl Default for CurrencyTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Rates quoted against a single base currency.
#[derive(Debug, Clone)]
pub struct RateTable {
    pub base: String,
    pub date: Option<NaiveDate>,
    pub rates: HashMap<String, f64>,
}

impl RateTable {
    /// Rate for `code`, converted through its shortest decimal form so that
    /// a quoted `5.03` is exactly `5.03`. A quoted rate that is not a positive
    /// decimal is a bad payload, not a missing rate.
    pub fn rate_for(&self, code: &str) -> std::result::Result<Decimal, ConversionError> {
        let rate = self
            .rates
            .get(code)
            .ok_or_else(|| ConversionError::MissingRate {
                base: self.base.clone(),
                target: code.to_string(),
            })?;

        let unusable = || {
            ConversionError::Provider(anyhow!(
                "Unusable rate {:?} for {} in {} rate table",
                rate,
                code,
                self.base
            ))
        };
        if !rate.is_finite() {
            return Err(unusable());
        }
        let rate = Decimal::from_str(&rate.to_string()).map_err(|_| unusable())?;
        if rate <= Decimal::ZERO {
            return Err(unusable());
        }
        Ok(rate)
    }
}

#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    async fn fetch_rates(&self, base: &str) -> Result<RateTable>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_builtin_table_is_valid() {
        let builtin = CurrencyTable::builtin();
        let rebuilt = CurrencyTable::new(builtin.iter().cloned().collect());
        assert!(rebuilt.is_ok());
        assert_eq!(builtin.iter().next().unwrap().code, "USD");
        assert!(builtin.get("BRL").is_some());
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = CurrencyTable::builtin();
        let brl = table.get(" brl ").expect("BRL should be present");
        assert_eq!(brl.code, "BRL");
        assert_eq!(brl.symbol, "R$");
        assert!(table.get("XYZ").is_none());
        assert_eq!(
            table.resolve("xyz").unwrap_err().to_string(),
            "Unsupported currency: xyz"
        );
    }

    #[test]
    fn test_table_rejects_duplicates_and_bad_codes() {
        let dup = CurrencyTable::new(vec![
            Currency::new("USD", "US Dollar", "$"),
            Currency::new("USD", "Another Dollar", "$"),
        ]);
        assert_eq!(
            dup.unwrap_err().to_string(),
            "Duplicate currency code: USD"
        );

        let bad = CurrencyTable::new(vec![Currency::new("usd", "US Dollar", "$")]);
        assert!(bad.unwrap_err().to_string().contains("Invalid currency code"));

        let empty = CurrencyTable::new(vec![]);
        assert!(empty.is_err());
    }

    fn usd_table() -> RateTable {
        RateTable {
            base: "USD".to_string(),
            date: None,
            rates: HashMap::from([
                ("BRL".to_string(), 5.03),
                ("JPY".to_string(), 149.0),
                ("NAN".to_string(), f64::NAN),
                ("BIG".to_string(), 1e300),
                ("NEG".to_string(), -1.5),
                ("ZRO".to_string(), 0.0),
            ]),
        }
    }

    #[test]
    fn test_rate_for_keeps_quoted_precision() {
        let table = usd_table();
        assert_eq!(table.rate_for("BRL").unwrap(), d("5.03"));
        assert_eq!(table.rate_for("JPY").unwrap(), d("149"));
    }

    #[test]
    fn test_rate_for_absent_code_is_missing_rate() {
        assert!(matches!(
            usd_table().rate_for("EUR"),
            Err(ConversionError::MissingRate { base, target }) if base == "USD" && target == "EUR"
        ));
    }

    #[test]
    fn test_rate_for_unusable_values_are_provider_errors() {
        let table = usd_table();
        for code in ["NAN", "BIG", "NEG", "ZRO"] {
            match table.rate_for(code) {
                Err(ConversionError::Provider(e)) => {
                    assert!(e.to_string().starts_with("Unusable rate"), "{code}: {e}")
                }
                other => panic!("Expected provider error for {code}, got {other:?}"),
            }
        }
    }
}
