//! Conversion screen state and its transitions
//!
//! An attempt moves `Idle -> Loading -> (Success | Failure) -> Idle`. Every
//! attempt is tagged with an id and the selection epoch it started under, so a
//! response that arrives after the user changed currencies is dropped instead
//! of overwriting newer state.

use crate::core::convert::{convert, format_amount, parse_amount};
use crate::core::currency::RateTable;
use crate::core::error::{ConversionError, Result};
use rust_decimal::Decimal;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    /// Amount exactly as the user typed it (trimmed).
    pub amount: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub request: ConversionRequest,
    pub rate: Decimal,
    pub converted_amount: Decimal,
}

impl ConversionResult {
    /// `"<amount> <FROM> = <converted> <TO>"`
    pub fn summary(&self) -> String {
        format!(
            "{} {} = {} {}",
            self.request.amount,
            self.request.from,
            format_amount(self.converted_amount),
            self.request.to
        )
    }
}

/// Ticket for one in-flight attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub id: u64,
    pub epoch: u64,
    pub request: ConversionRequest,
    amount: Decimal,
}

#[derive(Debug)]
pub enum AttemptOutcome {
    Converted(ConversionResult),
    Failed(ConversionError),
    /// The response belonged to an attempt that is no longer current.
    Discarded,
}

/// Read-only copy of the state handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterView {
    pub amount: String,
    pub from: String,
    pub to: String,
    pub busy: bool,
    pub can_convert: bool,
    pub result: Option<ConversionResult>,
    pub alert: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ConverterState {
    amount: String,
    from: String,
    to: String,
    in_flight: Option<u64>,
    next_attempt: u64,
    epoch: u64,
    result: Option<ConversionResult>,
    alert: Option<String>,
}

impl ConverterState {
    pub fn new(from: &str, to: &str) -> Self {
        ConverterState {
            amount: String::new(),
            from: from.to_string(),
            to: to.to_string(),
            in_flight: None,
            next_attempt: 1,
            epoch: 0,
            result: None,
            alert: None,
        }
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn result(&self) -> Option<&ConversionResult> {
        self.result.as_ref()
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The trigger is enabled unless the amount is empty or an attempt is running.
    pub fn can_convert(&self) -> bool {
        !self.amount.trim().is_empty() && !self.is_busy()
    }

    pub fn set_amount(&mut self, amount: &str) {
        self.amount = amount.to_string();
    }

    /// Overwrites the source currency. The displayed result is kept.
    pub fn select_from(&mut self, code: &str) {
        if self.from != code {
            self.from = code.to_string();
            self.epoch += 1;
        }
    }

    /// Overwrites the target currency. The displayed result is kept.
    pub fn select_to(&mut self, code: &str) {
        if self.to != code {
            self.to = code.to_string();
            self.epoch += 1;
        }
    }

    /// Exchanges source and target and clears the displayed result.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
        self.result = None;
        self.epoch += 1;
    }

    /// Enters `Loading`. Refused while busy or when the amount does not parse;
    /// a parse failure is surfaced as an alert like any other failed attempt.
    pub fn begin_attempt(&mut self) -> Result<Attempt> {
        if self.is_busy() {
            return Err(ConversionError::Busy);
        }
        let amount = match parse_amount(&self.amount) {
            Ok(amount) => amount,
            Err(ConversionError::EmptyAmount) => return Err(ConversionError::EmptyAmount),
            Err(e) => {
                self.alert = Some(e.alert_message());
                return Err(e);
            }
        };

        let id = self.next_attempt;
        self.next_attempt += 1;
        self.in_flight = Some(id);
        self.alert = None;

        let attempt = Attempt {
            id,
            epoch: self.epoch,
            request: ConversionRequest {
                amount: self.amount.trim().to_string(),
                from: self.from.clone(),
                to: self.to.clone(),
            },
            amount,
        };
        debug!(attempt = id, request = ?attempt.request, "Attempt started");
        Ok(attempt)
    }

    /// Leaves `Loading`. The busy flag is released on every path for the
    /// in-flight attempt; stale responses change nothing else.
    pub fn complete_attempt(
        &mut self,
        attempt: &Attempt,
        fetched: anyhow::Result<RateTable>,
    ) -> AttemptOutcome {
        if self.in_flight != Some(attempt.id) {
            debug!(attempt = attempt.id, "Dropping response of superseded attempt");
            return AttemptOutcome::Discarded;
        }
        self.in_flight = None;

        if attempt.epoch != self.epoch {
            debug!(
                attempt = attempt.id,
                "Dropping response, currencies changed while loading"
            );
            return AttemptOutcome::Discarded;
        }

        let outcome = fetched
            .map_err(ConversionError::Provider)
            .and_then(|table| table.rate_for(&attempt.request.to))
            .and_then(|rate| {
                Ok(ConversionResult {
                    request: attempt.request.clone(),
                    rate,
                    converted_amount: convert(attempt.amount, rate)?,
                })
            });

        match outcome {
            Ok(result) => {
                self.result = Some(result.clone());
                AttemptOutcome::Converted(result)
            }
            Err(e) => {
                self.alert = Some(e.alert_message());
                AttemptOutcome::Failed(e)
            }
        }
    }

    pub fn view(&self) -> ConverterView {
        ConverterView {
            amount: self.amount.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            busy: self.is_busy(),
            can_convert: self.can_convert(),
            result: self.result.clone(),
            alert: self.alert.clone(),
        }
    }
}
