//! Drives conversion attempts against a shared [`ConverterState`].

use crate::core::currency::{CurrencyTable, ExchangeRateProvider};
use crate::core::error::{ConversionError, Result};
use crate::core::notify::{Notification, NotificationSink, PermissionStatus};
use crate::core::state::{AttemptOutcome, ConversionResult, ConverterState, ConverterView};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

pub const PERMISSION_DENIED_WARNING: &str = "Notification permission denied!";

/// Owns the conversion state. Clones share the same state, so a conversion
/// can run in a spawned task while selections keep arriving.
#[derive(Clone)]
pub struct ConversionController {
    state: Arc<Mutex<ConverterState>>,
    currencies: Arc<CurrencyTable>,
    provider: Arc<dyn ExchangeRateProvider>,
    notifier: Arc<dyn NotificationSink>,
    notifications_allowed: Arc<AtomicBool>,
}

impl ConversionController {
    pub fn new(
        currencies: Arc<CurrencyTable>,
        provider: Arc<dyn ExchangeRateProvider>,
        notifier: Arc<dyn NotificationSink>,
        from: &str,
        to: &str,
    ) -> anyhow::Result<Self> {
        let from = currencies.resolve(from)?.code.clone();
        let to = currencies.resolve(to)?.code.clone();

        Ok(ConversionController {
            state: Arc::new(Mutex::new(ConverterState::new(&from, &to))),
            currencies,
            provider,
            notifier,
            notifications_allowed: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Asks the notification sink for permission once. Returns a warning to
    /// show the user when notifications will be suppressed.
    pub async fn start(&self) -> Option<String> {
        let status = match self.notifier.request_permission().await {
            Ok(status) => status,
            Err(e) => {
                warn!(error = %e, "Notification permission request failed");
                PermissionStatus::Denied
            }
        };

        let granted = status == PermissionStatus::Granted;
        self.notifications_allowed.store(granted, Ordering::SeqCst);
        info!(?status, "Notification permission resolved");

        (!granted).then(|| PERMISSION_DENIED_WARNING.to_string())
    }

    pub fn currencies(&self) -> &CurrencyTable {
        &self.currencies
    }

    pub async fn set_amount(&self, amount: &str) {
        self.state.lock().await.set_amount(amount);
    }

    pub async fn select_from(&self, code: &str) -> Result<()> {
        let code = self.canonical_code(code)?;
        self.state.lock().await.select_from(&code);
        Ok(())
    }

    pub async fn select_to(&self, code: &str) -> Result<()> {
        let code = self.canonical_code(code)?;
        self.state.lock().await.select_to(&code);
        Ok(())
    }

    pub async fn swap(&self) {
        self.state.lock().await.swap();
    }

    pub async fn can_convert(&self) -> bool {
        self.state.lock().await.can_convert()
    }

    pub async fn snapshot(&self) -> ConverterView {
        self.state.lock().await.view()
    }

    /// Runs one attempt. `Ok(None)` means the response arrived after the
    /// currency pair changed and was dropped.
    #[instrument(name = "ConversionAttempt", skip(self))]
    pub async fn convert(&self) -> Result<Option<ConversionResult>> {
        let attempt = self.state.lock().await.begin_attempt()?;

        let fetched = self.provider.fetch_rates(&attempt.request.from).await;
        if let Err(e) = &fetched {
            warn!(error = %e, base = %attempt.request.from, "Fetching rates failed");
        }

        let outcome = self.state.lock().await.complete_attempt(&attempt, fetched);
        match outcome {
            AttemptOutcome::Converted(result) => {
                debug!(summary = %result.summary(), "Conversion succeeded");
                self.emit(&result).await;
                Ok(Some(result))
            }
            AttemptOutcome::Failed(e) => {
                warn!(error = %e, "Conversion attempt failed");
                Err(e)
            }
            AttemptOutcome::Discarded => Ok(None),
        }
    }

    async fn emit(&self, result: &ConversionResult) {
        if !self.notifications_allowed.load(Ordering::SeqCst) {
            debug!("Notifications not permitted, skipping");
            return;
        }
        let notification = Notification::for_conversion(result);
        if let Err(e) = self.notifier.notify(&notification).await {
            warn!(error = %e, "Failed to emit notification");
        }
    }

    fn canonical_code(&self, code: &str) -> Result<String> {
        self.currencies
            .get(code)
            .map(|c| c.code.clone())
            .ok_or_else(|| ConversionError::UnknownCurrency(code.trim().to_string()))
    }
}
