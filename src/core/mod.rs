//! Core conversion logic and abstractions

pub mod config;
pub mod controller;
pub mod convert;
pub mod currency;
pub mod error;
pub mod log;
pub mod notify;
pub mod state;

// Re-export main types for cleaner imports
pub use controller::ConversionController;
pub use currency::{Currency, CurrencyTable, ExchangeRateProvider, RateTable};
pub use error::ConversionError;
pub use notify::{Notification, NotificationSink, PermissionStatus};
pub use state::{ConversionRequest, ConversionResult, ConverterState, ConverterView};
