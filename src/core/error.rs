use thiserror::Error;

/// Ways a single conversion attempt can fail.
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Amount is empty")]
    EmptyAmount,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Converted amount does not fit in a decimal")]
    AmountTooLarge,

    #[error("A conversion is already in progress")]
    Busy,

    #[error("Unsupported currency: {0}")]
    UnknownCurrency(String),

    #[error("Rate provider failed: {0}")]
    Provider(#[source] anyhow::Error),

    #[error("No rate for {target} in {base} rate table")]
    MissingRate { base: String, target: String },
}

impl ConversionError {
    /// Message shown to the user. Provider detail stays in the logs.
    pub fn alert_message(&self) -> String {
        match self {
            ConversionError::EmptyAmount => "Enter an amount to convert.".to_string(),
            ConversionError::InvalidAmount(_) => "Enter a valid, non-negative amount.".to_string(),
            ConversionError::AmountTooLarge => "Amount is too large to convert.".to_string(),
            ConversionError::Busy => "A conversion is already in progress.".to_string(),
            ConversionError::UnknownCurrency(code) => format!("Currency {code} is not supported."),
            ConversionError::Provider(_) => {
                "Could not fetch exchange rates. Please try again.".to_string()
            }
            ConversionError::MissingRate { base, target } => {
                format!("No exchange rate available from {base} to {target}.")
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ConversionError>;
