//! Payment method enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declared method of an out-of-band payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Bank transfer; requires an uploaded receipt image.
    BankTransfer,
    /// Postal money transfer.
    PostalTransfer,
    /// Any other method described in the notes.
    Other,
}

impl PaymentMethod {
    /// Check whether this method requires an uploaded receipt image.
    pub fn requires_receipt(&self) -> bool {
        matches!(self, Self::BankTransfer)
    }

    /// Return the method as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BankTransfer => "bank_transfer",
            Self::PostalTransfer => "postal_transfer",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = lessonhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bank_transfer" => Ok(Self::BankTransfer),
            "postal_transfer" => Ok(Self::PostalTransfer),
            "other" => Ok(Self::Other),
            _ => Err(lessonhub_core::AppError::validation(format!(
                "Invalid payment method: '{s}'. Expected one of: bank_transfer, postal_transfer, other"
            ))),
        }
    }
}
