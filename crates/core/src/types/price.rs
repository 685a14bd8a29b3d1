//! Type-safe price representation using decimal arithmetic.
//!
//! Shopify sends money as a decimal string plus an ISO 4217 code. [`Price`]
//! parses that pair into a [`Decimal`] so it can be formatted for display
//! without floating point rounding surprises.

use core::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Group separator used by French number formatting (narrow no-break space).
const FR_GROUP_SEPARATOR: char = '\u{202f}';

/// Separator between amount and currency symbol (no-break space).
const FR_SYMBOL_SEPARATOR: char = '\u{a0}';

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is not a decimal number.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// The currency code is not one the storefront sells in.
    #[error("unsupported currency code: {0}")]
    UnknownCurrency(String),
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., euros, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Parse a price from the string pair returned by the Storefront API.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not a decimal or the currency code is
    /// not supported.
    pub fn parse(amount: &str, currency_code: &str) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(amount.trim())
            .map_err(|_| PriceError::InvalidAmount(amount.to_string()))?;
        let currency_code = currency_code.parse()?;
        Ok(Self::new(amount, currency_code))
    }

    /// Format the price the way the French storefront displays it.
    ///
    /// Uses a decimal comma, narrow no-break spaces between thousands and a
    /// trailing currency symbol, e.g. `1 234,50 €`.
    #[must_use]
    pub fn format_fr(&self) -> String {
        let dp = self.currency_code.minor_units();
        let rounded = self
            .amount
            .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
        let digits = format!("{:.*}", dp as usize, rounded.abs());
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), ""));

        let mut out = String::new();
        if rounded.is_sign_negative() && !rounded.is_zero() {
            out.push('-');
        }
        out.push_str(&group_thousands(int_part));
        if !frac_part.is_empty() {
            out.push(',');
            out.push_str(frac_part);
        }
        out.push(FR_SYMBOL_SEPARATOR);
        out.push_str(self.currency_code.fr_symbol());
        out
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_fr())
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(FR_GROUP_SEPARATOR);
        }
        out.push(c);
    }
    out
}

/// ISO 4217 currency codes the storefront sells in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    EUR,
    USD,
    GBP,
    CAD,
    AUD,
    SEK,
    NOK,
    JPY,
    CNY,
}

impl CurrencyCode {
    /// Number of digits after the decimal separator.
    #[must_use]
    pub const fn minor_units(self) -> u32 {
        match self {
            Self::JPY => 0,
            _ => 2,
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::EUR => "EUR",
            Self::USD => "USD",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
            Self::SEK => "SEK",
            Self::NOK => "NOK",
            Self::JPY => "JPY",
            Self::CNY => "CNY",
        }
    }

    /// Symbol used by French-locale formatting.
    #[must_use]
    pub const fn fr_symbol(self) -> &'static str {
        match self {
            Self::EUR => "€",
            Self::USD => "$US",
            Self::GBP => "£GB",
            Self::CAD => "$CA",
            Self::AUD => "$AU",
            other => other.code(),
        }
    }
}

impl FromStr for CurrencyCode {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EUR" => Ok(Self::EUR),
            "USD" => Ok(Self::USD),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            "SEK" => Ok(Self::SEK),
            "NOK" => Ok(Self::NOK),
            "JPY" => Ok(Self::JPY),
            "CNY" => Ok(Self::CNY),
            _ => Err(PriceError::UnknownCurrency(s.to_string())),
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
