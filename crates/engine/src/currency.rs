use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Currency used to display amounts.
///
/// The backend stores bare decimals, so this only drives formatting: symbol,
/// placement and separators. No conversion ever happens.
///
/// ## Minor units
///
/// Amounts are held as an `i64` number of **minor units** (see `MoneyCents`).
/// Every supported currency uses 2 fraction digits, so `10.50` ⇄ `1050`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Brl,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Brl => "BRL",
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Brl => "R$",
        }
    }

    /// Thousands and decimal separators.
    pub(crate) const fn separators(self) -> (char, char) {
        match self {
            Currency::Usd => (',', '.'),
            Currency::Eur | Currency::Brl => ('.', ','),
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "BRL" => Ok(Currency::Brl),
            other => Err(EngineError::UnsupportedCurrency(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!(Currency::try_from("usd").unwrap(), Currency::Usd);
        assert_eq!(Currency::try_from(" BRL ").unwrap(), Currency::Brl);
        assert!(Currency::try_from("GBP").is_err());
    }
}
