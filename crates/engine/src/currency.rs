use serde::{Deserialize, Serialize};

use crate::{EngineError, Money};

/// ISO currency code of a group.
///
/// The engine never converts between currencies: every amount in a group
/// snapshot is assumed to be expressed in the group currency. The currency is
/// only used to render human readable explanations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Inr,
    Eur,
    Usd,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Inr => "INR",
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Currency::Inr => "₹",
            Currency::Eur => "€",
            Currency::Usd => "$",
        }
    }

    /// Number of fraction digits used when formatting amounts.
    #[must_use]
    pub const fn minor_units(self) -> u32 {
        match self {
            Currency::Inr | Currency::Eur | Currency::Usd => 2,
        }
    }

    /// Formats an amount for display, e.g. `₹157.33`.
    #[must_use]
    pub fn format(self, amount: Money) -> String {
        let rounded = amount.round_for_display(self.minor_units()).amount();
        format!(
            "{}{:.prec$}",
            self.symbol(),
            rounded,
            prec = self.minor_units() as usize
        )
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
            "INR" => Ok(Currency::Inr),
            "EUR" => Ok(Currency::Eur),
            "USD" => Ok(Currency::Usd),
            other => Err(EngineError::InvalidCurrency(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}
