use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Currency every conversion must start or end in.
pub const HOME_CURRENCY: &str = "CAD";

/// Currencies the Bank of Canada publishes daily rates for against CAD.
pub const SUPPORTED_CURRENCIES: [&str; 11] = [
    HOME_CURRENCY,
    "USD",
    "EUR",
    "JPY",
    "GBP",
    "AUD",
    "CHF",
    "CNY",
    "HKD",
    "MXN",
    "INR",
];

/// An ISO 4217 code from [`SUPPORTED_CURRENCIES`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Currency(&'static str);

impl Currency {
    pub const CAD: Currency = Currency(HOME_CURRENCY);

    pub fn code(self) -> &'static str {
        self.0
    }

    pub fn is_home(self) -> bool {
        self == Self::CAD
    }

    pub fn supported() -> impl Iterator<Item = Currency> {
        SUPPORTED_CURRENCIES.into_iter().map(Currency)
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        Self::supported()
            .find(|currency| currency.code() == code)
            .ok_or_else(|| {
                format!(
                    "unsupported currency '{s}', expected one of: {}",
                    SUPPORTED_CURRENCIES.join(", ")
                )
            })
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Ordered currency pair addressing one Valet series. `USDCAD` and `CADUSD` are different series.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PairKey {
    pub source: Currency,
    pub target: Currency,
}

impl PairKey {
    pub fn new(source: Currency, target: Currency) -> Self {
        Self { source, target }
    }

    /// Valet series name, also the observation field holding the rate
    pub fn series(&self) -> String {
        format!("FX{self}")
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.source, self.target)
    }
}
