use jiff::civil::Date;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::currency::PairKey;

/// Failures while converting an amount.
///
/// [`ConvertError::Usage`] is the caller's fault and can be fixed by changing the arguments.
/// Everything else happens after the arguments were accepted, mostly while talking to the Bank of
/// Canada.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("{0}")]
    Usage(String),

    #[error("failure while accessing BoC Valet: {0}")]
    Http(#[from] ureq::Error),

    #[error("BoC Valet responded with {status}: {message}")]
    Service { status: u16, message: String },

    #[error("observation on {date} has no value for series FX{pair}")]
    MissingSeries { pair: PairKey, date: Date },

    #[error("no FX{pair} observations between {start} and {end}")]
    NoObservations { pair: PairKey, start: Date, end: Date },

    #[error("failed to parse exchange data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{amount} x {rate} is too large to represent")]
    Overflow { amount: Decimal, rate: Decimal },
}

impl ConvertError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }

    /// Process exit code: 1 for bad arguments, 2 when the rate lookup itself failed.
    pub fn exit_code(&self) -> u8 {
        if self.is_usage() { 1 } else { 2 }
    }
}

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::ConvertError;
    use crate::currency::{Currency, PairKey};
    use jiff::civil::date;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ConvertError::usage("bad").exit_code(), 1);

        let pair = PairKey::new("USD".parse::<Currency>().unwrap(), Currency::CAD);
        let err = ConvertError::NoObservations {
            pair,
            start: date(2020, 1, 27),
            end: date(2020, 2, 2),
        };
        assert_eq!(err.exit_code(), 2);
        assert_eq!(
            err.to_string(),
            "no FXUSDCAD observations between 2020-01-27 and 2020-02-02"
        );
    }
}
