use clap::Parser;
use jiff::ToSpan;
use jiff::Zoned;
use jiff::civil::Date;
use log::info;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

pub mod config;
pub mod currency;
pub mod error;
pub mod valet;

pub use config::Config;
pub use currency::{Currency, HOME_CURRENCY, PairKey, SUPPORTED_CURRENCIES};
pub use error::{ConvertError, Result};
pub use valet::{Observation, RateSource, ValetClient};

/// Fractional digits kept for amounts
pub const AMOUNT_SCALE: u32 = 4;

/// Days before the requested date that may stand in for it (weekends, holidays)
const LOOKBACK_DAYS: i64 = 6;

/// Convert an amount to or from CAD using the Bank of Canada daily exchange rate.
///
/// Will use the preceding business day if the selected date has no published rate, and report
/// the date actually used.
#[derive(Parser)]
#[command(version)]
pub struct Cli {
    /// Amount of the source currency
    #[arg(value_name = "AMOUNT", allow_negative_numbers = true)]
    pub amount: String,
    /// Currency to convert from (CAD, USD, EUR, JPY, GBP, AUD, CHF, CNY, HKD, MXN, INR)
    #[arg(value_name = "FROM")]
    pub source: String,
    /// Currency to convert to. One of FROM and TO must be CAD
    #[arg(value_name = "TO")]
    pub target: String,
    /// Exchange date (format: YYYY-MM-DD) [default: today]
    #[arg(value_name = "DATE")]
    pub date: Option<String>,
}

// Values are parsed here rather than by clap so a missing argument is reported before a bad one.
impl Cli {
    /// Validate the arguments, using today's date if none was given.
    pub fn into_request(self) -> Result<ConversionRequest> {
        self.into_request_on(Zoned::now().date())
    }

    pub fn into_request_on(self, today: Date) -> Result<ConversionRequest> {
        let amount = self.amount.trim().parse::<Decimal>().map_err(|e| {
            ConvertError::usage(format!("invalid AMOUNT '{}': {e}", self.amount))
        })?;
        let source = self.source.parse::<Currency>().map_err(ConvertError::Usage)?;
        let target = self.target.parse::<Currency>().map_err(ConvertError::Usage)?;
        let date = match self.date {
            Some(date) => parse_date(&date)?,
            None => today,
        };

        ConversionRequest::new(amount, source, target, date)
    }
}

/// Parse a strict `YYYY-MM-DD` date
fn parse_date(s: &str) -> Result<Date> {
    let invalid = |detail: String| {
        ConvertError::usage(format!("invalid DATE '{s}', expected YYYY-MM-DD: {detail}"))
    };
    let date = Date::strptime("%Y-%m-%d", s).map_err(|e| invalid(e.to_string()))?;
    // strptime tolerates signed and unpadded years
    if date.to_string() != s {
        return Err(invalid(format!("not in canonical form (did you mean {date}?)")));
    }
    Ok(date)
}

/// A validated conversion: exactly one side is CAD.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConversionRequest {
    amount: Decimal,
    source: Currency,
    target: Currency,
    date: Date,
}

impl ConversionRequest {
    pub fn new(amount: Decimal, source: Currency, target: Currency, date: Date) -> Result<Self> {
        if source.is_home() == target.is_home() {
            return Err(ConvertError::usage(format!(
                "cannot convert {source} to {target}: exactly one currency must be {HOME_CURRENCY}"
            )));
        }

        Ok(Self {
            amount: round_amount(amount),
            source,
            target,
            date,
        })
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn source(&self) -> Currency {
        self.source
    }

    pub fn target(&self) -> Currency {
        self.target
    }

    pub fn date(&self) -> Date {
        self.date
    }

    pub fn pair(&self) -> PairKey {
        PairKey::new(self.source, self.target)
    }

    /// Inclusive range of dates whose rate may be used for this request
    pub fn window(&self) -> Result<(Date, Date)> {
        let start = self.date.checked_sub(LOOKBACK_DAYS.days()).map_err(|e| {
            ConvertError::usage(format!("date {} is out of range: {e}", self.date))
        })?;
        Ok((start, self.date))
    }
}

/// Outcome of a conversion. `date` is the date of the rate used, which may precede the one requested.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConversionResult {
    pub amount: Decimal,
    pub from: Currency,
    pub to: Currency,
    pub date: Date,
    pub rate: Decimal,
    pub converted: Decimal,
}

impl ConversionResult {
    /// Render as JSON with 4-space indentation
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut ser)?;
        // serde_json only ever writes valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Convert using the most recent rate published within the week ending on the requested date.
pub fn convert(request: &ConversionRequest, rates: &impl RateSource) -> Result<ConversionResult> {
    let pair = request.pair();
    let (start, end) = request.window()?;

    let observation = rates
        .observations(pair, start, end)?
        .into_iter()
        .next()
        .ok_or(ConvertError::NoObservations { pair, start, end })?;

    let product = request
        .amount
        .checked_mul(observation.rate)
        .ok_or(ConvertError::Overflow {
            amount: request.amount,
            rate: observation.rate,
        })?;

    if observation.date != request.date {
        info!(
            "no FX{pair} rate published on {}, using {}",
            request.date, observation.date
        );
    }

    Ok(ConversionResult {
        amount: request.amount,
        from: request.source,
        to: request.target,
        date: observation.date,
        rate: observation.rate,
        converted: round_amount(product),
    })
}

fn round_amount(amount: Decimal) -> Decimal {
    let mut amount = amount.round_dp(AMOUNT_SCALE);
    amount.rescale(AMOUNT_SCALE);
    amount
}
