//! Bank of Canada Valet API client.
//!
//! Only the `observations` endpoint is used. Each series is addressed by an ordered currency pair
//! (`FXUSDCAD`), and every observation carries its value under a field of the same name.

use std::cmp::Reverse;
use std::collections::HashMap;

use jiff::civil::Date;
use log::debug;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use ureq::Agent;

use crate::config::Config;
use crate::currency::PairKey;
use crate::error::{ConvertError, Result};

/// Anything that can list daily rate observations for a currency pair.
pub trait RateSource {
    /// Observations for `pair` within `start..=end`, newest first.
    fn observations(&self, pair: PairKey, start: Date, end: Date) -> Result<Vec<Observation>>;
}

pub struct ValetClient {
    agent: Agent,
    base_url: String,
}

impl ValetClient {
    pub fn new(config: &Config) -> Self {
        let agent_config = Agent::config_builder()
            // Valet explains failures in a JSON body, so read it instead of bailing on the status
            .http_status_as_error(false)
            .timeout_global(config.timeout)
            .build();

        Self {
            agent: Agent::new_with_config(agent_config),
            base_url: config.base_url.clone(),
        }
    }

    fn series_url(&self, pair: PairKey) -> String {
        format!("{}/observations/{}/json", self.base_url, pair.series())
    }
}

impl RateSource for ValetClient {
    fn observations(&self, pair: PairKey, start: Date, end: Date) -> Result<Vec<Observation>> {
        let url = self.series_url(pair);
        debug!("GET {url} ({start} to {end})");

        let mut resp = self
            .agent
            .get(&url)
            .query("start_date", start.to_string())
            .query("end_date", end.to_string())
            .query("order_dir", "desc")
            .call()?;

        let status = resp.status();
        let body = resp.body_mut().read_to_string()?;
        if !status.is_success() {
            return Err(ConvertError::Service {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let observations = serde_json::from_str::<ObservationsResponse>(&body)?.rates(pair)?;
        debug!("received {} FX{pair} observations", observations.len());
        Ok(observations)
    }
}

/// Pull the human-readable message out of a Valet error body, or show the body as-is
fn error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("message") {
            Some(Value::String(message)) => message.clone(),
            _ => serde_json::to_string_pretty(&map).unwrap_or_else(|_| body.to_string()),
        },
        _ => body.trim().to_string(),
    }
}

#[derive(Deserialize)]
pub struct ObservationsResponse {
    #[serde(default)]
    observations: Vec<RawObservation>,
}

impl ObservationsResponse {
    /// Extract the rate for `pair` from every observation, newest first.
    pub fn rates(self, pair: PairKey) -> Result<Vec<Observation>> {
        let series = pair.series();
        let mut observations = self
            .observations
            .into_iter()
            .map(|mut raw| -> Result<Observation> {
                let value = raw
                    .series
                    .remove(&series)
                    .ok_or(ConvertError::MissingSeries { pair, date: raw.d })?;
                let fx: Fx = serde_json::from_value(value)?;
                Ok(Observation {
                    date: raw.d,
                    rate: fx.v,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        // order_dir=desc is a request, not a guarantee
        observations.sort_unstable_by_key(|obs| Reverse(obs.date));
        Ok(observations)
    }
}

/// One row of `observations`. The series field name depends on the requested pair.
#[derive(Deserialize)]
struct RawObservation {
    d: Date,
    #[serde(flatten)]
    series: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct Fx {
    /// Value of 1 unit of left currency in right currency
    v: Decimal,
}

/// A published daily rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Observation {
    pub date: Date,
    pub rate: Decimal,
}
