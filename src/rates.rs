//! Passes through currency exchange rates from an upstream rates service.

use std::{collections::BTreeMap, time::Duration};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, Error};

/// The rates service used when none is configured, quoting rates against USD.
pub const DEFAULT_RATES_URL: &str = "https://api.frankfurter.app/latest?from=USD";

const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Exchange rates relative to a single base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRates {
    /// The amount of the base currency that the rates are quoted for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// The currency code the rates are relative to, e.g. "USD".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// The date the rates were published.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Currency code to rate.
    pub rates: BTreeMap<String, f64>,
}

/// The state needed to fetch exchange rates.
#[derive(Debug, Clone)]
pub struct RatesState {
    /// The HTTP client for talking to the rates service.
    pub client: reqwest::Client,
    /// The URL that responds with [ExchangeRates].
    pub url: String,
}

impl RatesState {
    /// Create the state for fetching rates from `url`.
    ///
    /// # Errors
    /// Returns an [Error::Upstream] if the HTTP client cannot be built.
    pub fn new(url: &str) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .map_err(|error| Error::Upstream(format!("could not build HTTP client: {error}")))?;

        Ok(Self {
            client,
            url: url.to_owned(),
        })
    }
}

impl FromRef<AppState> for RatesState {
    fn from_ref(state: &AppState) -> Self {
        state.rates.clone()
    }
}

/// Fetch the latest rates from the rates service.
///
/// # Errors
/// Returns an [Error::Upstream] if the request fails, the service responds
/// with an error status, or the response is not an [ExchangeRates] payload.
pub async fn fetch_rates(state: &RatesState) -> Result<ExchangeRates, Error> {
    let response = state
        .client
        .get(&state.url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|error| Error::Upstream(error.to_string()))?;

    response
        .json::<ExchangeRates>()
        .await
        .map_err(|error| Error::Upstream(format!("invalid rates payload: {error}")))
}

/// A route handler that responds with the latest exchange rates.
pub async fn get_rates_endpoint(State(state): State<RatesState>) -> Response {
    match fetch_rates(&state).await {
        Ok(rates) => Json(rates).into_response(),
        Err(error) => error.into_response_with("Failed to fetch rates"),
    }
}
