//! HTTP calls to the transaction API.

use reqwest::{Response, Url};
use serde::{
    Deserialize,
    de::{DeserializeOwned, IgnoredAny},
};

use crate::{
    ExchangeRates, Summary,
    transaction::{Transaction, TransactionFields, TransactionId},
};

/// The errors that may occur when calling the API.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The base URL cannot be used to build request URLs.
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),

    /// The request could not be sent or the response could not be read.
    #[error("could not reach the server: {0}")]
    Network(#[from] reqwest::Error),

    /// The server responded with a non-success status.
    ///
    /// `message` is the server's `error` field, or the status reason if the
    /// body did not have one.
    #[error("{message} ({status})")]
    Api {
        /// The HTTP status code.
        status: u16,
        /// Why the request failed.
        message: String,
    },
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// A client for the transaction REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for the API served at `base_url`, e.g. "http://localhost:5000".
    ///
    /// # Errors
    /// Returns [ClientError::InvalidUrl] if `base_url` is not an absolute
    /// HTTP(S) URL.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|error| ClientError::InvalidUrl(error.to_string()))?;

        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(format!(
                "{base_url} cannot be used as a base URL"
            )));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    /// Fetch all of a user's transactions, newest first.
    pub async fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>, ClientError> {
        let response = self
            .http
            .get(self.url(&["transactions", user_id])?)
            .send()
            .await?;

        parse_response(response).await
    }

    /// Create a transaction and return the stored record.
    pub async fn create_transaction(
        &self,
        fields: &TransactionFields,
    ) -> Result<Transaction, ClientError> {
        let response = self
            .http
            .post(self.url(&["transactions"])?)
            .json(fields)
            .send()
            .await?;

        parse_response(response).await
    }

    /// Overwrite the fields present in `patch` and return the updated record.
    pub async fn update_transaction(
        &self,
        id: TransactionId,
        patch: &TransactionFields,
    ) -> Result<Transaction, ClientError> {
        let response = self
            .http
            .put(self.url(&["transactions", &id.to_string()])?)
            .json(patch)
            .send()
            .await?;

        parse_response(response).await
    }

    /// Delete a transaction.
    pub async fn delete_transaction(&self, id: TransactionId) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&["transactions", &id.to_string()])?)
            .send()
            .await?;

        parse_response::<IgnoredAny>(response).await.map(|_| ())
    }

    /// Fetch the server's totals for a user's transactions.
    pub async fn get_summary(&self, user_id: &str) -> Result<Summary, ClientError> {
        let response = self
            .http
            .get(self.url(&["transactions", user_id, "summary"])?)
            .send()
            .await?;

        parse_response(response).await
    }

    /// Fetch the latest exchange rates.
    pub async fn get_rates(&self) -> Result<ExchangeRates, ClientError> {
        let response = self.http.get(self.url(&["rates"])?).send().await?;

        parse_response(response).await
    }

    /// Append percent-encoded `segments` to the base URL.
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|_| {
                ClientError::InvalidUrl(format!("{} cannot be used as a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }
}

async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.canonical_reason().unwrap_or("Unknown error").to_owned(),
    };

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
