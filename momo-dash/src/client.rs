//! HTTP client for the transactions API

use momo_core::{FilterCriteria, Transaction};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Failure modes of a dashboard fetch.
///
/// `Network` covers requests that could not be issued or whose body could
/// not be read or decoded; `Http` is a non-2xx answer carrying the server's
/// normalized error message.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
}

/// JSON body the API returns on failure
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self { http, base_url })
    }

    /// Fetch the filtered transaction list.
    ///
    /// Record shape beyond field types is not validated here; oddities in
    /// individual records surface downstream as rendering gaps.
    pub async fn fetch_transactions(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<Vec<Transaction>, FetchError> {
        let url = format!("{}/api/transactions", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&criteria.to_query())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(ErrorBody { error: Some(msg) }) if !msg.is_empty() => msg,
                _ => "Unknown error".to_string(),
            };
            return Err(FetchError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let records = response.json::<Vec<Transaction>>().await?;
        tracing::debug!("fetched {} transactions from {url}", records.len());
        Ok(records)
    }
}
