//! CRM webhook client.

use crate::error::CrmError;
use gleaner_domain::{Account, CrmStatus, ExtractedData};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default request timeout for webhook calls (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Body of a result submission
#[derive(Debug, Serialize)]
struct Submission<'a> {
    account_id: &'a str,
    data: &'a ExtractedData,
}

/// CRM webhook client
#[derive(Debug, Clone)]
pub struct CrmClient {
    webhook_url: String,
    http: reqwest::Client,
}

impl CrmClient {
    /// Create a client for the given webhook URL
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            http: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }

    /// Webhook URL used for both operations
    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }

    /// Fetch the account list, reporting failures
    ///
    /// The body must be a JSON array. Entries that are not `{id, name}`
    /// objects are skipped.
    pub async fn try_fetch_accounts(&self) -> Result<Vec<Account>, CrmError> {
        let response = self
            .http
            .get(&self.webhook_url)
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        let Value::Array(entries) = body else {
            return Err(CrmError::InvalidResponse(
                "expected an array of accounts".to_string(),
            ));
        };

        let mut accounts = Vec::with_capacity(entries.len());
        for (idx, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<Account>(entry) {
                Ok(account) => accounts.push(account),
                Err(e) => warn!("Skipping account entry {}: {}", idx, e),
            }
        }

        debug!("Fetched {} accounts", accounts.len());
        Ok(accounts)
    }

    /// Fetch the account list
    ///
    /// Any failure leaves the list empty; the cause is logged, never raised.
    pub async fn fetch_accounts(&self) -> Vec<Account> {
        match self.try_fetch_accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                warn!("Failed to fetch accounts: {}", e);
                Vec::new()
            }
        }
    }

    /// Post extracted data for an account
    ///
    /// Any 2xx status counts as accepted; the response body is ignored.
    pub async fn send_result(&self, account_id: &str, data: &ExtractedData) -> Result<(), CrmError> {
        let submission = Submission { account_id, data };

        let response = self
            .http
            .post(&self.webhook_url)
            .json(&submission)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrmError::Status {
                status: status.as_u16(),
            });
        }

        info!("Sent {} fields to account '{}'", data.len(), account_id);
        Ok(())
    }

    /// Post extracted data and collapse the outcome to a status
    pub async fn send(&self, account_id: &str, data: &ExtractedData) -> CrmStatus {
        match self.send_result(account_id, data).await {
            Ok(()) => CrmStatus::Success,
            Err(e) => {
                warn!("Error sending to CRM: {}", e);
                CrmStatus::Error
            }
        }
    }
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!("Failed to configure HTTP client ({}), using defaults", e);
            reqwest::Client::new()
        })
}
