//! Loyalty HTTP client implementation.

use reqwest::Client;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::ClientError;
use crate::types::{
    ApiErrorResponse, BalanceResponse, EarnEvent, EarnResponse, HistoryResponse, RedeemRequest,
    RedeemResponse, SweepResponse,
};

/// Loyalty API client.
///
/// Provides methods for crediting points, checking balances, and redeeming
/// rewards.
#[derive(Debug, Clone)]
pub struct LoyaltyClient {
    client: Client,
    base_url: String,
    api_key: String,
    service_name: String,
}

impl LoyaltyClient {
    /// Create a new loyalty client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the loyalty service (e.g., `"http://loyalty:8080"`)
    /// * `api_key` - Service API key for authentication
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_options(base_url, api_key, ClientOptions::default())
    }

    /// Create a new loyalty client with custom options.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn with_options(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        options: ClientOptions,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            service_name: options.service_name,
        }
    }

    /// Credit points to a member for an activity.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn earn_points(&self, event: EarnEvent) -> Result<EarnResponse, ClientError> {
        let url = format!("{}/v1/points/earn", self.base_url);

        tracing::debug!(
            member_id = %event.member_id,
            points = %event.points,
            source = ?event.source,
            "Reporting earn event"
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("x-service-name", &self.service_name)
            .json(&event)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get a member's current point balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn get_balance(&self, member_id: &str) -> Result<BalanceResponse, ClientError> {
        let url = format!("{}/v1/points/balance", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("x-member-id", member_id)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List a member's transaction history, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn get_history(
        &self,
        member_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<HistoryResponse, ClientError> {
        let url = format!("{}/v1/points/transactions", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("x-member-id", member_id)
            .query(&[("limit", limit), ("offset", offset)])
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Redeem a catalog reward on a member's behalf.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InsufficientPoints` when the member cannot
    /// afford the reward, or another error if the request fails.
    pub async fn redeem_reward(
        &self,
        member_id: &str,
        request: RedeemRequest,
    ) -> Result<RedeemResponse, ClientError> {
        let url = format!("{}/v1/rewards/redeem", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("x-member-id", member_id)
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Trigger an expiration sweep (requires the admin key, not the
    /// service API key).
    ///
    /// This method is typically used by ops tooling and backfills, not by
    /// activity services.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn run_expiration_sweep(
        &self,
        admin_key: &str,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<SweepResponse, ClientError> {
        let url = format!("{}/v1/admin/expiration-sweep", self.base_url);

        let mut request = self.client.post(&url).header("x-admin-key", admin_key);
        if let Some(as_of) = as_of {
            request = request.json(&serde_json::json!({ "as_of": as_of }));
        }

        let response = request.send().await?;

        self.handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse error response
        let error_body: Result<ApiErrorResponse, _> = response.json().await;

        match error_body {
            Ok(api_error) => {
                let code = api_error.error.code.as_str();
                let message = api_error.error.message;

                // Map specific error codes to typed errors
                match code {
                    "insufficient_points" => {
                        let balance = detail_i64(api_error.error.details.as_ref(), "balance");
                        let required = detail_i64(api_error.error.details.as_ref(), "required");

                        Err(ClientError::InsufficientPoints { balance, required })
                    }
                    "negative_balance_rejected" => {
                        let balance = detail_i64(api_error.error.details.as_ref(), "balance");
                        let delta = detail_i64(api_error.error.details.as_ref(), "delta");

                        Err(ClientError::NegativeBalanceRejected { balance, delta })
                    }
                    _ => Err(ClientError::Api {
                        code: code.to_string(),
                        message,
                        status: status.as_u16(),
                    }),
                }
            }
            Err(_) => Err(ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            }),
        }
    }
}

fn detail_i64(details: Option<&serde_json::Value>, key: &str) -> i64 {
    details
        .and_then(|d| d.get(key))
        .and_then(serde_json::Value::as_i64)
        .unwrap_or(0)
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
    /// Service name to include in requests.
    pub service_name: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            service_name: "unknown".to_string(),
        }
    }
}

impl ClientOptions {
    /// Create options with a service name.
    #[must_use]
    pub fn with_service_name(name: impl Into<String>) -> Self {
        Self {
            service_name: name.into(),
            ..Self::default()
        }
    }
}
