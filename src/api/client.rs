//! Marketplace API Client
//!
//! A thin reqwest wrapper over the marketplace REST backend. Auth context is
//! injected at construction: the bearer token is an explicit field, never
//! read from ambient storage by request code.

use crate::api::BuddyApi;
use crate::api::error::ApiError;
use crate::consts::cli_consts::api;
use crate::environment::Environment;
use crate::model::{Booking, BuddyProfile, BuddyStats, Conversation, SessionUser};
use reqwest::{Client, ClientBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

// User-Agent string with CLI version
const USER_AGENT: &str = concat!("buddy-dash/", env!("CARGO_PKG_VERSION"));

/// Session payload returned by the login endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    pub user: SessionUser,
}

/// Standard `{ success, data }` envelope for single-record responses.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Envelope<T> {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<T>,
}

/// List responses put the records under `data`, `bookings`, or
/// `conversations` depending on the endpoint.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ListEnvelope<T> {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Vec<T>>,
    #[serde(default)]
    bookings: Option<Vec<T>>,
    #[serde(default)]
    conversations: Option<Vec<T>>,
}

impl<T> Envelope<T> {
    fn into_data(self) -> Result<T, ApiError> {
        if self.success == Some(false) {
            return Err(ApiError::Unknown(
                self.message
                    .unwrap_or_else(|| "request reported failure".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| ApiError::Unknown("response carried no data".to_string()))
    }
}

impl<T> ListEnvelope<T> {
    fn into_items(self) -> Result<Vec<T>, ApiError> {
        if self.success == Some(false) {
            return Err(ApiError::Unknown(
                self.message
                    .unwrap_or_else(|| "request reported failure".to_string()),
            ));
        }
        Ok(self
            .data
            .or(self.bookings)
            .or(self.conversations)
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone)]
pub struct BuddyApiClient {
    client: Client,
    environment: Environment,
    access_token: Option<String>,
}

impl BuddyApiClient {
    pub fn new(environment: Environment, access_token: Option<String>) -> Self {
        Self {
            client: ClientBuilder::new()
                .connect_timeout(api::connect_timeout())
                .timeout(api::request_timeout())
                .build()
                .expect("Failed to create HTTP client"),
            environment,
            access_token,
        }
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.environment.api_url().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    async fn handle_response_status(response: Response) -> Result<Response, ApiError> {
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let url = self.build_url(endpoint);
        let mut request = self.client.get(&url).header("User-Agent", USER_AGENT);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        let response = Self::handle_response_status(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        endpoint: &str,
        body: serde_json::Value,
    ) -> Result<T, ApiError> {
        let url = self.build_url(endpoint);
        let mut request = self
            .client
            .request(method, &url)
            .header("User-Agent", USER_AGENT)
            .json(&body);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        let response = Self::handle_response_status(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Authenticate with email and password.
    ///
    /// This is the only call made without a bearer token; the returned
    /// session is persisted by the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        self.send_json::<Envelope<LoginResponse>>(
            reqwest::Method::POST,
            "/auth/login",
            json!({ "email": email, "password": password }),
        )
        .await?
        .into_data()
    }
}

#[async_trait::async_trait]
impl BuddyApi for BuddyApiClient {
    fn environment(&self) -> &Environment {
        &self.environment
    }

    async fn fetch_profile(&self) -> Result<BuddyProfile, ApiError> {
        self.get_json::<Envelope<BuddyProfile>>("/buddies/my/profile/me")
            .await?
            .into_data()
    }

    async fn fetch_stats(&self) -> Result<BuddyStats, ApiError> {
        self.get_json::<Envelope<BuddyStats>>("/buddies/my/stats")
            .await?
            .into_data()
    }

    async fn fetch_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        let primary = format!(
            "/bookings/my-bookings/buddy?status=confirmed&limit={}",
            api::RECENT_LIMIT
        );
        match self
            .get_json::<ListEnvelope<Booking>>(&primary)
            .await
            .and_then(ListEnvelope::into_items)
        {
            Ok(bookings) => Ok(bookings),
            Err(err) => {
                // Fallback is local to the section: retry without the
                // status filter before reporting anything upstream.
                log::debug!("confirmed bookings fetch failed ({}), retrying unfiltered", err);
                let fallback = format!("/bookings/my-bookings/buddy?limit={}", api::RECENT_LIMIT);
                self.get_json::<ListEnvelope<Booking>>(&fallback)
                    .await
                    .and_then(ListEnvelope::into_items)
            }
        }
    }

    async fn fetch_conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        let primary = format!("/conversations/recent?limit={}", api::RECENT_LIMIT);
        match self
            .get_json::<ListEnvelope<Conversation>>(&primary)
            .await
            .and_then(ListEnvelope::into_items)
        {
            Ok(conversations) => Ok(conversations),
            Err(err) => {
                log::debug!("recent conversations fetch failed ({}), retrying listing", err);
                let fallback = format!("/conversations?limit={}", api::RECENT_LIMIT);
                self.get_json::<ListEnvelope<Conversation>>(&fallback)
                    .await
                    .and_then(ListEnvelope::into_items)
            }
        }
    }

    async fn set_availability(&self, available: bool) -> Result<(), ApiError> {
        let envelope = self
            .send_json::<Envelope<serde_json::Value>>(
                reqwest::Method::PATCH,
                "/buddies/availability",
                json!({ "isAvailable": available }),
            )
            .await?;
        if envelope.success == Some(false) {
            return Err(ApiError::Unknown(
                envelope
                    .message
                    .unwrap_or_else(|| "availability update rejected".to_string()),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_joins_cleanly() {
        let client = BuddyApiClient::new(Environment::Local, None);
        assert_eq!(
            client.build_url("/buddies/my/stats"),
            "http://localhost:5000/api/buddies/my/stats"
        );
        assert_eq!(
            client.build_url("buddies/my/stats"),
            "http://localhost:5000/api/buddies/my/stats"
        );
    }

    #[test]
    fn list_envelope_accepts_alternate_keys() {
        let under_data: ListEnvelope<u32> =
            serde_json::from_str(r#"{ "success": true, "data": [1, 2] }"#).unwrap();
        assert_eq!(under_data.into_items().unwrap(), vec![1, 2]);

        let under_bookings: ListEnvelope<u32> =
            serde_json::from_str(r#"{ "success": true, "bookings": [3] }"#).unwrap();
        assert_eq!(under_bookings.into_items().unwrap(), vec![3]);

        let under_conversations: ListEnvelope<u32> =
            serde_json::from_str(r#"{ "conversations": [4] }"#).unwrap();
        assert_eq!(under_conversations.into_items().unwrap(), vec![4]);
    }

    #[test]
    fn failed_envelope_surfaces_backend_message() {
        let envelope: ListEnvelope<u32> =
            serde_json::from_str(r#"{ "success": false, "message": "no buddy profile" }"#).unwrap();
        assert_eq!(
            envelope.into_items().unwrap_err(),
            ApiError::Unknown("no buddy profile".to_string())
        );
    }
}
