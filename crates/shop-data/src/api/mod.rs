//! Backend API client.
//!
//! One [`ApiClient`] implements every collaborator trait. Responses may be
//! bare JSON or wrapped in `{"data": ...}`; both are accepted. Any
//! transport, status or decoding failure becomes
//! [`CommerceError::Service`] naming the collaborator.

mod account;
mod catalog;
mod orders;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use shop_commerce::CommerceError;
use tracing::warn;

use crate::{ClientRequestBuilder, FetchClient, FetchError, Transport};

const CATALOG: &str = "catalog";
const ORDERS: &str = "orders";
const DISCOUNTS: &str = "discounts";
const ADDRESSES: &str = "addresses";
const PROFILE: &str = "profile";

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload<R> {
    Wrapped { data: R },
    Bare(R),
}

impl<R> Payload<R> {
    fn into_inner(self) -> R {
        match self {
            Payload::Wrapped { data } => data,
            Payload::Bare(value) => value,
        }
    }
}

/// Client for the storefront backend.
pub struct ApiClient<T> {
    client: FetchClient<T>,
    token: Option<String>,
}

impl<T: Transport> ApiClient<T> {
    /// Create an anonymous client.
    pub fn new(client: FetchClient<T>) -> Self {
        Self {
            client,
            token: None,
        }
    }

    /// Authenticate requests with a session token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Check if a session token is set.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The underlying HTTP client.
    pub fn client(&self) -> &FetchClient<T> {
        &self.client
    }

    /// Attach the session token, or fail when signed out.
    fn authorized<'a>(
        &self,
        request: ClientRequestBuilder<'a, T>,
        action: &'static str,
    ) -> Result<ClientRequestBuilder<'a, T>, CommerceError> {
        match &self.token {
            Some(token) => Ok(request.bearer_auth(token)),
            None => Err(CommerceError::LoginRequired(action)),
        }
    }

    /// Send, check the status and decode the body.
    async fn fetch<R: DeserializeOwned>(
        &self,
        service: &'static str,
        request: ClientRequestBuilder<'_, T>,
    ) -> Result<R, CommerceError> {
        self.fetch_raw(request)
            .await
            .map_err(|e| service_error(service, e))
    }

    async fn fetch_raw<R: DeserializeOwned>(
        &self,
        request: ClientRequestBuilder<'_, T>,
    ) -> Result<R, FetchError> {
        let response = request.send().await?.error_for_status()?;
        response.json::<Payload<R>>().map(Payload::into_inner)
    }
}

fn service_error(service: &'static str, error: FetchError) -> CommerceError {
    warn!(service, error = %error, "Backend call failed");
    error.into_service_error(service)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_envelopes() {
        let wrapped: Payload<Vec<u32>> = serde_json::from_str(r#"{"success":true,"data":[1,2]}"#).unwrap();
        assert_eq!(wrapped.into_inner(), vec![1, 2]);

        let bare: Payload<Vec<u32>> = serde_json::from_str("[3]").unwrap();
        assert_eq!(bare.into_inner(), vec![3]);
    }
}
