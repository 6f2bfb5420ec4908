//! HTTP clients for the storefront backend.
//!
//! [`FetchClient`] is a small builder-style HTTP client over a pluggable
//! [`Transport`]; [`ApiClient`] uses it to implement the collaborator
//! traits from `shop_commerce::services` against the backend's JSON API.
//!
//! # Example
//!
//! ```rust,ignore
//! use shop_data::{ApiClient, FetchClient, SpinTransport};
//! use shop_commerce::prelude::*;
//!
//! let api = ApiClient::new(
//!     FetchClient::new(SpinTransport).with_base_url("https://api.example.com/api"),
//! )
//! .with_token(session_token);
//!
//! let phones = api.products_by_category("phones").await?;
//! let page = api.search(&SearchQuery::new("iphone").page(2)).await?;
//! ```

mod api;
mod error;
mod request;
mod response;
mod transport;

pub use api::ApiClient;
pub use error::FetchError;
pub use request::{Method, Request, RequestBuilder};
pub use response::Response;
#[cfg(target_arch = "wasm32")]
pub use transport::SpinTransport;
pub use transport::Transport;

use std::collections::HashMap;
use tracing::debug;

/// HTTP client for making outbound requests.
pub struct FetchClient<T> {
    transport: T,
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
}

impl<T: Transport> FetchClient<T> {
    /// Create a new HTTP client over `transport`.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            base_url: None,
            default_headers: HashMap::new(),
        }
    }

    /// Create a client with a base URL that will be prepended to all requests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder<'_, T> {
        self.request(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder<'_, T> {
        self.request(Method::Post, url)
    }

    /// Create a PUT request.
    pub fn put(&self, url: impl Into<String>) -> ClientRequestBuilder<'_, T> {
        self.request(Method::Put, url)
    }

    /// Create a DELETE request.
    pub fn delete(&self, url: impl Into<String>) -> ClientRequestBuilder<'_, T> {
        self.request(Method::Delete, url)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder<'_, T> {
        let url = url.into();
        let full_url = match &self.base_url {
            Some(base) => {
                if url.starts_with("http://") || url.starts_with("https://") {
                    url
                } else {
                    format!("{}{}", base.trim_end_matches('/'), url)
                }
            }
            None => url,
        };

        let mut builder = RequestBuilder::new(method, full_url).accept("application/json");
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }

        ClientRequestBuilder {
            client: self,
            builder,
        }
    }
}

/// A request builder bound to a client.
pub struct ClientRequestBuilder<'a, T> {
    client: &'a FetchClient<T>,
    builder: RequestBuilder,
}

impl<'a, T: Transport> ClientRequestBuilder<'a, T> {
    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.query(key, value);
        self
    }

    /// Append several query parameters.
    pub fn query_pairs<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.builder = self.builder.query_pairs(pairs);
        self
    }

    /// Set the request body as JSON.
    pub fn json<B: serde::Serialize + ?Sized>(mut self, value: &B) -> Result<Self, FetchError> {
        self.builder = self.builder.json(value)?;
        Ok(self)
    }

    /// Add a bearer token authorization header.
    pub fn bearer_auth(mut self, token: impl AsRef<str>) -> Self {
        self.builder = self.builder.bearer_auth(token);
        self
    }

    /// Send the request and return the response, whatever its status.
    pub async fn send(self) -> Result<Response, FetchError> {
        let request = self.builder.build()?;
        let method = request.method;
        let url = request.url.clone();

        let response = self.client.transport.send(request).await?;
        debug!(method = method.as_str(), %url, status = response.status, "HTTP request");
        Ok(response)
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{ApiClient, FetchClient, FetchError, Method, Request, Response, Transport};
}
