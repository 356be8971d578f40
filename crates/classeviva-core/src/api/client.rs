//! HTTP layer for the Classeviva REST API.
//!
//! `ApiClient` owns the connection pool and the fixed request headers. It
//! knows nothing about sessions: callers hand it a token per request.

use std::sync::Arc;

use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Client, Method, Response,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::endpoints::Endpoint;
use super::error::{ApiError, Result};
use crate::auth::Credential;
use crate::config::ClientConfig;
use crate::models::LoginResponse;

/// Header carrying the session token on authenticated requests
const AUTH_TOKEN_HEADER: &str = "Z-Auth-Token";

/// Header carrying the fixed application key on every request
const API_KEY_HEADER: &str = "Z-Dev-ApiKey";

#[derive(Serialize)]
struct LoginRequest<'a> {
    ident: Option<&'a str>,
    pass: &'a str,
    uid: &'a str,
}

/// API client for Classeviva.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: Arc<ClientConfig>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: ClientConfig) -> Result<Self> {
        let header_value = |name: &str, value: &str| {
            HeaderValue::from_str(value).map_err(|_| {
                ApiError::InvalidConfig(format!("{} is not a valid header value", name))
            })
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(API_KEY_HEADER, header_value("api key", &config.api_key)?);
        headers.insert(
            header::USER_AGENT,
            header_value("user agent", &config.user_agent)?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Log in and return the raw login response.
    pub async fn login(&self, credential: &Credential) -> Result<LoginResponse> {
        let url = self.config.url(&Endpoint::Login.path(credential.account_key()));
        let body = LoginRequest {
            ident: None,
            pass: credential.secret(),
            uid: credential.identifier(),
        };

        debug!(account = credential.identifier(), "Sending login request");
        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| ApiError::InvalidResponse(format!("login response: {}", e)));
        }

        let text = response.text().await.unwrap_or_default();
        if status.as_u16() == 422 {
            return Err(ApiError::InvalidCredential(
                credential.identifier().to_string(),
            ));
        }
        Err(ApiError::from_status(status, &text))
    }

    /// Issue one authenticated request, mapping failures to typed errors.
    async fn send(&self, endpoint: &Endpoint, account: &str, token: &str) -> Result<Response> {
        let url = self.config.url(&endpoint.path(account));
        let method = endpoint.method();

        let mut token_value = HeaderValue::from_str(token).map_err(|_| ApiError::TokenInvalid)?;
        token_value.set_sensitive(true);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(AUTH_TOKEN_HEADER, token_value);
        if method == Method::POST {
            request = request.json(&serde_json::json!({}));
        }

        debug!(method = %method, url = %url, "Sending request");
        let response = request.send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), url = %url, "Request failed");
        Err(endpoint
            .remote_error(status, &body)
            .unwrap_or_else(|| ApiError::from_status(status, &body)))
    }

    /// Authenticated request with a JSON response body.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        account: &str,
        token: &str,
    ) -> Result<T> {
        let response = self.send(endpoint, account, token).await?;
        response.json().await.map_err(|e| {
            ApiError::InvalidResponse(format!("{}: {}", endpoint.path(account), e))
        })
    }

    /// Authenticated request returning the raw body (avatar images).
    pub async fn fetch_bytes(
        &self,
        endpoint: &Endpoint,
        account: &str,
        token: &str,
    ) -> Result<Vec<u8>> {
        let response = self.send(endpoint, account, token).await?;
        Ok(response.bytes().await?.to_vec())
    }
}
