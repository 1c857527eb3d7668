//! HTTP client for the movie catalog API.
//!
//! Only the two calls reminders need are covered: fetching one movie and
//! posting an email. Failures are mapped to the API's own `message` when the
//! server replied, or to a connection error when it never did.

use crate::domain::{EmailRequest, EmailResponse, Movie};
use crate::error::{EstreiaError, Result};
use crate::infrastructure::config::Config;
use crate::infrastructure::notifier::NotificationSender;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const EMAIL_ENDPOINT: &str = "/email/send";
const MOVIES_ENDPOINT: &str = "/movies";

const CONNECTION_ERROR: &str = "Erro de conexão com a API";
const UNEXPECTED_ERROR: &str = "Erro inesperado";

/// Error body returned by the API
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Build a client from the configured base URL, timeout and token
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.api_timeout_ms))
            .build()
            .map_err(|e| EstreiaError::Api(format!("{}: {}", UNEXPECTED_ERROR, e)))?;

        Ok(ApiClient {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, rb: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => rb.bearer_auth(token),
            None => rb,
        }
    }

    /// Fetch a movie by id (GET /movies/{id})
    pub async fn get_movie(&self, id: u64) -> Result<Movie> {
        let url = self.url(&format!("{}/{}", MOVIES_ENDPOINT, id));
        tracing::debug!(%url, "fetching movie");

        let response = self
            .authorize(self.http.get(&url))
            .send()
            .await
            .map_err(transport_error)?;

        read_json(response, "Erro ao buscar filme").await
    }

    /// Post an email to the API (POST /email/send)
    pub async fn send_email(&self, email: &EmailRequest) -> Result<EmailResponse> {
        let url = self.url(EMAIL_ENDPOINT);
        tracing::debug!(%url, to = %email.to, "sending email");

        let response = self
            .authorize(self.http.post(&url))
            .json(email)
            .send()
            .await
            .map_err(transport_error)?;

        read_json(response, "Erro ao enviar email").await
    }
}

#[async_trait]
impl NotificationSender for ApiClient {
    async fn send_email(&self, email: EmailRequest) -> Result<EmailResponse> {
        ApiClient::send_email(self, &email).await
    }
}

/// Decode a successful reply, or turn an error reply into its message
async fn read_json<T: DeserializeOwned>(response: Response, fallback: &str) -> Result<T> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_string());
        tracing::warn!(status = status.as_u16(), %message, "API request failed");
        return Err(EstreiaError::Api(message));
    }

    response.json::<T>().await.map_err(|e| {
        tracing::warn!(error = %e, "API reply could not be decoded");
        EstreiaError::Api(UNEXPECTED_ERROR.to_string())
    })
}

fn transport_error(e: reqwest::Error) -> EstreiaError {
    tracing::warn!(error = %e, "API unreachable");
    if e.is_connect() || e.is_timeout() || e.is_request() {
        EstreiaError::Api(CONNECTION_ERROR.to_string())
    } else {
        EstreiaError::Api(UNEXPECTED_ERROR.to_string())
    }
}
