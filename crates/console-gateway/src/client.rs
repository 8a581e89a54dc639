//! HTTP implementation of the gateway over `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tracing::debug;

use shared_types::{ApiErrorBody, ERROR_CODE_UNSTRUCTURED};

use crate::{ApiGateway, GatewayError, HttpMethod};

/// Default end-to-end request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Default connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Remote Data Gateway over HTTP.
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Create a gateway against the given API base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(GatewayError::Http)?;

        Ok(Self {
            client,
            base_url: normalize_base(base_url.into()),
        })
    }

    /// The configured API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn normalize_base(base: String) -> String {
    base.trim_end_matches('/').to_string()
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Post => Method::POST,
    }
}

/// Map a failed response to a structured API error.
///
/// A body that does not parse as `{ code, message? }` still yields an `Api`
/// error, carrying the generic unstructured marker code.
fn api_error(status: StatusCode, body: &str) -> GatewayError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => GatewayError::Api {
            status: status.as_u16(),
            code: parsed.code,
            message: parsed.message,
        },
        Err(_) => GatewayError::Api {
            status: status.as_u16(),
            code: ERROR_CODE_UNSTRUCTURED.to_string(),
            message: None,
        },
    }
}

#[async_trait]
impl ApiGateway for HttpGateway {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, GatewayError> {
        let url = self.url_for(path);
        debug!(%method, %url, "gateway request");

        let mut builder = self.client.request(to_reqwest_method(method), &url);
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_connect() {
                GatewayError::Connection(format!("cannot connect to {url}"))
            } else {
                GatewayError::Http(e)
            }
        })?;
        let status = response.status();
        let text = response.text().await.map_err(GatewayError::Http)?;

        if !status.is_success() {
            return Err(api_error(status, &text));
        }

        if text.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}
