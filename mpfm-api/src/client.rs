/// HTTP client and envelope decoding
use crate::config::ApiConfig;
use crate::error::{friendly_message, ApiError, Result};
use mpfm_model::envelope::ApiResponse;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// Thin wrapper over `reqwest::Client` that knows the base URL, the bearer
/// token and the `{ success, message, data?, errors? }` envelope.
///
/// Endpoint methods live in [`crate::auth`] and [`crate::monitoring`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let builder = Client::builder();
        // Browsers own request timeouts on wasm.
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(config.timeout);
        let http = builder.build()?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|_| ApiError::InvalidUrl(base_url.clone()))?;

        Ok(Self {
            http,
            base_url,
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL with `segments` appended, each one percent-encoded.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url =
            Url::parse(&self.base_url).map_err(|_| ApiError::InvalidUrl(self.base_url.clone()))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&'static str, String)],
    ) -> Result<T> {
        let url = self.url(segments)?;
        log::debug!("GET {}", url);
        let request = self.http.get(url).query(query);
        self.execute(request).await
    }

    pub(crate) async fn send<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T> {
        let url = self.url(segments)?;
        log::debug!("{} {}", method, url);
        let request = self.http.request(method, url).json(body);
        self.execute(request).await
    }

    /// Like [`ApiClient::send`] for endpoints that answer with a message only.
    pub(crate) async fn send_for_message<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<String> {
        let url = self.url(segments)?;
        log::debug!("{} {}", method, url);
        let request = self.authorize(self.http.request(method, url).json(body));
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        decode_message(status, self.token.is_some(), &body)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        let body = response.text().await?;
        decode_envelope(status, self.token.is_some(), &body)
    }
}

/// Check status and envelope, returning the envelope when it reports success.
///
/// A 401 on a request that carried a token means the session is gone. Without
/// a token (login, signup) the server's message is translated like any other
/// failure.
fn open_envelope(status: StatusCode, authenticated: bool, body: &str) -> Result<ApiResponse<Value>> {
    if status == StatusCode::UNAUTHORIZED && authenticated {
        log::info!("Server rejected the stored token");
        return Err(ApiError::Unauthorized);
    }

    let envelope: ApiResponse<Value> = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) if status.is_success() => {
            log::warn!("Undecodable response body: {}", e);
            return Err(ApiError::Decode(e.to_string()));
        }
        Err(_) => {
            let reason = status.canonical_reason().unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: friendly_message(reason),
            });
        }
    };

    if envelope.success && status.is_success() {
        return Ok(envelope);
    }
    if !envelope.errors.is_empty() {
        return Err(ApiError::Validation(envelope.errors));
    }
    log::info!("API failure ({}): {}", status.as_u16(), envelope.message);
    Err(ApiError::Api {
        status: status.as_u16(),
        message: friendly_message(&envelope.message),
    })
}

/// Decode the `data` of a response body.
///
/// Endpoints whose `data` is absent decode as JSON `null`, so `T = ()` or an
/// `Option` works for them.
pub fn decode_envelope<T: DeserializeOwned>(
    status: StatusCode,
    authenticated: bool,
    body: &str,
) -> Result<T> {
    let envelope = open_envelope(status, authenticated, body)?;
    let data = envelope.data.unwrap_or(Value::Null);
    serde_json::from_value(data).map_err(|e| {
        log::warn!("Response data did not match the expected shape: {}", e);
        ApiError::Decode(e.to_string())
    })
}

/// The `message` of a successful response body.
pub fn decode_message(status: StatusCode, authenticated: bool, body: &str) -> Result<String> {
    open_envelope(status, authenticated, body).map(|envelope| envelope.message)
}
