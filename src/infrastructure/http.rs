use crate::{log_debug, log_error, log_warn};
use crate::domain::{
    errors::{AppError, AppResult},
    logging::LogComponent,
};
use crate::infrastructure::config::ApiConfig;
use futures::future::{Either, LocalBoxFuture, select};
use futures::FutureExt;
use gloo::net::http::Request;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum::{AsRefStr, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, AsRefStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

/// Fully resolved request handed to a transport
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The server could not be reached at all; the only retried failure
    Unreachable(String),
    /// The request could not be issued or its body could not be read
    Failed(String),
}

/// Moves one request over the wire. Implementations must not retry.
pub trait HttpTransport {
    fn send(&self, request: HttpRequest) -> LocalBoxFuture<'static, Result<HttpResponse, TransportError>>;
}

/// Timer used for both the request deadline and retry backoff
pub trait Delay {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

/// Caller-side description of a request: method, optional JSON body and
/// extra headers. Defaults to a bare GET.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub body: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post_json<B: Serialize>(body: &B) -> AppResult<Self> {
        let body = serde_json::to_string(body)
            .map_err(|e| AppError::Parse(format!("could not encode request body: {}", e)))?;
        Ok(Self {
            method: HttpMethod::Post,
            body: Some(body),
            headers: Vec::new(),
        })
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }
}

/// Bounded retry with linear backoff, applied to unreachable-server failures only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &ApiConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: config.retry_base_delay,
        }
    }

    /// Wait before retry number `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    pub fn total_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

#[derive(Debug)]
enum AttemptError {
    TimedOut,
    Transport(TransportError),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// JSON-over-HTTP client for the analysis backend.
///
/// Each attempt races the transport against the configured deadline; the
/// losing transport future is dropped, which cancels the underlying fetch.
/// Attempts that could not reach the server are retried per [`RetryPolicy`].
/// Non-2xx statuses and timeouts are surfaced immediately.
pub struct RequestClient<T, D> {
    config: ApiConfig,
    policy: RetryPolicy,
    transport: T,
    delay: D,
}

impl<T: HttpTransport, D: Delay> RequestClient<T, D> {
    pub fn new(config: ApiConfig, transport: T, delay: D) -> Self {
        let policy = RetryPolicy::from_config(&config);
        Self { config, policy, transport, delay }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    fn build_request(&self, endpoint: &str, options: RequestOptions) -> HttpRequest {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        headers.extend(options.headers);
        HttpRequest {
            method: options.method,
            url: self.config.endpoint_url(endpoint),
            headers,
            body: options.body,
        }
    }

    async fn attempt(&self, request: HttpRequest) -> Result<HttpResponse, AttemptError> {
        let send = self.transport.send(request);
        let deadline = self.delay.sleep(self.config.timeout);
        match select(send, deadline).await {
            Either::Left((result, _)) => result.map_err(AttemptError::Transport),
            Either::Right(((), _abandoned)) => Err(AttemptError::TimedOut),
        }
    }

    async fn send_with_policy(&self, endpoint: &str, options: RequestOptions) -> AppResult<HttpResponse> {
        let request = self.build_request(endpoint, options);
        let mut retries = 0;
        loop {
            log_debug!(
                LogComponent::Infrastructure("RequestClient"),
                "📡 {} {} (attempt {}/{})",
                request.method,
                request.url,
                retries + 1,
                self.policy.total_attempts(),
            );

            match self.attempt(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(AttemptError::TimedOut) => {
                    log_error!(
                        LogComponent::Infrastructure("RequestClient"),
                        "⏱️ {} timed out after {} ms",
                        endpoint,
                        self.config.timeout.as_millis(),
                    );
                    return Err(AppError::Timeout(self.config.timeout));
                }
                Err(AttemptError::Transport(TransportError::Unreachable(reason))) => {
                    if retries < self.policy.max_retries {
                        retries += 1;
                        let wait = self.policy.backoff(retries);
                        log_warn!(
                            LogComponent::Infrastructure("RequestClient"),
                            "🔄 {} unreachable ({}), retry {}/{} in {} ms",
                            endpoint,
                            reason,
                            retries,
                            self.policy.max_retries,
                            wait.as_millis(),
                        );
                        self.delay.sleep(wait).await;
                        continue;
                    }
                    log_error!(
                        LogComponent::Infrastructure("RequestClient"),
                        "❌ {} unreachable after {} attempts: {}",
                        endpoint,
                        retries + 1,
                        reason,
                    );
                    return Err(AppError::Network(format!(
                        "Cannot connect to the server at {}. Make sure the backend is running.",
                        self.config.base_url
                    )));
                }
                Err(AttemptError::Transport(TransportError::Failed(reason))) => {
                    log_error!(
                        LogComponent::Infrastructure("RequestClient"),
                        "❌ {} failed: {}",
                        endpoint,
                        reason,
                    );
                    return Err(AppError::Network(reason));
                }
            }
        }
    }

    /// Performs one logical request and decodes the JSON body into `R`
    pub async fn request_json<R: DeserializeOwned>(&self, endpoint: &str, options: RequestOptions) -> AppResult<R> {
        let response = self.send_with_policy(endpoint, options).await?;
        decode_response(endpoint, response)
    }

    /// Performs one logical request and only checks the status; the body is ignored
    pub async fn request_status(&self, endpoint: &str, options: RequestOptions) -> AppResult<()> {
        let response = self.send_with_policy(endpoint, options).await?;
        ensure_success(endpoint, response).map(|_| ())
    }
}

fn ensure_success(endpoint: &str, response: HttpResponse) -> AppResult<HttpResponse> {
    if response.is_success() {
        return Ok(response);
    }
    let message = serde_json::from_str::<ErrorBody>(&response.body)
        .ok()
        .and_then(|body| body.error)
        .unwrap_or_else(|| format!("HTTP status {}", response.status));
    log_error!(
        LogComponent::Infrastructure("RequestClient"),
        "❌ {} returned {}: {}",
        endpoint,
        response.status,
        message,
    );
    Err(AppError::Server { status: response.status, message })
}

fn decode_response<R: DeserializeOwned>(endpoint: &str, response: HttpResponse) -> AppResult<R> {
    let response = ensure_success(endpoint, response)?;
    serde_json::from_str(&response.body).map_err(|e| {
        log_error!(
            LogComponent::Infrastructure("RequestClient"),
            "❌ {} returned malformed JSON: {}",
            endpoint,
            e,
        );
        AppError::Parse(e.to_string())
    })
}

/// Aborts the wrapped fetch when the request future is dropped early
struct AbortOnDrop(Option<web_sys::AbortController>);

impl AbortOnDrop {
    fn disarm(&mut self) {
        self.0 = None;
    }
}

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        if let Some(controller) = self.0.take() {
            controller.abort();
        }
    }
}

/// Browser `fetch` transport built on gloo
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

impl HttpTransport for FetchTransport {
    fn send(&self, request: HttpRequest) -> LocalBoxFuture<'static, Result<HttpResponse, TransportError>> {
        async move {
            let controller = web_sys::AbortController::new()
                .map_err(|e| TransportError::Failed(format!("AbortController unavailable: {:?}", e)))?;
            let signal = controller.signal();
            let mut guard = AbortOnDrop(Some(controller));

            let mut builder = match request.method {
                HttpMethod::Get => Request::get(&request.url),
                HttpMethod::Post => Request::post(&request.url),
            };
            for (key, value) in &request.headers {
                builder = builder.header(key, value);
            }
            builder = builder.abort_signal(Some(&signal));

            let sent = match request.body {
                Some(body) => builder
                    .body(body)
                    .map_err(|e| TransportError::Failed(format!("Failed to build request: {}", e)))?
                    .send()
                    .await,
                None => builder.send().await,
            };
            let response = sent.map_err(|e| match e {
                gloo::net::Error::JsError(js) => TransportError::Unreachable(js.to_string()),
                other => TransportError::Failed(other.to_string()),
            })?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| TransportError::Failed(format!("Failed to read response body: {}", e)))?;
            guard.disarm();
            Ok::<_, TransportError>(HttpResponse { status, body })
        }
        .boxed_local()
    }
}

/// `setTimeout`-backed delay
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserDelay;

impl Delay for BrowserDelay {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        gloo_timers::future::sleep(duration).boxed_local()
    }
}
