use crate::log_info;
use crate::domain::logging::LogComponent;
use once_cell::sync::OnceCell;
use std::time::Duration;
use wasm_bindgen::JsValue;

pub const LOCAL_API_BASE_URL: &str = "http://localhost:5000/api";
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(60_000);
pub const MAX_RETRIES: u32 = 2;
pub const RETRY_BASE_DELAY: Duration = Duration::from_millis(1_000);

/// Name of the global a deployment can set to point the client elsewhere
pub const BASE_URL_OVERRIDE_KEY: &str = "API_BASE_URL";

/// Connection settings shared by every endpoint call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_base_delay: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::with_base_url(LOCAL_API_BASE_URL)
    }
}

impl ApiConfig {
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            timeout: REQUEST_TIMEOUT,
            max_retries: MAX_RETRIES,
            retry_base_delay: RETRY_BASE_DELAY,
        }
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    /// Configuration resolved once from the hosting page
    pub fn global() -> &'static ApiConfig {
        static CONFIG: OnceCell<ApiConfig> = OnceCell::new();
        CONFIG.get_or_init(|| {
            let base_url = resolve_base_url(&PageLocation::current());
            log_info!(LogComponent::Infrastructure("Config"), "🔧 API base URL: {}", base_url);
            ApiConfig::with_base_url(&base_url)
        })
    }
}

/// What the resolver needs to know about the page the client runs in
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLocation {
    pub override_url: Option<String>,
    pub protocol: String,
    pub hostname: String,
    pub origin: String,
}

impl PageLocation {
    /// Reads `window.API_BASE_URL` and `window.location`; empty outside a browser
    pub fn current() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };
        let override_url = js_sys::Reflect::get(&window, &JsValue::from_str(BASE_URL_OVERRIDE_KEY))
            .ok()
            .and_then(|value| value.as_string())
            .filter(|value| !value.trim().is_empty());
        let location = window.location();
        Self {
            override_url,
            protocol: location.protocol().unwrap_or_default(),
            hostname: location.hostname().unwrap_or_default(),
            origin: location.origin().unwrap_or_default(),
        }
    }

    fn is_local(&self) -> bool {
        self.protocol == "file:"
            || self.hostname.is_empty()
            || self.hostname == "localhost"
            || self.hostname == "127.0.0.1"
    }
}

/// Override first, then same-origin `/api` for hosted pages, then the local
/// development server.
pub fn resolve_base_url(location: &PageLocation) -> String {
    if let Some(url) = &location.override_url {
        return url.trim().trim_end_matches('/').to_string();
    }
    if !location.is_local() && !location.origin.is_empty() {
        return format!("{}/api", location.origin.trim_end_matches('/'));
    }
    LOCAL_API_BASE_URL.to_string()
}
