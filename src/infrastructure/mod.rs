pub mod api;
pub mod config;
pub mod dto;
pub mod http;
pub mod services;

pub use api::{BrowserApi, CorrelationApi};
pub use config::ApiConfig;
pub use http::{RequestClient, RequestOptions};
