use derive_more::Display;
use std::time::Duration;

/// Every failure the client can report. None of them is fatal: the UI stays
/// usable after any of these.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum AppError {
    /// Local precondition failed; no request was sent
    #[display(fmt = "{}", _0)]
    Validation(String),
    /// Backend unreachable after the retry budget was spent
    #[display(fmt = "{}", _0)]
    Network(String),
    #[display(fmt = "Request timed out after {} ms", "_0.as_millis()")]
    Timeout(Duration),
    #[display(fmt = "{}", message)]
    Server { status: u16, message: String },
    #[display(fmt = "Invalid response from server: {}", _0)]
    Parse(String),
    #[display(fmt = "{}", _0)]
    Export(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Short label used as the notification title
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::Network(_) => "network",
            AppError::Timeout(_) => "timeout",
            AppError::Server { .. } => "server",
            AppError::Parse(_) => "parse",
            AppError::Export(_) => "export",
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;
