#![cfg(target_arch = "wasm32")]

use correlation_matrix_wasm::domain::logging::{LogComponent, LogEntry, LogLevel, Logger, TimeProvider};
use correlation_matrix_wasm::infrastructure::config::{LOCAL_API_BASE_URL, PageLocation, resolve_base_url};
use correlation_matrix_wasm::infrastructure::http::{BrowserDelay, Delay};
use correlation_matrix_wasm::infrastructure::services::{BrowserTimeProvider, ConsoleLogger};
use futures::future::{AbortHandle, Abortable};
use std::time::Duration;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn timestamps_format_as_clock_time() {
    let clock = BrowserTimeProvider::new();
    let formatted = clock.format_timestamp(clock.current_timestamp());
    assert_eq!(formatted.len(), "00:00:00.000".len());
    assert_eq!(formatted.matches(':').count(), 2);
}

#[wasm_bindgen_test]
fn console_logger_accepts_every_level() {
    let logger = ConsoleLogger::new_development();
    for level in [LogLevel::Trace, LogLevel::Debug, LogLevel::Info, LogLevel::Warn, LogLevel::Error] {
        logger.log(LogEntry::new(level, LogComponent::Presentation("BrowserTest"), "hello"));
    }
}

#[wasm_bindgen_test]
fn test_runner_page_resolves_to_a_base_url() {
    let location = PageLocation::current();
    let base_url = resolve_base_url(&location);
    if location.hostname == "localhost" || location.hostname == "127.0.0.1" {
        assert_eq!(base_url, LOCAL_API_BASE_URL);
    } else {
        assert!(base_url.ends_with("/api"));
    }
}

#[wasm_bindgen_test(async)]
async fn aborted_delay_never_completes() {
    let (handle, registration) = AbortHandle::new_pair();
    let sleeping = Abortable::new(BrowserDelay.sleep(Duration::from_millis(50)), registration);
    handle.abort();
    assert!(sleeping.await.is_err());
}

#[wasm_bindgen_test(async)]
async fn delay_resolves() {
    BrowserDelay.sleep(Duration::from_millis(5)).await;
}
