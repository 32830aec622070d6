use wasm_bindgen::prelude::*;

use crate::domain::logging::{LogComponent, Logger, TeeLogger, init_logger, init_time_provider};
use crate::infrastructure::services::{BrowserTimeProvider, ConsoleLogger};

pub mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

/// Installs logging and the clock, then mounts the UI
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();

    let console = if cfg!(debug_assertions) {
        ConsoleLogger::new_development()
    } else {
        ConsoleLogger::new_production()
    };
    let sinks: Vec<Box<dyn Logger>> = vec![Box::new(console), Box::new(app::debug_log())];
    init_logger(Box::new(TeeLogger::new(sinks)));
    init_time_provider(Box::new(BrowserTimeProvider::new()));

    log_info!(LogComponent::Presentation("Initialize"), "🚀 Correlation matrix client starting");

    leptos::mount_to_body(app::App);
}
