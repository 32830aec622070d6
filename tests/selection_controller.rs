mod common;

use common::{
    InstantDelay, MockApi, MockTransport, Reply, catalog_json, correlation_json, healthy_backend, mock_api,
};
use correlation_matrix_wasm::application::{CalculationOutcome, CustomAssetForm, SelectionController};
use correlation_matrix_wasm::domain::analysis::{AnalysisBackend, CorrelationResponse};
use correlation_matrix_wasm::domain::assets::{AssetCategory, DisplaySymbol, TechnicalSymbol, TimePeriod};
use correlation_matrix_wasm::domain::errors::AppError;
use futures::executor::block_on;
use serde_json::json;

fn ready_controller(transport: &MockTransport) -> (SelectionController, MockApi) {
    let api = mock_api(transport, &InstantDelay::new());
    let mut controller = SelectionController::new();
    block_on(controller.initialize(&api)).unwrap();
    (controller, api)
}

fn select(controller: &mut SelectionController, category: AssetCategory, technical: &str) {
    let technical = TechnicalSymbol::from(technical);
    let display = DisplaySymbol::new(controller.display_for(&technical));
    controller.add(&display, technical, category);
}

fn sample_response() -> CorrelationResponse {
    serde_json::from_value(correlation_json()).unwrap()
}

#[test]
fn initialize_applies_the_default_selection() {
    let transport = healthy_backend();
    let (controller, _api) = ready_controller(&transport);

    assert_eq!(controller.total_selected(), 6);
    let selection = controller.selection();
    assert_eq!(selection.symbols(AssetCategory::Crypto).len(), 2);
    assert_eq!(selection.symbols(AssetCategory::Stocks).len(), 2);
    assert_eq!(selection.symbols(AssetCategory::Etfs).len(), 1);
    assert_eq!(selection.symbols(AssetCategory::Commodities).len(), 1);
    assert!(controller.is_calculate_enabled());

    let tags: Vec<String> = controller.selected_tags().into_iter().map(|t| t.display).collect();
    assert_eq!(tags, vec!["BTC", "ETH", "AAPL", "MSFT", "SPY", "GOLD"]);
}

#[test]
fn initialize_reports_unreachable_backend() {
    let transport = MockTransport::new();
    transport.reply("/health", Reply::Unreachable);
    let api = mock_api(&transport, &InstantDelay::new());
    let mut controller = SelectionController::new();

    let err = block_on(controller.initialize(&api)).unwrap_err();

    assert!(matches!(err, AppError::Network(_)));
    assert_eq!(transport.calls("/assets"), 0);
    assert!(controller.catalog().is_empty());
    assert_eq!(controller.total_selected(), 0);
}

#[test]
fn single_asset_never_reaches_the_network() {
    let transport = healthy_backend();
    let api = mock_api(&transport, &InstantDelay::new());
    let mut controller = SelectionController::new();
    select(&mut controller, AssetCategory::Crypto, "BTC");

    let err = block_on(controller.calculate(&api)).unwrap_err();

    assert!(err.is_validation());
    assert_eq!(transport.total_calls(), 0);
    assert!(!controller.is_busy());
}

#[test]
fn three_asset_analysis_returns_square_matrix_keyed_by_technical_symbol() {
    let transport = healthy_backend();
    let (mut controller, api) = ready_controller(&transport);
    controller.reset();
    select(&mut controller, AssetCategory::Crypto, "BTC");
    select(&mut controller, AssetCategory::Stocks, "AAPL");
    select(&mut controller, AssetCategory::Commodities, "GC=F");

    let response = block_on(controller.calculate(&api)).unwrap().clone();

    let matrix = &response.correlation_matrix;
    assert_eq!(matrix.dimension(), 3);
    assert!(matrix.is_square());
    for symbol in &response.assets {
        assert_eq!(matrix.get(symbol, symbol), Some(1.0));
    }
    assert!(matrix.symbols().any(|s| s.value() == "GC=F"));
    assert_eq!(controller.current_result(), Some(&response));

    let body = transport.last_body("/correlation").unwrap();
    assert_eq!(
        body["assets"],
        json!({"crypto": ["BTC"], "stocks": ["AAPL"], "etfs": [], "commodities": ["GC=F"]})
    );
}

#[test]
fn period_change_is_sent_with_the_next_calculation() {
    let transport = healthy_backend();
    let (mut controller, api) = ready_controller(&transport);
    controller.set_period(TimePeriod::NinetyDays);

    block_on(controller.calculate(&api)).unwrap();

    let body = transport.last_body("/correlation").unwrap();
    assert_eq!(body["period"], json!("90d"));
    assert_eq!(body["correlation_method"], json!("pearson"));
    assert_eq!(body["returns_method"], json!("log"));
}

#[test]
fn failed_calculation_keeps_previous_result() {
    let transport = MockTransport::new();
    transport
        .json("/health", json!({"status": "ok"}))
        .json("/assets", catalog_json())
        .json("/correlation", correlation_json())
        .reply(
            "/correlation",
            Reply::Status(400, json!({"error": "Invalid time period"}).to_string()),
        );
    let (mut controller, api) = ready_controller(&transport);
    block_on(controller.calculate(&api)).unwrap();

    let err = block_on(controller.calculate(&api)).unwrap_err();

    assert_eq!(err.to_string(), "Invalid time period");
    assert!(controller.current_result().is_some());
    assert!(!controller.is_busy());
}

#[test]
fn ticket_payload_is_frozen_at_start() {
    let transport = healthy_backend();
    let (mut controller, _api) = ready_controller(&transport);
    let ticket = controller.prepare_calculation().unwrap();

    select(&mut controller, AssetCategory::Etfs, "QQQ");

    assert_eq!(ticket.request().assets.total(), 6);
    assert_eq!(controller.total_selected(), 7);
    assert!(controller.is_busy());
}

#[test]
fn newer_calculation_supersedes_older_one() {
    let mut controller = SelectionController::new();
    select(&mut controller, AssetCategory::Crypto, "BTC");
    select(&mut controller, AssetCategory::Stocks, "AAPL");

    let first = controller.prepare_calculation().unwrap();
    let second = controller.prepare_calculation().unwrap();
    assert_ne!(first.id(), second.id());

    let stale = controller.finish_calculation(&first, Ok(sample_response()));
    assert_eq!(stale, CalculationOutcome::Superseded);
    assert!(controller.current_result().is_none());
    assert!(controller.is_busy());

    let fresh = controller.finish_calculation(&second, Ok(sample_response()));
    assert_eq!(fresh, CalculationOutcome::Completed);
    assert!(controller.current_result().is_some());
    assert!(!controller.is_busy());
}

#[test]
fn late_response_after_cancel_is_ignored() {
    let mut controller = SelectionController::new();
    select(&mut controller, AssetCategory::Crypto, "BTC");
    select(&mut controller, AssetCategory::Crypto, "ETH");

    let ticket = controller.prepare_calculation().unwrap();
    controller.cancel_calculation(&ticket);

    assert!(!controller.is_busy());
    assert_eq!(
        controller.finish_calculation(&ticket, Ok(sample_response())),
        CalculationOutcome::Superseded
    );
    assert!(controller.current_result().is_none());
}

#[test]
fn duplicate_custom_asset_is_rejected_locally() {
    let transport = healthy_backend();
    let (controller, _api) = ready_controller(&transport);

    for symbol in [" aapl ", "Msft", "gc=f", "gold"] {
        let category = if symbol.contains('=') || symbol == "gold" {
            AssetCategory::Commodities
        } else {
            AssetCategory::Stocks
        };
        let form = CustomAssetForm {
            symbol: symbol.to_string(),
            name: "Duplicate".to_string(),
            category,
            source: None,
        };
        let err = controller.prepare_custom_asset(&form).unwrap_err();
        assert!(err.is_validation(), "{} was accepted", symbol);
    }
    assert_eq!(transport.calls("/add-custom-asset"), 0);
}

#[test]
fn same_symbol_in_another_category_is_allowed() {
    let transport = healthy_backend();
    let (controller, _api) = ready_controller(&transport);

    let request = controller
        .prepare_custom_asset(&CustomAssetForm {
            symbol: "btc".to_string(),
            name: "Bitcoin Trust".to_string(),
            category: AssetCategory::Etfs,
            source: None,
        })
        .unwrap();

    assert_eq!(request.symbol, "BTC");
}

#[test]
fn custom_asset_requires_symbol_and_name() {
    let transport = healthy_backend();
    let (mut controller, api) = ready_controller(&transport);
    let form = CustomAssetForm {
        symbol: "NVDA".to_string(),
        name: "   ".to_string(),
        category: AssetCategory::Stocks,
        source: None,
    };

    let err = block_on(controller.add_custom_asset(&api, &form)).unwrap_err();

    assert_eq!(err, AppError::validation("Symbol and name are required"));
    assert_eq!(transport.calls("/add-custom-asset"), 0);
}

#[test]
fn accepted_custom_asset_is_selected_and_shown() {
    let transport = healthy_backend();
    transport.json(
        "/add-custom-asset",
        json!({
            "success": true,
            "asset": {"symbol": "SILVER", "name": "Silver", "technical_symbol": "SI=F", "category": "commodities", "custom": true}
        }),
    );
    let (mut controller, api) = ready_controller(&transport);
    controller.switch_category(AssetCategory::Crypto);

    let form = CustomAssetForm {
        symbol: "silver".to_string(),
        name: "Silver".to_string(),
        category: AssetCategory::Commodities,
        source: None,
    };
    let technical = block_on(controller.add_custom_asset(&api, &form)).unwrap();

    assert_eq!(technical, TechnicalSymbol::from("SI=F"));
    assert_eq!(controller.active_category(), AssetCategory::Commodities);
    assert!(controller.is_selected(AssetCategory::Commodities, &technical));
    assert_eq!(controller.display_for(&technical), "SILVER");
    assert_eq!(controller.catalog().custom(AssetCategory::Commodities).len(), 1);
    assert_eq!(controller.total_selected(), 7);

    let body = transport.last_body("/add-custom-asset").unwrap();
    assert_eq!(
        body,
        json!({"symbol": "SILVER", "name": "Silver", "category": "commodities", "source": "yahoo"})
    );
}

#[test]
fn backend_refusal_surfaces_its_message() {
    let transport = healthy_backend();
    transport.json(
        "/add-custom-asset",
        json!({"success": false, "error": "Symbol ZZZZ not found"}),
    );
    let (mut controller, api) = ready_controller(&transport);
    let form = CustomAssetForm {
        symbol: "zzzz".to_string(),
        name: "Nothing".to_string(),
        category: AssetCategory::Stocks,
        source: None,
    };

    let err = block_on(controller.add_custom_asset(&api, &form)).unwrap_err();

    assert_eq!(err.to_string(), "Symbol ZZZZ not found");
    assert_eq!(controller.total_selected(), 6);
    assert!(controller.catalog().custom(AssetCategory::Stocks).is_empty());
}

#[test]
fn export_without_result_is_a_no_op() {
    let transport = MockTransport::new();
    let api = mock_api(&transport, &InstantDelay::new());
    let controller = SelectionController::new();

    assert_eq!(block_on(controller.export(&api)), Ok(None));
    assert_eq!(transport.total_calls(), 0);
}

#[test]
fn export_sends_current_matrix() {
    let transport = healthy_backend();
    transport.json(
        "/export",
        json!({"csv": ",BTC\nBTC,1.0\n", "filename": "correlation_matrix.csv"}),
    );
    let (mut controller, api) = ready_controller(&transport);
    block_on(controller.calculate(&api)).unwrap();

    let file = block_on(controller.export(&api)).unwrap().unwrap();

    assert_eq!(file.filename, "correlation_matrix.csv");
    let body = transport.last_body("/export").unwrap();
    assert_eq!(body["correlation_matrix"]["BTC"]["AAPL"], json!(0.42));
}

#[test]
fn export_failure_is_generic() {
    let transport = healthy_backend();
    transport.reply("/export", Reply::Status(500, json!({"error": "disk full"}).to_string()));
    let (mut controller, api) = ready_controller(&transport);
    block_on(controller.calculate(&api)).unwrap();

    let err = block_on(controller.export(&api)).unwrap_err();

    assert_eq!(err, AppError::Export("Export failed".to_string()));
}

#[test]
fn search_needs_two_characters() {
    let transport = healthy_backend();
    transport.json(
        "/search-assets",
        json!({"results": [{"symbol": "NVDA", "name": "NVIDIA", "category": "stocks", "source": "yahoo", "price": 120.5}]}),
    );
    let api = mock_api(&transport, &InstantDelay::new());

    let err = block_on(SelectionController::search_assets(&api, " n ")).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(transport.calls("/search-assets"), 0);

    let results = block_on(SelectionController::search_assets(&api, "  nv ")).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].category(), Some(AssetCategory::Stocks));
    assert_eq!(transport.last_body("/search-assets"), Some(json!({"query": "nv"})));
}

#[test]
fn latest_prices_need_a_selection() {
    let transport = MockTransport::new();
    let api = mock_api(&transport, &InstantDelay::new());
    let controller = SelectionController::new();

    let err = block_on(controller.latest_prices(&api)).unwrap_err();

    assert!(err.is_validation());
    assert_eq!(transport.total_calls(), 0);
}

#[test]
fn rolling_correlation_uses_current_result() {
    let transport = healthy_backend();
    transport.json(
        "/rolling-correlation",
        json!({"dates": ["2024-12-30", "2024-12-31"], "values": [0.31, 0.35]}),
    );
    let (mut controller, api) = ready_controller(&transport);
    let btc = TechnicalSymbol::from("BTC");
    let gold = TechnicalSymbol::from("GC=F");

    assert!(controller.prepare_rolling(&btc, &gold, None).unwrap_err().is_validation());

    block_on(controller.calculate(&api)).unwrap();
    assert!(controller.prepare_rolling(&btc, &btc, None).unwrap_err().is_validation());
    assert!(
        controller
            .prepare_rolling(&btc, &TechnicalSymbol::from("SOL"), None)
            .unwrap_err()
            .is_validation()
    );

    let series = block_on(controller.rolling_correlation(&api, &btc, &gold, None)).unwrap();
    assert_eq!(series.latest(), Some(0.35));
    assert_eq!(
        transport.last_body("/rolling-correlation"),
        Some(json!({"asset1": "BTC", "asset2": "GC=F", "period": "1y", "window": 30}))
    );
}

#[test]
fn plain_text_health_reply_still_starts_the_client() {
    let transport = MockTransport::new();
    transport
        .reply("/health", Reply::Status(200, "OK".to_string()))
        .json("/assets", catalog_json());
    let api = mock_api(&transport, &InstantDelay::new());
    let mut controller = SelectionController::new();

    block_on(controller.initialize(&api)).unwrap();

    assert_eq!(controller.total_selected(), 6);
    assert_eq!(transport.calls("/assets"), 1);
}

#[test]
fn startup_fetch_leaves_state_to_the_caller() {
    let transport = healthy_backend();
    let api = mock_api(&transport, &InstantDelay::new());

    let listing = block_on(SelectionController::fetch_startup(&api)).unwrap();
    assert_eq!(listing.len(), 4);

    let mut controller = SelectionController::new();
    controller.finish_startup(listing);
    assert_eq!(controller.total_selected(), 6);
    assert_eq!(controller.display_for(&TechnicalSymbol::from("GC=F")), "GOLD");
}

#[test]
fn unexpected_performance_shape_does_not_break_the_analysis() {
    let mut response = correlation_json();
    response["performance_comparison"] = json!({
        "BTC": {"total_return": 85.2},
        "AAPL": {"label": "n/a"},
        "GC=F": "-3.4%"
    });
    let transport = MockTransport::new();
    transport
        .json("/health", json!({"status": "ok"}))
        .json("/assets", catalog_json())
        .json("/correlation", response);
    let (mut controller, api) = ready_controller(&transport);
    controller.reset();
    select(&mut controller, AssetCategory::Crypto, "BTC");
    select(&mut controller, AssetCategory::Stocks, "AAPL");

    let ticket = controller.prepare_calculation().unwrap();
    let result = block_on(api.correlation(ticket.request()));
    assert_eq!(controller.finish_calculation(&ticket, result), CalculationOutcome::Completed);

    let performance = &controller.current_result().unwrap().performance_comparison;
    assert_eq!(performance.len(), 1);
    assert_eq!(performance[&TechnicalSymbol::from("BTC")], 85.2);
}

#[test]
fn performance_that_is_not_a_map_is_treated_as_empty() {
    let mut raw = correlation_json();
    raw["performance_comparison"] = json!(["BTC", 85.2]);

    let response: CorrelationResponse = serde_json::from_value(raw).unwrap();

    assert!(response.performance_comparison.is_empty());
    assert_eq!(response.assets.len(), 3);
}

fn silver_form(symbol: &str) -> CustomAssetForm {
    CustomAssetForm {
        symbol: symbol.to_string(),
        name: "Silver".to_string(),
        category: AssetCategory::Commodities,
        source: None,
    }
}

fn backend_resolving_silver() -> MockTransport {
    let transport = healthy_backend();
    transport.json(
        "/add-custom-asset",
        json!({
            "success": true,
            "asset": {"symbol": "SILVER", "name": "Silver", "technical_symbol": "SI=F", "category": "commodities", "custom": true}
        }),
    );
    transport
}

#[test]
fn custom_asset_cannot_be_added_twice() {
    let transport = backend_resolving_silver();
    let (mut controller, api) = ready_controller(&transport);
    block_on(controller.add_custom_asset(&api, &silver_form("silver"))).unwrap();

    for symbol in ["Silver", "si=f"] {
        let err = block_on(controller.add_custom_asset(&api, &silver_form(symbol))).unwrap_err();
        assert!(err.is_validation(), "{} was accepted", symbol);
        assert!(err.to_string().contains("already exists in Commodities"), "{}", err);
    }
    assert_eq!(transport.calls("/add-custom-asset"), 1);
    assert_eq!(controller.catalog().custom(AssetCategory::Commodities).len(), 1);
}

#[test]
fn symbol_resolving_to_an_existing_custom_asset_is_rejected() {
    let transport = backend_resolving_silver();
    let (mut controller, api) = ready_controller(&transport);
    block_on(controller.add_custom_asset(&api, &silver_form("silver"))).unwrap();
    let selected = controller.total_selected();

    let err = block_on(controller.add_custom_asset(&api, &silver_form("silver2"))).unwrap_err();

    assert_eq!(err, AppError::validation("SI=F already exists in Commodities"));
    assert_eq!(transport.calls("/add-custom-asset"), 2);
    assert_eq!(controller.catalog().custom(AssetCategory::Commodities).len(), 1);
    assert_eq!(controller.total_selected(), selected);
}

#[test]
fn reloading_the_catalog_keeps_custom_assets() {
    let transport = backend_resolving_silver();
    let (mut controller, api) = ready_controller(&transport);
    block_on(controller.add_custom_asset(&api, &silver_form("silver"))).unwrap();

    block_on(controller.load_catalog(&api)).unwrap();

    assert_eq!(controller.catalog().custom(AssetCategory::Commodities).len(), 1);
    assert_eq!(controller.display_for(&TechnicalSymbol::from("SI=F")), "SILVER");
    assert_eq!(transport.calls("/assets"), 2);
}
