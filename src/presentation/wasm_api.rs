use crate::log_info;
use js_sys::Promise;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::application::{CalculationOutcome, CustomAssetForm, SelectionController, export_error};
use crate::domain::{
    analysis::AnalysisBackend,
    assets::{AssetCategory, DisplaySymbol, TechnicalSymbol, TimePeriod},
    errors::AppError,
    logging::LogComponent,
};
use crate::infrastructure::BrowserApi;

/// Error shape handed to JavaScript: `{ kind, message }`
#[derive(Serialize)]
struct JsFailure<'a> {
    kind: &'a str,
    message: String,
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
    js_sys::JSON::parse(&json)
}

fn js_error(err: &AppError) -> JsValue {
    let failure = JsFailure { kind: err.kind(), message: err.to_string() };
    to_js(&failure).unwrap_or_else(|_| JsValue::from_str(&failure.message))
}

fn parse_category(raw: &str) -> Result<AssetCategory, JsValue> {
    raw.parse()
        .map_err(|_| js_error(&AppError::validation(format!("Unknown category: {}", raw))))
}

/// Selection controller for pages that drive the UI from JavaScript.
///
/// Async methods return promises resolving to plain JSON objects and
/// rejecting with `{ kind, message }`.
#[wasm_bindgen]
pub struct CorrelationClient {
    controller: Rc<RefCell<SelectionController>>,
    api: Rc<BrowserApi>,
}

impl Default for CorrelationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl CorrelationClient {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            controller: Rc::new(RefCell::new(SelectionController::new())),
            api: Rc::new(BrowserApi::browser()),
        }
    }

    /// Health check, catalog load and default selection
    pub fn initialize(&self) -> Promise {
        let controller = self.controller.clone();
        let api = self.api.clone();
        future_to_promise(async move {
            let listing = SelectionController::fetch_startup(&*api)
                .await
                .map_err(|e| js_error(&e))?;
            let mut controller = controller.borrow_mut();
            controller.finish_startup(listing);
            log_info!(
                LogComponent::Presentation("CorrelationClient"),
                "✅ Ready with {} assets selected",
                controller.total_selected(),
            );
            Ok(JsValue::from(controller.total_selected() as u32))
        })
    }

    /// Returns whether the asset is selected afterwards
    #[wasm_bindgen(js_name = toggleAsset)]
    pub fn toggle_asset(&self, display: String, technical: String, category: String) -> Result<bool, JsValue> {
        let category = parse_category(&category)?;
        Ok(self.controller.borrow_mut().toggle(
            &DisplaySymbol::new(display),
            TechnicalSymbol::new(technical),
            category,
        ))
    }

    #[wasm_bindgen(js_name = removeAsset)]
    pub fn remove_asset(&self, display: String, technical: String, category: String) -> Result<bool, JsValue> {
        let category = parse_category(&category)?;
        Ok(self.controller.borrow_mut().remove(
            &DisplaySymbol::new(display),
            &TechnicalSymbol::new(technical),
            category,
        ))
    }

    pub fn reset(&self) {
        self.controller.borrow_mut().reset();
    }

    #[wasm_bindgen(js_name = setPeriod)]
    pub fn set_period(&self, code: String) -> Result<(), JsValue> {
        let period = code
            .parse::<TimePeriod>()
            .map_err(|_| js_error(&AppError::validation(format!("Unknown period: {}", code))))?;
        self.controller.borrow_mut().set_period(period);
        Ok(())
    }

    #[wasm_bindgen(js_name = totalSelected)]
    pub fn total_selected(&self) -> u32 {
        self.controller.borrow().total_selected() as u32
    }

    #[wasm_bindgen(js_name = isCalculateEnabled)]
    pub fn is_calculate_enabled(&self) -> bool {
        let controller = self.controller.borrow();
        controller.is_calculate_enabled() && !controller.is_busy()
    }

    #[wasm_bindgen(js_name = selectedTags)]
    pub fn selected_tags(&self) -> Result<JsValue, JsValue> {
        to_js(&self.controller.borrow().selected_tags())
    }

    /// Resolves to the correlation response; a newer call supersedes this one
    pub fn calculate(&self) -> Promise {
        let controller = self.controller.clone();
        let api = self.api.clone();
        future_to_promise(async move {
            let ticket = controller.borrow_mut().prepare_calculation().map_err(|e| js_error(&e))?;
            let result = api.correlation(ticket.request()).await;
            let response = result.as_ref().ok().cloned();
            match controller.borrow_mut().finish_calculation(&ticket, result) {
                CalculationOutcome::Completed => to_js(&response),
                CalculationOutcome::Failed(err) => Err(js_error(&err)),
                CalculationOutcome::Superseded => Ok(JsValue::NULL),
            }
        })
    }

    #[wasm_bindgen(js_name = addCustomAsset)]
    pub fn add_custom_asset(&self, symbol: String, name: String, category: String) -> Promise {
        let controller = self.controller.clone();
        let api = self.api.clone();
        future_to_promise(async move {
            let form = CustomAssetForm {
                symbol,
                name,
                category: parse_category(&category)?,
                source: None,
            };
            let request = controller.borrow().prepare_custom_asset(&form).map_err(|e| js_error(&e))?;
            let asset = api.add_custom_asset(&request).await.map_err(|e| js_error(&e))?;
            let technical = controller
                .borrow_mut()
                .accept_custom_asset(&request, asset)
                .map_err(|e| js_error(&e))?;
            Ok(JsValue::from_str(technical.value()))
        })
    }

    /// Resolves to `{ csv, filename }`, or `null` when nothing was analysed yet
    #[wasm_bindgen(js_name = exportMatrix)]
    pub fn export_matrix(&self) -> Promise {
        let matrix = self.controller.borrow().export_matrix().cloned();
        let api = self.api.clone();
        future_to_promise(async move {
            let Some(matrix) = matrix else {
                return Ok(JsValue::NULL);
            };
            let file = api.export(&matrix).await.map_err(|e| js_error(&export_error(e)))?;
            to_js(&file)
        })
    }

    #[wasm_bindgen(js_name = searchAssets)]
    pub fn search_assets(&self, query: String) -> Promise {
        let api = self.api.clone();
        future_to_promise(async move {
            let results = SelectionController::search_assets(&*api, &query)
                .await
                .map_err(|e| js_error(&e))?;
            to_js(&results)
        })
    }

    #[wasm_bindgen(js_name = latestPrices)]
    pub fn latest_prices(&self) -> Promise {
        let assets = self.controller.borrow().prepare_prices();
        let api = self.api.clone();
        future_to_promise(async move {
            let assets = assets.map_err(|e| js_error(&e))?;
            let prices = api.latest_prices(&assets).await.map_err(|e| js_error(&e))?;
            to_js(&prices)
        })
    }

    #[wasm_bindgen(js_name = rollingCorrelation)]
    pub fn rolling_correlation(&self, asset1: String, asset2: String, window: Option<u32>) -> Promise {
        let request = self.controller.borrow().prepare_rolling(
            &TechnicalSymbol::new(asset1),
            &TechnicalSymbol::new(asset2),
            window,
        );
        let api = self.api.clone();
        future_to_promise(async move {
            let request = request.map_err(|e| js_error(&e))?;
            let series = api.rolling_correlation(&request).await.map_err(|e| js_error(&e))?;
            to_js(&series)
        })
    }
}
