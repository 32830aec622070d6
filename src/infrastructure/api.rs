use crate::log_warn;
use crate::domain::{
    analysis::{
        AnalysisBackend, CatalogListing, CorrelationMatrix, CorrelationRequest, CorrelationResponse,
        CustomAssetRequest, ExportFile, LatestPrices, RollingCorrelation, RollingCorrelationRequest,
        SearchResult,
    },
    assets::{AssetCategory, AssetDescriptor, SelectionSet},
    errors::{AppError, AppResult},
    logging::LogComponent,
};
use crate::infrastructure::{
    config::ApiConfig,
    dto::{AddCustomAssetResponse, AssetDto, ExportQuery, PricesQuery, SearchQuery, SearchResponse},
    http::{BrowserDelay, Delay, FetchTransport, HttpTransport, RequestClient, RequestOptions},
};
use std::collections::{BTreeMap, HashMap};

pub const HEALTH: &str = "/health";
pub const ASSETS: &str = "/assets";
pub const PERIODS: &str = "/periods";
pub const CORRELATION: &str = "/correlation";
pub const PRICES: &str = "/prices";
pub const SEARCH_ASSETS: &str = "/search-assets";
pub const ADD_CUSTOM_ASSET: &str = "/add-custom-asset";
pub const EXPORT: &str = "/export";
pub const ROLLING_CORRELATION: &str = "/rolling-correlation";

/// Typed wrapper over every backend endpoint
pub struct CorrelationApi<T, D> {
    client: RequestClient<T, D>,
}

pub type BrowserApi = CorrelationApi<FetchTransport, BrowserDelay>;

impl BrowserApi {
    /// Client bound to the page-resolved configuration
    pub fn browser() -> Self {
        Self::new(RequestClient::new(ApiConfig::global().clone(), FetchTransport, BrowserDelay))
    }
}

impl<T: HttpTransport, D: Delay> CorrelationApi<T, D> {
    pub fn new(client: RequestClient<T, D>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RequestClient<T, D> {
        &self.client
    }
}

impl<T: HttpTransport, D: Delay> AnalysisBackend for CorrelationApi<T, D> {
    async fn health(&self) -> AppResult<()> {
        self.client.request_status(HEALTH, RequestOptions::get()).await
    }

    async fn assets(&self) -> AppResult<CatalogListing> {
        let raw: HashMap<String, Vec<AssetDto>> = self.client.request_json(ASSETS, RequestOptions::get()).await?;
        let mut listing = BTreeMap::new();
        for (key, assets) in raw {
            match key.parse::<AssetCategory>() {
                Ok(category) => {
                    listing.insert(category, assets.into_iter().map(AssetDto::into_descriptor).collect());
                }
                Err(_) => log_warn!(
                    LogComponent::Infrastructure("CorrelationApi"),
                    "⚠️ Ignoring unknown asset category '{}'",
                    key,
                ),
            }
        }
        Ok(listing)
    }

    async fn periods(&self) -> AppResult<BTreeMap<String, String>> {
        self.client.request_json(PERIODS, RequestOptions::get()).await
    }

    async fn correlation(&self, request: &CorrelationRequest) -> AppResult<CorrelationResponse> {
        self.client
            .request_json(CORRELATION, RequestOptions::post_json(request)?)
            .await
    }

    async fn latest_prices(&self, assets: &SelectionSet) -> AppResult<LatestPrices> {
        self.client
            .request_json(PRICES, RequestOptions::post_json(&PricesQuery { assets })?)
            .await
    }

    async fn search_assets(&self, query: &str) -> AppResult<Vec<SearchResult>> {
        let response: SearchResponse = self
            .client
            .request_json(SEARCH_ASSETS, RequestOptions::post_json(&SearchQuery { query })?)
            .await?;
        Ok(response.results)
    }

    async fn add_custom_asset(&self, request: &CustomAssetRequest) -> AppResult<AssetDescriptor> {
        let response: AddCustomAssetResponse = self
            .client
            .request_json(ADD_CUSTOM_ASSET, RequestOptions::post_json(request)?)
            .await?;
        match response.asset {
            Some(asset) if response.success => Ok(asset.into_descriptor()),
            _ => Err(AppError::Server {
                status: 200,
                message: response
                    .error
                    .unwrap_or_else(|| format!("Asset {} could not be added", request.symbol)),
            }),
        }
    }

    async fn export(&self, matrix: &CorrelationMatrix) -> AppResult<ExportFile> {
        self.client
            .request_json(EXPORT, RequestOptions::post_json(&ExportQuery { correlation_matrix: matrix })?)
            .await
    }

    async fn rolling_correlation(&self, request: &RollingCorrelationRequest) -> AppResult<RollingCorrelation> {
        self.client
            .request_json(ROLLING_CORRELATION, RequestOptions::post_json(request)?)
            .await
    }
}
