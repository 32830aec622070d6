use super::entities::{CorrelationMatrix, CorrelationResponse, ExportFile, LatestPrices, RollingCorrelation};
use crate::domain::assets::{
    AssetCategory, AssetDescriptor, AssetSource, CorrelationMethod, ReturnsMethod, SelectionSet,
    TechnicalSymbol, TimePeriod,
};
use crate::domain::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of `POST /correlation`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationRequest {
    pub assets: SelectionSet,
    pub period: TimePeriod,
    pub correlation_method: CorrelationMethod,
    pub returns_method: ReturnsMethod,
}

/// Body of `POST /add-custom-asset`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomAssetRequest {
    pub symbol: String,
    pub name: String,
    pub category: AssetCategory,
    pub source: AssetSource,
}

/// Body of `POST /rolling-correlation`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingCorrelationRequest {
    pub asset1: TechnicalSymbol,
    pub asset2: TechnicalSymbol,
    pub period: TimePeriod,
    pub window: u32,
}

/// One hit of the asset search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub symbol: String,
    pub name: String,
    pub category: String,
    pub source: String,
    #[serde(default)]
    pub price: Option<f64>,
}

impl SearchResult {
    pub fn category(&self) -> Option<AssetCategory> {
        self.category.parse().ok()
    }

    pub fn source(&self) -> Option<AssetSource> {
        self.source.parse().ok()
    }
}

/// Default asset list per category
pub type CatalogListing = BTreeMap<AssetCategory, Vec<AssetDescriptor>>;

/// The remote analysis service. Everything numeric happens behind this trait.
#[allow(async_fn_in_trait)]
pub trait AnalysisBackend {
    async fn health(&self) -> AppResult<()>;

    async fn assets(&self) -> AppResult<CatalogListing>;

    /// Period code → human label
    async fn periods(&self) -> AppResult<BTreeMap<String, String>>;

    async fn correlation(&self, request: &CorrelationRequest) -> AppResult<CorrelationResponse>;

    async fn latest_prices(&self, assets: &SelectionSet) -> AppResult<LatestPrices>;

    async fn search_assets(&self, query: &str) -> AppResult<Vec<SearchResult>>;

    /// Resolves the technical symbol of a user-entered asset
    async fn add_custom_asset(&self, request: &CustomAssetRequest) -> AppResult<AssetDescriptor>;

    async fn export(&self, matrix: &CorrelationMatrix) -> AppResult<ExportFile>;

    async fn rolling_correlation(&self, request: &RollingCorrelationRequest) -> AppResult<RollingCorrelation>;
}
