use crate::{log_debug, log_error, log_info, log_warn};
use crate::domain::{
    analysis::{
        AnalysisBackend, CatalogListing, CorrelationMatrix, CorrelationRequest, CorrelationResponse,
        CustomAssetRequest, ExportFile, LatestPrices, RollingCorrelation, RollingCorrelationRequest,
        SearchResult,
    },
    assets::{
        AssetCatalog, AssetCategory, AssetDescriptor, AssetSource, CORRELATION_METHOD, DisplayMapping,
        DisplaySymbol, RETURNS_METHOD, SelectedTag, SelectionSet, TechnicalSymbol, TimePeriod,
        default_selection, normalize_symbol,
    },
    errors::{AppError, AppResult},
    logging::LogComponent,
};

/// Fewest assets a correlation analysis accepts
pub const MIN_ASSETS_FOR_ANALYSIS: usize = 2;
pub const MIN_SEARCH_QUERY_LEN: usize = 2;
pub const DEFAULT_ROLLING_WINDOW: u32 = 30;

const COMPONENT: LogComponent = LogComponent::Application("SelectionController");

/// Payload captured when a calculation starts. Later selection changes do
/// not affect it.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationTicket {
    id: u64,
    request: CorrelationRequest,
}

impl CalculationTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn request(&self) -> &CorrelationRequest {
        &self.request
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CalculationOutcome {
    /// Response stored as the current result
    Completed,
    Failed(AppError),
    /// A newer calculation started meanwhile; the response was dropped
    Superseded,
}

/// User input for a custom asset
#[derive(Debug, Clone, PartialEq)]
pub struct CustomAssetForm {
    pub symbol: String,
    pub name: String,
    pub category: AssetCategory,
    pub source: Option<AssetSource>,
}

/// Owns everything the user has chosen and mediates every change to it.
///
/// The controller never holds the backend: async operations borrow one per
/// call, and each of them is also available as a synchronous
/// `prepare_*`/`finish_*` pair so a UI keeping the controller in a
/// `RefCell` does not hold a borrow across an `.await`.
#[derive(Debug, Default)]
pub struct SelectionController {
    catalog: AssetCatalog,
    selection: SelectionSet,
    mapping: DisplayMapping,
    current_result: Option<CorrelationResponse>,
    active_category: AssetCategory,
    period: TimePeriod,
    last_ticket: u64,
    pending_ticket: Option<u64>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    // --- state accessors -------------------------------------------------

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn mapping(&self) -> &DisplayMapping {
        &self.mapping
    }

    pub fn current_result(&self) -> Option<&CorrelationResponse> {
        self.current_result.as_ref()
    }

    pub fn active_category(&self) -> AssetCategory {
        self.active_category
    }

    pub fn switch_category(&mut self, category: AssetCategory) {
        self.active_category = category;
    }

    pub fn period(&self) -> TimePeriod {
        self.period
    }

    pub fn set_period(&mut self, period: TimePeriod) {
        self.period = period;
    }

    pub fn total_selected(&self) -> usize {
        self.selection.total()
    }

    /// Presentation hint; [`Self::prepare_calculation`] re-checks it
    pub fn is_calculate_enabled(&self) -> bool {
        self.total_selected() >= MIN_ASSETS_FOR_ANALYSIS
    }

    pub fn is_busy(&self) -> bool {
        self.pending_ticket.is_some()
    }

    pub fn is_selected(&self, category: AssetCategory, technical: &TechnicalSymbol) -> bool {
        self.selection.contains(category, technical)
    }

    pub fn display_for<'a>(&'a self, technical: &'a TechnicalSymbol) -> &'a str {
        self.mapping.display_for(technical)
    }

    /// Tags for the selected-assets strip, category order then insertion order
    pub fn selected_tags(&self) -> Vec<SelectedTag> {
        self.selection
            .iter()
            .map(|(category, technical)| SelectedTag {
                display: self.mapping.display_for(technical).to_string(),
                technical: technical.clone(),
                category,
            })
            .collect()
    }

    // --- catalog ---------------------------------------------------------

    /// Replaces every default list and rebuilds the display mapping.
    /// Custom assets added during the session are kept.
    fn apply_catalog(&mut self, mut listing: CatalogListing) {
        for category in AssetCategory::all() {
            self.catalog
                .set_defaults(category, listing.remove(&category).unwrap_or_default());
        }
        self.rebuild_mapping();
        log_info!(COMPONENT, "📚 Catalog loaded: {} assets", self.catalog.len());
    }

    fn rebuild_mapping(&mut self) {
        self.mapping = DisplayMapping::from_catalog(&self.catalog);
    }

    fn apply_default_selection(&mut self) {
        for (category, technical) in default_selection() {
            let technical = TechnicalSymbol::from(technical);
            let display = DisplaySymbol::new(self.mapping.display_for(&technical));
            self.add(&display, technical, category);
        }
    }

    // --- selection state machine -----------------------------------------

    /// No-op when the asset is already selected in `category`
    pub fn add(&mut self, display: &DisplaySymbol, technical: TechnicalSymbol, category: AssetCategory) -> bool {
        let symbol = technical.to_string();
        let added = self.selection.add(category, technical);
        if added {
            log_debug!(COMPONENT, "➕ {} ({}) selected in {}", display, symbol, category);
        }
        added
    }

    /// No-op when the asset is not selected in `category`
    pub fn remove(&mut self, display: &DisplaySymbol, technical: &TechnicalSymbol, category: AssetCategory) -> bool {
        let removed = self.selection.remove(category, technical);
        if removed {
            log_debug!(COMPONENT, "➖ {} ({}) removed from {}", display, technical, category);
        }
        removed
    }

    /// Returns whether the asset is selected afterwards
    pub fn toggle(&mut self, display: &DisplaySymbol, technical: TechnicalSymbol, category: AssetCategory) -> bool {
        if self.selection.contains(category, &technical) {
            self.remove(display, &technical, category);
            false
        } else {
            self.add(display, technical, category)
        }
    }

    pub fn reset(&mut self) {
        self.selection.reset();
        log_info!(COMPONENT, "🧹 Selection cleared");
    }

    // --- calculation -----------------------------------------------------

    /// Validates the selection and captures the request payload.
    ///
    /// Starting a calculation while another one is pending supersedes the
    /// older one: its response will be reported as
    /// [`CalculationOutcome::Superseded`].
    pub fn prepare_calculation(&mut self) -> AppResult<CalculationTicket> {
        let total = self.total_selected();
        if total < MIN_ASSETS_FOR_ANALYSIS {
            return Err(AppError::validation(format!(
                "Select at least {} assets (currently {})",
                MIN_ASSETS_FOR_ANALYSIS, total
            )));
        }

        if let Some(previous) = self.pending_ticket {
            log_warn!(COMPONENT, "⚠️ Calculation #{} superseded before completion", previous);
        }
        self.last_ticket += 1;
        self.pending_ticket = Some(self.last_ticket);

        log_info!(
            COMPONENT,
            "🧮 Calculation #{} started for {} assets ({})",
            self.last_ticket,
            total,
            self.period,
        );

        Ok(CalculationTicket {
            id: self.last_ticket,
            request: CorrelationRequest {
                assets: self.selection.clone(),
                period: self.period,
                correlation_method: CORRELATION_METHOD,
                returns_method: RETURNS_METHOD,
            },
        })
    }

    /// Applies a response if `ticket` is still the current calculation
    pub fn finish_calculation(
        &mut self,
        ticket: &CalculationTicket,
        result: AppResult<CorrelationResponse>,
    ) -> CalculationOutcome {
        if self.pending_ticket != Some(ticket.id) {
            log_debug!(COMPONENT, "🗑️ Dropping response of stale calculation #{}", ticket.id);
            return CalculationOutcome::Superseded;
        }
        self.pending_ticket = None;

        match result {
            Ok(response) => {
                log_info!(
                    COMPONENT,
                    "✅ Calculation #{} done: {} assets, {} data points",
                    ticket.id,
                    response.assets.len(),
                    response.data_points,
                );
                self.current_result = Some(response);
                CalculationOutcome::Completed
            }
            Err(err) => {
                log_error!(COMPONENT, "❌ Calculation #{} failed: {}", ticket.id, err);
                CalculationOutcome::Failed(err)
            }
        }
    }

    /// Forgets the pending calculation, e.g. when the UI aborted it
    pub fn cancel_calculation(&mut self, ticket: &CalculationTicket) {
        if self.pending_ticket == Some(ticket.id) {
            self.pending_ticket = None;
        }
    }

    pub async fn calculate<B: AnalysisBackend>(&mut self, backend: &B) -> AppResult<&CorrelationResponse> {
        let ticket = self.prepare_calculation()?;
        let result = backend.correlation(ticket.request()).await;
        match self.finish_calculation(&ticket, result) {
            CalculationOutcome::Completed => self
                .current_result
                .as_ref()
                .ok_or_else(|| AppError::validation("No analysis result available")),
            CalculationOutcome::Failed(err) => Err(err),
            CalculationOutcome::Superseded => Err(AppError::validation("Calculation was superseded")),
        }
    }

    // --- custom assets ---------------------------------------------------

    /// Normalizes the form and rejects duplicates before anything is sent
    pub fn prepare_custom_asset(&self, form: &CustomAssetForm) -> AppResult<CustomAssetRequest> {
        let symbol = normalize_symbol(&form.symbol);
        let name = form.name.trim();
        if symbol.is_empty() || name.is_empty() {
            return Err(AppError::validation("Symbol and name are required"));
        }
        if self.catalog.contains_symbol(form.category, &symbol) {
            return Err(AppError::validation(format!(
                "{} already exists in {}",
                symbol,
                form.category.label()
            )));
        }
        Ok(CustomAssetRequest {
            symbol,
            name: name.to_string(),
            category: form.category,
            source: form
                .source
                .unwrap_or_else(|| AssetSource::for_category(form.category)),
        })
    }

    /// Registers a backend-resolved asset, selects it and shows its category
    pub fn accept_custom_asset(
        &mut self,
        request: &CustomAssetRequest,
        asset: AssetDescriptor,
    ) -> AppResult<TechnicalSymbol> {
        let category = request.category;
        let resolved = normalize_symbol(asset.technical_symbol.value());
        if self.catalog.contains_symbol(category, &resolved) {
            return Err(AppError::validation(format!(
                "{} already exists in {}",
                resolved,
                category.label()
            )));
        }

        let display = asset.symbol.clone();
        let technical = asset.technical_symbol.clone();
        self.catalog.push_custom(category, asset);
        self.rebuild_mapping();
        self.add(&display, technical.clone(), category);
        self.switch_category(category);

        log_info!(COMPONENT, "⭐ Custom asset {} → {} added to {}", display, technical, category);
        Ok(technical)
    }

    pub async fn add_custom_asset<B: AnalysisBackend>(
        &mut self,
        backend: &B,
        form: &CustomAssetForm,
    ) -> AppResult<TechnicalSymbol> {
        let request = self.prepare_custom_asset(form)?;
        let asset = backend.add_custom_asset(&request).await?;
        self.accept_custom_asset(&request, asset)
    }

    // --- export ----------------------------------------------------------

    /// Matrix to export, if an analysis has completed
    pub fn export_matrix(&self) -> Option<&CorrelationMatrix> {
        self.current_result.as_ref().map(|r| &r.correlation_matrix)
    }

    /// `Ok(None)` when there is nothing to export yet
    pub async fn export<B: AnalysisBackend>(&self, backend: &B) -> AppResult<Option<ExportFile>> {
        let Some(matrix) = self.export_matrix() else {
            return Ok(None);
        };
        backend
            .export(matrix)
            .await
            .map(Some)
            .map_err(export_error)
    }

    // --- secondary queries -----------------------------------------------

    pub fn prepare_search(query: &str) -> AppResult<String> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_QUERY_LEN {
            return Err(AppError::validation(format!(
                "Enter at least {} characters to search",
                MIN_SEARCH_QUERY_LEN
            )));
        }
        Ok(query.to_string())
    }

    pub async fn search_assets<B: AnalysisBackend>(backend: &B, query: &str) -> AppResult<Vec<SearchResult>> {
        let query = Self::prepare_search(query)?;
        backend.search_assets(&query).await
    }

    /// Snapshot of the selection to price; empty selections are rejected
    pub fn prepare_prices(&self) -> AppResult<SelectionSet> {
        if self.selection.is_empty() {
            return Err(AppError::validation("Select at least one asset"));
        }
        Ok(self.selection.clone())
    }

    pub async fn latest_prices<B: AnalysisBackend>(&self, backend: &B) -> AppResult<LatestPrices> {
        let assets = self.prepare_prices()?;
        backend.latest_prices(&assets).await
    }

    /// Both symbols must come from the current result and differ
    pub fn prepare_rolling(
        &self,
        asset1: &TechnicalSymbol,
        asset2: &TechnicalSymbol,
        window: Option<u32>,
    ) -> AppResult<RollingCorrelationRequest> {
        let Some(result) = self.current_result.as_ref() else {
            return Err(AppError::validation("Run an analysis first"));
        };
        if asset1 == asset2 {
            return Err(AppError::validation("Select two different assets"));
        }
        for asset in [asset1, asset2] {
            if !result.assets.contains(asset) {
                return Err(AppError::validation(format!("{} is not part of the current analysis", asset)));
            }
        }
        let window = window.unwrap_or(DEFAULT_ROLLING_WINDOW);
        if window < 2 {
            return Err(AppError::validation("Rolling window must be at least 2"));
        }
        Ok(RollingCorrelationRequest {
            asset1: asset1.clone(),
            asset2: asset2.clone(),
            period: self.period,
            window,
        })
    }

    pub async fn rolling_correlation<B: AnalysisBackend>(
        &self,
        backend: &B,
        asset1: &TechnicalSymbol,
        asset2: &TechnicalSymbol,
        window: Option<u32>,
    ) -> AppResult<RollingCorrelation> {
        let request = self.prepare_rolling(asset1, asset2, window)?;
        backend.rolling_correlation(&request).await
    }

    // --- lifecycle -------------------------------------------------------

    pub async fn load_catalog<B: AnalysisBackend>(&mut self, backend: &B) -> AppResult<()> {
        let listing = backend.assets().await?;
        self.apply_catalog(listing);
        Ok(())
    }

    /// Network half of startup: health check, then the catalog. Stops at the
    /// first failure; an unreachable backend is reported as a network error.
    pub async fn fetch_startup<B: AnalysisBackend>(backend: &B) -> AppResult<CatalogListing> {
        if let Err(err) = backend.health().await {
            log_error!(COMPONENT, "❌ Health check failed: {}", err);
            return Err(connection_error(err));
        }
        backend.assets().await
    }

    /// Installs the startup catalog and the default selection
    pub fn finish_startup(&mut self, listing: CatalogListing) {
        self.apply_catalog(listing);
        self.apply_default_selection();
    }

    pub async fn initialize<B: AnalysisBackend>(&mut self, backend: &B) -> AppResult<()> {
        let listing = Self::fetch_startup(backend).await?;
        self.finish_startup(listing);
        Ok(())
    }
}

/// Health-check failures other than timeouts read as "cannot connect"
fn connection_error(err: AppError) -> AppError {
    match err {
        AppError::Network(_) | AppError::Timeout(_) => err,
        _ => AppError::Network("Cannot connect to the server. Make sure the backend is running.".to_string()),
    }
}

/// Export problems are reported generically; the detail goes to the log
pub fn export_error(err: AppError) -> AppError {
    log_error!(COMPONENT, "❌ Export failed: {}", err);
    AppError::Export("Export failed".to_string())
}
