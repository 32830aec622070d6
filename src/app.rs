use crate::{log_info, log_warn};
use futures::future::{AbortHandle, Abortable};
use leptos::*;
use once_cell::sync::Lazy;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;
use strum::IntoEnumIterator;

use crate::{
    application::{
        CalculationOutcome, CustomAssetForm, SelectionController, export_error,
    },
    domain::{
        analysis::{
            AnalysisBackend, AnalysisViewService, DiversificationRating, Heatmap, LatestPrices, PairLine,
            PerformanceBar, RollingCorrelation, SearchResult, StatisticsRow, heatmap_color,
        },
        assets::{AssetCategory, AssetDescriptor, DisplaySymbol, SelectedTag, TechnicalSymbol, TimePeriod},
        errors::AppError,
        logging::{LogComponent, LogLevel, MemoryLogger},
    },
    infrastructure::{BrowserApi, services::download_text_file},
};

const DEBUG_LOG_CAPACITY: usize = 200;

static DEBUG_LOG: Lazy<Arc<MemoryLogger>> =
    Lazy::new(|| Arc::new(MemoryLogger::new(LogLevel::Debug, DEBUG_LOG_CAPACITY)));

/// Log sink behind the debug console panel
pub fn debug_log() -> Arc<MemoryLogger> {
    Arc::clone(&DEBUG_LOG)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

/// Handles shared by every component. The controller is only borrowed inside
/// `read`/`update`, never across an `.await`.
#[derive(Clone, Copy)]
pub struct AppState {
    controller: StoredValue<Rc<RefCell<SelectionController>>>,
    api: StoredValue<Rc<BrowserApi>>,
    revision: RwSignal<u64>,
    notice: RwSignal<Option<Notice>>,
    period_labels: RwSignal<BTreeMap<String, String>>,
    calculation: StoredValue<Option<AbortHandle>>,
}

impl AppState {
    fn new() -> Self {
        Self {
            controller: store_value(Rc::new(RefCell::new(SelectionController::new()))),
            api: store_value(Rc::new(BrowserApi::browser())),
            revision: create_rw_signal(0),
            notice: create_rw_signal(None),
            period_labels: create_rw_signal(BTreeMap::new()),
            calculation: store_value(None),
        }
    }

    /// Reactive read of the controller
    fn read<R>(&self, f: impl FnOnce(&SelectionController) -> R) -> R {
        self.revision.get();
        self.controller.with_value(|controller| f(&controller.borrow()))
    }

    fn update<R>(&self, f: impl FnOnce(&mut SelectionController) -> R) -> R {
        let out = self
            .controller
            .with_value(|controller| f(&mut controller.borrow_mut()));
        self.revision.update(|r| *r += 1);
        out
    }

    fn api(&self) -> Rc<BrowserApi> {
        self.api.get_value()
    }

    fn notify(&self, kind: NoticeKind, text: impl Into<String>) {
        self.notice.set(Some(Notice { kind, text: text.into() }));
    }

    fn notify_error(&self, err: &AppError) {
        self.notify(NoticeKind::Error, err.to_string());
    }

    fn clear_notice(&self) {
        self.notice.set(None);
    }
}

/// Everything the results panel shows, derived from the current result
#[derive(Debug, Clone, PartialEq)]
struct ResultsView {
    heatmap: Heatmap,
    statistics: Vec<StatisticsRow>,
    performance: Vec<PerformanceBar>,
    positive_pairs: Vec<PairLine>,
    negative_pairs: Vec<PairLine>,
    diversification_score: f64,
    data_points: usize,
    date_range: String,
    assets: Vec<(TechnicalSymbol, String)>,
}

impl ResultsView {
    fn from_controller(controller: &SelectionController) -> Option<Self> {
        let response = controller.current_result()?;
        let service = AnalysisViewService::new(controller.mapping());
        Some(Self {
            heatmap: service.heatmap(response),
            statistics: service.statistics_rows(response),
            performance: service.performance_bars(response),
            positive_pairs: service.pair_lines(&response.highly_correlated.positive),
            negative_pairs: service.pair_lines(&response.highly_correlated.negative),
            diversification_score: response.diversification_score,
            data_points: response.data_points,
            date_range: format!("{} → {}", response.start_date, response.end_date),
            assets: response
                .assets
                .iter()
                .map(|s| (s.clone(), controller.display_for(s).to_string()))
                .collect(),
        })
    }
}

/// Root component: loads the catalog and lays out the panels
#[component]
pub fn App() -> impl IntoView {
    let state = AppState::new();

    spawn_local(async move {
        state.notify(NoticeKind::Info, "Connecting to the analysis server...");
        let api = state.api();

        match SelectionController::fetch_startup(&*api).await {
            Ok(listing) => {
                state.update(|c| c.finish_startup(listing));
                state.clear_notice();
            }
            Err(err) => {
                state.notify_error(&err);
                return;
            }
        }
        match api.periods().await {
            Ok(labels) => state.period_labels.set(labels),
            Err(err) => log_warn!(
                LogComponent::Presentation("App"),
                "⚠️ Period labels unavailable, using built-in ones: {}",
                err,
            ),
        }
    });

    view! {
        <style>{STYLES}</style>
        <div class="correlation-app">
            <header class="header">
                <h1>"📊 Asset Correlation Matrix"</h1>
                <p class="subtitle">"Pick assets across categories and compare how they move together"</p>
            </header>
            <NoticeBar state=state/>
            <div class="layout">
                <section class="panel selection-panel">
                    <CategoryTabs state=state/>
                    <AssetGrid state=state/>
                    <SelectedAssets state=state/>
                    <AnalysisControls state=state/>
                    <CustomAssetPanel state=state/>
                    <SearchPanel state=state/>
                </section>
                <section class="panel results-panel">
                    <ResultsPanel state=state/>
                    <PricesPanel state=state/>
                </section>
            </div>
            <DebugConsole/>
        </div>
    }
}

#[component]
fn NoticeBar(state: AppState) -> impl IntoView {
    view! {
        {move || {
            state.notice.get().map(|notice| {
                let class = match notice.kind {
                    NoticeKind::Info => "notice info",
                    NoticeKind::Success => "notice success",
                    NoticeKind::Error => "notice error",
                };
                view! {
                    <div class=class>
                        <span>{notice.text}</span>
                        <button class="notice-close" on:click=move |_| state.clear_notice()>"×"</button>
                    </div>
                }
            })
        }}
    }
}

#[component]
fn CategoryTabs(state: AppState) -> impl IntoView {
    view! {
        <div class="tabs">
            {AssetCategory::all()
                .map(|category| {
                    view! {
                        <button
                            class="tab"
                            class:active=move || state.read(|c| c.active_category() == category)
                            on:click=move |_| state.update(|c| c.switch_category(category))
                        >
                            {category.label()}
                            <span class="tab-count">
                                {move || state.read(|c| c.selection().symbols(category).len())}
                            </span>
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}

#[component]
fn AssetGrid(state: AppState) -> impl IntoView {
    let assets = move || {
        state.read(|c| {
            let category = c.active_category();
            c.catalog()
                .assets(category)
                .map(|asset| (category, asset.clone(), c.is_selected(category, &asset.technical_symbol)))
                .collect::<Vec<(AssetCategory, AssetDescriptor, bool)>>()
        })
    };

    view! {
        <div class="asset-grid">
            {move || {
                let assets = assets();
                if assets.is_empty() {
                    return view! { <p class="empty">"No assets in this category yet"</p> }.into_view();
                }
                assets
                    .into_iter()
                    .map(|(category, asset, selected)| {
                        let display = asset.symbol.clone();
                        let technical = asset.technical_symbol.clone();
                        view! {
                            <button
                                class="asset-card"
                                class:selected=selected
                                class:custom=asset.custom
                                title=asset.technical_symbol.to_string()
                                on:click=move |_| {
                                    let technical = technical.clone();
                                    state.update(|c| c.toggle(&display, technical, category));
                                }
                            >
                                <span class="asset-symbol">{asset.symbol.to_string()}</span>
                                <span class="asset-name">{asset.name.clone()}</span>
                            </button>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}

#[component]
fn SelectedAssets(state: AppState) -> impl IntoView {
    view! {
        <div class="selected">
            <div class="selected-header">
                <span>{move || format!("Selected: {}", state.read(|c| c.total_selected()))}</span>
                <button class="link-btn" on:click=move |_| state.update(|c| c.reset())>"Clear all"</button>
            </div>
            <div class="tags">
                <For
                    each=move || state.read(|c| c.selected_tags())
                    key=|tag: &SelectedTag| (tag.category, tag.technical.clone())
                    children=move |tag: SelectedTag| {
                        let display = DisplaySymbol::new(tag.display.clone());
                        let technical = tag.technical.clone();
                        let category = tag.category;
                        view! {
                            <span class="tag">
                                {tag.display.clone()}
                                <button
                                    class="tag-remove"
                                    on:click=move |_| {
                                        state.update(|c| c.remove(&display, &technical, category));
                                    }
                                >
                                    "×"
                                </button>
                            </span>
                        }
                    }
                />
            </div>
        </div>
    }
}

#[component]
fn AnalysisControls(state: AppState) -> impl IntoView {
    let period_label = move |period: TimePeriod| {
        state
            .period_labels
            .with(|labels| labels.get(period.as_ref()).cloned())
            .unwrap_or_else(|| period.label().to_string())
    };

    view! {
        <div class="controls">
            <select
                class="period-select"
                on:change=move |ev| {
                    match event_target_value(&ev).parse::<TimePeriod>() {
                        Ok(period) => state.update(|c| c.set_period(period)),
                        Err(_) => log_warn!(
                            LogComponent::Presentation("AnalysisControls"),
                            "⚠️ Unknown period selected",
                        ),
                    }
                }
            >
                {TimePeriod::iter()
                    .map(|period| {
                        view! {
                            <option
                                value=period.to_string()
                                selected=move || state.read(|c| c.period() == period)
                            >
                                {move || period_label(period)}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
            <button
                class="primary-btn"
                disabled=move || state.read(|c| !c.is_calculate_enabled() || c.is_busy())
                on:click=move |_| start_calculation(state)
            >
                {move || if state.read(|c| c.is_busy()) { "⏳ Calculating..." } else { "🧮 Calculate correlation" }}
            </button>
        </div>
    }
}

fn start_calculation(state: AppState) {
    let ticket = match state.update(|c| c.prepare_calculation()) {
        Ok(ticket) => ticket,
        Err(err) => {
            state.notify_error(&err);
            return;
        }
    };

    let (handle, registration) = AbortHandle::new_pair();
    state.calculation.update_value(|pending| {
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
        }
    });
    state.notify(NoticeKind::Info, "Calculating correlations...");

    let api = state.api();
    spawn_local(async move {
        let request = ticket.request().clone();
        let call = Abortable::new(async move { api.correlation(&request).await }, registration);
        match call.await {
            Ok(result) => match state.update(|c| c.finish_calculation(&ticket, result)) {
                CalculationOutcome::Completed => state.notify(NoticeKind::Success, "Analysis complete"),
                CalculationOutcome::Failed(err) => state.notify_error(&err),
                CalculationOutcome::Superseded => {}
            },
            Err(_aborted) => state.update(|c| c.cancel_calculation(&ticket)),
        }
    });
}

fn submit_custom_asset(state: AppState, form: CustomAssetForm) {
    let request = match state.read(|c| c.prepare_custom_asset(&form)) {
        Ok(request) => request,
        Err(err) => {
            state.notify_error(&err);
            return;
        }
    };
    state.notify(NoticeKind::Info, format!("Adding {}...", request.symbol));

    let api = state.api();
    spawn_local(async move {
        let accepted = match api.add_custom_asset(&request).await {
            Ok(asset) => state.update(|c| c.accept_custom_asset(&request, asset)),
            Err(err) => Err(err),
        };
        match accepted {
            Ok(technical) => state.notify(
                NoticeKind::Success,
                format!("{} added to {}", technical, request.category.label()),
            ),
            Err(err) => state.notify_error(&err),
        }
    });
}

#[component]
fn CustomAssetPanel(state: AppState) -> impl IntoView {
    let symbol = create_rw_signal(String::new());
    let name = create_rw_signal(String::new());
    let category = create_rw_signal(AssetCategory::default());

    let submit = move |_| {
        submit_custom_asset(
            state,
            CustomAssetForm {
                symbol: symbol.get_untracked(),
                name: name.get_untracked(),
                category: category.get_untracked(),
                source: None,
            },
        );
        symbol.set(String::new());
        name.set(String::new());
    };

    view! {
        <div class="custom-asset">
            <h3>"➕ Custom asset"</h3>
            <input
                placeholder="Symbol (e.g. NVDA)"
                prop:value=move || symbol.get()
                on:input=move |ev| symbol.set(event_target_value(&ev))
            />
            <input
                placeholder="Name"
                prop:value=move || name.get()
                on:input=move |ev| name.set(event_target_value(&ev))
            />
            <select on:change=move |ev| {
                if let Ok(parsed) = event_target_value(&ev).parse::<AssetCategory>() {
                    category.set(parsed);
                }
            }>
                {AssetCategory::all()
                    .map(|c| {
                        view! {
                            <option value=c.to_string() selected=move || category.get() == c>
                                {c.label()}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
            <button class="secondary-btn" on:click=submit>"Add"</button>
        </div>
    }
}

#[component]
fn SearchPanel(state: AppState) -> impl IntoView {
    let query = create_rw_signal(String::new());
    let results = create_rw_signal(Vec::<SearchResult>::new());
    let searching = create_rw_signal(false);

    let search = move || {
        let raw = query.get_untracked();
        let api = state.api();
        searching.set(true);
        spawn_local(async move {
            match SelectionController::search_assets(&*api, &raw).await {
                Ok(found) => {
                    if found.is_empty() {
                        state.notify(NoticeKind::Info, format!("No assets found for \"{}\"", raw.trim()));
                    }
                    results.set(found);
                }
                Err(err) => state.notify_error(&err),
            }
            searching.set(false);
        });
    };

    view! {
        <div class="search">
            <h3>"🔍 Search assets"</h3>
            <div class="search-row">
                <input
                    placeholder="Search by symbol or name"
                    prop:value=move || query.get()
                    on:input=move |ev| query.set(event_target_value(&ev))
                    on:keydown=move |ev| {
                        if ev.key() == "Enter" {
                            search();
                        }
                    }
                />
                <button class="secondary-btn" disabled=move || searching.get() on:click=move |_| search()>
                    "Search"
                </button>
            </div>
            <ul class="search-results">
                {move || {
                    results
                        .get()
                        .into_iter()
                        .map(|hit| {
                            let price = hit.price.map(|p| format!("${:.2}", p)).unwrap_or_default();
                            let form = CustomAssetForm {
                                symbol: hit.symbol.clone(),
                                name: hit.name.clone(),
                                category: hit
                                    .category()
                                    .unwrap_or_else(|| state.read(|c| c.active_category())),
                                source: hit.source(),
                            };
                            view! {
                                <li>
                                    <span class="asset-symbol">{hit.symbol.clone()}</span>
                                    <span class="asset-name">{hit.name.clone()}</span>
                                    <span class="muted">{hit.category.clone()}</span>
                                    <span>{price}</span>
                                    <button
                                        class="link-btn"
                                        on:click=move |_| submit_custom_asset(state, form.clone())
                                    >
                                        "Add"
                                    </button>
                                </li>
                            }
                        })
                        .collect_view()
                }}
            </ul>
        </div>
    }
}

#[component]
fn ResultsPanel(state: AppState) -> impl IntoView {
    let results = create_memo(move |_| state.read(ResultsView::from_controller));

    view! {
        {move || match results.get() {
            None => view! {
                <div class="placeholder">"Select at least two assets and run an analysis"</div>
            }
            .into_view(),
            Some(results) => {
                let rating = DiversificationRating::from_score(results.diversification_score);
                view! {
                    <div class="metrics">
                        <div class="metric">
                            <span class="metric-label">"Diversification"</span>
                            <span class="metric-value" style:color=rating.color()>
                                {format!("{:.3}", results.diversification_score)}
                            </span>
                        </div>
                        <div class="metric">
                            <span class="metric-label">"Data points"</span>
                            <span class="metric-value">{results.data_points}</span>
                        </div>
                        <div class="metric">
                            <span class="metric-label">"Range"</span>
                            <span class="metric-value small">{results.date_range.clone()}</span>
                        </div>
                        <button class="secondary-btn" on:click=move |_| export_current(state)>
                            "💾 Export CSV"
                        </button>
                    </div>
                    <CorrelationHeatmap heatmap=results.heatmap.clone()/>
                    <StatisticsTable rows=results.statistics.clone()/>
                    <PerformanceChart bars=results.performance.clone()/>
                    <div class="pairs">
                        <PairList title="Highly correlated" pairs=results.positive_pairs.clone()/>
                        <PairList title="Negatively correlated" pairs=results.negative_pairs.clone()/>
                    </div>
                    <RollingPanel state=state assets=results.assets.clone()/>
                }
                .into_view()
            }
        }}
    }
}

#[component]
fn CorrelationHeatmap(heatmap: Heatmap) -> impl IntoView {
    let header = heatmap.labels.clone();
    view! {
        <table class="heatmap">
            <thead>
                <tr>
                    <th></th>
                    {header.into_iter().map(|label| view! { <th>{label}</th> }).collect_view()}
                </tr>
            </thead>
            <tbody>
                {heatmap
                    .labels
                    .into_iter()
                    .zip(heatmap.values)
                    .map(|(label, row)| {
                        view! {
                            <tr>
                                <th>{label}</th>
                                {row
                                    .into_iter()
                                    .map(|cell| match cell {
                                        Some(value) => view! {
                                            <td style:background=heatmap_color(value)>{format!("{:.2}", value)}</td>
                                        }
                                        .into_view(),
                                        None => view! { <td class="muted">"-"</td> }.into_view(),
                                    })
                                    .collect_view()}
                            </tr>
                        }
                    })
                    .collect_view()}
            </tbody>
        </table>
    }
}

#[component]
fn StatisticsTable(rows: Vec<StatisticsRow>) -> impl IntoView {
    view! {
        <table class="stats">
            <thead>
                <tr>
                    <th>"Asset"</th>
                    <th>"Mean return"</th>
                    <th>"Volatility"</th>
                    <th>"Sharpe"</th>
                    <th>"Beta"</th>
                    <th>"Skew"</th>
                    <th>"Kurtosis"</th>
                    <th>"Positive days"</th>
                </tr>
            </thead>
            <tbody>
                {rows
                    .into_iter()
                    .map(|row| {
                        view! {
                            <tr>
                                <td>{row.symbol}</td>
                                <td class:positive=row.mean_is_positive class:negative=!row.mean_is_positive>
                                    {row.mean_return}
                                </td>
                                <td>{row.volatility}</td>
                                <td class:positive=row.sharpe_is_positive class:negative=!row.sharpe_is_positive>
                                    {row.sharpe_ratio}
                                </td>
                                <td>{row.beta}</td>
                                <td>{row.skewness}</td>
                                <td>{row.kurtosis}</td>
                                <td>{row.positive_days}</td>
                            </tr>
                        }
                    })
                    .collect_view()}
            </tbody>
        </table>
    }
}

#[component]
fn PerformanceChart(bars: Vec<PerformanceBar>) -> impl IntoView {
    view! {
        <div class="performance">
            <h3>"Total return"</h3>
            {bars
                .into_iter()
                .map(|bar| {
                    let positive = bar.return_pct >= 0.0;
                    view! {
                        <div class="bar-row">
                            <span class="bar-label">{bar.label}</span>
                            <div class="bar-track">
                                <div
                                    class="bar"
                                    class:positive=positive
                                    class:negative=!positive
                                    style:width=format!("{:.1}%", bar.width * 100.0)
                                ></div>
                            </div>
                            <span class="bar-value">{format!("{:+.2}%", bar.return_pct)}</span>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}

#[component]
fn PairList(title: &'static str, pairs: Vec<PairLine>) -> impl IntoView {
    view! {
        <div class="pair-list">
            <h3>{title}</h3>
            {if pairs.is_empty() {
                view! { <p class="muted">"None"</p> }.into_view()
            } else {
                pairs
                    .into_iter()
                    .map(|pair| view! { <div class="pair">{pair.assets}<b>{pair.correlation}</b></div> })
                    .collect_view()
            }}
        </div>
    }
}

#[component]
fn RollingPanel(state: AppState, assets: Vec<(TechnicalSymbol, String)>) -> impl IntoView {
    let first = create_rw_signal(assets.first().map(|(s, _)| s.clone()));
    let second = create_rw_signal(assets.get(1).map(|(s, _)| s.clone()));
    let series = create_rw_signal(None::<RollingCorrelation>);

    let options = move |selected: RwSignal<Option<TechnicalSymbol>>| {
        assets
            .iter()
            .map(|(symbol, label)| {
                let value = symbol.clone();
                let current = symbol.clone();
                view! {
                    <option
                        value=value.to_string()
                        selected=move || selected.get().as_ref() == Some(&current)
                    >
                        {label.clone()}
                    </option>
                }
            })
            .collect_view()
    };
    let first_options = options(first);
    let second_options = options(second);

    let run = move |_| {
        let (Some(a), Some(b)) = (first.get_untracked(), second.get_untracked()) else {
            state.notify_error(&AppError::validation("Select two assets"));
            return;
        };
        let request = match state.read(|c| c.prepare_rolling(&a, &b, None)) {
            Ok(request) => request,
            Err(err) => {
                state.notify_error(&err);
                return;
            }
        };
        let api = state.api();
        spawn_local(async move {
            match api.rolling_correlation(&request).await {
                Ok(result) => series.set(Some(result)),
                Err(err) => state.notify_error(&err),
            }
        });
    };

    view! {
        <div class="rolling">
            <h3>"Rolling correlation"</h3>
            <select on:change=move |ev| first.set(Some(TechnicalSymbol::new(event_target_value(&ev))))>
                {first_options}
            </select>
            <select on:change=move |ev| second.set(Some(TechnicalSymbol::new(event_target_value(&ev))))>
                {second_options}
            </select>
            <button class="secondary-btn" on:click=run>"Show"</button>
            {move || {
                series.get().map(|s| {
                    let latest = s.latest().map(|v| format!("{:.3}", v)).unwrap_or_else(|| "-".to_string());
                    view! {
                        <p class="muted">
                            {format!("{} windows, latest {}", s.values.len(), latest)}
                        </p>
                    }
                })
            }}
        </div>
    }
}

fn export_current(state: AppState) {
    let Some(matrix) = state.read(|c| c.export_matrix().cloned()) else {
        return;
    };
    let api = state.api();
    spawn_local(async move {
        let exported = api.export(&matrix).await.map_err(export_error);
        match exported.and_then(|file| download_text_file(&file.filename, &file.csv, "text/csv")) {
            Ok(()) => state.notify(NoticeKind::Success, "Correlation matrix exported"),
            Err(err) => state.notify_error(&err),
        }
    });
}

#[component]
fn PricesPanel(state: AppState) -> impl IntoView {
    let prices = create_rw_signal(None::<LatestPrices>);

    let refresh = move |_| {
        let assets = match state.read(|c| c.prepare_prices()) {
            Ok(assets) => assets,
            Err(err) => {
                state.notify_error(&err);
                return;
            }
        };
        let api = state.api();
        spawn_local(async move {
            match api.latest_prices(&assets).await {
                Ok(latest) => prices.set(Some(latest)),
                Err(err) => state.notify_error(&err),
            }
        });
    };

    view! {
        <div class="prices">
            <div class="selected-header">
                <h3>"💰 Latest prices"</h3>
                <button class="link-btn" on:click=refresh>"Refresh"</button>
            </div>
            {move || {
                prices.get().map(|latest| {
                    latest
                        .prices
                        .into_iter()
                        .map(|(symbol, price)| {
                            let label = state.read(|c| c.display_for(&symbol).to_string());
                            view! {
                                <div class="price-row">
                                    <span>{label}</span>
                                    <b>{format!("${:.2}", price)}</b>
                                </div>
                            }
                        })
                        .collect_view()
                })
            }}
        </div>
    }
}

/// Debug console fed by the in-memory log sink
#[component]
fn DebugConsole() -> impl IntoView {
    let lines = create_rw_signal(debug_log().lines());
    let is_paused = create_rw_signal(false);

    let poll = gloo::timers::callback::Interval::new(1_000, move || {
        if !is_paused.get_untracked() {
            lines.set(debug_log().lines());
        }
    });
    on_cleanup(move || drop(poll));

    view! {
        <div class="debug-console">
            <div class="debug-header">
                <span>"🐛 Debug console"</span>
                <button
                    class="debug-btn"
                    on:click=move |_| {
                        is_paused.update(|p| *p = !*p);
                        let message = if is_paused.get_untracked() { "🛑 Logging paused" } else { "▶️ Logging resumed" };
                        log_info!(LogComponent::Presentation("DebugConsole"), "{}", message);
                    }
                >
                    {move || if is_paused.get() { "▶️ Resume" } else { "⏸️ Pause" }}
                </button>
                <button
                    class="debug-btn"
                    on:click=move |_| {
                        debug_log().clear();
                        lines.set(Vec::new());
                    }
                >
                    "🗑️ Clear"
                </button>
            </div>
            <div class="debug-log">
                {move || {
                    lines
                        .get()
                        .into_iter()
                        .rev()
                        .map(|line| view! { <div class="log-line">{line}</div> })
                        .collect_view()
                }}
            </div>
        </div>
    }
}

const STYLES: &str = r#"
.correlation-app {
    font-family: 'SF Pro Display', -apple-system, BlinkMacSystemFont, sans-serif;
    background: linear-gradient(135deg, #1e3c72 0%, #2a5298 100%);
    min-height: 100vh;
    padding: 20px;
    color: white;
}
.header, .panel, .debug-console {
    background: rgba(255, 255, 255, 0.1);
    border: 1px solid rgba(255, 255, 255, 0.2);
    border-radius: 15px;
    padding: 20px;
    margin-bottom: 20px;
}
.header { text-align: center; }
.subtitle, .muted { color: #a0a0a0; }
.layout { display: grid; grid-template-columns: minmax(320px, 1fr) 2fr; gap: 20px; }
.notice { display: flex; justify-content: space-between; padding: 10px 15px; border-radius: 8px; margin-bottom: 15px; }
.notice.info { background: rgba(59, 130, 246, 0.3); }
.notice.success { background: rgba(16, 185, 129, 0.3); }
.notice.error { background: rgba(239, 68, 68, 0.35); }
.notice-close, .tag-remove, .link-btn { background: none; border: none; color: inherit; cursor: pointer; }
.tabs { display: flex; gap: 6px; margin-bottom: 12px; }
.tab { flex: 1; padding: 8px; border-radius: 8px; border: none; background: rgba(0, 0, 0, 0.2); color: white; cursor: pointer; }
.tab.active { background: #72c685; color: #0b1f3a; }
.tab-count { margin-left: 6px; font-size: 11px; opacity: 0.8; }
.asset-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(110px, 1fr)); gap: 8px; }
.asset-card { display: flex; flex-direction: column; padding: 8px; border-radius: 8px; border: 1px solid transparent; background: rgba(0, 0, 0, 0.2); color: white; cursor: pointer; }
.asset-card.selected { border-color: #72c685; background: rgba(114, 198, 133, 0.2); }
.asset-card.custom .asset-symbol::after { content: " ★"; color: #f59e0b; }
.asset-symbol { font-weight: 700; }
.asset-name { font-size: 11px; color: #d0d0d0; }
.selected-header { display: flex; justify-content: space-between; align-items: center; margin: 12px 0 6px; }
.tags { display: flex; flex-wrap: wrap; gap: 6px; }
.tag { background: rgba(114, 198, 133, 0.25); padding: 4px 8px; border-radius: 12px; font-size: 12px; }
.controls, .search-row { display: flex; gap: 8px; margin: 12px 0; }
.primary-btn { flex: 1; padding: 10px; border: none; border-radius: 8px; background: #72c685; color: #0b1f3a; font-weight: 700; cursor: pointer; }
.primary-btn:disabled, .secondary-btn:disabled { opacity: 0.5; cursor: not-allowed; }
.secondary-btn { padding: 8px 12px; border: none; border-radius: 8px; background: rgba(255, 255, 255, 0.2); color: white; cursor: pointer; }
input, select { padding: 8px; border-radius: 8px; border: none; background: rgba(0, 0, 0, 0.25); color: white; }
.custom-asset { display: flex; flex-wrap: wrap; gap: 6px; margin-top: 12px; }
.custom-asset h3, .search h3 { width: 100%; margin: 4px 0; }
.search-results { list-style: none; padding: 0; }
.search-results li { display: flex; gap: 8px; align-items: center; padding: 4px 0; }
.placeholder { text-align: center; color: #a0a0a0; padding: 60px 0; }
.metrics { display: flex; gap: 20px; align-items: center; margin-bottom: 16px; }
.metric { display: flex; flex-direction: column; }
.metric-label { font-size: 12px; color: #a0a0a0; }
.metric-value { font-size: 22px; font-weight: 700; }
.metric-value.small { font-size: 14px; }
table { border-collapse: collapse; width: 100%; margin-bottom: 16px; font-size: 12px; }
th, td { padding: 6px; text-align: center; }
.heatmap td { color: white; font-weight: 600; }
.positive { color: #10b981; }
.negative { color: #ef4444; }
.bar-row { display: flex; align-items: center; gap: 8px; margin: 4px 0; }
.bar-label { width: 80px; }
.bar-track { flex: 1; background: rgba(0, 0, 0, 0.2); border-radius: 4px; height: 12px; }
.bar { height: 12px; border-radius: 4px; }
.bar.positive { background: #10b981; }
.bar.negative { background: #ef4444; }
.pairs { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; }
.pair { display: flex; justify-content: space-between; padding: 2px 0; }
.rolling { display: flex; flex-wrap: wrap; gap: 8px; align-items: center; margin-top: 16px; }
.rolling h3 { width: 100%; margin: 4px 0; }
.price-row { display: flex; justify-content: space-between; padding: 2px 0; }
.debug-header { display: flex; gap: 10px; align-items: center; }
.debug-btn { background: rgba(0, 0, 0, 0.3); border: none; border-radius: 6px; color: white; padding: 4px 8px; cursor: pointer; }
.debug-log { max-height: 200px; overflow-y: auto; font-family: monospace; font-size: 11px; margin-top: 8px; }
"#;
