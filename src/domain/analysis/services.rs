use super::entities::{AssetStatistics, CorrelatedPair, CorrelationResponse};
use crate::domain::assets::{DisplayMapping, TechnicalSymbol};

/// Qualitative reading of the diversification score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiversificationRating {
    Good,
    Moderate,
    Poor,
}

impl DiversificationRating {
    pub fn from_score(score: f64) -> Self {
        if score > 0.7 {
            Self::Good
        } else if score > 0.4 {
            Self::Moderate
        } else {
            Self::Poor
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Good => "#10b981",
            Self::Moderate => "#f59e0b",
            Self::Poor => "#ef4444",
        }
    }
}

/// Square grid ready to be drawn as a heatmap, rows and columns in the order
/// of `CorrelationResponse::assets`
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    pub labels: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsRow {
    pub symbol: String,
    pub mean_return: String,
    pub volatility: String,
    pub sharpe_ratio: String,
    pub beta: String,
    pub skewness: String,
    pub kurtosis: String,
    pub positive_days: String,
    pub mean_is_positive: bool,
    pub sharpe_is_positive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceBar {
    pub label: String,
    pub return_pct: f64,
    /// Bar length relative to the largest absolute return, in `0.0..=1.0`
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairLine {
    pub assets: String,
    pub correlation: String,
}

/// Turns a correlation response into display rows. Pure: no DOM access.
pub struct AnalysisViewService<'a> {
    mapping: &'a DisplayMapping,
}

impl<'a> AnalysisViewService<'a> {
    pub fn new(mapping: &'a DisplayMapping) -> Self {
        Self { mapping }
    }

    fn label(&self, symbol: &TechnicalSymbol) -> String {
        self.mapping.display_for(symbol).to_string()
    }

    pub fn heatmap(&self, response: &CorrelationResponse) -> Heatmap {
        let labels = response.assets.iter().map(|s| self.label(s)).collect();
        let values = response
            .assets
            .iter()
            .map(|row| {
                response
                    .assets
                    .iter()
                    .map(|column| response.correlation_matrix.get(row, column))
                    .collect()
            })
            .collect();
        Heatmap { labels, values }
    }

    pub fn statistics_rows(&self, response: &CorrelationResponse) -> Vec<StatisticsRow> {
        response
            .statistics
            .iter()
            .map(|(symbol, stats)| self.statistics_row(symbol, stats, response.betas.get(symbol).copied()))
            .collect()
    }

    pub fn statistics_row(&self, symbol: &TechnicalSymbol, stats: &AssetStatistics, beta: Option<f64>) -> StatisticsRow {
        let positive_share = if stats.total_days > 0 {
            f64::from(stats.positive_days) / f64::from(stats.total_days) * 100.0
        } else {
            0.0
        };
        StatisticsRow {
            symbol: self.label(symbol),
            mean_return: format!("{:.3}%", stats.mean_return * 100.0),
            volatility: format!("{:.3}%", stats.volatility * 100.0),
            sharpe_ratio: format!("{:.2}", stats.sharpe_ratio),
            beta: beta.map(|b| format!("{:.2}", b)).unwrap_or_else(|| "-".to_string()),
            skewness: format!("{:.2}", stats.skewness),
            kurtosis: format!("{:.2}", stats.kurtosis),
            positive_days: format!(
                "{:.1}% ({}/{})",
                positive_share, stats.positive_days, stats.total_days
            ),
            mean_is_positive: stats.mean_return > 0.0,
            sharpe_is_positive: stats.sharpe_ratio > 0.0,
        }
    }

    /// Best performer first
    pub fn performance_bars(&self, response: &CorrelationResponse) -> Vec<PerformanceBar> {
        let max_abs = response
            .performance_comparison
            .values()
            .fold(0.0_f64, |acc, v| acc.max(v.abs()));
        let mut bars: Vec<PerformanceBar> = response
            .performance_comparison
            .iter()
            .map(|(symbol, value)| PerformanceBar {
                label: self.label(symbol),
                return_pct: *value,
                width: if max_abs > 0.0 { value.abs() / max_abs } else { 0.0 },
            })
            .collect();
        bars.sort_by(|a, b| b.return_pct.total_cmp(&a.return_pct));
        bars
    }

    pub fn pair_lines(&self, pairs: &[CorrelatedPair]) -> Vec<PairLine> {
        pairs
            .iter()
            .map(|pair| PairLine {
                assets: format!("{} - {}", self.label(&pair.asset1), self.label(&pair.asset2)),
                correlation: format!("{:.3}", pair.correlation),
            })
            .collect()
    }
}

/// Colour stop for one heatmap cell, red (-1) through grey (0) to green (+1)
pub fn heatmap_color(value: f64) -> &'static str {
    match value {
        v if v <= -0.75 => "#ef4444",
        v if v <= -0.25 => "#f59e0b",
        v if v < 0.25 => "#6b7280",
        v if v < 0.75 => "#10b981",
        _ => "#059669",
    }
}
