use crate::domain::assets::TechnicalSymbol;
use serde::de::{Deserializer, IgnoredAny};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pairwise correlations keyed by technical symbol on both axes.
///
/// The backend sends a column-oriented object (`{column: {row: value}}`); the
/// matrix is symmetric so lookups do not care about the orientation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationMatrix(BTreeMap<TechnicalSymbol, BTreeMap<TechnicalSymbol, f64>>);

impl CorrelationMatrix {
    pub fn get(&self, a: &TechnicalSymbol, b: &TechnicalSymbol) -> Option<f64> {
        self.0
            .get(a)
            .and_then(|column| column.get(b))
            .or_else(|| self.0.get(b).and_then(|column| column.get(a)))
            .copied()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &TechnicalSymbol> {
        self.0.keys()
    }

    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    /// Every column has an entry for every symbol
    pub fn is_square(&self) -> bool {
        let n = self.0.len();
        self.0
            .values()
            .all(|column| column.len() == n && self.0.keys().all(|k| column.contains_key(k)))
    }

    pub fn insert(&mut self, a: TechnicalSymbol, b: TechnicalSymbol, value: f64) {
        self.0.entry(a).or_default().insert(b, value);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetStatistics {
    pub mean_return: f64,
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub skewness: f64,
    pub kurtosis: f64,
    pub max_return: f64,
    pub min_return: f64,
    pub positive_days: u32,
    pub negative_days: u32,
    pub total_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelatedPair {
    pub asset1: TechnicalSymbol,
    pub asset2: TechnicalSymbol,
    pub correlation: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlyCorrelated {
    pub positive: Vec<CorrelatedPair>,
    pub negative: Vec<CorrelatedPair>,
}

/// Full payload of a successful `/correlation` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResponse {
    pub correlation_matrix: CorrelationMatrix,
    pub assets: Vec<TechnicalSymbol>,
    #[serde(default)]
    pub asset_names: BTreeMap<TechnicalSymbol, String>,
    #[serde(default)]
    pub statistics: BTreeMap<TechnicalSymbol, AssetStatistics>,
    #[serde(default)]
    pub betas: BTreeMap<TechnicalSymbol, f64>,
    #[serde(default)]
    pub highly_correlated: HighlyCorrelated,
    /// Total return over the period, in percent. Entries that are not a
    /// number (or an object with a numeric `total_return`) are dropped.
    #[serde(default, deserialize_with = "lenient_performance")]
    pub performance_comparison: BTreeMap<TechnicalSymbol, f64>,
    pub diversification_score: f64,
    #[serde(default)]
    pub period: Option<String>,
    pub data_points: usize,
    pub start_date: String,
    pub end_date: String,
}

impl CorrelationResponse {
    /// Name from the response, else the symbol itself
    pub fn asset_name<'a>(&'a self, symbol: &'a TechnicalSymbol) -> &'a str {
        self.asset_names
            .get(symbol)
            .map(String::as_str)
            .unwrap_or_else(|| symbol.value())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PerformanceEntry {
    Percent(f64),
    Detailed { total_return: f64 },
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PerformanceShape {
    Map(BTreeMap<TechnicalSymbol, PerformanceEntry>),
    Other(IgnoredAny),
}

fn lenient_performance<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BTreeMap<TechnicalSymbol, f64>, D::Error> {
    let entries = match PerformanceShape::deserialize(deserializer)? {
        PerformanceShape::Map(entries) => entries,
        PerformanceShape::Other(_) => return Ok(BTreeMap::new()),
    };
    Ok(entries
        .into_iter()
        .filter_map(|(symbol, entry)| match entry {
            PerformanceEntry::Percent(value) | PerformanceEntry::Detailed { total_return: value } => {
                Some((symbol, value))
            }
            PerformanceEntry::Other(_) => None,
        })
        .collect())
}

/// CSV produced by `/export`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportFile {
    pub csv: String,
    pub filename: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatestPrices {
    #[serde(default)]
    pub prices: BTreeMap<TechnicalSymbol, f64>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollingCorrelation {
    pub dates: Vec<String>,
    pub values: Vec<f64>,
}

impl RollingCorrelation {
    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied()
    }
}
