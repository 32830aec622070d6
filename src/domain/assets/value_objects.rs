use derive_more::{Deref, Display, From};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString, IntoEnumIterator};

/// Partition of the asset catalog. Declaration order is the order used for
/// tabs, selected tags and request payloads.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
    StrumDisplay, EnumIter, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AssetCategory {
    #[default]
    Crypto = 0,
    Stocks = 1,
    Etfs = 2,
    Commodities = 3,
}

impl AssetCategory {
    pub const COUNT: usize = 4;

    pub fn all() -> impl Iterator<Item = AssetCategory> {
        Self::iter()
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Crypto => "Crypto",
            Self::Stocks => "Stocks",
            Self::Etfs => "ETFs",
            Self::Commodities => "Commodities",
        }
    }
}

/// Identifier sent to the backend; uniqueness key inside a category
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deref, Display, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TechnicalSymbol(String);

impl TechnicalSymbol {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TechnicalSymbol {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Human-facing ticker shown in the UI
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deref, Display, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplaySymbol(String);

impl DisplaySymbol {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DisplaySymbol {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Canonical form used for every custom-asset comparison
pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Data provider a custom asset is resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumIter, EnumString, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AssetSource {
    Yahoo,
    Coingecko,
}

impl AssetSource {
    /// Crypto goes through CoinGecko, everything else through Yahoo
    pub fn for_category(category: AssetCategory) -> Self {
        match category {
            AssetCategory::Crypto => Self::Coingecko,
            _ => Self::Yahoo,
        }
    }
}

/// One catalog entry, default or custom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    pub symbol: DisplaySymbol,
    pub name: String,
    pub technical_symbol: TechnicalSymbol,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<AssetCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<AssetSource>,
    #[serde(default)]
    pub custom: bool,
}

impl AssetDescriptor {
    pub fn new(symbol: &str, name: &str, technical_symbol: &str) -> Self {
        Self {
            symbol: DisplaySymbol::from(symbol),
            name: name.to_string(),
            technical_symbol: TechnicalSymbol::from(technical_symbol),
            category: None,
            source: None,
            custom: false,
        }
    }

    pub fn in_category(mut self, category: AssetCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// True when either identifier equals the already-normalized `symbol`
    pub fn matches_normalized(&self, symbol: &str) -> bool {
        normalize_symbol(self.symbol.value()) == symbol
            || normalize_symbol(self.technical_symbol.value()) == symbol
    }
}

/// Look-back window for the analysis
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default,
    StrumDisplay, EnumIter, EnumString, AsRefStr, Serialize, Deserialize,
)]
pub enum TimePeriod {
    #[strum(serialize = "30d")]
    #[serde(rename = "30d")]
    ThirtyDays,
    #[strum(serialize = "90d")]
    #[serde(rename = "90d")]
    NinetyDays,
    #[strum(serialize = "180d")]
    #[serde(rename = "180d")]
    SixMonths,
    #[default]
    #[strum(serialize = "1y")]
    #[serde(rename = "1y")]
    OneYear,
    #[strum(serialize = "ytd")]
    #[serde(rename = "ytd")]
    YearToDate,
}

impl TimePeriod {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ThirtyDays => "30 days",
            Self::NinetyDays => "90 days",
            Self::SixMonths => "6 months",
            Self::OneYear => "1 year",
            Self::YearToDate => "Year to date",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, EnumString, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMethod {
    Pearson,
    Spearman,
    Kendall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, EnumString, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReturnsMethod {
    Log,
    Simple,
}

/// Method sent with every analysis request
pub const CORRELATION_METHOD: CorrelationMethod = CorrelationMethod::Pearson;
pub const RETURNS_METHOD: ReturnsMethod = ReturnsMethod::Log;

/// Assets selected right after the catalog first loads
pub fn default_selection() -> [(AssetCategory, &'static str); 6] {
    [
        (AssetCategory::Crypto, "BTC"),
        (AssetCategory::Crypto, "ETH"),
        (AssetCategory::Stocks, "AAPL"),
        (AssetCategory::Stocks, "MSFT"),
        (AssetCategory::Etfs, "SPY"),
        (AssetCategory::Commodities, "GC=F"),
    ]
}
