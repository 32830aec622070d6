//! Wire shapes of backend responses that do not map 1:1 onto domain types.

use crate::domain::assets::{AssetCategory, AssetDescriptor, AssetSource, DisplaySymbol, TechnicalSymbol};
use crate::domain::analysis::SearchResult;
use serde::{Deserialize, Serialize};

/// Catalog entry as served by `/assets` and `/add-custom-asset`.
/// `technical_symbol` is optional on the wire; when absent the display
/// symbol doubles as the technical one.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetDto {
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub technical_symbol: Option<String>,
    #[serde(default)]
    pub category: Option<AssetCategory>,
    #[serde(default)]
    pub source: Option<AssetSource>,
    #[serde(default)]
    pub custom: bool,
}

impl AssetDto {
    pub fn into_descriptor(self) -> AssetDescriptor {
        let technical = self
            .technical_symbol
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.symbol.clone());
        AssetDescriptor {
            symbol: DisplaySymbol::new(self.symbol),
            name: self.name,
            technical_symbol: TechnicalSymbol::new(technical),
            category: self.category,
            source: self.source,
            custom: self.custom,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddCustomAssetResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub asset: Option<AssetDto>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Serialize)]
pub struct SearchQuery<'a> {
    pub query: &'a str,
}

#[derive(Debug, Serialize)]
pub struct PricesQuery<'a> {
    pub assets: &'a crate::domain::assets::SelectionSet,
}

#[derive(Debug, Serialize)]
pub struct ExportQuery<'a> {
    pub correlation_matrix: &'a crate::domain::analysis::CorrelationMatrix,
}
