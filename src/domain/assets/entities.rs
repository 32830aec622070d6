use super::value_objects::{AssetCategory, AssetDescriptor, DisplaySymbol, TechnicalSymbol};
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use std::collections::HashMap;

/// Technical symbols chosen for the next analysis, per category.
///
/// Each category keeps insertion order and never holds the same symbol twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    slots: [Vec<TechnicalSymbol>; AssetCategory::COUNT],
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, category: AssetCategory, symbol: &TechnicalSymbol) -> bool {
        self.slots[category.index()].contains(symbol)
    }

    /// Returns `false` when the symbol was already selected
    pub fn add(&mut self, category: AssetCategory, symbol: TechnicalSymbol) -> bool {
        let slot = &mut self.slots[category.index()];
        if slot.contains(&symbol) {
            return false;
        }
        slot.push(symbol);
        true
    }

    /// Returns `false` when the symbol was not selected
    pub fn remove(&mut self, category: AssetCategory, symbol: &TechnicalSymbol) -> bool {
        let slot = &mut self.slots[category.index()];
        match slot.iter().position(|s| s == symbol) {
            Some(index) => {
                slot.remove(index);
                true
            }
            None => false,
        }
    }

    /// Flips membership and returns the new state
    pub fn toggle(&mut self, category: AssetCategory, symbol: TechnicalSymbol) -> bool {
        if self.contains(category, &symbol) {
            self.remove(category, &symbol);
            false
        } else {
            self.add(category, symbol)
        }
    }

    pub fn reset(&mut self) {
        self.slots = Default::default();
    }

    pub fn symbols(&self, category: AssetCategory) -> &[TechnicalSymbol] {
        &self.slots[category.index()]
    }

    pub fn total(&self) -> usize {
        self.slots.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Category order first, then insertion order
    pub fn iter(&self) -> impl Iterator<Item = (AssetCategory, &TechnicalSymbol)> {
        AssetCategory::all().flat_map(move |category| {
            self.symbols(category).iter().map(move |symbol| (category, symbol))
        })
    }
}

/// Serialized as `{"crypto": [...], "stocks": [...], "etfs": [...], "commodities": [...]}`
impl Serialize for SelectionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(AssetCategory::COUNT))?;
        for category in AssetCategory::all() {
            map.serialize_entry(category.as_ref(), self.symbols(category))?;
        }
        map.end()
    }
}

/// Technical → display symbol lookup, rebuilt from the catalog on every load
#[derive(Debug, Clone, Default)]
pub struct DisplayMapping {
    by_technical: HashMap<TechnicalSymbol, DisplaySymbol>,
}

impl DisplayMapping {
    pub fn from_catalog(catalog: &AssetCatalog) -> Self {
        let mut mapping = Self::default();
        for category in AssetCategory::all() {
            for asset in catalog.assets(category) {
                mapping.insert(asset.symbol.clone(), asset.technical_symbol.clone());
            }
        }
        mapping
    }

    pub fn insert(&mut self, display: DisplaySymbol, technical: TechnicalSymbol) {
        self.by_technical.insert(technical, display);
    }

    /// Falls back to the technical symbol itself when no entry exists
    pub fn display_for<'a>(&'a self, technical: &'a TechnicalSymbol) -> &'a str {
        self.by_technical
            .get(technical)
            .map(DisplaySymbol::value)
            .unwrap_or_else(|| technical.value())
    }
}

#[derive(Debug, Clone, Default)]
struct CategoryAssets {
    defaults: Vec<AssetDescriptor>,
    custom: Vec<AssetDescriptor>,
}

/// Assets offered per category: the backend's default list plus whatever the
/// user added during the session.
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    categories: [CategoryAssets; AssetCategory::COUNT],
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the default list of one category; custom assets are kept
    pub fn set_defaults(&mut self, category: AssetCategory, assets: Vec<AssetDescriptor>) {
        self.categories[category.index()].defaults = assets
            .into_iter()
            .map(|asset| asset.in_category(category))
            .collect();
    }

    pub fn push_custom(&mut self, category: AssetCategory, mut asset: AssetDescriptor) {
        asset.category = Some(category);
        asset.custom = true;
        self.categories[category.index()].custom.push(asset);
    }

    pub fn defaults(&self, category: AssetCategory) -> &[AssetDescriptor] {
        &self.categories[category.index()].defaults
    }

    pub fn custom(&self, category: AssetCategory) -> &[AssetDescriptor] {
        &self.categories[category.index()].custom
    }

    /// Defaults first, then custom assets in the order they were added
    pub fn assets(&self, category: AssetCategory) -> impl Iterator<Item = &AssetDescriptor> {
        let slot = &self.categories[category.index()];
        slot.defaults.iter().chain(slot.custom.iter())
    }

    /// `symbol` must already be normalized
    pub fn contains_symbol(&self, category: AssetCategory, symbol: &str) -> bool {
        self.assets(category).any(|asset| asset.matches_normalized(symbol))
    }

    pub fn len(&self) -> usize {
        AssetCategory::all().map(|c| self.assets(c).count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One entry of the "selected assets" strip
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedTag {
    pub display: String,
    pub technical: TechnicalSymbol,
    pub category: AssetCategory,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_fallback_is_technical_symbol() {
        let mapping = DisplayMapping::default();
        let symbol = TechnicalSymbol::from("NG=F");
        assert_eq!(mapping.display_for(&symbol), "NG=F");
    }

    #[test]
    fn custom_assets_survive_default_reload() {
        let mut catalog = AssetCatalog::new();
        catalog.push_custom(AssetCategory::Stocks, AssetDescriptor::new("ASML", "ASML Holding", "ASML"));
        catalog.set_defaults(AssetCategory::Stocks, vec![AssetDescriptor::new("AAPL", "Apple Inc.", "AAPL")]);
        assert_eq!(catalog.assets(AssetCategory::Stocks).count(), 2);
        assert!(catalog.custom(AssetCategory::Stocks)[0].custom);
    }
}
