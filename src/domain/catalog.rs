//! Asset catalog loaded from configuration.
//!
//! Every `[asset.<id>]` section defines one asset. Assets are validated on
//! load and ordered by category, then symbol, so iteration order does not
//! depend on how the INI file happens to be laid out.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::asset::{Asset, Category};
use crate::domain::error::DashboardError;
use crate::ports::config_port::ConfigPort;

pub const ASSET_SECTION_PREFIX: &str = "asset.";

#[derive(Debug, Clone, PartialEq)]
pub struct AssetCatalog {
    assets: Vec<Asset>,
}

impl AssetCatalog {
    /// Builds a catalog from already constructed assets, rejecting duplicates.
    pub fn new(mut assets: Vec<Asset>) -> Result<Self, DashboardError> {
        if assets.is_empty() {
            return Err(DashboardError::EmptyCatalog);
        }
        let mut seen = HashSet::new();
        for asset in &assets {
            if !seen.insert(asset.symbol.to_uppercase()) {
                return Err(DashboardError::invalid(
                    "asset",
                    "symbol",
                    format!("duplicate symbol {}", asset.symbol),
                ));
            }
        }
        assets.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.symbol.cmp(&b.symbol))
        });
        Ok(Self { assets })
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, DashboardError> {
        let mut sections: Vec<String> = config
            .sections()
            .into_iter()
            .filter(|s| s.starts_with(ASSET_SECTION_PREFIX))
            .collect();
        sections.sort();

        let assets = sections
            .iter()
            .map(|section| parse_asset(config, section))
            .collect::<Result<Vec<_>, _>>()?;

        let catalog = Self::new(assets)?;
        debug!(assets = catalog.len(), "loaded asset catalog");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.iter()
    }

    pub fn get(&self, symbol: &str) -> Result<&Asset, DashboardError> {
        self.assets
            .iter()
            .find(|a| a.symbol.eq_ignore_ascii_case(symbol))
            .ok_or_else(|| DashboardError::UnknownAsset {
                symbol: symbol.to_string(),
            })
    }

    pub fn by_category(&self, category: Category) -> Vec<&Asset> {
        self.assets
            .iter()
            .filter(|a| a.category == category)
            .collect()
    }

    /// Categories present in the catalog, in display order.
    pub fn categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = self.assets.iter().map(|a| a.category).collect();
        categories.dedup();
        categories
    }
}

fn parse_asset(config: &dyn ConfigPort, section: &str) -> Result<Asset, DashboardError> {
    let symbol = required_string(config, section, "symbol")?.to_uppercase();
    let name = required_string(config, section, "name")?;
    let category: Category = required_string(config, section, "category")?.parse()?;

    let base_price = required_f64(config, section, "base_price")?;
    if base_price <= 0.0 {
        return Err(DashboardError::invalid(
            section,
            "base_price",
            "base_price must be positive",
        ));
    }

    let volatility = required_f64(config, section, "volatility")?;
    if volatility < 0.0 {
        return Err(DashboardError::invalid(
            section,
            "volatility",
            "volatility must be non-negative",
        ));
    }

    let daily_volume = required_f64(config, section, "daily_volume")?;
    if daily_volume < 0.0 {
        return Err(DashboardError::invalid(
            section,
            "daily_volume",
            "daily_volume must be non-negative",
        ));
    }

    let total_supply = match optional_string(config, section, "total_supply") {
        None => None,
        Some(raw) if raw.eq_ignore_ascii_case("none") => None,
        Some(raw) => {
            let supply = parse_f64(&raw, section, "total_supply")?;
            if supply <= 0.0 {
                return Err(DashboardError::invalid(
                    section,
                    "total_supply",
                    "total_supply must be positive (or 'none' for uncapped)",
                ));
            }
            Some(supply)
        }
    };

    let launched = match optional_string(config, section, "launched") {
        None => None,
        Some(raw) => Some(raw.parse::<i32>().map_err(|_| {
            DashboardError::invalid(section, "launched", format!("invalid year '{raw}'"))
        })?),
    };

    Ok(Asset {
        symbol,
        name,
        category,
        base_price,
        volatility,
        total_supply,
        daily_volume,
        blockchain: optional_string(config, section, "blockchain"),
        launched,
    })
}

fn optional_string(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn required_string(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<String, DashboardError> {
    optional_string(config, section, key).ok_or_else(|| DashboardError::missing(section, key))
}

fn required_f64(config: &dyn ConfigPort, section: &str, key: &str) -> Result<f64, DashboardError> {
    let raw = required_string(config, section, key)?;
    parse_f64(&raw, section, key)
}

fn parse_f64(raw: &str, section: &str, key: &str) -> Result<f64, DashboardError> {
    match raw.replace('_', "").parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(DashboardError::invalid(
            section,
            key,
            format!("'{raw}' is not a number"),
        )),
    }
}
