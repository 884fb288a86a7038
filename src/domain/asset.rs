//! Asset definitions and categories.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::DashboardError;

/// Market segment an asset belongs to. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Major,
    DeFi,
    Layer1,
    Layer2,
    Meme,
    Gaming,
    Metaverse,
    Privacy,
    Exchange,
    Stablecoin,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Major,
        Category::DeFi,
        Category::Layer1,
        Category::Layer2,
        Category::Meme,
        Category::Gaming,
        Category::Metaverse,
        Category::Privacy,
        Category::Exchange,
        Category::Stablecoin,
    ];

    /// Pegged assets ignore market-wide regime, seasonal and event factors.
    pub fn is_pegged(self) -> bool {
        matches!(self, Category::Stablecoin)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Major => "Major",
            Category::DeFi => "DeFi",
            Category::Layer1 => "Layer1",
            Category::Layer2 => "Layer2",
            Category::Meme => "Meme",
            Category::Gaming => "Gaming",
            Category::Metaverse => "Metaverse",
            Category::Privacy => "Privacy",
            Category::Exchange => "Exchange",
            Category::Stablecoin => "Stablecoin",
        };
        f.write_str(name)
    }
}

impl FromStr for Category {
    type Err = DashboardError;

    /// Case-insensitive; spaces, dashes and underscores are ignored so
    /// "Layer 1" and "layer-1" both parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "major" | "majors" => Ok(Category::Major),
            "defi" => Ok(Category::DeFi),
            "layer1" | "l1" => Ok(Category::Layer1),
            "layer2" | "l2" => Ok(Category::Layer2),
            "meme" => Ok(Category::Meme),
            "gaming" => Ok(Category::Gaming),
            "metaverse" => Ok(Category::Metaverse),
            "privacy" => Ok(Category::Privacy),
            "exchange" => Ok(Category::Exchange),
            "stablecoin" | "stablecoins" => Ok(Category::Stablecoin),
            _ => Err(DashboardError::UnknownCategory {
                name: s.trim().to_string(),
            }),
        }
    }
}

/// A tradable pair. Immutable once the catalog is loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub symbol: String,
    pub name: String,
    pub category: Category,
    pub base_price: f64,
    /// Daily volatility in percent.
    pub volatility: f64,
    /// Total supply in coins; `None` for assets without a supply cap.
    pub total_supply: Option<f64>,
    /// Daily volume baseline in billions of USD.
    pub daily_volume: f64,
    pub blockchain: Option<String>,
    pub launched: Option<i32>,
}
