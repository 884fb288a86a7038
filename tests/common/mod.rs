#![allow(dead_code)]

use chrono::NaiveDate;
use cryptoboard::adapters::file_config_adapter::FileConfigAdapter;
use cryptoboard::domain::catalog::AssetCatalog;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::Write;

pub const SAMPLE_INI: &str = r#"
[generator]
start_date = 2024-01-01
end_date = 2024-06-30
seed = 7

[indicators]
ma_short = 5
ma_long = 20
rsi_period = 14
bollinger_period = 20
bollinger_mult = 2.0

[quotes]
alert_threshold = 3.0
change_probability = 0.7
max_tick_move_pct = 2.0
initial_move_pct = 5.0

[asset.btc]
symbol = BTC/USD
name = Bitcoin
category = Major
base_price = 65250
volatility = 4.5
daily_volume = 30.0
blockchain = Bitcoin
launched = 2009
total_supply = 21_000_000

[asset.uni]
symbol = UNI/USD
name = Uniswap
category = DeFi
base_price = 10.5
volatility = 7.5
daily_volume = 0.4
total_supply = 1_000_000_000

[asset.doge]
symbol = DOGE/USD
name = Dogecoin
category = Meme
base_price = 0.16
volatility = 8.5
daily_volume = 0.9
total_supply = none

[asset.usdt]
symbol = USDT/USD
name = Tether
category = Stablecoin
base_price = 1.0
volatility = 0.1
daily_volume = 45.0
"#;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn sample_config() -> FileConfigAdapter {
    FileConfigAdapter::from_string(SAMPLE_INI).unwrap()
}

pub fn sample_catalog() -> AssetCatalog {
    AssetCatalog::from_config(&sample_config()).unwrap()
}

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
