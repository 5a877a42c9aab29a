use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Price, Quote, Volume};
use crate::time::{DEFAULT_TIME_FORMAT, parse_timestamp};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub book: BookConfig,
    #[serde(default)]
    pub quotes: Vec<QuoteConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookConfig {
    #[serde(default = "default_time_format")]
    pub time_format: String,
    /// Pins the book's clock to this time instead of the wall clock.
    #[serde(default)]
    pub now: Option<String>,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            time_format: default_time_format(),
            now: None,
        }
    }
}

fn default_time_format() -> String {
    DEFAULT_TIME_FORMAT.to_string()
}

/// A quote as written in configuration, with a textual expiration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteConfig {
    pub id: String,
    pub symbol: String,
    pub price: Price,
    pub available_volume: Volume,
    pub expiration: String,
}

impl QuoteConfig {
    pub fn to_quote(&self, time_format: &str) -> Result<Quote> {
        let expiration = parse_timestamp(&self.expiration, time_format)?;
        Ok(Quote::new(
            self.id.clone(),
            self.symbol.clone(),
            self.price,
            self.available_volume,
            expiration,
        ))
    }
}

/// One step of a replay script.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Upsert { quote: QuoteConfig },
    Remove { id: String },
    RemoveAll { symbol: String },
    Best { symbol: String },
    Trade { symbol: String, volume: Volume },
    /// Moves a pinned clock forward.
    Advance { seconds: i64 },
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(path));
        Ok(builder.build()?.try_deserialize()?)
    }
}

pub fn load_script(path: &str) -> anyhow::Result<Vec<Command>> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&text)?)
}
