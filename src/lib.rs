pub mod book;
pub mod config;
pub mod error;
pub mod matching;
pub mod models;
pub mod time;

pub mod metrics;

pub use book::{QuoteBook, SharedQuoteBook};
pub use error::{QuoteBookError, Result};
pub use models::{Price, Quote, QuoteId, Symbol, TradeResult, Volume};
pub use time::{Clock, ManualClock, SystemClock};
