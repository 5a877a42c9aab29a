use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const UPSERTS_TOTAL: &str = "quote_book_upserts_total";
pub const REMOVALS_TOTAL: &str = "quote_book_removals_total";
pub const TRADES_TOTAL: &str = "quote_book_trades_total";
pub const VOLUME_EXECUTED_TOTAL: &str = "quote_book_volume_executed_total";
pub const LIVE_QUOTES: &str = "quote_book_live_quotes";

pub fn install_recorder() -> anyhow::Result<PrometheusHandle> {
    let builder = PrometheusBuilder::new();
    let handle = builder.install_recorder()?;
    Ok(handle)
}
