/// Canonical reference currency every trade is normalized into.
pub const REFERENCE_ASSET: &str = "USDT";

/// Quote assets accepted without cross-pair splitting.
pub const ACCEPTED_QUOTE_ASSETS: &[&str] = &["USDT", "BUSD", "RUB"];

/// Stablecoins treated as identical to the canonical reference asset.
pub const QUOTE_ASSET_ALIASES: &[(&str, &str)] = &[("BUSD", "USDT")];

/// Assets valued through another listing when their own reference pair is
/// not traded (e.g. staked variants).
pub const VALUATION_SYMBOL_ALIASES: &[(&str, &str)] = &[("BETH", "ETH")];

/// Asset groups analysed concurrently per batch.
pub const ASSET_BATCH_SIZE: usize = 8;
