use crate::constants::{REFERENCE_ASSET, VALUATION_SYMBOL_ALIASES};

/// The trading-pair symbol used to value `base_asset` against the
/// reference currency, routing through the alias table for assets whose
/// own pair is not listed.
pub fn valuation_symbol(base_asset: &str) -> String {
    let listed = VALUATION_SYMBOL_ALIASES
        .iter()
        .find(|(alias, _)| *alias == base_asset)
        .map(|(_, listing)| *listing)
        .unwrap_or(base_asset);
    format!("{listed}{REFERENCE_ASSET}")
}
