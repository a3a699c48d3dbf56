//! Cost-basis reconciliation - corrected lots and pooled average price.

mod lot_model;
mod reconciler;

pub use lot_model::*;
pub use reconciler::*;
