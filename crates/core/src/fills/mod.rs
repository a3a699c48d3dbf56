//! Trade fills and their normalization into reference-currency form.

mod fill_model;
mod fills_traits;
pub mod normalizer;

pub use fill_model::*;
pub use fills_traits::*;
pub use normalizer::*;
