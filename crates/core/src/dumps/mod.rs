//! On-disk dumps that pre-populate pipeline inputs between runs.

mod dump_store;

pub use dump_store::*;

#[cfg(test)]
mod dump_store_tests;
