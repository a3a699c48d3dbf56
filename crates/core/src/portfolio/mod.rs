//! Account-level orchestration across asset groups.

mod portfolio_service;

pub use portfolio_service::*;

#[cfg(test)]
mod portfolio_service_tests;
