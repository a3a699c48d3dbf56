pub mod symbols;
pub mod time_utils;
