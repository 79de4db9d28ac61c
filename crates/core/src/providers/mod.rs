pub mod registry;
pub mod traits;

// Quote source implementations
pub mod alphavantage;
pub mod static_table;
#[cfg(not(target_arch = "wasm32"))]
pub mod yahoo_finance;
