pub mod auth_service;
pub mod export_service;
pub mod holding_service;
pub mod price_service;
pub mod valuation_service;
