pub mod analytics;
pub mod book;
pub mod catalog;
pub mod holding;
pub mod price;
pub mod settings;
pub mod user;
