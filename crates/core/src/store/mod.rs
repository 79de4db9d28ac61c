pub mod manager;
pub mod memory;
pub mod row;
pub mod traits;
