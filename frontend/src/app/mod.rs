pub mod config;
pub mod map;
pub mod query;
pub mod utils;
pub mod viewer;
