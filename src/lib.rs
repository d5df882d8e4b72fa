pub mod config;
pub mod stub;
