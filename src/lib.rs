// Library exports for the CLI binary and integration tests

pub mod app_data;
pub mod audit;
pub mod authorization;
pub mod cli;
pub mod config;
pub mod coordinators;
pub mod errors;
pub mod providers;
pub mod stores;
pub mod types;

pub use app_data::AppData;
