pub mod api;
pub mod clients;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use db::{create_pool, PgBillStore};
pub use error::BillError;
pub use service::BillPipeline;
