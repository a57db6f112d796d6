pub mod handlers;

pub use handlers::{get_stats, health_check, upload_bill};
