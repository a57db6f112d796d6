pub mod pool;
pub mod queries;
pub mod stores;

pub use pool::create_pool;
pub use stores::{AggregateStore, PgBillStore, RecordStore};
