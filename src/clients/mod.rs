pub mod analysis;
pub mod storage;

pub use analysis::{ExpenseAnalyzer, HttpExpenseAnalyzer};
pub use storage::{FsObjectStorage, ObjectStorage};
