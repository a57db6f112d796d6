pub mod analysis;
pub mod invoice;
pub mod stats;

pub use analysis::{
    AnalysisResult, ExpenseDocument, ExpenseField, FieldType, LineItem, LineItemGroup,
    ValueDetection,
};
pub use invoice::{BillLineItem, ExtractedInvoice, DEFAULT_TEXT, DEFAULT_TOTAL};
pub use stats::{StatsDelta, StatsSnapshot};
