pub mod format;
pub mod money;
pub mod recurring;
pub mod transaction;

pub use format::{BankFormatDescriptor, FormatSummary, LogicalField};
pub use money::Money;
pub use recurring::{Interval, RecurringPattern, RecurringReport};
pub use transaction::{DetectedFormat, ImportPreviewResult, ObservedTransaction, PreviewRow};
