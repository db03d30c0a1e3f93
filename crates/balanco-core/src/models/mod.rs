//! Data models for invoice records and account batches.

pub mod account;
pub mod invoice;

pub use account::{AccountBatch, AccountRole, TariffGroup};
pub use invoice::{HistoryEntry, InvoiceRecord, MONTH_CODES, month_code_to_number};
