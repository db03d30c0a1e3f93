//! Core library for energy balance workbook processing.
//!
//! This crate provides:
//! - Field extraction from utility invoice text (Group A and Group B tariffs)
//! - Consumption history extraction from the trailing 12-month table
//! - Workbook template preparation (per-account tab duplication)
//! - Workbook population (month row lookup, column layout by tariff group
//!   and account role, history backfill, summary tab)

pub mod error;
pub mod extract;
pub mod models;
pub mod workbook;

pub use error::{BalancoError, Result};
pub use extract::{ExtractionResult, InvoiceExtractor, extract_history, normalize_text, parse_br_number};
pub use models::{AccountBatch, AccountRole, HistoryEntry, InvoiceRecord, TariffGroup};
pub use workbook::{CellRange, CellValue, MemoryWorkbook, Workbook, XlsxWorkbook};
pub use workbook::populate::populate;
pub use workbook::prepare::prepare_tabs;
