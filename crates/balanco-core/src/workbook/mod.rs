//! Workbook model boundary and population engine.

pub mod layout;
pub mod memory;
pub mod populate;
pub mod prepare;
pub mod xlsx;

use chrono::{Datelike, NaiveDate};

use crate::models::month_code_to_number;

pub use memory::MemoryWorkbook;
pub use xlsx::XlsxWorkbook;

/// A single cell value.
///
/// `Date` exists because spreadsheet templates commonly key month rows with
/// native date values rather than text codes; month matching must handle
/// both.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Calendar month represented by the cell, if any. Text cells are read
    /// by their leading three-letter code ("JAN", "JAN/25", "JANEIRO" all
    /// map to 1); date cells by their calendar month.
    pub fn month_number(&self) -> Option<u32> {
        match self {
            CellValue::Text(s) => {
                let code: String = s.trim().chars().take(3).collect();
                month_code_to_number(&code)
            }
            CellValue::Date(d) => Some(d.month()),
            _ => None,
        }
    }
}

/// A rectangular merged-cell range, 1-based inclusive on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub start_col: u32,
    pub start_row: u32,
    pub end_col: u32,
    pub end_row: u32,
}

impl CellRange {
    pub fn new(start_col: u32, start_row: u32, end_col: u32, end_row: u32) -> Self {
        Self {
            start_col,
            start_row,
            end_col,
            end_row,
        }
    }

    /// Parse an A1-style range reference ("B5:D5"). A bare single-cell
    /// reference ("B5") yields a 1x1 range.
    pub fn parse(reference: &str) -> Option<Self> {
        let mut parts = reference.split(':');
        let (start_col, start_row) = parse_cell_reference(parts.next()?)?;
        let (end_col, end_row) = match parts.next() {
            Some(end) => parse_cell_reference(end)?,
            None => (start_col, start_row),
        };
        Some(Self::new(start_col, start_row, end_col, end_row))
    }

    pub fn contains(&self, col: u32, row: u32) -> bool {
        col >= self.start_col && col <= self.end_col && row >= self.start_row && row <= self.end_row
    }

    /// Top-left cell, the only one that persists a value in a merged range.
    pub fn anchor(&self) -> (u32, u32) {
        (self.start_col, self.start_row)
    }
}

/// The in-memory spreadsheet model the core operates on: named tabs, cells
/// addressed by (1-based column, 1-based row), merged ranges per tab.
///
/// Implementations with an unknown tab name must degrade: reads yield
/// `CellValue::Empty` and writes are dropped.
pub trait Workbook {
    /// Tab names in workbook order.
    fn tab_names(&self) -> Vec<String>;

    /// Rename a tab; `false` when `old` does not exist.
    fn rename_tab(&mut self, old: &str, new: &str) -> bool;

    /// Copy a tab (cells and merged ranges) under a new name, appended after
    /// the existing tabs; `false` when the source does not exist.
    fn duplicate_tab(&mut self, source: &str, new_name: &str) -> bool;

    /// Read a cell; absent tabs and unset cells read as `Empty`.
    fn cell_value(&self, tab: &str, col: u32, row: u32) -> CellValue;

    /// Write a cell; writes to absent tabs are dropped.
    fn set_cell(&mut self, tab: &str, col: u32, row: u32, value: CellValue);

    /// Merged ranges of a tab; empty for absent tabs.
    fn merged_ranges(&self, tab: &str) -> Vec<CellRange>;

    fn has_tab(&self, name: &str) -> bool {
        self.tab_names().iter().any(|n| n == name)
    }

    /// First tab whose upper-cased name contains `fragment` (already
    /// upper-cased by the caller).
    fn find_tab_containing(&self, fragment: &str) -> Option<String> {
        self.tab_names()
            .into_iter()
            .find(|n| n.to_uppercase().contains(fragment))
    }
}

/// Convert a column letter ("A", "AA") to its 1-based index.
pub fn column_index(letter: &str) -> u32 {
    letter
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .fold(0, |acc, c| acc * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1))
}

/// Convert a 1-based column index to its letter form (1 -> "A", 27 -> "AA").
pub fn column_letter(index: u32) -> String {
    let mut n = index;
    let mut s = String::new();
    while n > 0 {
        let r = ((n - 1) % 26) as u8;
        s.insert(0, (b'A' + r) as char);
        n = (n - 1) / 26;
    }
    s
}

fn parse_cell_reference(reference: &str) -> Option<(u32, u32)> {
    let reference = reference.trim().trim_matches('$');
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    let col = column_index(letters);
    let row: u32 = digits.trim_matches('$').parse().ok()?;
    if col == 0 || row == 0 {
        return None;
    }
    Some((col, row))
}
