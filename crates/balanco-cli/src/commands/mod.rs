//! CLI subcommands.

pub mod extract;
pub mod populate;

use std::path::Path;

use balanco_core::TariffGroup;

/// Tariff group selection shared by the subcommands.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum GroupArg {
    /// High voltage (Group A)
    A,
    /// Low voltage (Group B)
    B,
}

impl From<GroupArg> for TariffGroup {
    fn from(value: GroupArg) -> Self {
        match value {
            GroupArg::A => TariffGroup::A,
            GroupArg::B => TariffGroup::B,
        }
    }
}

/// Read invoice text from a PDF, or from a plain-text file for
/// pre-extracted input. Page text comes back concatenated without
/// separators, which the extractor tolerates.
pub fn read_invoice_text(path: &Path) -> anyhow::Result<String> {
    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

    if is_pdf {
        Ok(pdf_extract::extract_text(path)?)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}
