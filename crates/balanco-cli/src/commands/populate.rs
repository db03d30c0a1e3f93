//! Populate command - fill a workbook template from per-account invoices.

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::info;

use balanco_core::{
    AccountBatch, AccountRole, InvoiceExtractor, TariffGroup, XlsxWorkbook, populate, prepare_tabs,
};

use super::{GroupArg, read_invoice_text};

/// Arguments for the populate command.
#[derive(Args)]
pub struct PopulateArgs {
    /// Workbook template (xlsx) with the model tabs
    #[arg(short, long)]
    template: PathBuf,

    /// Tariff group of all accounts in this run
    #[arg(short, long, value_enum)]
    group: GroupArg,

    /// Generator account input, one flag per account in sequence order.
    /// A directory means all invoices inside belong to that account.
    #[arg(long = "generator", value_name = "PATH")]
    generators: Vec<PathBuf>,

    /// Beneficiary account input, one flag per account in sequence order
    #[arg(long = "beneficiary", value_name = "PATH")]
    beneficiaries: Vec<PathBuf>,

    /// Output path (default: BALANCO_GRUPO_<A|B>.xlsx)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: PopulateArgs) -> anyhow::Result<()> {
    let group: TariffGroup = args.group.into();

    let mut workbook = XlsxWorkbook::load(&args.template)?;
    prepare_tabs(
        &mut workbook,
        args.generators.len() as u32,
        args.beneficiaries.len() as u32,
    );

    let extractor = InvoiceExtractor::new(group);
    let mut batches = Vec::new();
    for (i, path) in args.generators.iter().enumerate() {
        batches.push(build_batch(&extractor, AccountRole::Generator, i as u32 + 1, path)?);
    }
    for (i, path) in args.beneficiaries.iter().enumerate() {
        batches.push(build_batch(&extractor, AccountRole::Beneficiary, i as u32 + 1, path)?);
    }

    populate(&mut workbook, &batches, group);

    let output = args.output.unwrap_or_else(|| {
        let suffix = match group {
            TariffGroup::A => "A",
            TariffGroup::B => "B",
        };
        PathBuf::from(format!("BALANCO_GRUPO_{suffix}.xlsx"))
    });
    workbook.save(&output)?;

    eprintln!(
        "{} {} ({} account(s))",
        style("Saved").green(),
        output.display(),
        batches.len()
    );
    Ok(())
}

/// Extract every invoice belonging to one account.
fn build_batch(
    extractor: &InvoiceExtractor,
    role: AccountRole,
    sequence_index: u32,
    path: &Path,
) -> anyhow::Result<AccountBatch> {
    let files = collect_invoice_files(path)?;
    if files.is_empty() {
        anyhow::bail!("No invoice files found at {}", path.display());
    }

    let mut records = Vec::with_capacity(files.len());
    for file in files {
        let text = read_invoice_text(&file)?;
        let result = extractor.extract(&text);
        info!(
            "{}: account {} period {}/{} ({} defaulted field(s))",
            file.display(),
            result.record.account_id,
            result.record.month,
            result.record.year,
            result.warnings.len()
        );
        records.push(result.record);
    }

    Ok(AccountBatch::new(role, sequence_index, records))
}

fn collect_invoice_files(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(path)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("pdf") || e.eq_ignore_ascii_case("txt"))
        })
        .collect();
    files.sort();
    Ok(files)
}
