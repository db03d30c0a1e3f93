//! Extract command - parse a single invoice file and dump the record.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::{info, warn};

use balanco_core::InvoiceExtractor;

use super::{GroupArg, read_invoice_text};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF or pre-extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Tariff group of the invoice
    #[arg(short, long, value_enum, default_value = "b")]
    group: GroupArg,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: ExtractArgs) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let text = read_invoice_text(&args.input)?;
    info!("Read {} characters from {}", text.len(), args.input.display());

    let extractor = InvoiceExtractor::new(args.group.into());
    let result = extractor.extract(&text);

    for warning in &result.warnings {
        warn!("{warning}");
    }

    let json = serde_json::to_string_pretty(&result.record)?;
    match args.output {
        Some(path) => {
            fs::write(&path, json)?;
            eprintln!("{} {}", style("Wrote").green(), path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
