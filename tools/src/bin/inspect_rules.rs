use anyhow::Result;
use clap::Parser;

use rule_tools::{render_text, table_report};
use unicorn_segment::BoundaryKind;

/// Print the compiled boundary rule tables.
#[derive(Parser)]
struct Args {
    /// boundary kind to inspect (default: all)
    #[arg(long)]
    kind: Option<BoundaryKind>,
    /// only show the rule with this name (e.g. GB9c)
    #[arg(long)]
    rule: Option<String>,
    /// list program sizes without disassembly
    #[arg(long)]
    summary: bool,
    /// emit JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let kinds = match args.kind {
        Some(kind) => vec![kind],
        None => BoundaryKind::ALL.to_vec(),
    };

    let mut reports = Vec::new();
    for kind in kinds {
        reports.push(table_report(kind, args.rule.as_deref())?);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print!("{}", render_text(report, !args.summary));
        }
    }
    Ok(())
}
