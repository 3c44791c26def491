use clap::Args;

use crate::cli::{DatasetArgs, OutputFormat};
use crate::store::{CallStore, Pack};

#[derive(Args)]
pub struct RunsArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
}

pub fn run(args: RunsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let dataset = args.dataset.load()?;
    let runs = dataset.store.runs()?;

    if verbose {
        eprintln!(
            "Dataset '{}': {} contigs, {} bp",
            dataset.name,
            dataset.pack.contig_names().len(),
            dataset.pack.total_size()
        );
    }

    match format {
        OutputFormat::Text => {
            let name_width = runs.iter().map(|r| r.name.len()).max().unwrap_or(4).max(4);
            println!("Runs in '{}' ({} runs)\n", dataset.name, runs.len());
            println!(
                "{:>6} {:<name_w$} {:>8} {:>8}  Description",
                "ID",
                "Name",
                "Calls",
                "Jumps",
                name_w = name_width
            );
            println!("{}", "-".repeat(6 + name_width + 8 + 8 + 16));
            for run in &runs {
                println!(
                    "{:>6} {:<name_w$} {:>8} {:>8}  {}",
                    run.id,
                    run.name,
                    run.num_calls,
                    run.num_jumps,
                    run.description,
                    name_w = name_width
                );
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&runs)?),
        OutputFormat::Tsv => {
            println!("id\tname\tnum_calls\tnum_jumps\tdescription");
            for run in &runs {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    run.id, run.name, run.num_calls, run.num_jumps, run.description
                );
            }
        }
    }

    Ok(())
}
