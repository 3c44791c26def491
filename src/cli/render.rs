use std::collections::BTreeMap;

use clap::Args;

use crate::cli::{DatasetArgs, OutputFormat, ViewportArgs};
use crate::core::types::JumpCategory;
use crate::render::analyzer::ViewportAnalyzer;
use crate::render::model::{BaseGlyph, DetailView, OverviewView, RenderModel};
use crate::store::Pack;

/// Number of densest cells listed in text output
const TOP_CELLS: usize = 10;

#[derive(Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    #[command(flatten)]
    pub viewport: ViewportArgs,
}

pub fn run(args: RenderArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let dataset = args.dataset.load()?;
    if verbose {
        eprintln!(
            "Loaded dataset '{}' ({} bp)",
            dataset.name,
            dataset.pack.total_size()
        );
    }

    let request = args.viewport.to_request(&dataset.name);
    let model = ViewportAnalyzer::for_dataset(&dataset).render(&request)?;

    match format {
        OutputFormat::Text => print_text(&model),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&model)?),
        OutputFormat::Tsv => print_tsv(&model),
    }

    Ok(())
}

fn print_text(model: &RenderModel) {
    let frame = model.frame();
    println!("Render Results");
    println!("{}", "=".repeat(60));
    println!("\nViewport: {}", frame.region);
    println!("Padded:   {}", frame.padded);
    println!("Genome:   {} bp", frame.total_size);

    match model {
        RenderModel::Overview(view) => print_overview_text(view),
        RenderModel::Detail(view) => print_detail_text(view),
    }
}

fn print_overview_text(view: &OverviewView) {
    println!("\nMode: overview ({} non-empty cells)", view.cells.len());
    if view.cells.is_empty() {
        return;
    }

    let mut cells: Vec<_> = view.cells.iter().collect();
    cells.sort_by(|a, b| b.count.cmp(&a.count).then(a.x.cmp(&b.x)).then(a.y.cmp(&b.y)));

    println!("\nDensest cells:");
    println!(
        "  {:>12} {:>12} {:>10} {:>10} {:>8}  {:<10} {:<10}",
        "From", "To", "Width", "Height", "Calls", "From ctg", "To ctg"
    );
    for cell in cells.iter().take(TOP_CELLS) {
        println!(
            "  {:>12} {:>12} {:>10} {:>10} {:>8}  {:<10} {:<10}",
            cell.x, cell.y, cell.w, cell.h, cell.count, cell.from_contig, cell.to_contig
        );
    }
    if cells.len() > TOP_CELLS {
        println!("  ... and {} more", cells.len() - TOP_CELLS);
    }
}

fn print_detail_text(view: &DetailView) {
    println!("\nMode: detail{}", if view.complete { "" } else { " (partial)" });

    if view.jumps.swept {
        let mut by_category: BTreeMap<JumpCategory, usize> = BTreeMap::new();
        for quad in &view.jumps.quads {
            *by_category.entry(quad.category).or_default() += 1;
        }
        println!("\nJumps: {}", view.jumps.quads.len());
        for category in JumpCategory::ALL {
            if let Some(count) = by_category.get(&category) {
                println!("  {category}: {count}");
            }
        }
    } else {
        println!("\nJumps: skipped (too many in view)");
    }

    println!(
        "\nAccepted calls: {} ({} boxes)",
        view.accepted_calls.markers.len(),
        view.accepted_calls.boxes.len()
    );
    for marker in &view.accepted_calls.markers {
        let score = marker
            .score
            .map_or_else(|| "-".to_string(), |s| format!("{s:.3}"));
        println!(
            "  #{:<8} ({:.1}, {:.1})  score {}  {} jumps",
            marker.call_id, marker.x, marker.y, score, marker.num_supporting_jumps
        );
    }

    let truth = &view.ground_truth_calls;
    if truth.color.is_some() {
        println!("\nGround-truth calls: {}", truth.markers.len());
        if !truth.anomalies.is_empty() {
            println!("  Non-point ground truth: {:?}", truth.anomalies);
        }
    }

    match &view.read_layout {
        Some(layout) => {
            println!(
                "\nReads: {} ({} seeds in {} columns)",
                layout.reads.len(),
                layout.seeds.len(),
                layout.column_labels.len()
            );
            for read in &layout.reads {
                println!(
                    "  read {:<10} columns {}..{}",
                    read.read_id,
                    read.first_column,
                    read.first_column + read.num_lanes
                );
            }
        }
        None => println!("\nReads: skipped (too many in view)"),
    }

    match &view.sequence_tracks {
        Some(tracks) => {
            let bases = |glyphs: &[BaseGlyph]| {
                glyphs.iter().map(|g| g.symbol).collect::<String>()
            };
            println!("\nSequence (from axis): {}", bases(&tracks.horizontal));
            println!("Sequence (to axis):   {}", bases(&tracks.vertical));
        }
        None => println!("\nSequence: skipped (view too wide)"),
    }
}

fn print_tsv(model: &RenderModel) {
    match model {
        RenderModel::Overview(view) => {
            println!("x\ty\tw\th\tcount\tfrom_contig\tto_contig\tcolor");
            for cell in &view.cells {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    cell.x,
                    cell.y,
                    cell.w,
                    cell.h,
                    cell.count,
                    cell.from_contig,
                    cell.to_contig,
                    cell.color
                );
            }
        }
        RenderModel::Detail(view) => {
            println!("element\tid\tread_id\tcategory\tfrom\tto\tscore");
            for quad in &view.jumps.quads {
                println!(
                    "jump\t{}\t{}\t{}\t{}\t{}\t{}",
                    quad.id,
                    quad.read_id,
                    quad.category,
                    quad.from_pos,
                    quad.to_pos,
                    format_score(quad.score)
                );
            }
            for marker in &view.accepted_calls.markers {
                println!(
                    "call\t{}\t\t{:?}\t{}\t{}\t{}",
                    marker.call_id,
                    marker.shape,
                    marker.x,
                    marker.y,
                    format_score(marker.score)
                );
            }
            for marker in &view.ground_truth_calls.markers {
                println!(
                    "ground_truth\t{}\t\t\t{}\t{}\t{}",
                    marker.call_id,
                    marker.x,
                    marker.y,
                    format_score(marker.score)
                );
            }
            if let Some(layout) = &view.read_layout {
                for seed in &layout.seeds {
                    println!(
                        "seed\t{}\t{}\tcolumn {}\t{}\t{}\t",
                        seed.id, seed.read_id, seed.column, seed.ref_first, seed.ref_last
                    );
                }
            }
        }
    }
}

fn format_score(score: Option<f64>) -> String {
    score.map_or_else(String::new, |s| format!("{s:.4}"))
}
