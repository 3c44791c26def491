use clap::{ArgGroup, Args};

use crate::cli::{DatasetArgs, OutputFormat, ViewportArgs};
use crate::core::types::{JumpId, SeedId};
use crate::render::analyzer::ViewportAnalyzer;
use crate::render::linker::{HighlightMap, HighlightState, InteractionLinker, Selection};

#[derive(Args)]
#[command(group(ArgGroup::new("selection").required(true).args(["jump", "seed"])))]
pub struct HighlightArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    #[command(flatten)]
    pub viewport: ViewportArgs,

    /// Select the jump with this id
    #[arg(long)]
    pub jump: Option<i64>,

    /// Select a seed, given as READ:INDEX
    #[arg(long)]
    pub seed: Option<SeedId>,
}

impl HighlightArgs {
    fn selection(&self) -> Selection {
        match (self.jump, self.seed) {
            (Some(id), _) => Selection::Jump { id: JumpId(id) },
            (None, Some(id)) => Selection::Seed { id },
            (None, None) => Selection::None,
        }
    }
}

pub fn run(args: HighlightArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let dataset = args.dataset.load()?;
    let request = args.viewport.to_request(&dataset.name);
    let model = ViewportAnalyzer::for_dataset(&dataset).render(&request)?;

    if model.as_detail().is_none() {
        anyhow::bail!("Viewport is rendered as an overview; zoom in to select jumps or seeds");
    }

    let selection = args.selection();
    let map = InteractionLinker::highlight(&model, &selection);
    if verbose {
        eprintln!(
            "{} jumps and {} seeds in view",
            map.jumps.len(),
            map.seeds.len()
        );
    }

    match format {
        OutputFormat::Text => print_text(&selection, &map),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&map)?),
        OutputFormat::Tsv => print_tsv(&map),
    }

    Ok(())
}

fn state_label(state: HighlightState) -> &'static str {
    match state {
        HighlightState::Default => "default",
        HighlightState::Highlighted => "highlighted",
        HighlightState::Dimmed => "dimmed",
    }
}

fn print_text(selection: &Selection, map: &HighlightMap) {
    match selection {
        Selection::Jump { id } => println!("Selected jump {id}"),
        Selection::Seed { id } => println!("Selected seed {id}"),
        Selection::None => println!("No selection"),
    }
    println!("{}", "=".repeat(60));

    let jumps = map.highlighted_jumps();
    let seeds = map.highlighted_seeds();
    if jumps.is_empty() && seeds.is_empty() {
        println!("\nSelection not found in view; all elements use their default colors");
        return;
    }

    println!("\nHighlighted jumps ({}):", jumps.len());
    for id in &jumps {
        println!("  {id}");
    }
    println!("\nHighlighted seeds ({}):", seeds.len());
    for id in &seeds {
        println!("  {id}");
    }
    println!(
        "\nDimmed: {} jumps, {} seeds",
        map.jumps.len() - jumps.len(),
        map.seeds.len() - seeds.len()
    );
}

fn print_tsv(map: &HighlightMap) {
    println!("element\tid\tstate\tcolor");
    for (id, style) in &map.jumps {
        println!("jump\t{}\t{}\t{}", id, state_label(style.state), style.color);
    }
    for (id, style) in &map.seeds {
        println!("seed\t{}\t{}\t{}", id, state_label(style.state), style.color);
    }
}
