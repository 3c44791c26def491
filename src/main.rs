use clap::Parser;
use tracing_subscriber::EnvFilter;

use sv_view::cli;
use sv_view::web;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("sv_view=debug,info")
    } else {
        EnvFilter::new("sv_view=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Render(args) => {
            cli::render::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Highlight(args) => {
            cli::highlight::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Runs(args) => {
            cli::runs::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Serve(args) => {
            web::server::run(args)?;
        }
    }

    Ok(())
}
