use anyhow::{Context, Result};
use pokedex_seed::{
    cli::Cli,
    commands::{execute, ApiSeed, Outcome},
    engine::{BundledEngine, Engine, Layout, SystemEngine},
    fetch::PokeApiClient,
    filter::resolve_tables,
    ui::{ConsoleUi, UiApp},
};
use std::time::Instant;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse_args();
    let start = Instant::now();
    let mode = cli.mode;

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().context("Could not determine current directory")?,
    };
    let engine = platform_engine(Layout::new(root));

    let tables = resolve_tables(cli.include, cli.exclude)?;
    let seed = ApiSeed {
        fetch: PokeApiClient::new(cli.api_url)?,
        tables,
    };

    if cli.tui {
        let mut ui = UiApp::new()?;
        match execute(mode, engine.as_ref(), &seed, &mut ui) {
            Ok(outcome) => ui.finish(&summary(outcome, start)),
            Err(err) => {
                ui.fail(&err.to_string())?;
                Err(err).with_context(|| format!("{:?} mode failed", mode))
            }
        }
    } else {
        let mut ui = ConsoleUi::new();
        let outcome = execute(mode, engine.as_ref(), &seed, &mut ui)
            .with_context(|| format!("{:?} mode failed", mode))?;
        println!("\n{}", summary(outcome, start));
        Ok(())
    }
}

/// Windows gets portable binaries unpacked next to the data directory. Other
/// platforms use the PostgreSQL installed by the system package manager.
fn platform_engine(layout: Layout) -> Box<dyn Engine> {
    if cfg!(windows) {
        Box::new(BundledEngine::new(layout))
    } else {
        Box::new(SystemEngine::new(layout))
    }
}

fn summary(outcome: Outcome, start: Instant) -> String {
    format!("{} in {:.1}s", outcome, start.elapsed().as_secs_f64())
}
