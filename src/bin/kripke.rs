use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use log::info;

use kripke_rs::config::CheckOptions;
use kripke_rs::dot::DrawConfig;
use kripke_rs::loader::Query;
use kripke_rs::logic::SabotageScope;
use kripke_rs::model::Model;

#[derive(Debug, Parser)]
#[command(author, version, about = "Check modal, travel and sabotage formulas on Kripke models")]
struct Cli {
    /// Model file (YAML or JSON).
    #[arg(value_name = "MODEL")]
    model: PathBuf,

    /// Query file: formula on the first line, worlds on the second.
    #[arg(value_name = "QUERY")]
    query: PathBuf,

    /// Write the model and the verdict as a DOT graph.
    #[arg(long, value_name = "FILE")]
    draw: Option<PathBuf>,

    /// Relation seen by `<>` and `[]` inside sabotage formulas: `current`
    /// drops the sabotaged edges, `base` keeps every edge of the model.
    #[arg(long, value_name = "SCOPE", default_value = "current")]
    sabotage_scope: SabotageScope,

    /// BDD size (in bits, so the actual size is `2^size` nodes).
    #[arg(long, value_name = "INT", default_value = "16")]
    storage_bits: usize,

    /// Show debug output.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Show warnings and errors only.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    let level = if args.verbose {
        simplelog::LevelFilter::Debug
    } else if args.quiet {
        simplelog::LevelFilter::Warn
    } else {
        simplelog::LevelFilter::Info
    };
    simplelog::TermLogger::init(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let options = CheckOptions {
        storage_bits: args.storage_bits,
        sabotage_scope: args.sabotage_scope,
    };
    let model = Model::from_path(&args.model, options)?;
    let query = Query::from_path(&args.query)?;
    info!("Formula: {}", query.formula);
    info!("Worlds: {}", query.worlds.join(", "));

    let start_time = Instant::now();
    match &args.draw {
        Some(path) => {
            let drawing = model.draw(&query.formula, &query.worlds)?;
            std::fs::write(path, drawing.to_dot(&DrawConfig::default())?)?;
            println!("Result calculated and drawn in {:.6} secs", start_time.elapsed().as_secs_f64());
            println!("Drawing written to {}", path.display());
        }
        None => {
            let result = model.check(&query.formula, &query.worlds)?;
            let elapsed = start_time.elapsed();
            println!("Formula evaluates to {}", result);
            println!("Result calculated in {:.6} secs", elapsed.as_secs_f64());
        }
    }

    Ok(())
}
