use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

mod config;
mod plotting;
mod workflow;

#[derive(Parser)]
#[command(name = "barkeep")]
#[command(about = "Bar simulation: pour, shake, recognize and serve cocktails")]
struct Cli {
    /// Show debug diagnostics from the simulation core
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted bar scenario and report on the session
    Run {
        /// Knowledge base directory
        #[arg(long, default_value = "./data/knowledge_base")]
        kb: String,

        /// Scenario YAML file
        #[arg(long)]
        scenario: String,

        /// Scenario to run when the file holds several (defaults to the first)
        #[arg(long)]
        scenario_id: Option<String>,

        /// Directory the timestamped run folder is created in
        #[arg(long, default_value = "./data/runs")]
        out: String,

        /// Seconds per simulation frame
        #[arg(long, default_value = "0.05")]
        dt: f64,

        /// Skip chart rendering
        #[arg(long)]
        no_plots: bool,
    },

    /// Recognize a mix given as ingredient=ml pairs
    Recognize {
        #[arg(long, default_value = "./data/knowledge_base")]
        kb: String,

        /// Treat the mix as shaken
        #[arg(long)]
        shaken: bool,

        /// Pours, e.g. gin=60 vermouth=10
        #[arg(required = true)]
        pours: Vec<String>,
    },

    /// List the known recipes
    Recipes {
        #[arg(long, default_value = "./data/knowledge_base")]
        kb: String,
    },

    /// Draw charts from an existing session log
    Plot {
        /// Session CSV written by `run`
        #[arg(long)]
        log: String,

        /// Directory to write the charts into
        #[arg(long)]
        out: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    println!("--- Barkeep ---");

    match cli.command {
        Commands::Run {
            kb,
            scenario,
            scenario_id,
            out,
            dt,
            no_plots,
        } => {
            if !(dt.is_finite() && dt > 0.0) {
                bail!("--dt must be a positive number of seconds, got {}", dt);
            }
            let kb = config::KnowledgeBase::load(&kb)?;
            let options = workflow::RunOptions {
                scenario_path: &scenario,
                scenario_id: scenario_id.as_deref(),
                output_root: &out,
                dt,
                plots: !no_plots,
            };
            let output_dir = workflow::run_scenario(&kb, &options)?;
            println!("\nRun complete. Results are in '{}'", output_dir);
        }
        Commands::Recognize { kb, shaken, pours } => {
            let kb = config::KnowledgeBase::load(&kb)?;
            let pours = workflow::parse_pours(&pours)?;
            debug!(?pours, shaken, "recognizing mix");
            let (result, contents) = workflow::recognize_mix(&kb, &pours, shaken);
            workflow::print_recognition(&kb, &result, &contents);
        }
        Commands::Recipes { kb } => {
            let kb = config::KnowledgeBase::load(&kb)?;
            workflow::print_recipes(&kb);
        }
        Commands::Plot { log, out } => {
            std::fs::create_dir_all(&out)?;
            plotting::generate_all_plots(&out, &log)?;
        }
    }

    Ok(())
}
