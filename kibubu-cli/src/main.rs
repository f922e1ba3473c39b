use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use kibubu_ingest::{extract, extract_and_analyze};
use std::path::PathBuf;
use tracing::{info, warn};

mod config;
mod logging;
mod report;
mod state;

use config::{Config, OutputFormat, Overrides};

#[derive(Parser, Debug)]
#[command(
    name = "kibubu",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("KIBUBU_BUILD_SHA"), ")"),
    about = "Rebuild main and savings ledgers from a mobile-money statement"
)]
struct Cli {
    /// Log every extracted record and transfer decision to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract, classify and replay a statement; print both ledgers
    Analyze {
        /// Statement PDF, or text already extracted from one (`-` or omitted: stdin)
        input: Option<PathBuf>,

        /// Main-account balance before the first record
        #[arg(long)]
        opening_balance: Option<f64>,

        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        #[arg(long)]
        pretty: bool,
    },

    /// Print the classified records without replaying them
    Records {
        input: Option<PathBuf>,

        #[arg(long)]
        pretty: bool,
    },

    /// Manage ~/.kibubu/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config file if none exists
    Init,
    /// Print the effective configuration
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Analyze {
            input,
            opening_balance,
            format,
            pretty,
        } => {
            let cfg = config::load_config()?.apply(Overrides {
                opening_balance,
                format,
                pretty,
            });
            let text = read_input(input)?;

            let replay = cfg.replay();
            let analysis = extract_and_analyze(&text, &replay).context("analyzing statement")?;
            if let Err(mismatch) = analysis.verify_running_balances(replay.opening()) {
                warn!(?mismatch, "running balance does not add up");
            }
            info!(
                transactions = analysis.summary.transaction_count,
                total_balance = analysis.summary.total_balance,
                "statement analyzed"
            );

            println!("{}", report::render(&analysis, &cfg.output)?);
        }

        Command::Records { input, pretty } => {
            let text = read_input(input)?;
            let records = extract(&text).context("extracting records")?;
            for date in report::impossible_dates(&records) {
                warn!(date, "date marker is not a real calendar date");
            }
            println!("{}", report::to_json(&records, pretty)?);
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg: Config = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn read_input(input: Option<PathBuf>) -> Result<String> {
    if let Some(p) = input.as_deref().filter(|p| p.as_os_str() != "-") {
        if !p.exists() {
            bail!("statement text not found: {} (pass a path or pipe text on stdin)", p.display());
        }
    }
    state::read_statement_text(input.as_deref())
}
