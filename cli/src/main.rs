//! mayor: command line front end for sealed-ballot elections.

mod runner;
mod scenario;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use mayor_types::{Amount, Sigil};
use mayor_utils::LogFormat;

use crate::scenario::{resolve_account, Scenario};

#[derive(Parser)]
#[command(name = "mayor", about = "Sealed-ballot mayor elections")]
struct Cli {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, default_value = "warn", env = "MAYOR_LOG_LEVEL")]
    log_level: String,

    /// Log format: "human" or "json". Logs go to stderr.
    #[arg(long, global = true, default_value = "human", env = "MAYOR_LOG_FORMAT")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print the account id derived from a label.
    Account { label: String },

    /// Compute the commitment to cast for a ballot.
    Commit {
        /// Sigil as a small integer or 64 hex characters.
        #[arg(long, conflicts_with = "random", required_unless_present = "random")]
        sigil: Option<String>,

        /// Draw a fresh random sigil and print it.
        #[arg(long)]
        random: bool,

        /// Candidate label or hex account id.
        #[arg(long)]
        candidate: String,

        /// Ballot amount.
        #[arg(long)]
        amount: u128,
    },

    /// Replay a scripted election from a TOML file.
    Run {
        scenario: PathBuf,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,

        /// Stop at the first call whose result differs from its `expect`.
        #[arg(long)]
        fail_fast: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    mayor_utils::init_logging(cli.log_format, &cli.log_level)?;

    match cli.command {
        Command::Account { label } => {
            println!("{}", mayor_crypto::account_from_label(&label));
        }
        Command::Commit {
            sigil,
            random,
            candidate,
            amount,
        } => {
            let sigil = if random {
                let sigil = mayor_crypto::random_sigil()?;
                println!("sigil:      {}", hex::encode(sigil.as_bytes()));
                sigil
            } else {
                let text = sigil.context("either --sigil or --random is required")?;
                text.parse::<Sigil>()
                    .with_context(|| format!("invalid sigil {text:?}"))?
            };
            let commitment = mayor_crypto::compute_commitment(
                &sigil,
                &resolve_account(&candidate),
                Amount::new(amount),
            );
            if random {
                println!("commitment: {commitment}");
            } else {
                println!("{commitment}");
            }
        }
        Command::Run {
            scenario,
            json,
            fail_fast,
        } => {
            let loaded = Scenario::from_toml_file(&scenario)?;
            tracing::info!(path = %scenario.display(), calls = loaded.calls.len(), "loaded scenario");
            let report = runner::run(&loaded, fail_fast)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.render(&loaded.labels()));
            }
            let mismatches = report.mismatches();
            if mismatches > 0 {
                anyhow::bail!("{mismatches} call(s) did not match their expected result");
            }
        }
    }
    Ok(())
}
