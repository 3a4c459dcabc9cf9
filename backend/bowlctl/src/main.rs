use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Catalog document to build bowls from.
    #[arg(long, default_value = "data/restaurants.json")]
    catalog: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the catalog and report anything suspicious in it.
    Check,

    /// Restore a share token and print the resulting bowl as JSON.
    Decode { token: String },

    /// Build a bowl one change at a time and print its share token.
    Encode {
        #[arg(long)]
        menu: Option<String>,

        #[arg(long)]
        strict: bool,

        /// Nutrient limit, e.g. `--limit sodium_mg=500`.
        #[arg(long = "limit", value_parser = bowlctl::parse_pair)]
        limits: Vec<(String, String)>,

        /// Ingredient portion, e.g. `--portion rice=0.5`. Applied in order.
        #[arg(long = "portion", value_parser = bowlctl::parse_pair)]
        portions: Vec<(String, String)>,
    },

    /// Print the totals report for a share token.
    Totals { token: String },
}

fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let result = bowlctl::load(&args.catalog).and_then(|catalog| match args.command {
        Command::Check => bowlctl::check(&catalog),
        Command::Decode { token } => bowlctl::decode(&catalog, &token),
        Command::Encode {
            menu,
            strict,
            limits,
            portions,
        } => bowlctl::encode(&catalog, menu.as_deref(), strict, &limits, &portions),
        Command::Totals { token } => bowlctl::totals(&catalog, &token),
    });

    match result {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
