use std::process::ExitCode;

use clap::{Parser, Subcommand};
use ipv4_ranges::{cidr_to_range, range_to_cidrs, IntervalMap};

use tracing::Level;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Show every insertion and decomposition step
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the first and last address of a CIDR block
    Range { cidr: String },
    /// Print the CIDR blocks covering an inclusive address range
    Cidrs { left: String, right: String },
    /// Build a map from `address-or-cidr=label` entries and look up an address
    Lookup {
        address: String,
        #[arg(required = true)]
        entries: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            Level::TRACE
        } else {
            Level::INFO
        })
        .init();

    let result = match cli.command {
        Command::Range { cidr } => cidr_to_range(&cidr).map(|(first, last)| {
            println!("{first} {last}");
        }),
        Command::Cidrs { left, right } => range_to_cidrs(&left, &right).map(|blocks| {
            for block in blocks {
                println!("{block}");
            }
        }),
        Command::Lookup { address, entries } => lookup(&address, &entries),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn lookup(address: &str, entries: &[String]) -> ipv4_ranges::Result<()> {
    let mut map = IntervalMap::with_capacity(entries.len());

    for entry in entries {
        let (spec, label) = entry.split_once('=').unwrap_or((entry.as_str(), ""));
        map.add_by_address_or_cidr(spec, label.to_string())?;
    }

    println!("{}", map.dump());

    match map.contains(address) {
        Some(label) => println!("{address} => {label:?}"),
        None => println!("{address} => not found"),
    }

    Ok(())
}
