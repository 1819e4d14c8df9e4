use clap::Parser;
use std::io;
use std::path::PathBuf;
use stock_ledger::persistence::{DEFAULT_CSV_PATH, DEFAULT_JSON_PATH};
use stock_ledger::{load, DataFiles, Inventory, LedgerConfig, LoadSource, Shell};

/// Interactive product inventory ledger backed by CSV/JSON files
#[derive(Parser, Debug)]
#[command(name = "stock_ledger")]
#[command(version, about, long_about = None)]
struct Args {
    /// CSV data file, preferred when loading
    #[arg(long, default_value = DEFAULT_CSV_PATH)]
    csv: PathBuf,

    /// JSON data file, used when the CSV file is missing or unreadable
    #[arg(long, default_value = DEFAULT_JSON_PATH)]
    json: PathBuf,

    /// Where the stock status chart is written
    #[arg(long, default_value = stock_ledger::chart::DEFAULT_CHART_PATH)]
    chart: PathBuf,
}

fn main() {
    // Initialize logger. Set RUST_LOG environment variable to control log level.
    // Examples: RUST_LOG=info, RUST_LOG=warn, RUST_LOG=stock_ledger=debug
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = LedgerConfig {
        files: DataFiles::new(args.csv, args.json),
        chart_path: args.chart,
    };

    log::info!("Starting stock ledger");
    let outcome = load(&config.files);
    match &outcome.source {
        LoadSource::Csv(path) | LoadSource::Json(path) => println!(
            "Loaded {} products from {}",
            outcome.products.len(),
            path.display()
        ),
        LoadSource::Empty => println!("No data file found. Starting with an empty list."),
    }
    let inventory = Inventory::from_products(outcome.products);

    let stdin = io::stdin();
    let mut shell = Shell::new(stdin.lock(), io::stdout(), inventory, config);
    if let Err(e) = shell.run() {
        log::error!("Console error: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
