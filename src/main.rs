pub mod config;
pub mod data;
pub mod figures;
pub mod geo;
pub mod layout;
pub mod pages;
pub mod server;
pub mod stats;
pub mod theme;
pub mod types;
pub mod util;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard
    Serve {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
    /// Load the dataset and print diagnostics without serving
    Inspect {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve { config } => {
            let app_config = config::AppConfig::load_from_file(config)?;

            let (table, report) = data::load_table(&app_config)?;
            info!(
                total = report.total_rows,
                loaded = report.loaded_rows,
                skipped = report.parse_errors,
                "dataset loaded"
            );

            server::start_server(app_config, table).await?;
        }
        Commands::Inspect { config } => {
            let app_config = config::AppConfig::load_from_file(config)?;

            let (table, report) = data::load_table(&app_config)?;
            println!("Dataset: {:?}", app_config.input.data_csv);
            println!("Columns: {}", table.columns.join(", "));
            println!(
                "Rows: {} read, {} loaded, {} skipped (parse errors)",
                util::format_int(report.total_rows as i64),
                util::format_int(report.loaded_rows as i64),
                util::format_int(report.parse_errors as i64)
            );

            let dates: Vec<_> = table.rows.iter().filter_map(|r| r.date).collect();
            match (dates.iter().min(), dates.iter().max()) {
                (Some(min), Some(max)) => println!("Date range: {} to {}", min, max),
                _ => println!("Date range: no parseable dates"),
            }
        }
    }

    Ok(())
}
