use anyhow::Context;
use clap::{Parser, Subcommand};

use bookstand_app::modules::catalog::models::NewBook;
use bookstand_app::modules::catalog::store::CatalogStore;
use bookstand_generator::GeminiClient;
use bookstand_kernel::settings::Settings;

#[derive(Parser)]
#[command(name = "bookstand", about = "Generated-catalog bookstore storefront")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the storefront HTTP server.
    Serve,
    /// Generate one catalog batch and print it as JSON.
    Generate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => bookstand_app::run().await,
        Command::Generate => generate().await,
    }
}

/// One-shot generation to stdout, enriched with ids and cover colors the
/// same way the server store does it.
async fn generate() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Bookstand settings")?;
    bookstand_telemetry::init(&settings.telemetry);

    let client = GeminiClient::from_settings(&settings.generator)
        .context("generator client unavailable")?;
    let books = client
        .generate_catalog()
        .await
        .context("catalog generation failed")?;

    let mut store = CatalogStore::new();
    store.replace_all(books.into_iter().map(NewBook::from).collect());

    println!("{}", serde_json::to_string_pretty(store.books())?);
    Ok(())
}
