use clap::Parser;
use gram_atlas::dataset::{self, LocationStore};
use gram_atlas::dispatch::{self, Params};
use std::path::PathBuf;

/// Gram Atlas: hierarchical location directory server.
///
/// Serves states, districts, blocks and villages from a static JSON
/// dataset through a single parameter-driven endpoint.
///
/// Examples:
///   gramatlas
///   gramatlas --port 8080 --data ./data/locations.json
///   gramatlas --query
///   gramatlas --query --state odisha --district khordha
///   gramatlas --query --type villages --state odisha --district khordha --block jankia
#[derive(Parser)]
#[command(name = "gramatlas", version, about, long_about = None)]
struct Cli {
    /// Path to the dataset JSON file. Defaults to $GRAM_ATLAS_DATA,
    /// then ./data/locations.json, then the user data directory.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Host to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind.
    #[arg(long, short = 'p', default_value_t = 8000)]
    port: u16,

    /// Run one lookup and print the response instead of serving.
    #[arg(long, short = 'q')]
    query: bool,

    /// State filter (one-shot mode).
    #[arg(long)]
    state: Option<String>,

    /// District filter (one-shot mode).
    #[arg(long)]
    district: Option<String>,

    /// Block filter (one-shot mode).
    #[arg(long)]
    block: Option<String>,

    /// Explicit lookup type: states, districts, blocks, or villages.
    #[arg(long = "type")]
    kind: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // ── Load the dataset ────────────────────────────────────────

    let path = cli.data.clone().unwrap_or_else(dataset::default_data_path);
    let store = LocationStore::new(dataset::load_or_empty(&path));
    eprintln!(
        "  Dataset: {} ({} states)",
        path.display(),
        store.state_count()
    );

    // ── One-shot query or serve ─────────────────────────────────

    if cli.query {
        run_query(&cli, &store);
        return;
    }

    gram_atlas::server::start(&cli.host, cli.port, store).await;
}

fn run_query(cli: &Cli, store: &LocationStore) {
    let params = Params::from_raw(
        cli.state.as_deref(),
        cli.district.as_deref(),
        cli.block.as_deref(),
        cli.kind.as_deref(),
    );

    match dispatch::dispatch(store, &params) {
        Ok(envelope) => {
            println!("{}", serde_json::to_string_pretty(&envelope).unwrap());
        }
        Err(e) => {
            eprintln!("Error: {}. {}", e, e.message_text());
            std::process::exit(1);
        }
    }
}
