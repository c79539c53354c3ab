//! Fetch one page of a list endpoint through the state primitives.
//!
//! Usage: `panel-state [PATH] [KEYWORD] [PAGE_SIZE]`, e.g.
//! `panel-state /projects acme 25`. A page size given on the command line is
//! saved to the local store and reused by later runs that omit it.

use std::sync::Arc;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use panel_state::adapters::{FileStore, RestClient};
use panel_state::state::{ApiOptions, ApiResource, FilterSet, PageUpdate, Paginator, PersistentValue};
use panel_state::traits::{ApiBackend, KeyValueStore};
use panel_state::StateConfig;
use serde_json::{json, Value};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const PAGE_SIZE_KEY: &str = "panel-state.page_size";

fn main() -> Result<()> {
    if std::env::args().any(|arg| arg == "--version") {
        println!("panel-state {}", VERSION);
        return Ok(());
    }

    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("panel_state=info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "/projects".to_string());
    let keyword = args.next().unwrap_or_default();
    let requested_size = args
        .next()
        .map(|raw| {
            raw.parse::<u64>()
                .map_err(|err| eyre!("invalid page size '{}': {}", raw, err))
        })
        .transpose()?;

    let config = StateConfig::from_env();
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(config, path, keyword, requested_size))
}

async fn run(config: StateConfig, path: String, keyword: String, requested_size: Option<u64>) -> Result<()> {
    let store: Arc<dyn KeyValueStore> = match &config.store_path {
        Some(path) => Arc::new(FileStore::with_path(path)),
        None => Arc::new(FileStore::new()?),
    };
    let mut page_size = PersistentValue::new(store, PAGE_SIZE_KEY, config.page_size);
    if let Some(size) = requested_size {
        page_size.set_value(size.max(1));
        tracing::info!(page_size = *page_size.value(), "Saved page size");
    }

    let mut filters = FilterSet::from_pairs([("status", json!("all")), ("keyword", json!(""))]);
    filters.set("keyword", keyword);

    let mut paginator = Paginator::new(*page_size.value());

    let backend: Arc<dyn ApiBackend> = Arc::new(RestClient::from_config(&config));
    let list: ApiResource<Vec<(String, String)>, Value> =
        ApiResource::get(backend, path.clone(), ApiOptions::from_config(&config));

    let mut query = filters.to_query_pairs();
    query.extend(paginator.params().to_query_pairs());
    tracing::info!(%path, filters = filters.active_count(), page = paginator.page(), "Fetching list");

    let body = list.execute(query).await.map_err(|message| eyre!(message))?;

    if let Ok(update) = serde_json::from_value::<PageUpdate>(body.clone()) {
        paginator.update_from_response(update);
    }

    println!("{}", serde_json::to_string_pretty(&body)?);
    match paginator.item_range() {
        Some((first, last)) => println!(
            "Items {}-{} of {} (page {}/{})",
            first,
            last,
            paginator.total(),
            paginator.page(),
            paginator.total_pages()
        ),
        None => println!("No items"),
    }

    Ok(())
}
