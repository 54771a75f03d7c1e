//! admin-console: smoke run against a live backend
//!
//! ```text
//! admin-console [products|users [1d|1w|1m|3m|6m]|pending]
//! ```

use admin_client::logger::init_logger_with_level;
use admin_client::users::{ReportRange, export_csv};
use admin_client::{
    CatalogEditor, ClientConfig, ConsoleApi, EventBus, JsonFileStore, KeyValueStore, MemoryStore,
    MyMemoryTranslator, NetworkHttpClient, UserManagement,
};
use anyhow::Context;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment and logging
    dotenv::dotenv().ok();
    let config = ClientConfig::from_env();
    init_logger_with_level(Some(&config.log_level), false);

    tracing::info!(backend = %config.base_url, "Admin console starting");

    // 2. Backend and translator clients
    let api: Arc<dyn ConsoleApi> =
        Arc::new(NetworkHttpClient::new(&config).context("building HTTP client")?);
    let translator = Arc::new(MyMemoryTranslator::new(&config).context("building translator")?);
    let store: Arc<dyn KeyValueStore> = match &config.state_path {
        Some(path) => Arc::new(JsonFileStore::new(path)),
        None => Arc::new(MemoryStore::new()),
    };
    let bus = EventBus::new();

    let mut args = std::env::args().skip(1);
    match args.next().as_deref().unwrap_or("products") {
        "products" => {
            let mut editor = CatalogEditor::new(Arc::clone(&api), translator, &config);
            editor.subscribe(&bus);
            let count = editor.mount().await.context("loading catalog")?;
            let snapshot = editor.snapshot();
            println!("{count} products, {} categories", snapshot.categories.len());
            for product in &snapshot.products {
                println!(
                    "{:>6}  {:<32} {:>10}  {}",
                    product.id,
                    product.name.en,
                    product.price,
                    if product.is_disabled { "disabled" } else { "" }
                );
            }
        }
        "users" => {
            let range: ReportRange = args.next().as_deref().unwrap_or("1d").parse()?;
            let today = chrono::Local::now().date_naive();
            let users = UserManagement::new(api, store, bus.clone(), today).await;
            let rows = users
                .report()
                .load(today, range)
                .await
                .context("loading user activity")?;
            print!("{}", export_csv(&rows)?);
        }
        "pending" => {
            let pending = api.pending_users().await.context("loading pending users")?;
            println!("{} pending approval(s)", pending.len());
        }
        other => anyhow::bail!("unknown command `{other}`"),
    }

    bus.shutdown();
    Ok(())
}
