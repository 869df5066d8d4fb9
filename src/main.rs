use tracing::error;
use tracing_subscriber::EnvFilter;

use wares::{Config, Server, Store, products};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wares=info")),
        )
        .init();

    if let Err(e) = run().await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), wares::Error> {
    let config = Config::from_env()?;
    let store = Store::open(&config.products_file).await?;

    Server::bind(config.socket_addr())
        .serve(products::routes(store))
        .await
}
