use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use storefront::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("storefront=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting storefront");

    let path = std::env::args().nth(1).unwrap_or_else(|| "/".to_string());
    let config = Config::load()?;
    let app = App::new(config)?;

    let output = app.render(&path).await?;
    print!("{}", output);
    Ok(())
}
