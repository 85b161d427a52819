use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use mmcartbox::oracle::OracleClient;
use mmcartbox::server;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let oracle = OracleClient::from_env();
    if oracle.is_some() {
        tracing::info!("oracle credential found, remote suggestions enabled");
    } else {
        tracing::info!("no oracle credential, serving local suggestions only");
    }

    let app = server::app(Arc::new(oracle));

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "mmcartbox server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
