use clap::Parser;
use sketchroom_server::{ServerArgs, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sketchroom_server=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from(ServerArgs::parse());
    sketchroom_server::serve(config).await?;
    Ok(())
}
