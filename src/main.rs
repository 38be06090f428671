use std::sync::Arc;

use fileserver::config::Config;
use fileserver::server::Listener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;

    if !cfg.document_root.is_dir() {
        tracing::error!(
            document_root = %cfg.document_root.display(),
            "Document root does not exist"
        );
        anyhow::bail!("document root {} does not exist", cfg.document_root.display());
    }

    let listener = Listener::bind(Arc::new(cfg)).await?;
    let stop = listener.stop_handle();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            stop.stop();
        }
    });

    listener.run().await?;

    Ok(())
}
