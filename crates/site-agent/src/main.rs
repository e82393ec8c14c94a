#[tokio::main]
async fn main() -> site_agent::Result<()> {
    site_agent::init_tracing();
    tracing::info!(version = site_agent::VERSION, "site agent starting");
    site_agent::run().await
}
