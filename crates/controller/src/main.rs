#[tokio::main]
async fn main() -> controller::Result<()> {
    controller::init_tracing();
    tracing::info!(version = controller::VERSION, "controller starting");
    controller::run().await
}
