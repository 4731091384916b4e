#[tokio::main]
async fn main() -> anyhow::Result<()> {
    places_server::start_server().await
}
