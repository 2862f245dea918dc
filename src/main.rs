#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bookstand_app::run().await
}
