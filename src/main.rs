#[tokio::main]
async fn main() -> anyhow::Result<()> {
    crewsense_lib::run().await
}
