use anyhow::Result;
use daybrief::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
