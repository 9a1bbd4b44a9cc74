use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    certview::cli::start().await
}
