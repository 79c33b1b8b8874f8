use anyhow::Result;
use explain_bridge::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run_cli().await
}
