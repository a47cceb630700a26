use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    puzzterm::cli::run_cli().await
}
