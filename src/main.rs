use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    chaostype::cli::run_cli().await
}
